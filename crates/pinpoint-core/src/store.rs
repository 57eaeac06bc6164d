//! The authoritative location collection and its persisted snapshot.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::map::MarkerRegistry;
use crate::models::{normalize_kind, Coords, Location, LocationDraft, LocationId};
use crate::storage::KeyValueStore;

/// Key the snapshot is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "locations";

/// What `LocationStore::initialize` found in the key-value store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing was stored yet
    Empty,
    /// The snapshot was read; `rejected` records failed validation and were dropped
    Loaded { count: usize, rejected: usize },
    /// The stored value is not a location array; nothing was loaded
    Corrupt { reason: String },
    /// The backend could not be read; nothing was loaded
    Unavailable { reason: String },
}

/// Locations decoded from a snapshot payload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSnapshot {
    pub locations: Vec<Location>,
    pub rejected: usize,
}

/// Decode a snapshot payload.
///
/// A payload that is not a JSON array is `MalformedPersistedData`. Inside the
/// array, records that fail to decode or validate, or that repeat an earlier
/// id, are dropped and counted in `rejected`. Kinds of kept records are
/// normalized.
pub fn decode_snapshot(payload: &str) -> Result<DecodedSnapshot> {
    let records = serde_json::from_str::<Vec<serde_json::Value>>(payload)
        .map_err(|error| Error::MalformedPersistedData(error.to_string()))?;

    let mut seen = HashSet::new();
    let mut locations = Vec::with_capacity(records.len());
    let mut rejected = 0;

    for (index, record) in records.into_iter().enumerate() {
        let mut location = match serde_json::from_value::<Location>(record) {
            Ok(location) => location,
            Err(error) => {
                tracing::warn!("Dropping unreadable location record #{index}: {error}");
                rejected += 1;
                continue;
            }
        };
        if let Err(error) = location.validate() {
            tracing::warn!("Dropping invalid location record #{index}: {error}");
            rejected += 1;
            continue;
        }
        location.kind = normalize_kind(&location.kind);
        if !seen.insert(location.id.clone()) {
            tracing::warn!(
                "Dropping location record #{index}: duplicate id {}",
                location.id
            );
            rejected += 1;
            continue;
        }
        locations.push(location);
    }

    Ok(DecodedSnapshot {
        locations,
        rejected,
    })
}

/// Owner of the location collection, its durable snapshot, and the marker
/// registry. `H` is the marker handle type of the map in use.
pub struct LocationStore<S, H> {
    backend: S,
    key: String,
    locations: Vec<Location>,
    markers: MarkerRegistry<H>,
    /// The last load failed to read the backend, so a snapshot may exist that
    /// the collection does not reflect
    unread_snapshot: bool,
}

impl<S: KeyValueStore, H> LocationStore<S, H> {
    /// Create an empty store persisting under the default key
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    /// Create an empty store persisting under `key`
    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            locations: Vec::new(),
            markers: MarkerRegistry::new(),
            unread_snapshot: false,
        }
    }

    /// Replace the in-memory collection with the persisted snapshot.
    ///
    /// Never fails: missing, corrupt, or unreadable data leaves the
    /// collection empty and is reported through the outcome. Nothing is
    /// written back. After an unreadable load the store refuses to persist
    /// until a later load succeeds or the snapshot is cleared.
    pub fn initialize(&mut self) -> LoadOutcome {
        self.locations.clear();
        self.unread_snapshot = false;

        let payload = match self.backend.get(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::info!("No saved locations under '{}'", self.key);
                return LoadOutcome::Empty;
            }
            Err(error) => {
                tracing::error!("Failed to read saved locations: {error}");
                self.unread_snapshot = true;
                return LoadOutcome::Unavailable {
                    reason: error.to_string(),
                };
            }
        };

        match decode_snapshot(&payload) {
            Ok(decoded) => {
                let count = decoded.locations.len();
                self.locations = decoded.locations;
                tracing::info!(
                    "Loaded {count} saved locations ({} rejected)",
                    decoded.rejected
                );
                LoadOutcome::Loaded {
                    count,
                    rejected: decoded.rejected,
                }
            }
            Err(error) => {
                tracing::warn!(
                    "Ignoring corrupt location snapshot under '{}': {error}",
                    self.key
                );
                LoadOutcome::Corrupt {
                    reason: error.to_string(),
                }
            }
        }
    }

    /// Write the whole collection under the storage key
    pub fn persist(&mut self) -> Result<()> {
        if self.unread_snapshot {
            return Err(Error::SnapshotNotLoaded);
        }
        let payload = serde_json::to_string(&self.locations)?;
        self.backend.set(&self.key, &payload)?;
        tracing::debug!("Persisted {} locations", self.locations.len());
        Ok(())
    }

    /// Create a location from a draft, append it, and persist.
    ///
    /// If persisting fails the location is not kept.
    pub fn add(&mut self, draft: LocationDraft, coords: Coords) -> Result<Location> {
        coords.validate()?;
        let location = Location::from_draft(draft, coords);
        if location.kind.is_empty() {
            return Err(Error::InvalidInput("location type cannot be empty".into()));
        }

        self.locations.push(location.clone());
        if let Err(error) = self.persist() {
            self.locations.pop();
            return Err(error);
        }

        tracing::info!("Saved location {} ({})", location.id, location.kind);
        Ok(location)
    }

    /// Remove a location and persist.
    ///
    /// The marker registry is left to the caller, which reconciles the map
    /// once the snapshot is durable.
    pub fn remove(&mut self, id: &LocationId) -> Result<Location> {
        let index = self
            .locations
            .iter()
            .position(|location| &location.id == id)
            .ok_or_else(|| Error::LocationNotFound(id.clone()))?;

        let removed = self.locations.remove(index);
        if let Err(error) = self.persist() {
            self.locations.insert(index, removed);
            return Err(error);
        }

        tracing::info!("Removed location {id}");
        Ok(removed)
    }

    /// Look up a location by id
    pub fn find_by_id(&self, id: &LocationId) -> Option<&Location> {
        self.locations.iter().find(|location| &location.id == id)
    }

    /// All locations in insertion order
    pub fn all(&self) -> &[Location] {
        &self.locations
    }

    /// Erase the persisted snapshot and the collection.
    ///
    /// Returns the released marker handles so they can be taken off the map.
    pub fn clear(&mut self) -> Result<Vec<H>> {
        self.backend.remove(&self.key)?;
        self.unread_snapshot = false;
        let count = self.locations.len();
        self.locations.clear();
        tracing::info!("Cleared {count} saved locations");
        Ok(self.markers.drain())
    }

    /// Distinct kinds in order of first appearance
    pub fn kinds(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.locations
            .iter()
            .filter(|location| seen.insert(location.kind.as_str()))
            .map(|location| location.kind.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub const fn markers(&self) -> &MarkerRegistry<H> {
        &self.markers
    }

    pub fn markers_mut(&mut self) -> &mut MarkerRegistry<H> {
        &mut self.markers
    }

    /// Borrow the collection and the marker registry at the same time
    pub fn split_mut(&mut self) -> (&[Location], &mut MarkerRegistry<H>) {
        (&self.locations, &mut self.markers)
    }

    /// The underlying key-value store
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }
}
