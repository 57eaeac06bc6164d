//! Location model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::category::normalize_kind;
use crate::error::{Error, Result};

/// Identity of a saved location.
///
/// New ids are UUID v7 strings. Ids from older snapshots (timestamp digits)
/// are kept verbatim, so the id is stored as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    /// Create a new unique location ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocationId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("location id cannot be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for LocationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A latitude/longitude pair, persisted as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both components are finite and inside WGS84 bounds.
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(Error::InvalidInput(format!(
                "coordinates must be finite, got {self}"
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidInput(format!(
                "latitude {} is outside [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidInput(format!(
                "longitude {} is outside [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl FromStr for Coords {
    type Err = Error;

    /// Parse `"lat,lng"` (whitespace around either part is ignored).
    fn from_str(s: &str) -> Result<Self> {
        let Some((lat, lng)) = s.split_once(',') else {
            return Err(Error::InvalidInput(format!(
                "expected coordinates as 'lat,lng', got '{s}'"
            )));
        };
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|error| Error::InvalidInput(format!("invalid coordinate '{part}': {error}")))
        };
        let coords = Self::new(parse(lat)?, parse(lng)?);
        coords.validate()?;
        Ok(coords)
    }
}

/// The user's category + note choice, before it is placed on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDraft {
    /// Category label or kind as chosen; normalized when the location is built
    pub kind: String,
    /// Free-form note
    pub notes: String,
    /// Display date, e.g. "Aug 21, 2024"
    pub created_at: String,
}

impl LocationDraft {
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        notes: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            notes: notes.into(),
            created_at: created_at.into(),
        }
    }
}

/// A saved location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier
    pub id: LocationId,
    /// Normalized category, e.g. `want-to-go`
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form note
    #[serde(default)]
    pub notes: String,
    /// Display date (not used for ordering)
    pub created_at: String,
    /// Where the location is
    pub coords: Coords,
}

impl Location {
    /// Build a location from a draft with a fresh id.
    #[must_use]
    pub fn from_draft(draft: LocationDraft, coords: Coords) -> Self {
        Self {
            id: LocationId::new(),
            kind: normalize_kind(&draft.kind),
            notes: draft.notes,
            created_at: draft.created_at,
            coords,
        }
    }

    /// Check a record decoded from storage.
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(Error::InvalidInput("location id is empty".into()));
        }
        if normalize_kind(&self.kind).is_empty() {
            return Err(Error::InvalidInput(format!(
                "location {} has an empty type",
                self.id
            )));
        }
        self.coords.validate()
    }

    /// Case-insensitive kind comparison against an already normalized kind.
    #[must_use]
    pub fn has_kind(&self, kind: &str) -> bool {
        normalize_kind(&self.kind) == kind
    }
}
