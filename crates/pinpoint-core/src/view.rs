//! Keeps the active tab, the list rows, and the map markers consistent with
//! the location store.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::map::{FlyToOptions, MapView, MarkerRegistry, Popup};
use crate::models::{kind_label, normalize_kind, Location, LocationId};
use crate::storage::KeyValueStore;
use crate::store::LocationStore;
use crate::ui::ListSurface;

/// The selected list tab
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    /// Every location
    #[default]
    All,
    /// Locations of one normalized kind
    Kind(String),
}

impl Tab {
    /// Tab for a category label or kind (normalized)
    #[must_use]
    pub fn kind(label: &str) -> Self {
        Self::Kind(normalize_kind(label))
    }

    /// Whether a location is visible under this tab
    #[must_use]
    pub fn matches(&self, location: &Location) -> bool {
        match self {
            Self::All => true,
            Self::Kind(kind) => location.has_kind(kind),
        }
    }
}

impl FromStr for Tab {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = normalize_kind(s);
        if normalized.is_empty() || normalized == "all" {
            Ok(Self::All)
        } else {
            Ok(Self::Kind(normalized))
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Kind(kind) => f.write_str(kind),
        }
    }
}

/// Filter `locations` for `tab`, keeping insertion order.
#[must_use]
pub fn render_tab(tab: &Tab, locations: &[Location]) -> Vec<Location> {
    locations
        .iter()
        .filter(|location| tab.matches(location))
        .cloned()
        .collect()
}

/// Popup shown on a saved location's marker
#[must_use]
pub fn marker_popup(location: &Location) -> Popup {
    let body = if location.notes.trim().is_empty() {
        location.created_at.clone()
    } else {
        format!("{}\n{}", location.created_at, location.notes.trim())
    };
    Popup::new(kind_label(&location.kind), body)
}

/// Map settings the synchronizer needs for `focus`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusSettings {
    pub zoom: u8,
    pub fly_to: FlyToOptions,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            zoom: 15,
            fly_to: FlyToOptions::default(),
        }
    }
}

/// Drives the map and list collaborators from the location store
pub struct ViewSynchronizer<M, L> {
    map: M,
    list: L,
    active_tab: Tab,
    focus: FocusSettings,
}

impl<M: MapView, L: ListSurface> ViewSynchronizer<M, L> {
    pub fn new(map: M, list: L, focus: FocusSettings) -> Self {
        Self {
            map,
            list,
            active_tab: Tab::All,
            focus,
        }
    }

    pub const fn active_tab(&self) -> &Tab {
        &self.active_tab
    }

    /// Switch tabs and re-render the list
    pub fn select_tab<S: KeyValueStore>(
        &mut self,
        tab: Tab,
        store: &LocationStore<S, M::Handle>,
    ) -> Vec<Location> {
        tracing::debug!("Selecting tab '{tab}'");
        self.active_tab = tab;
        self.render(store)
    }

    /// Recompute the active tab's rows and push them to the list
    pub fn render<S: KeyValueStore>(&mut self, store: &LocationStore<S, M::Handle>) -> Vec<Location> {
        let visible = render_tab(&self.active_tab, store.all());
        self.list.render_rows(&visible);
        visible
    }

    /// Place a marker for every location and render the list
    pub fn render_all<S: KeyValueStore>(
        &mut self,
        store: &mut LocationStore<S, M::Handle>,
    ) -> Vec<Location> {
        let (locations, markers) = store.split_mut();
        for location in locations {
            self.materialize_marker(markers, location, false);
        }
        self.render(store)
    }

    /// Place a marker for `location` and register it.
    ///
    /// An already registered marker for the same id is replaced.
    pub fn materialize_marker(
        &mut self,
        markers: &mut MarkerRegistry<M::Handle>,
        location: &Location,
        open_popup: bool,
    ) {
        let popup = marker_popup(location);
        let handle = self.map.add_marker(location.coords, &popup);
        if open_popup {
            self.map.open_popup(&handle);
        }
        if let Some(previous) = markers.insert(location.id.clone(), handle) {
            tracing::debug!("Replacing existing marker for {}", location.id);
            self.map.remove_marker(previous);
        }
    }

    /// Fly to a location and open its popup.
    ///
    /// A location whose marker went missing gets a new one.
    pub fn focus<S: KeyValueStore>(
        &mut self,
        store: &mut LocationStore<S, M::Handle>,
        id: &LocationId,
    ) -> Result<Location> {
        let location = store
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::LocationNotFound(id.clone()))?;

        self.map
            .fly_to(location.coords, self.focus.zoom, &self.focus.fly_to);

        if let Some(handle) = store.markers().get(id) {
            self.map.open_popup(handle);
        } else {
            tracing::warn!("No marker registered for {id}; placing a new one");
            self.materialize_marker(store.markers_mut(), &location, true);
        }
        Ok(location)
    }

    /// Take a deleted location's marker off the map and drop its row
    pub fn reconcile_after_delete(
        &mut self,
        markers: &mut MarkerRegistry<M::Handle>,
        id: &LocationId,
    ) {
        match markers.remove(id) {
            Some(handle) => self.map.remove_marker(handle),
            None => tracing::debug!("No marker registered for deleted location {id}"),
        }
        self.list.remove_row(id);
    }

    /// Remove a batch of released marker handles from the map
    pub fn clear_markers(&mut self, handles: Vec<M::Handle>) {
        for handle in handles {
            self.map.remove_marker(handle);
        }
    }

    pub const fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub const fn list(&self) -> &L {
        &self.list
    }
}
