//! Map view collaborator and marker registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Coords, LocationId};

/// Animation settings for `MapView::fly_to`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlyToOptions {
    #[serde(default = "default_animate")]
    pub animate: bool,
    /// Animation length in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
    #[serde(default = "default_ease_linearity")]
    pub ease_linearity: f64,
}

const fn default_animate() -> bool {
    true
}

const fn default_duration_secs() -> f64 {
    1.0
}

const fn default_ease_linearity() -> f64 {
    0.2
}

impl Default for FlyToOptions {
    fn default() -> Self {
        Self {
            animate: default_animate(),
            duration_secs: default_duration_secs(),
            ease_linearity: default_ease_linearity(),
        }
    }
}

/// Popup content attached to a marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub body: String,
    /// Keep the popup open when the map is clicked elsewhere
    pub sticky: bool,
}

impl Popup {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            sticky: false,
        }
    }

    #[must_use]
    pub const fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }
}

/// The interactive map the locations are drawn on.
///
/// Implementations own rendering and animation; the core only places and
/// removes markers through the handles this trait hands out.
pub trait MapView {
    /// Opaque reference to a placed marker
    type Handle;

    /// Center the map without animation
    fn set_view(&mut self, center: Coords, zoom: u8);

    /// Animate the map to `target`
    fn fly_to(&mut self, target: Coords, zoom: u8, options: &FlyToOptions);

    /// Place a marker with a bound popup
    fn add_marker(&mut self, coords: Coords, popup: &Popup) -> Self::Handle;

    /// Open the popup bound to a placed marker
    fn open_popup(&mut self, handle: &Self::Handle);

    /// Remove a marker from the map and release its handle
    fn remove_marker(&mut self, handle: Self::Handle);
}

/// Mapping from location identity to its marker handle
#[derive(Debug)]
pub struct MarkerRegistry<H> {
    markers: HashMap<LocationId, H>,
}

impl<H> Default for MarkerRegistry<H> {
    fn default() -> Self {
        Self {
            markers: HashMap::new(),
        }
    }
}

impl<H> MarkerRegistry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle, returning the one it replaces
    pub fn insert(&mut self, id: LocationId, handle: H) -> Option<H> {
        self.markers.insert(id, handle)
    }

    pub fn get(&self, id: &LocationId) -> Option<&H> {
        self.markers.get(id)
    }

    pub fn remove(&mut self, id: &LocationId) -> Option<H> {
        self.markers.remove(id)
    }

    pub fn contains(&self, id: &LocationId) -> bool {
        self.markers.contains_key(id)
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<LocationId> {
        let mut ids = self.markers.keys().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    /// Remove every entry and hand back the released handles
    pub fn drain(&mut self) -> Vec<H> {
        self.markers.drain().map(|(_, handle)| handle).collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
