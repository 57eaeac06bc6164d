//! Recording collaborators shared by the unit tests.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::map::{FlyToOptions, MapView, Popup};
use crate::models::{Coords, Location, LocationId};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::ui::{ListSurface, Notification, Notifier};

/// Store whose writes always fail
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Storage("disk full".into()))
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Err(Error::Storage("disk full".into()))
    }
}

/// Store whose reads fail while `readable` is false
#[derive(Debug, Clone, Default)]
pub struct UnreadableStore {
    pub inner: MemoryStore,
    pub readable: bool,
}

impl UnreadableStore {
    pub const fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            readable: false,
        }
    }
}

impl KeyValueStore for UnreadableStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.readable {
            self.inner.get(key)
        } else {
            Err(Error::Storage("backend locked".into()))
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

#[derive(Debug, Default)]
pub struct RecordingMap {
    next_handle: u32,
    pub markers: BTreeMap<u32, (Coords, Popup)>,
    pub opened: Vec<u32>,
    pub removed: Vec<u32>,
    pub views: Vec<(Coords, u8)>,
    pub flights: Vec<(Coords, u8)>,
}

impl MapView for RecordingMap {
    type Handle = u32;

    fn set_view(&mut self, center: Coords, zoom: u8) {
        self.views.push((center, zoom));
    }

    fn fly_to(&mut self, target: Coords, zoom: u8, _options: &FlyToOptions) {
        self.flights.push((target, zoom));
    }

    fn add_marker(&mut self, coords: Coords, popup: &Popup) -> u32 {
        self.next_handle += 1;
        self.markers
            .insert(self.next_handle, (coords, popup.clone()));
        self.next_handle
    }

    fn open_popup(&mut self, handle: &u32) {
        self.opened.push(*handle);
    }

    fn remove_marker(&mut self, handle: u32) {
        self.markers.remove(&handle);
        self.removed.push(handle);
    }
}

#[derive(Debug, Default)]
pub struct RecordingList {
    pub rows: Vec<LocationId>,
    pub renders: usize,
}

impl ListSurface for RecordingList {
    fn render_rows(&mut self, locations: &[Location]) {
        self.rows = locations
            .iter()
            .map(|location| location.id.clone())
            .collect();
        self.renders += 1;
    }

    fn remove_row(&mut self, id: &LocationId) {
        self.rows.retain(|row| row != id);
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notifications: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn last_message(&self) -> Option<&str> {
        self.notifications
            .last()
            .map(|notification| notification.message.as_str())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
