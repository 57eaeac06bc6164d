//! Terminal implementations of the map, list, and notification surfaces.
//!
//! There is no map to draw in a terminal, so `TerminalMap` only tracks the
//! camera and placed markers and logs what a graphical map would do.

use std::collections::BTreeMap;

use pinpoint_core::map::{FlyToOptions, MapView, Popup};
use pinpoint_core::ui::{ListSurface, Notification, NotificationKind, Notifier};
use pinpoint_core::{Coords, Location, LocationId};
use tracing::Level;

#[derive(Debug, Default)]
pub struct TerminalMap {
    next_handle: usize,
    markers: BTreeMap<usize, (Coords, Popup)>,
    center: Option<(Coords, u8)>,
    active_popup: Option<usize>,
}

impl TerminalMap {
    /// Current camera position and zoom
    pub const fn center(&self) -> Option<(Coords, u8)> {
        self.center
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Popup currently open, if any
    pub fn active_popup(&self) -> Option<&Popup> {
        self.active_popup
            .and_then(|handle| self.markers.get(&handle))
            .map(|(_, popup)| popup)
    }
}

impl MapView for TerminalMap {
    type Handle = usize;

    fn set_view(&mut self, center: Coords, zoom: u8) {
        tracing::debug!("Map centered on {center} at zoom {zoom}");
        self.center = Some((center, zoom));
    }

    fn fly_to(&mut self, target: Coords, zoom: u8, options: &FlyToOptions) {
        tracing::debug!(
            "Flying to {target} at zoom {zoom} over {}s",
            options.duration_secs
        );
        self.center = Some((target, zoom));
    }

    fn add_marker(&mut self, coords: Coords, popup: &Popup) -> usize {
        self.next_handle += 1;
        self.markers
            .insert(self.next_handle, (coords, popup.clone()));
        self.next_handle
    }

    fn open_popup(&mut self, handle: &usize) {
        if self.markers.contains_key(handle) {
            self.active_popup = Some(*handle);
        }
    }

    fn remove_marker(&mut self, handle: usize) {
        self.markers.remove(&handle);
        if self.active_popup == Some(handle) {
            self.active_popup = None;
        }
    }
}

/// Keeps the rendered rows so commands can print them
#[derive(Debug, Default)]
pub struct TerminalList {
    rows: Vec<Location>,
}

impl TerminalList {
    pub fn rows(&self) -> &[Location] {
        &self.rows
    }
}

impl ListSurface for TerminalList {
    fn render_rows(&mut self, locations: &[Location]) {
        self.rows = locations.to_vec();
    }

    fn remove_row(&mut self, id: &LocationId) {
        self.rows.retain(|location| &location.id != id);
    }
}

/// Prints success messages to stderr and logs failures at `warn`.
///
/// Some failures (skipped or unreadable saved data) are only ever reported
/// through the notifier, so they must pass the default log filter.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    /// Suppress success output (used by machine-readable commands)
    pub const fn quiet() -> Self {
        Self { quiet: true }
    }
}

/// Log level for a notification; failures must pass the default `pinpoint=info` filter
pub const fn log_level(kind: NotificationKind) -> Level {
    match kind {
        NotificationKind::Success => Level::DEBUG,
        NotificationKind::Error => Level::WARN,
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        if notification.kind == NotificationKind::Success && !self.quiet {
            eprintln!("{}", notification.message);
        }
        if log_level(notification.kind) == Level::WARN {
            tracing::warn!("{}", notification.message);
        } else {
            tracing::debug!("{}", notification.message);
        }
    }
}
