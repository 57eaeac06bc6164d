//! Controller wiring the position source, selector, store, and views.
//!
//! Every operation reports its failure to the notifier before returning it,
//! and leaves the previous state untouched.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::map::{MapView, Popup};
use crate::models::{Coords, Location, LocationDraft, LocationId};
use crate::position::{PositionSource, PositionTracker, RequestToken};
use crate::selector::{LocationSelector, Selection};
use crate::storage::KeyValueStore;
use crate::store::{LoadOutcome, LocationStore};
use crate::ui::{ListSurface, Notification, Notifier};
use crate::view::{render_tab, Tab, ViewSynchronizer};

const POSITION_FAILED: &str = "Could not get your position.";
const LOCATE_FAILED: &str = "Could not retrieve your location. Please enable location services.";

/// The location bookmarking controller
pub struct App<S, M: MapView, L, N> {
    config: AppConfig,
    store: LocationStore<S, M::Handle>,
    view: ViewSynchronizer<M, L>,
    selector: LocationSelector,
    notifier: N,
    tracker: PositionTracker,
    position_marker: Option<M::Handle>,
    started: bool,
}

impl<S, M, L, N> App<S, M, L, N>
where
    S: KeyValueStore,
    M: MapView,
    L: ListSurface,
    N: Notifier,
{
    pub fn new(config: AppConfig, backend: S, map: M, list: L, notifier: N) -> Self {
        let store = LocationStore::with_key(backend, config.storage_key.clone());
        let view = ViewSynchronizer::new(map, list, config.focus_settings());
        let selector = LocationSelector::new(config.categories.iter().cloned());
        Self {
            config,
            store,
            view,
            selector,
            notifier,
            tracker: PositionTracker::new(),
            position_marker: None,
            started: false,
        }
    }

    /// Center the map on the user's position and load saved locations.
    ///
    /// Without a position the map stays uninitialized and nothing is loaded.
    pub async fn start<P: PositionSource>(&mut self, source: &P) -> Result<LoadOutcome> {
        match source.current_position().await {
            Ok(center) => Ok(self.initialize_map(center)),
            Err(error) => {
                tracing::warn!("Could not get position: {error}");
                self.notify_error(POSITION_FAILED);
                Err(error)
            }
        }
    }

    /// Center the map on `center`, load saved locations once, and render them.
    pub fn initialize_map(&mut self, center: Coords) -> LoadOutcome {
        self.view.map_mut().set_view(center, self.config.initial_zoom);
        self.place_position_marker(center);

        if self.started {
            tracing::debug!("Map already initialized; keeping loaded locations");
            self.view.render(&self.store);
            return LoadOutcome::Loaded {
                count: self.store.len(),
                rejected: 0,
            };
        }

        let outcome = self.store.initialize();
        self.started = true;
        match &outcome {
            LoadOutcome::Corrupt { .. } => {
                self.notify_error("Saved locations could not be read and were ignored.");
            }
            LoadOutcome::Unavailable { .. } => {
                self.notify_error("Saved locations are unavailable right now.");
            }
            LoadOutcome::Loaded { rejected, .. } if *rejected > 0 => {
                self.notify_error(format!("{rejected} saved locations were invalid and skipped."));
            }
            LoadOutcome::Loaded { .. } | LoadOutcome::Empty => {}
        }

        self.view.render_all(&mut self.store);
        outcome
    }

    /// A click on the map opens the selector for that point
    pub fn handle_map_click(&mut self, coords: Coords) {
        tracing::debug!("Map clicked at {coords}");
        self.selector.show(coords);
    }

    pub fn cancel_selection(&mut self) {
        self.selector.cancel();
    }

    /// Save the selector's choice at the clicked point
    pub fn confirm_selection(&mut self, selection: &Selection) -> Result<Location> {
        let ready = self.ensure_started();
        self.report(ready)?;
        let today = chrono::Local::now().date_naive();
        let confirmed = self.selector.confirm(selection, today);
        let (draft, coords) = self.report(confirmed)?;
        self.add_location(draft, coords)
    }

    /// Save a location, then show its marker and refresh the list
    pub fn add_location(&mut self, draft: LocationDraft, coords: Coords) -> Result<Location> {
        let added = self
            .ensure_started()
            .and_then(|()| self.store.add(draft, coords));
        let location = self.report(added)?;

        self.view
            .materialize_marker(self.store.markers_mut(), &location, true);
        self.view.render(&self.store);
        self.notify_success("Location saved.");
        Ok(location)
    }

    /// Delete a location and take it off the map and list
    pub fn delete(&mut self, id: &LocationId) -> Result<Location> {
        let removed = self.ensure_started().and_then(|()| self.store.remove(id));
        let location = self.report(removed)?;

        self.view
            .reconcile_after_delete(self.store.markers_mut(), id);
        self.notify_success("Location deleted.");
        Ok(location)
    }

    /// Fly to a saved location
    pub fn focus(&mut self, id: &LocationId) -> Result<Location> {
        let focused = self.view.focus(&mut self.store, id);
        self.report(focused)
    }

    /// Switch the list tab
    pub fn select_tab(&mut self, tab: Tab) -> Vec<Location> {
        self.view.select_tab(tab, &self.store)
    }

    /// Locations visible under the active tab
    pub fn visible(&self) -> Vec<Location> {
        render_tab(self.view.active_tab(), self.store.all())
    }

    /// Delete every saved location and its marker
    pub fn reset(&mut self) -> Result<usize> {
        let count = self.store.len();
        let cleared = self.ensure_started().and_then(|()| self.store.clear());
        let handles = self.report(cleared)?;

        self.view.clear_markers(handles);
        self.view.render(&self.store);
        self.notify_success("All locations cleared.");
        Ok(count)
    }

    /// Start a "locate me" request; older outstanding requests become stale
    pub fn begin_locate(&mut self) -> RequestToken {
        self.tracker.begin()
    }

    /// Apply a "locate me" result.
    ///
    /// Returns `Ok(false)` when a newer request superseded this one.
    pub fn finish_locate(&mut self, token: RequestToken, result: Result<Coords>) -> Result<bool> {
        if !self.tracker.is_current(token) {
            tracing::debug!("Discarding superseded position result {token:?}");
            return Ok(false);
        }

        let coords = match result {
            Ok(coords) => coords,
            Err(error) => {
                tracing::warn!("Locate failed: {error}");
                self.notify_error(LOCATE_FAILED);
                return Err(error);
            }
        };

        let zoom = self.config.locate_zoom;
        let options = self.config.fly_to;
        self.view.map_mut().fly_to(coords, zoom, &options);
        self.place_position_marker(coords);
        Ok(true)
    }

    /// Fly to the user's current position
    pub async fn locate_me<P: PositionSource>(&mut self, source: &P) -> Result<bool> {
        let token = self.begin_locate();
        let result = source.current_position().await;
        self.finish_locate(token, result)
    }

    pub const fn is_started(&self) -> bool {
        self.started
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub const fn store(&self) -> &LocationStore<S, M::Handle> {
        &self.store
    }

    pub const fn view(&self) -> &ViewSynchronizer<M, L> {
        &self.view
    }

    pub const fn selector(&self) -> &LocationSelector {
        &self.selector
    }

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Snapshot writes replace everything saved, so nothing may be written
    /// before the snapshot has been loaded
    const fn ensure_started(&self) -> Result<()> {
        if self.started {
            Ok(())
        } else {
            Err(Error::MapNotInitialized)
        }
    }

    fn place_position_marker(&mut self, coords: Coords) {
        let map = self.view.map_mut();
        if let Some(previous) = self.position_marker.take() {
            map.remove_marker(previous);
        }
        let handle = map.add_marker(coords, &Popup::new("You are here", "").sticky());
        map.open_popup(&handle);
        self.position_marker = Some(handle);
    }

    fn report<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            let message = match error {
                Error::PositionUnavailable(_) => POSITION_FAILED.to_string(),
                other => other.to_string(),
            };
            self.notify_error(message);
        }
        result
    }

    fn notify_success(&mut self, message: impl Into<String>) {
        let timeout = self.config.notification_timeout();
        self.notifier.notify(Notification::success(message, timeout));
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        let timeout = self.config.notification_timeout();
        self.notifier.notify(Notification::error(message, timeout));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::FixedPosition;
    use crate::storage::MemoryStore;
    use crate::store::DEFAULT_STORAGE_KEY;
    use crate::testing::{RecordingList, RecordingMap, RecordingNotifier, UnreadableStore};
    use crate::ui::NotificationKind;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    type TestApp = App<MemoryStore, RecordingMap, RecordingList, RecordingNotifier>;

    fn app_with(backend: MemoryStore) -> TestApp {
        App::new(
            AppConfig::default(),
            backend,
            RecordingMap::default(),
            RecordingList::default(),
            RecordingNotifier::default(),
        )
    }

    fn started_app() -> TestApp {
        let mut app = app_with(MemoryStore::new());
        app.initialize_map(Coords::new(0.0, 0.0));
        app
    }

    fn registry_matches_collection(app: &TestApp) -> bool {
        let stored = app
            .store()
            .all()
            .iter()
            .map(|location| location.id.clone())
            .collect::<BTreeSet<_>>();
        let registered = app.store().markers().ids().into_iter().collect::<BTreeSet<_>>();
        stored == registered
    }

    #[tokio::test]
    async fn start_centers_map_and_loads_saved_locations() {
        let backend = MemoryStore::with_entry(
            DEFAULT_STORAGE_KEY,
            r#"[{"id":"1","type":"favorite","notes":"","created_at":"Aug 21, 2024","coords":[1.0,2.0]},
                {"id":"2","type":"want-to-go","notes":"","created_at":"Aug 21, 2024","coords":[3.0,4.0]}]"#,
        );
        let mut app = app_with(backend);

        let outcome = app
            .start(&FixedPosition::new(Coords::new(52.5, 13.4)))
            .await
            .unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded { count: 2, rejected: 0 });
        assert!(app.is_started());
        assert_eq!(app.view().map().views, vec![(Coords::new(52.5, 13.4), 15)]);
        // two saved markers plus the position marker
        assert_eq!(app.view().map().markers.len(), 3);
        assert!(registry_matches_collection(&app));
        assert_eq!(app.view().list().rows.len(), 2);
    }

    #[tokio::test]
    async fn start_without_position_leaves_map_uninitialized() {
        let backend = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "[]");
        let mut app = app_with(backend);

        let error = app.start(&FixedPosition::unavailable()).await.unwrap_err();

        assert!(matches!(error, Error::PositionUnavailable(_)));
        assert!(!app.is_started());
        assert!(app.view().map().views.is_empty());
        assert_eq!(app.notifier().last_message(), Some(POSITION_FAILED));
    }

    #[test]
    fn initialize_map_loads_only_once() {
        let mut app = started_app();
        app.add_location(
            LocationDraft::new("visited", "", "Aug 21, 2024"),
            Coords::new(1.0, 1.0),
        )
        .unwrap();

        let outcome = app.initialize_map(Coords::new(5.0, 5.0));

        assert_eq!(outcome, LoadOutcome::Loaded { count: 1, rejected: 0 });
        assert_eq!(app.store().len(), 1);
        assert!(registry_matches_collection(&app));
    }

    #[test]
    fn corrupt_snapshot_is_reported() {
        let mut app = app_with(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "not json"));

        let outcome = app.initialize_map(Coords::new(0.0, 0.0));

        assert!(matches!(outcome, LoadOutcome::Corrupt { .. }));
        let last = app.notifier().notifications.last().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
        assert!(app.store().is_empty());
    }

    #[test]
    fn click_then_confirm_adds_marker_row_and_snapshot() {
        let mut app = started_app();
        app.handle_map_click(Coords::new(10.0, 20.0));

        let location = app
            .confirm_selection(&Selection::new("Want to go", "check this out"))
            .unwrap();

        assert_eq!(location.kind, "want-to-go");
        assert_eq!(location.coords, Coords::new(10.0, 20.0));
        assert!(!app.selector().is_visible());
        assert!(app.store().markers().contains(&location.id));
        assert_eq!(app.view().list().rows, vec![location.id.clone()]);
        let payload = app.store().backend().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let persisted: Vec<Location> = serde_json::from_str(&payload).unwrap();
        assert_eq!(persisted, vec![location]);
        assert_eq!(app.notifier().last_message(), Some("Location saved."));
    }

    #[test]
    fn confirm_without_category_notifies_and_saves_nothing() {
        let mut app = started_app();
        app.handle_map_click(Coords::new(10.0, 20.0));

        let error = app.confirm_selection(&Selection::default()).unwrap_err();

        assert!(matches!(error, Error::NoCategorySelected));
        assert_eq!(
            app.notifier().last_message(),
            Some("Please select a location type.")
        );
        assert!(app.store().is_empty());
        assert!(app.selector().is_visible());
    }

    #[test]
    fn add_under_other_tab_keeps_filtered_rows() {
        let mut app = started_app();
        app.select_tab(Tab::kind("favorite"));

        app.add_location(
            LocationDraft::new("visited", "", "Aug 21, 2024"),
            Coords::new(1.0, 1.0),
        )
        .unwrap();
        let favorite = app
            .add_location(
                LocationDraft::new("favorite", "", "Aug 21, 2024"),
                Coords::new(2.0, 2.0),
            )
            .unwrap();

        assert_eq!(app.view().list().rows, vec![favorite.id]);
        assert_eq!(app.visible().len(), 1);
        assert_eq!(app.store().markers().len(), 2);
    }

    #[test]
    fn registry_tracks_collection_across_adds_and_removes() {
        let mut app = started_app();
        let mut ids = Vec::new();
        for (index, kind) in ["visited", "favorite", "want-to-go", "visited", "favorite"]
            .into_iter()
            .enumerate()
        {
            let coords = Coords::new(f64::from(u8::try_from(index).unwrap()), 0.0);
            let location = app
                .add_location(LocationDraft::new(kind, "", "Aug 21, 2024"), coords)
                .unwrap();
            ids.push(location.id);
            assert!(registry_matches_collection(&app));
        }

        for id in [&ids[1], &ids[3], &ids[0]] {
            app.delete(id).unwrap();
            assert!(registry_matches_collection(&app));
        }

        assert_eq!(app.store().len(), 2);
        assert_eq!(app.view().list().rows, vec![ids[2].clone(), ids[4].clone()]);
    }

    #[test]
    fn delete_unknown_id_notifies_and_changes_nothing() {
        let mut app = started_app();
        let kept = app
            .add_location(
                LocationDraft::new("visited", "", "Aug 21, 2024"),
                Coords::new(1.0, 1.0),
            )
            .unwrap();

        let error = app.delete(&LocationId::from("nonexistent")).unwrap_err();

        assert!(matches!(error, Error::LocationNotFound(_)));
        assert_eq!(app.store().all(), &[kept.clone()]);
        assert!(app.store().markers().contains(&kept.id));
        assert_eq!(
            app.notifier().last_message(),
            Some("Location not found: nonexistent")
        );
    }

    #[test]
    fn focus_flies_to_location() {
        let mut app = started_app();
        let location = app
            .add_location(
                LocationDraft::new("favorite", "", "Aug 21, 2024"),
                Coords::new(7.0, 8.0),
            )
            .unwrap();

        app.focus(&location.id).unwrap();

        assert_eq!(app.view().map().flights, vec![(Coords::new(7.0, 8.0), 15)]);
        assert!(app.focus(&LocationId::from("gone")).is_err());
    }

    #[test]
    fn reset_clears_everything_but_position_marker() {
        let mut app = started_app();
        for kind in ["visited", "favorite"] {
            app.add_location(
                LocationDraft::new(kind, "", "Aug 21, 2024"),
                Coords::new(1.0, 1.0),
            )
            .unwrap();
        }

        assert_eq!(app.reset().unwrap(), 2);

        assert!(app.store().is_empty());
        assert!(app.store().markers().is_empty());
        assert!(app.view().list().rows.is_empty());
        assert_eq!(app.view().map().markers.len(), 1);
        assert_eq!(app.store().backend().get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn locate_me_flies_and_replaces_position_marker() {
        let mut app = started_app();

        let applied = app
            .locate_me(&FixedPosition::new(Coords::new(40.0, -3.7)))
            .await
            .unwrap();

        assert!(applied);
        assert_eq!(app.view().map().flights, vec![(Coords::new(40.0, -3.7), 13)]);
        let markers = &app.view().map().markers;
        assert_eq!(markers.len(), 1);
        assert_eq!(
            markers.values().next().map(|(coords, _)| *coords),
            Some(Coords::new(40.0, -3.7))
        );
    }

    #[tokio::test]
    async fn locate_me_failure_is_notified() {
        let mut app = started_app();

        let error = app
            .locate_me(&FixedPosition::unavailable())
            .await
            .unwrap_err();

        assert!(matches!(error, Error::PositionUnavailable(_)));
        assert_eq!(app.notifier().last_message(), Some(LOCATE_FAILED));
    }

    #[test]
    fn superseded_locate_result_is_discarded() {
        let mut app = started_app();
        let first = app.begin_locate();
        let second = app.begin_locate();

        assert!(app.finish_locate(second, Ok(Coords::new(2.0, 2.0))).unwrap());
        assert!(!app.finish_locate(first, Ok(Coords::new(1.0, 1.0))).unwrap());
        // stale failures are dropped silently too
        let third = app.begin_locate();
        let fourth = app.begin_locate();
        assert!(!app
            .finish_locate(third, Err(Error::PositionUnavailable("timeout".into())))
            .unwrap());
        assert!(app.finish_locate(fourth, Ok(Coords::new(3.0, 3.0))).unwrap());

        assert_eq!(
            app.view().map().flights,
            vec![(Coords::new(2.0, 2.0), 13), (Coords::new(3.0, 3.0), 13)]
        );
    }

    const SAVED_PAIR: &str = r#"[{"id":"1","type":"favorite","notes":"","created_at":"Aug 21, 2024","coords":[1.0,2.0]},
        {"id":"2","type":"want-to-go","notes":"","created_at":"Aug 21, 2024","coords":[3.0,4.0]}]"#;

    #[test]
    fn writes_before_map_initialization_keep_saved_locations() {
        let mut app = app_with(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, SAVED_PAIR));
        app.handle_map_click(Coords::new(10.0, 20.0));

        let error = app
            .confirm_selection(&Selection::new("Favorite", ""))
            .unwrap_err();
        assert!(matches!(error, Error::MapNotInitialized));
        assert!(app.selector().is_visible());
        assert!(matches!(
            app.add_location(
                LocationDraft::new("visited", "", "Aug 21, 2024"),
                Coords::new(1.0, 1.0),
            ),
            Err(Error::MapNotInitialized)
        ));
        assert!(matches!(
            app.delete(&LocationId::from("1")),
            Err(Error::MapNotInitialized)
        ));
        assert!(matches!(app.reset(), Err(Error::MapNotInitialized)));

        assert_eq!(
            app.store().backend().get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some(SAVED_PAIR)
        );
        assert_eq!(
            app.notifier().last_message(),
            Some("The map is not ready yet; saved locations have not been loaded.")
        );

        app.initialize_map(Coords::new(0.0, 0.0));
        let location = app
            .confirm_selection(&Selection::new("Favorite", ""))
            .unwrap();
        assert_eq!(app.store().len(), 3);
        assert!(app.store().find_by_id(&location.id).is_some());
    }

    #[test]
    fn unreadable_snapshot_blocks_adds() {
        let backend = UnreadableStore::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, SAVED_PAIR));
        let mut app = App::new(
            AppConfig::default(),
            backend,
            RecordingMap::default(),
            RecordingList::default(),
            RecordingNotifier::default(),
        );

        let outcome = app.initialize_map(Coords::new(0.0, 0.0));
        assert!(matches!(outcome, LoadOutcome::Unavailable { .. }));

        let error = app
            .add_location(
                LocationDraft::new("visited", "", "Aug 21, 2024"),
                Coords::new(1.0, 1.0),
            )
            .unwrap_err();

        assert!(matches!(error, Error::SnapshotNotLoaded));
        assert!(app.store().is_empty());
        assert!(app.store().markers().is_empty());
        assert_eq!(
            app.store().backend().inner.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some(SAVED_PAIR)
        );
        assert_eq!(
            app.notifier().last_message(),
            Some("Saved locations could not be read; refusing to overwrite them.")
        );
    }
}
