//! pinpoint-core - Core library for Pinpoint
//!
//! This crate contains the location models, the key-value persistence layer,
//! and the logic that keeps saved locations, map markers, and the filtered
//! list in step. Map, list, notification, and position collaborators are
//! traits implemented by each front end.

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod map;
pub mod models;
pub mod position;
pub mod selector;
pub mod storage;
pub mod store;
pub mod ui;
pub mod util;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use app::App;
pub use error::{Error, Result};
pub use models::{Coords, Location, LocationDraft, LocationId};
pub use store::{LoadOutcome, LocationStore};
pub use view::{render_tab, Tab, ViewSynchronizer};
