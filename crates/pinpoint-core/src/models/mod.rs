//! Data models for Pinpoint

mod category;
mod location;

pub use category::{kind_label, normalize_kind};
pub use location::{Coords, Location, LocationDraft, LocationId};
