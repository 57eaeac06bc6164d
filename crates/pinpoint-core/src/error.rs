//! Error types for pinpoint-core

use thiserror::Error;

use crate::models::LocationId;

/// Result type alias using pinpoint-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pinpoint-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Geolocation was denied, timed out, or is unsupported
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// A delete or focus referenced an id that is not in the collection
    #[error("Location not found: {0}")]
    LocationNotFound(LocationId),

    /// The persisted snapshot could not be decoded
    #[error("Malformed persisted data: {0}")]
    MalformedPersistedData(String),

    /// The selector was confirmed without a category
    #[error("Please select a location type.")]
    NoCategorySelected,

    /// The selector was confirmed with a category outside the configured set
    #[error("Unknown location type: {0}")]
    UnknownCategory(String),

    /// A selection was confirmed before any map click
    #[error("No map position selected")]
    NoPendingClick,

    /// A mutation was attempted before the map was initialized and the
    /// saved locations were loaded
    #[error("The map is not ready yet; saved locations have not been loaded.")]
    MapNotInitialized,

    /// Saved locations could not be read, so writing a snapshot would replace them
    #[error("Saved locations could not be read; refusing to overwrite them.")]
    SnapshotNotLoaded,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Key-value store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
