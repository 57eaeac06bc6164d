use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pinpoint_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Location ID cannot be empty")]
    EmptyLocationId,
    #[error("Location not found for id/prefix: {0}")]
    LocationNotFound(String),
    #[error("{0}")]
    AmbiguousLocationId(String),
    #[error(
        "No position available. Pass --at LAT,LNG, set PINPOINT_POSITION, or set `home` in the config file."
    )]
    PositionNotConfigured,
    #[error("Saved locations could not be read ({0}); run `pinpoint reset --yes` to discard them")]
    CorruptData(String),
    #[error("Saved locations are unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Reset deletes every saved location; rerun with --yes to confirm")]
    ResetNotConfirmed,
}
