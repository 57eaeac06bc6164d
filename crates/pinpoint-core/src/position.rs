//! Position acquisition and request supersession.

use crate::error::{Error, Result};
use crate::models::Coords;

/// Source of the user's current position (async)
#[allow(async_fn_in_trait)]
pub trait PositionSource {
    /// Resolve the current position, or fail with `Error::PositionUnavailable`
    async fn current_position(&self) -> Result<Coords>;
}

/// Position source that always answers with a configured value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedPosition {
    coords: Option<Coords>,
}

impl FixedPosition {
    #[must_use]
    pub const fn new(coords: Coords) -> Self {
        Self {
            coords: Some(coords),
        }
    }

    /// A source that always reports the position as unavailable
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { coords: None }
    }
}

impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coords> {
        self.coords.ok_or_else(|| {
            Error::PositionUnavailable("no position source is configured".to_string())
        })
    }
}

/// Token identifying one position request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Issues request tokens so only the most recent position request applies
#[derive(Debug, Default)]
pub struct PositionTracker {
    latest: u64,
}

impl PositionTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Start a new request; any older outstanding request becomes stale
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Whether `token` belongs to the most recently issued request
    pub const fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_request_supersedes_older() {
        let mut tracker = PositionTracker::new();
        let first = tracker.begin();
        assert!(tracker.is_current(first));

        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_fixed_position() {
        let coords = Coords::new(48.2, 16.37);
        assert_eq!(
            FixedPosition::new(coords).current_position().await.unwrap(),
            coords
        );

        let error = FixedPosition::unavailable()
            .current_position()
            .await
            .unwrap_err();
        assert!(matches!(error, Error::PositionUnavailable(_)));
    }
}
