//! List and notification surfaces.

use std::fmt;
use std::time::Duration;

use crate::models::{Location, LocationId};

/// Renders the visible location rows
pub trait ListSurface {
    /// Replace all rows with `locations`, in order
    fn render_rows(&mut self, locations: &[Location]);

    /// Drop the row for a deleted location
    fn remove_row(&mut self, id: &LocationId);
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// How long the message stays visible
    pub timeout: Duration,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>, timeout: Duration) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>, timeout: Duration) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            timeout,
        }
    }
}

/// Surfaces notifications to the user
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}
