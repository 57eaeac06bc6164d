//! Category + note selection after a map click.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{normalize_kind, Coords, LocationDraft};

/// What the user picked in the selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Chosen category label, if any
    pub category: Option<String>,
    pub notes: String,
}

impl Selection {
    #[must_use]
    pub fn new(category: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            notes: notes.into(),
        }
    }
}

/// Display format for `created_at`, e.g. "Aug 21, 2024"
#[must_use]
pub fn format_created_at(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Holds the clicked position until the user confirms or cancels
#[derive(Debug, Clone)]
pub struct LocationSelector {
    categories: Vec<String>,
    pending: Option<Coords>,
}

impl LocationSelector {
    /// Create a selector offering the given category labels
    pub fn new(categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            pending: None,
        }
    }

    /// Open the selector for a clicked position
    pub fn show(&mut self, coords: Coords) {
        self.pending = Some(coords);
    }

    /// Close the selector and forget the clicked position
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub const fn is_visible(&self) -> bool {
        self.pending.is_some()
    }

    pub const fn pending(&self) -> Option<Coords> {
        self.pending
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Turn the selection into a draft for the pending position.
    ///
    /// On failure the selector stays open with its position intact.
    pub fn confirm(&mut self, selection: &Selection, today: NaiveDate) -> Result<(LocationDraft, Coords)> {
        let coords = self.pending.ok_or(Error::NoPendingClick)?;

        let category = selection
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .ok_or(Error::NoCategorySelected)?;

        let kind = normalize_kind(category);
        if !self
            .categories
            .iter()
            .any(|label| normalize_kind(label) == kind)
        {
            return Err(Error::UnknownCategory(category.to_string()));
        }

        self.pending = None;
        let draft = LocationDraft::new(kind, selection.notes.trim(), format_created_at(today));
        Ok((draft, coords))
    }
}
