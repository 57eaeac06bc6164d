//! Category normalization and display labels

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Normalize a category label into its stored kind.
///
/// Lowercases, trims, and replaces whitespace runs with a single hyphen.
///
/// # Examples
///
/// ```
/// use pinpoint_core::models::normalize_kind;
///
/// assert_eq!(normalize_kind("Want to go"), "want-to-go");
/// assert_eq!(normalize_kind(" Favorite "), "favorite");
/// ```
#[must_use]
pub fn normalize_kind(label: &str) -> String {
    WHITESPACE
        .replace_all(label.trim(), "-")
        .to_lowercase()
}

/// Human-readable label for a stored kind (`want-to-go` -> `Want to go`).
#[must_use]
pub fn kind_label(kind: &str) -> String {
    let spaced = kind.replace('-', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_kind() {
        assert_eq!(normalize_kind("Want to go"), "want-to-go");
        assert_eq!(normalize_kind("VISITED"), "visited");
        assert_eq!(normalize_kind("  spaced \t out  "), "spaced-out");
        assert_eq!(normalize_kind("   "), "");
    }

    #[test]
    fn test_kind_label() {
        assert_eq!(kind_label("want-to-go"), "Want to go");
        assert_eq!(kind_label("favorite"), "Favorite");
        assert_eq!(kind_label(""), "");
    }
}
