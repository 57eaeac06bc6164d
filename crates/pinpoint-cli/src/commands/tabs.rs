use pinpoint_core::models::{kind_label, normalize_kind};
use pinpoint_core::storage::KeyValueStore;
use pinpoint_core::{render_tab, LocationStore, Tab};

use crate::commands::common::{open_store, CliContext};
use crate::error::CliError;

pub fn run_tabs(context: &CliContext) -> Result<(), CliError> {
    let store = open_store(&context.db_path, &context.config)?;
    for line in format_tab_lines(&context.config.categories, &store) {
        println!("{line}");
    }
    Ok(())
}

/// One line per tab: "All", every configured category, then stored kinds
/// that are no longer configured.
pub fn format_tab_lines<S: KeyValueStore, H>(
    categories: &[String],
    store: &LocationStore<S, H>,
) -> Vec<String> {
    let locations = store.all();
    let mut lines = vec![format!(
        "{:<16}{}",
        Tab::All.to_string(),
        render_tab(&Tab::All, locations).len()
    )];

    let configured = categories
        .iter()
        .map(|label| normalize_kind(label))
        .collect::<Vec<_>>();

    for label in categories {
        let count = render_tab(&Tab::kind(label), locations).len();
        lines.push(format!("{label:<16}{count}"));
    }

    for kind in store.kinds() {
        let kind = normalize_kind(&kind);
        if configured.contains(&kind) {
            continue;
        }
        let count = render_tab(&Tab::kind(&kind), locations).len();
        lines.push(format!(
            "{:<16}{count}  (not configured)",
            kind_label(&kind)
        ));
    }

    lines
}
