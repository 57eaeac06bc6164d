use pinpoint_core::Tab;

use crate::commands::common::{
    format_location_lines, location_to_list_item, open_app, CliContext, LocationListItem,
};
use crate::error::CliError;
use crate::terminal::ConsoleNotifier;

pub async fn run_list(tab: &str, as_json: bool, context: &CliContext) -> Result<(), CliError> {
    let mut app = open_app(context, ConsoleNotifier::quiet()).await?;
    app.select_tab(tab.parse::<Tab>().unwrap_or_default());
    let rows = app.view().list().rows();

    if as_json {
        let json_items = rows
            .iter()
            .map(location_to_list_item)
            .collect::<Vec<LocationListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if rows.is_empty() {
        eprintln!("No locations under \"{}\"", app.view().active_tab());
    } else {
        for line in format_location_lines(rows) {
            println!("{line}");
        }
    }

    Ok(())
}
