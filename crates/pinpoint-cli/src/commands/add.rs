use pinpoint_core::selector::Selection;
use pinpoint_core::Coords;

use crate::commands::common::{open_app, CliContext};
use crate::error::CliError;
use crate::terminal::ConsoleNotifier;

/// Save a location as if the map had been clicked at `lat,lng`
pub async fn run_add(
    kind: &str,
    lat: f64,
    lng: f64,
    notes: &[String],
    context: &CliContext,
) -> Result<(), CliError> {
    let mut app = open_app(context, ConsoleNotifier::default()).await?;

    app.handle_map_click(Coords::new(lat, lng));
    let selection = Selection::new(kind, notes.join(" "));
    let location = app.confirm_selection(&selection)?;

    println!("{}", location.id);
    Ok(())
}
