use pinpoint_core::models::kind_label;

use crate::commands::common::{
    normalize_location_identifier, open_app, resolve_location_id, CliContext,
};
use crate::error::CliError;
use crate::terminal::ConsoleNotifier;

pub async fn run_show(id: &str, context: &CliContext) -> Result<(), CliError> {
    let normalized_id = normalize_location_identifier(id)?;
    let mut app = open_app(context, ConsoleNotifier::quiet()).await?;
    let location_id = resolve_location_id(&normalized_id, app.store().all())?;
    let location = app.focus(&location_id)?;

    println!("ID:       {}", location.id);
    println!("Type:     {}", kind_label(&location.kind));
    println!("Created:  {}", location.created_at);
    println!("Position: {}", location.coords);
    if !location.notes.is_empty() {
        println!("Notes:    {}", location.notes);
    }
    let map = app.view().map();
    if let Some((center, zoom)) = map.center() {
        tracing::debug!("Map now at {center} (zoom {zoom})");
    }
    if let Some(popup) = map.active_popup() {
        tracing::debug!("Popup open: {}", popup.title);
    }

    Ok(())
}
