use crate::commands::common::{
    normalize_location_identifier, open_app, resolve_location_id, CliContext,
};
use crate::error::CliError;
use crate::terminal::ConsoleNotifier;

pub async fn run_delete(id: &str, context: &CliContext) -> Result<(), CliError> {
    let normalized_id = normalize_location_identifier(id)?;
    let mut app = open_app(context, ConsoleNotifier::default()).await?;
    let location_id = resolve_location_id(&normalized_id, app.store().all())?;

    let location = app.delete(&location_id)?;
    println!("{}", location.id);
    Ok(())
}
