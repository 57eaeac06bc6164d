use crate::commands::common::{open_app, position_source, CliContext};
use crate::error::CliError;
use crate::terminal::ConsoleNotifier;

pub async fn run_locate(context: &CliContext) -> Result<(), CliError> {
    let mut app = open_app(context, ConsoleNotifier::quiet()).await?;
    let source = position_source(context);

    if app.locate_me(&source).await? {
        let map = app.view().map();
        if let Some((center, zoom)) = map.center() {
            println!("You are here: {center} (zoom {zoom})");
        }
        tracing::debug!("{} markers on the map", map.marker_count());
    }

    Ok(())
}
