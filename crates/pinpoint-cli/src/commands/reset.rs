use crate::commands::common::{open_app_for_reset, CliContext};
use crate::error::CliError;
use crate::terminal::ConsoleNotifier;

pub async fn run_reset(confirmed: bool, context: &CliContext) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::ResetNotConfirmed);
    }

    let mut app = open_app_for_reset(context, ConsoleNotifier::default()).await?;
    let count = app.reset()?;
    println!("{count}");
    Ok(())
}
