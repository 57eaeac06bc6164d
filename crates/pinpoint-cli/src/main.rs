//! Pinpoint CLI - bookmark places on a map from the terminal
//!
//! Every command opens the local database, centers the map on the current
//! position, and then acts on saved locations the same way a map front end
//! would.

mod cli;
mod commands;
mod error;
mod terminal;


use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::CliContext;
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::list::run_list;
use crate::commands::locate::run_locate;
use crate::commands::reset::run_reset;
use crate::commands::show::run_show;
use crate::commands::tabs::run_tabs;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pinpoint=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    if let Commands::Completions { shell, output } = &command {
        return run_completions(*shell, output.as_deref());
    }

    let context = CliContext::resolve(cli.db_path, cli.config, cli.at.as_deref())?;

    match command {
        Commands::Add {
            kind,
            lat,
            lng,
            notes,
        } => run_add(&kind, lat, lng, &notes, &context).await?,
        Commands::List { tab, json } => run_list(&tab, json, &context).await?,
        Commands::Tabs => run_tabs(&context)?,
        Commands::Show { id } => run_show(&id, &context).await?,
        Commands::Delete { id } => run_delete(&id, &context).await?,
        Commands::Locate => run_locate(&context).await?,
        Commands::Export { format, output } => run_export(format, output.as_deref(), &context)?,
        Commands::Reset { yes } => run_reset(yes, &context).await?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}
