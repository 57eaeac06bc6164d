use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pinpoint")]
#[command(about = "Bookmark places on a map from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Current position as "lat,lng" (overrides PINPOINT_POSITION and config home)
    #[arg(long, global = true, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub at: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a location
    #[command(alias = "new")]
    Add {
        /// Category label, e.g. "Want to go"
        #[arg(short, long)]
        kind: String,
        /// Latitude
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Optional note
        notes: Vec<String>,
    },
    /// List saved locations
    List {
        /// Tab to show: "all" or a category
        #[arg(short, long, default_value = "all")]
        tab: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show configured categories with location counts
    Tabs,
    /// Fly to a saved location and show its details
    Show {
        /// Location ID or unique ID prefix
        id: String,
    },
    /// Delete a saved location
    Delete {
        /// Location ID or unique ID prefix
        id: String,
    },
    /// Re-center on the current position
    Locate,
    /// Export saved locations
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Delete every saved location
    Reset {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Geojson,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
