use std::env;
use std::path::{Path, PathBuf};

use pinpoint_core::config::AppConfig;
use pinpoint_core::models::kind_label;
use pinpoint_core::position::FixedPosition;
use pinpoint_core::storage::SqliteStore;
use pinpoint_core::util::preview_text;
use pinpoint_core::{App, Coords, LoadOutcome, Location, LocationId, LocationStore};
use serde::Serialize;

use crate::error::CliError;
use crate::terminal::{ConsoleNotifier, TerminalList, TerminalMap};

pub const DB_PATH_ENV: &str = "PINPOINT_DB_PATH";
pub const CONFIG_PATH_ENV: &str = "PINPOINT_CONFIG";
pub const POSITION_ENV: &str = "PINPOINT_POSITION";

pub type CliApp = App<SqliteStore, TerminalMap, TerminalList, ConsoleNotifier>;
pub type CliStore = LocationStore<SqliteStore, usize>;

/// Everything a command needs, resolved once from flags, environment, and config
#[derive(Debug, Clone)]
pub struct CliContext {
    pub db_path: PathBuf,
    pub config: AppConfig,
    pub position: Option<Coords>,
}

impl CliContext {
    pub fn resolve(
        cli_db_path: Option<PathBuf>,
        cli_config_path: Option<PathBuf>,
        at: Option<&str>,
    ) -> Result<Self, CliError> {
        let db_path = resolve_db_path(cli_db_path);
        let config_path = resolve_config_path(cli_config_path);
        let config = AppConfig::load_from_path(&config_path)?;
        let position = resolve_position(at, env::var(POSITION_ENV).ok().as_deref(), &config)?;

        tracing::debug!(
            "Using database {} and config {}",
            db_path.display(),
            config_path.display()
        );

        Ok(Self {
            db_path,
            config,
            position,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct LocationListItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub notes: String,
    pub created_at: String,
    pub lat: f64,
    pub lng: f64,
}

pub fn location_to_list_item(location: &Location) -> LocationListItem {
    LocationListItem {
        id: location.id.to_string(),
        kind: location.kind.clone(),
        label: kind_label(&location.kind),
        notes: location.notes.clone(),
        created_at: location.created_at.clone(),
        lat: location.coords.lat,
        lng: location.coords.lng,
    }
}

pub fn format_location_lines(locations: &[Location]) -> Vec<String> {
    locations
        .iter()
        .map(|location| {
            let short_id = short_id(location.id.as_str());
            let label = kind_label(&location.kind);
            let preview = preview_text(&location.notes, 40);

            if preview.is_empty() {
                format!(
                    "{short_id:<13}  {label:<12}  {:<12}  {}",
                    location.created_at, location.coords
                )
            } else {
                format!(
                    "{short_id:<13}  {label:<12}  {:<12}  {:<22}  {preview}",
                    location.created_at,
                    location.coords.to_string()
                )
            }
        })
        .collect()
}

pub fn short_id(id: &str) -> String {
    id.chars().take(13).collect()
}

pub fn normalize_location_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyLocationId);
    }
    Ok(trimmed.to_string())
}

/// Resolve a full id or a unique id prefix against the saved locations
pub fn resolve_location_id(query: &str, locations: &[Location]) -> Result<LocationId, CliError> {
    if let Some(location) = locations.iter().find(|location| location.id.as_str() == query) {
        return Ok(location.id.clone());
    }

    let matching = locations
        .iter()
        .filter(|location| location.id.as_str().starts_with(query))
        .collect::<Vec<_>>();

    match matching.as_slice() {
        [] => Err(CliError::LocationNotFound(query.to_string())),
        [location] => Ok(location.id.clone()),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|location| short_id(location.id.as_str()))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousLocationId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os(DB_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pinpoint")
        .join("pinpoint.db")
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> PathBuf {
    cli_config_path
        .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pinpoint")
        .join("config.json")
}

/// Pick the current position: `--at`, then the environment, then config `home`
pub fn resolve_position(
    at: Option<&str>,
    env_value: Option<&str>,
    config: &AppConfig,
) -> Result<Option<Coords>, CliError> {
    let explicit = at
        .or(env_value)
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match explicit {
        Some(value) => Ok(Some(value.parse::<Coords>()?)),
        None => Ok(config.home),
    }
}

pub fn open_store(path: &Path, config: &AppConfig) -> Result<CliStore, CliError> {
    let backend = SqliteStore::open(path)?;
    let mut store = LocationStore::with_key(backend, config.storage_key.clone());
    report_load_outcome(&store.initialize())?;
    Ok(store)
}

/// Open the database and start the controller at the resolved position
pub async fn open_app(context: &CliContext, notifier: ConsoleNotifier) -> Result<CliApp, CliError> {
    let (app, outcome) = start_app(context, notifier).await?;
    report_load_outcome(&outcome)?;
    Ok(app)
}

/// Like [`open_app`], but unreadable saved data is tolerated so it can be cleared
pub async fn open_app_for_reset(
    context: &CliContext,
    notifier: ConsoleNotifier,
) -> Result<CliApp, CliError> {
    let (app, outcome) = start_app(context, notifier).await?;
    if let LoadOutcome::Corrupt { reason } = &outcome {
        tracing::warn!("Discarding unreadable saved locations: {reason}");
    } else {
        report_load_outcome(&outcome)?;
    }
    Ok(app)
}

async fn start_app(
    context: &CliContext,
    notifier: ConsoleNotifier,
) -> Result<(CliApp, LoadOutcome), CliError> {
    let backend = SqliteStore::open(&context.db_path)?;
    let mut app = App::new(
        context.config.clone(),
        backend,
        TerminalMap::default(),
        TerminalList::default(),
        notifier,
    );

    let source = position_source(context);
    match app.start(&source).await {
        Ok(outcome) => Ok((app, outcome)),
        Err(pinpoint_core::Error::PositionUnavailable(_)) if context.position.is_none() => {
            Err(CliError::PositionNotConfigured)
        }
        Err(error) => Err(error.into()),
    }
}

pub fn position_source(context: &CliContext) -> FixedPosition {
    context
        .position
        .map_or_else(FixedPosition::unavailable, FixedPosition::new)
}

/// Unreadable saved data is an error on the command line; skipped records are a warning
fn report_load_outcome(outcome: &LoadOutcome) -> Result<(), CliError> {
    match outcome {
        LoadOutcome::Empty => tracing::debug!("No saved locations"),
        LoadOutcome::Loaded { count, rejected } => {
            tracing::debug!("Loaded {count} saved locations");
            if *rejected > 0 {
                tracing::warn!("Skipped {rejected} invalid saved locations");
            }
        }
        LoadOutcome::Corrupt { reason } => {
            return Err(CliError::CorruptData(reason.clone()));
        }
        LoadOutcome::Unavailable { reason } => {
            return Err(CliError::StorageUnavailable(reason.clone()));
        }
    }
    Ok(())
}
