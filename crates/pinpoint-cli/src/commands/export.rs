use std::path::Path;

use pinpoint_core::export::{render_geojson_export, render_json_export};

use crate::cli::ExportFormat;
use crate::commands::common::{open_store, CliContext};
use crate::error::CliError;

pub fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    context: &CliContext,
) -> Result<(), CliError> {
    let store = open_store(&context.db_path, &context.config)?;
    let rendered = match format {
        ExportFormat::Json => render_json_export(store.all())?,
        ExportFormat::Geojson => render_geojson_export(store.all())?,
    };

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
