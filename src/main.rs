//! gridcore viewer - Entry Point

use clap::Parser;
use gridcore::config::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config_onto,
    ConfigFile, GridConfig, GridSettings,
};
use gridcore::model::{columns_from_data, AppError, ColumnDescriptor, GridError};
use gridcore::source::{load_columns, load_rows};
use gridcore::state::RowQuery;
use gridcore::view::{run_viewer, ColorConfig, GridStyles};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// gridcore - browse JSON records in a scrollable, sortable terminal grid
#[derive(Parser, Debug)]
#[command(name = "gridcore")]
#[command(version)]
#[command(about = "Terminal data grid for JSON arrays of records")]
pub struct Args {
    /// Path to a JSON array of records (`-` reads stdin)
    pub rows: PathBuf,

    /// TOML file of [[columns]] tables (derived from the first row if omitted)
    #[arg(long)]
    pub columns: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Column to sort by on startup
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Initial sort direction
    #[arg(long, default_value = "asc", value_parser = ["asc", "desc"], ignore_case = true)]
    pub sort_order: String,

    /// Only show rows containing this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Show only this 1-based page of rows (requires --page-size)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Select the row with this id on startup and keep it on top when sorting
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<String>,

    /// Allow at most one selected row
    #[arg(long)]
    pub single: bool,

    /// Hide the selection checkboxes
    #[arg(long)]
    pub no_select: bool,

    /// Row height estimate in lines before rows are measured
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub row_height: Option<u32>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

/// Resolve settings: terminal defaults → config file → env vars → CLI args.
fn resolve_settings(args: &Args, config_file: Option<ConfigFile>) -> GridSettings {
    let merged = merge_config_onto(GridSettings::terminal(), config_file);
    let with_env = apply_env_overrides(merged);
    apply_cli_overrides(
        with_env,
        args.row_height.map(|h| h as usize),
        args.log_file.clone(),
    )
}

fn build_config(
    args: &Args,
    columns: Vec<ColumnDescriptor>,
    settings: &GridSettings,
) -> Result<GridConfig, GridError> {
    let mut builder = GridConfig::builder(columns)
        .settings(settings)
        .selectable(!args.no_select)
        .multiple(!args.single)
        .sortable(true)
        .resizable(true)
        .clickable(true)
        .sort_order(args.sort_order.clone());
    if let Some(name) = &args.sort_by {
        builder = builder.sort_by(name.clone());
    }
    builder.build()
}

/// Row ids from the command line: JSON literals where they parse, else strings.
fn parse_ids(raw: &[String]) -> Vec<Value> {
    raw.iter()
        .map(|id| serde_json::from_str(id).unwrap_or_else(|_| Value::String(id.clone())))
        .collect()
}

fn build_query(args: &Args, config: &GridConfig) -> RowQuery {
    RowQuery {
        filter: args.filter.clone().unwrap_or_default(),
        sort_by: config.sort_by().map(str::to_string),
        sort_order: config.sort_order(),
        page: args.page as usize,
        page_size: args.page_size.map(|size| size as usize),
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let config_file = load_config_with_precedence(args.config.clone())?;
    let settings = resolve_settings(&args, config_file);

    gridcore::logging::init(&settings.log_file_path)?;
    info!(settings = ?settings, "Configuration loaded and resolved");

    let rows = load_rows(&args.rows)?;
    let columns = match &args.columns {
        Some(path) => load_columns(path.clone())?,
        None => columns_from_data(&rows),
    };

    let config = build_config(&args, columns, &settings)?;
    let query = build_query(&args, &config);
    let styles = GridStyles::with_color_config(ColorConfig::from_env_and_args(args.no_color));

    run_viewer(config, rows, query, styles, &parse_ids(&args.select))?;

    Ok(())
}
