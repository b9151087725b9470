pub mod dashboard;
pub mod export;
pub mod groups;
pub mod init;
pub mod report;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::dataset::CostDataset;
use crate::error::Result;
use crate::query::CategoryFilter;
use crate::settings::load_settings;

#[derive(Parser)]
#[command(name = "custos", version, about = "Maintenance cost analysis by planning group")]
pub struct Cli {
    /// Spreadsheet or CSV to read instead of the configured source
    #[arg(long, global = true)]
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save the source file and column settings
    Init {
        /// Worksheet name (empty string resets to the first sheet)
        #[arg(long)]
        sheet: Option<String>,
        /// Field delimiter for CSV sources
        #[arg(long)]
        delimiter: Option<char>,
        #[arg(long)]
        group_column: Option<String>,
        #[arg(long)]
        superintendence_column: Option<String>,
        #[arg(long)]
        value_column: Option<String>,
    },
    /// Show settings and source file statistics
    Status,
    /// List planning groups with record counts and totals
    Groups,
    /// Print the cost subtotal and superintendence distribution
    Report {
        /// Planning group to select (all records when omitted)
        #[arg(long)]
        group: Option<String>,
        /// Number of records to list
        #[arg(long, default_value = "20")]
        rows: usize,
        /// Emit JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Write the selected records to a CSV file
    Export {
        #[arg(long)]
        group: Option<String>,
        /// Output path (defaults to a timestamped file in the current directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Open the interactive dashboard (default)
    Dashboard {
        #[arg(long)]
        group: Option<String>,
    },
}

/// Load the configured source, honoring a `--file` override.
pub(crate) fn load_dataset(file: Option<&str>) -> Result<(CostDataset, PathBuf)> {
    let settings = load_settings();
    let path = settings.source_path(file);
    let options = settings.load_options()?;
    let dataset = CostDataset::load(&path, &options)?;
    if dataset.is_empty() {
        log::warn!("{} has no rows with a numeric value", path.display());
    }
    Ok((dataset, path))
}

pub(crate) fn warn_if_unknown(dataset: &CostDataset, filter: &CategoryFilter) {
    if let CategoryFilter::Group(g) = filter {
        if dataset.groups().binary_search(g).is_err() {
            log::warn!("planning group '{g}' does not occur in the data; the selection is empty");
        }
    }
}
