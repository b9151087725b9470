mod cli;
mod dataset;
mod error;
mod fmt;
mod models;
mod query;
mod settings;
mod tui;

use clap::Parser;

use cli::{Cli, Commands};
use error::{CustosError, LoadError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let file = cli.file.as_deref();

    let result = match cli.command {
        None => cli::dashboard::run(file, None),
        Some(Commands::Dashboard { group }) => cli::dashboard::run(file, group),
        Some(Commands::Init {
            sheet,
            delimiter,
            group_column,
            superintendence_column,
            value_column,
        }) => cli::init::run(cli::init::InitOptions {
            file: cli.file.clone(),
            sheet,
            delimiter,
            group_column,
            superintendence_column,
            value_column,
        }),
        Some(Commands::Status) => cli::status::run(file),
        Some(Commands::Groups) => cli::groups::run(file),
        Some(Commands::Report { group, rows, json }) => cli::report::run(file, group, rows, json),
        Some(Commands::Export { group, output }) => cli::export::run(file, group, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let CustosError::Load(LoadError::SourceNotFound(_)) = e {
            eprintln!("Check that the file exists, or point to it with --file <PATH> (or `custos init --file <PATH>`).");
        }
        std::process::exit(1);
    }
}
