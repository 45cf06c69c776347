mod cli;
mod commands;
mod config;
mod csv;
mod error;
mod expense;
mod store;
mod types;

use std::{io, process};

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{cli::Cli, error::Result, store::ExpenseStore};

fn init_logging() {
    // RUST_LOG picks the level, warn otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let path = config::resolve_data_file(cli.file);
    let mut store = ExpenseStore::open(path)?;
    tracing::debug!(
        path = %store.path().display(),
        next_id = store.next_id(),
        "using data file"
    );

    let stdout = io::stdout();
    commands::dispatch(cli.command, &mut store, &mut stdout.lock())
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        if e.is_storage() {
            eprintln!("hint: pass --file or set EXPENSES_FILE to use another data file");
        }
        process::exit(1);
    }
}
