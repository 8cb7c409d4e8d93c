//! `todo` command-line front end.
//!
//! # Responsibility
//! - Resolve storage and logging configuration from flags and environment.
//! - Normalize user input and forward it to the core store.
//!
//! Owns no business rules; everything stateful lives in `todo_core`.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::warn;
use todo_core::db::open_db;
use todo_core::{
    default_log_level, flush_logging, init_logging, MemoryStateStorage, SqliteStateStorage,
    TodoStore,
};

mod cli;
mod cmd;
mod input;

use cli::{Cli, Commands};
use cmd::run_command;

const DEFAULT_DB_DIR: &str = ".todo";
const DEFAULT_DB_FILE: &str = "todo.sqlite3";
const LOG_SUBDIR: &str = "logs";

/// Effective settings after flags, environment and defaults are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Config {
    db_path: PathBuf,
    log_dir: PathBuf,
    log_level: String,
    memory: bool,
}

fn main() {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    if let Err(err) = init_logging(&config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("Logging disabled: {err}");
    }

    let result = run(&config, cli.command);
    flush_logging();

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn resolve_config(cli: &Cli) -> Config {
    let db_path = absolute(cli.db.clone().unwrap_or_else(default_db_path));
    let log_dir = match &cli.log_dir {
        Some(dir) => absolute(dir.clone()),
        None => db_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(LOG_SUBDIR),
    };
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());

    Config {
        db_path,
        log_dir,
        log_level,
        memory: cli.memory,
    }
}

/// Opens the configured storage and runs one command against it.
///
/// A database that cannot be opened degrades to an in-memory store so the
/// command still runs; nothing is saved in that case.
fn run(config: &Config, command: Commands) -> Result<(), String> {
    if config.memory {
        let mut store = TodoStore::load(MemoryStateStorage::new());
        return run_command(&mut store, command);
    }

    match open_db(&config.db_path) {
        Ok(conn) => {
            let mut store = TodoStore::load(SqliteStateStorage::new(&conn));
            run_command(&mut store, command)
        }
        Err(err) => {
            warn!("event=cli_storage module=cli status=fallback error={err}");
            eprintln!(
                "Storage unavailable at {} ({err}); changes will not be saved.",
                config.db_path.display()
            );
            let mut store = TodoStore::load(MemoryStateStorage::new());
            run_command(&mut store, command)
        }
    }
}

fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(DEFAULT_DB_DIR).join(DEFAULT_DB_FILE)
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}
