pub mod auth;
pub mod commands;
pub mod config;
pub mod core_state;
pub mod crud; // Generic table-driven CRUD + system definitions
pub mod crypto;
pub mod db;
pub mod financial;
pub mod models;

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Serialize;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use commands::session::{self, LoginOutcome, WorkspaceData};
use commands::CommandError;
use config::DatabaseConfig;
use core_state::CoreState;
use db::{Database, DatabaseError};

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Could not encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the launcher prints after a successful login.
#[derive(Debug, Serialize)]
struct LaunchReport {
    app: &'static str,
    version: &'static str,
    login: LoginOutcome,
    data: WorkspaceData,
}

/// Launcher entry point.
///
/// Reads `.env` from the working directory, opens the configured database,
/// creates the bootstrap admin when asked, reads a username and a password
/// (one per line) from stdin, routes the session and prints the opened
/// workspace's data as JSON on stdout.
pub fn run() -> Result<(), LaunchError> {
    // Before the subscriber, so RUST_LOG may come from the file too
    let dotenv = config::load_dotenv_from(Path::new(config::DOTENV_FILE));

    // Logs go to stderr so stdout carries only the JSON report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    match dotenv {
        Ok(true) => tracing::info!("Settings loaded from {}", config::DOTENV_FILE),
        Ok(false) => {}
        Err(e) => tracing::warn!("Ignoring {}: {e}", config::DOTENV_FILE),
    }

    let db_config = DatabaseConfig::from_env()?;
    let state = CoreState::new(Database::open(&db_config)?);

    if let Some(password) = config::bootstrap_admin_password() {
        let password = Zeroizing::new(password);
        if session::bootstrap_admin(&state, &password)? {
            tracing::info!("Bootstrap admin account ready");
        }
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let username = lines.next().transpose()?.unwrap_or_default();
    let password = Zeroizing::new(lines.next().transpose()?.unwrap_or_default());

    let login = session::login(&state, &username, &password)?;
    let data = session::load_workspace(&state)?;

    let report = LaunchReport {
        app: config::APP_NAME,
        version: config::APP_VERSION,
        login,
        data,
    };
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &report)?;
    writeln!(out)?;

    session::logout(&state)?;
    Ok(())
}
