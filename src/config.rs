use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// Application-level constants
pub const APP_NAME: &str = "Hospital Desk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming the directory that holds the database file.
pub const ENV_DB_SERVER: &str = "HOSPITAL_DB_SERVER";
/// Environment variable naming the database file.
pub const ENV_DB_NAME: &str = "HOSPITAL_DB_NAME";
/// Environment variable naming the database driver.
pub const ENV_DB_DRIVER: &str = "HOSPITAL_DB_DRIVER";
/// Password for the bootstrap `admin` account on an empty database.
pub const ENV_ADMIN_PASSWORD: &str = "HOSPITAL_ADMIN_PASSWORD";

pub const DEFAULT_DB_NAME: &str = "hospital.db";
pub const DEFAULT_DRIVER: &str = "sqlite";
pub const MEMORY_SERVER: &str = ":memory:";
/// Settings file read from the working directory at startup.
pub const DOTENV_FILE: &str = ".env";

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "hospital_desk_lib=info,hospital_desk=info"
}

/// Get the application data directory
/// ~/HospitalDesk/ on all platforms
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("HospitalDesk")
}

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Driver {
    Sqlite,
}

impl Driver {
    pub fn parse(name: &str) -> Result<Self, DatabaseError> {
        match name.trim().to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            other => Err(DatabaseError::UnsupportedDriver(other.to_string())),
        }
    }
}

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    Memory,
}

/// Connection parameters assembled from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Directory holding the database, or `:memory:`.
    pub server: String,
    pub database: String,
    pub driver: Driver,
}

impl DatabaseConfig {
    /// Read `HOSPITAL_DB_SERVER`, `HOSPITAL_DB_NAME` and `HOSPITAL_DB_DRIVER`.
    pub fn from_env() -> Result<Self, DatabaseError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DatabaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server = get(ENV_DB_SERVER)
            .unwrap_or_else(|| app_data_dir().to_string_lossy().into_owned());
        let database = get(ENV_DB_NAME).unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
        let driver = Driver::parse(&get(ENV_DB_DRIVER).unwrap_or_else(|| DEFAULT_DRIVER.into()))?;

        Ok(Self {
            server,
            database,
            driver,
        })
    }

    pub fn location(&self) -> DatabaseLocation {
        if self.server == MEMORY_SERVER || self.database == MEMORY_SERVER {
            DatabaseLocation::Memory
        } else {
            DatabaseLocation::File(PathBuf::from(&self.server).join(&self.database))
        }
    }
}

/// Load `KEY=value` lines from `path` into the process environment.
///
/// Variables that are already set keep their value. Returns `false` when
/// the file does not exist.
pub fn load_dotenv_from(path: &Path) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Bootstrap admin password, if configured.
pub fn bootstrap_admin_password() -> Option<String> {
    std::env::var(ENV_ADMIN_PASSWORD)
        .ok()
        .filter(|p| !p.is_empty())
}
