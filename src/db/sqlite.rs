use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use uuid::Uuid;

use super::DatabaseError;
use crate::config::{DatabaseConfig, DatabaseLocation, Driver};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;"
    )?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![
        (1, include_str!("../../resources/migrations/001_initial.sql")),
    ];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get::<_, i64>(0),
    )
    .unwrap_or(0)
}

enum Target {
    File(PathBuf),
    /// Named shared-cache URI; every connection opened on it sees the same data.
    SharedMemory(String),
}

/// Owned handle to the hospital database.
///
/// Each UI action calls [`Database::connect`] for a fresh connection and
/// drops it when done. Migrations run once, in [`Database::open`].
/// In-memory databases keep an anchor connection so the data outlives
/// the per-action connections.
pub struct Database {
    target: Target,
    _anchor: Option<Mutex<Connection>>,
}

impl Database {
    /// Resolve the configured location, create it if needed, and migrate.
    pub fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let Driver::Sqlite = config.driver;

        match config.location() {
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let conn = open_database(&path)?;
                drop(conn);
                tracing::info!(path = %path.display(), "Database opened");
                Ok(Self {
                    target: Target::File(path),
                    _anchor: None,
                })
            }
            DatabaseLocation::Memory => Self::open_memory(),
        }
    }

    /// Fresh in-memory database, isolated from every other one.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let uri = format!("file:hospital-{}?mode=memory&cache=shared", Uuid::new_v4());
        let anchor = Connection::open_with_flags(&uri, Self::memory_flags())?;
        configure_pragmas(&anchor)?;
        run_migrations(&anchor)?;
        tracing::debug!("In-memory database opened");
        Ok(Self {
            target: Target::SharedMemory(uri),
            _anchor: Some(Mutex::new(anchor)),
        })
    }

    fn memory_flags() -> OpenFlags {
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
    }

    /// Open a connection for one action.
    pub fn connect(&self) -> Result<Connection, DatabaseError> {
        let conn = match &self.target {
            Target::File(path) => Connection::open(path)?,
            Target::SharedMemory(uri) => Connection::open_with_flags(uri, Self::memory_flags())?,
        };
        configure_pragmas(&conn)?;
        Ok(conn)
    }
}
