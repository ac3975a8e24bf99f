//! Workspace operations, one module per role window.
//!
//! Every operation takes the shared [`CoreState`], checks that the signed-in
//! role owns the workspace, opens a connection for the action and drops it
//! when done. Failures come back as [`CommandError`]; its [`ErrorKind`]
//! tells the front-end which dialog to show.

pub mod admin;
pub mod doctor;
pub mod receptionist;
pub mod session;

use rusqlite::Connection;
use serde::Serialize;

use crate::auth::LoginValidationError;
use crate::core_state::{CoreError, CoreState, Workspace};
use crate::crud::CrudError;
use crate::crypto::CryptoError;
use crate::db::DatabaseError;
use crate::models::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Informational,
    Validation,
    Database,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Informational(String),
    #[error("{0}")]
    Validation(String),
    #[error("Selected room is not available for that date range.")]
    ReservationConflict,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("{0}")]
    Core(#[from] CoreError),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Informational(_) => ErrorKind::Informational,
            Self::Validation(_) | Self::ReservationConflict => ErrorKind::Validation,
            Self::Database(e) | Self::Core(CoreError::Database(e)) => database_kind(e),
            Self::Core(CoreError::NoActiveSession | CoreError::WrongRole { .. }) => {
                ErrorKind::Informational
            }
            Self::Core(CoreError::LockPoisoned) => ErrorKind::Database,
        }
    }
}

fn database_kind(e: &DatabaseError) -> ErrorKind {
    match e {
        DatabaseError::NotFound { .. } => ErrorKind::Informational,
        _ => ErrorKind::Database,
    }
}

impl From<rusqlite::Error> for CommandError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(DatabaseError::from(e))
    }
}

impl From<CrudError> for CommandError {
    fn from(e: CrudError) -> Self {
        match e {
            CrudError::Validation(msg) => Self::Validation(msg),
            CrudError::RowNotFound => Self::Informational("Row not found.".into()),
            CrudError::Database(e) => Self::Database(e),
        }
    }
}

impl From<LoginValidationError> for CommandError {
    fn from(e: LoginValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<CryptoError> for CommandError {
    fn from(e: CryptoError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Role check plus a connection for one action.
fn open_workspace(
    state: &CoreState,
    workspace: Workspace,
) -> Result<(Session, Connection), CommandError> {
    let session = state.require(workspace)?;
    let conn = state.open_db()?;
    Ok((session, conn))
}

/// Trimmed text, or a validation error carrying `message` when blank.
fn required_text(value: &str, message: &str) -> Result<String, CommandError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CommandError::Validation(message.into()));
    }
    Ok(trimmed.to_owned())
}
