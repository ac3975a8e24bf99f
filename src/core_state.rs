//! Application state shared by every workspace.
//!
//! `CoreState` owns the [`Database`] handle and the signed-in session.
//! The session sits behind an `RwLock` so a front-end can share the state
//! through an `Arc`: operations read it, login/logout write it.

use std::sync::RwLock;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::crypto::PBKDF2_ITERATIONS;
use crate::db::{self, Database};
use crate::models::Session;

/// Role-specific window opened after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workspace {
    Admin,
    Doctor,
    Receptionist,
}

impl Workspace {
    /// Match a stored role name, ignoring case and surrounding spaces.
    /// Roles without a desktop workspace (e.g. "Patient") yield `None`.
    pub fn from_role_name(role_name: &str) -> Option<Self> {
        match role_name.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "doctor" => Some(Self::Doctor),
            "receptionist" => Some(Self::Receptionist),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Doctor => "Doctor",
            Self::Receptionist => "Receptionist",
        }
    }
}

impl std::fmt::Display for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct CoreState {
    db: Database,
    session: RwLock<Option<Session>>,
    /// PBKDF2 cost for passwords written by the admin workspace.
    password_iterations: u32,
}

impl CoreState {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            session: RwLock::new(None),
            password_iterations: PBKDF2_ITERATIONS,
        }
    }

    pub fn with_password_iterations(mut self, iterations: u32) -> Self {
        self.password_iterations = iterations;
        self
    }

    pub fn password_iterations(&self) -> u32 {
        self.password_iterations
    }

    /// Fresh connection for one action.
    pub fn open_db(&self) -> Result<Connection, CoreError> {
        self.db.connect().map_err(CoreError::Database)
    }

    // ── Session access ──────────────────────────────────────

    /// Owned copy of the current session.
    pub fn current_session(&self) -> Result<Session, CoreError> {
        let guard = self.session.read().map_err(|_| CoreError::LockPoisoned)?;
        guard.clone().ok_or(CoreError::NoActiveSession)
    }

    /// Current session, provided its role opens `workspace`.
    pub fn require(&self, workspace: Workspace) -> Result<Session, CoreError> {
        let session = self.current_session()?;
        if Workspace::from_role_name(&session.role_name) != Some(workspace) {
            return Err(CoreError::WrongRole {
                expected: workspace,
                actual: session.role_name,
            });
        }
        Ok(session)
    }

    /// Replace the active session.
    pub fn set_session(&self, session: Session) -> Result<(), CoreError> {
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = Some(session);
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), CoreError> {
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = None;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No active session")]
    NoActiveSession,
    #[error("This action requires the {expected} role (signed in as {actual})")]
    WrongRole { expected: Workspace, actual: String },
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role_name: &str) -> Session {
        Session {
            user_id: 1,
            role_id: 1,
            role_name: role_name.into(),
            staff_id: Some(1),
            patient_id: None,
        }
    }

    #[test]
    fn role_names_match_case_insensitively() {
        assert_eq!(Workspace::from_role_name("ADMIN"), Some(Workspace::Admin));
        assert_eq!(Workspace::from_role_name(" doctor "), Some(Workspace::Doctor));
        assert_eq!(
            Workspace::from_role_name("Receptionist"),
            Some(Workspace::Receptionist)
        );
        assert_eq!(Workspace::from_role_name("Patient"), None);
        assert_eq!(Workspace::from_role_name("Nurse"), None);
    }

    #[test]
    fn no_session_until_set() {
        let state = CoreState::new(Database::open_memory().unwrap());
        assert!(matches!(state.current_session(), Err(CoreError::NoActiveSession)));
    }

    #[test]
    fn require_checks_role() {
        let state = CoreState::new(Database::open_memory().unwrap());
        state.set_session(session("doctor")).unwrap();

        assert_eq!(state.require(Workspace::Doctor).unwrap().user_id, 1);
        let err = state.require(Workspace::Admin).unwrap_err();
        assert!(matches!(
            err,
            CoreError::WrongRole { expected: Workspace::Admin, .. }
        ));
    }

    #[test]
    fn clear_session_logs_out() {
        let state = CoreState::new(Database::open_memory().unwrap());
        state.set_session(session("Admin")).unwrap();
        state.clear_session().unwrap();
        assert!(matches!(
            state.require(Workspace::Admin),
            Err(CoreError::NoActiveSession)
        ));
    }

    #[test]
    fn open_db_reaches_shared_database() {
        let state = CoreState::new(Database::open_memory().unwrap());
        let roles: i64 = state
            .open_db()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM Role", [], |row| row.get(0))
            .unwrap();
        assert_eq!(roles, 4);
    }
}
