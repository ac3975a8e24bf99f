//! Login: credential validation and user lookup.
//!
//! A login yields a [`Session`] only for an existing, active account whose
//! password verifies. Every rejection looks the same to the caller.

use rusqlite::Connection;
use zeroize::Zeroizing;

use crate::crypto::{verify_password, PasswordCheck};
use crate::db::{self, DatabaseError};
use crate::models::Session;

/// Error returned when login inputs are blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("Username and password required.")]
    EmptyUsername,
    #[error("Username and password required.")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// `username` is trimmed and non-empty. `password` is non-empty and keeps
/// caller-provided whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Authenticate against `UserAccount`. `Ok(None)` means rejected.
pub fn login(
    conn: &Connection,
    credentials: &LoginCredentials,
) -> Result<Option<Session>, DatabaseError> {
    let Some(record) = db::find_login_record(conn, credentials.username())? else {
        tracing::warn!(username = credentials.username(), "Login rejected: unknown user");
        return Ok(None);
    };

    if !record.is_active {
        tracing::warn!(user_id = record.user_id, "Login rejected: inactive user");
        return Ok(None);
    }

    match verify_password(credentials.password(), &record.password_hash) {
        Ok(PasswordCheck::Match) => {}
        Ok(PasswordCheck::LegacyMatch) => {
            tracing::warn!(
                user_id = record.user_id,
                "Account still stores a plaintext password; re-save it to hash"
            );
        }
        Ok(PasswordCheck::Mismatch) => {
            tracing::warn!(user_id = record.user_id, "Login rejected: wrong password");
            return Ok(None);
        }
        Err(e) => {
            tracing::error!(user_id = record.user_id, "Login rejected: {e}");
            return Ok(None);
        }
    }

    tracing::info!(user_id = record.user_id, role = %record.role_name, "Login succeeded");
    Ok(Some(Session {
        user_id: record.user_id,
        role_id: record.role_id,
        role_name: record.role_name,
        staff_id: record.staff_id,
        patient_id: record.patient_id,
    }))
}
