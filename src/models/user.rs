use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Authenticated user, as returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub role_id: i64,
    pub role_name: String,
    pub staff_id: Option<i64>,
    pub patient_id: Option<i64>,
}

/// User account row for the admin grid. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccountRow {
    pub user_id: i64,
    pub username: String,
    pub role_id: i64,
    pub role_name: String,
    pub staff_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub is_active: bool,
}

/// Add/edit form for a user account.
///
/// On edit an empty `password` keeps the stored hash. The password is
/// wiped on drop and never serialized or printed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: Zeroizing<String>,
    pub role_id: i64,
    pub staff_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub is_active: bool,
}

impl fmt::Debug for UserForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role_id", &self.role_id)
            .field("staff_id", &self.staff_id)
            .field("patient_id", &self.patient_id)
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// Stored credentials joined with the role, used only by authentication.
#[derive(Debug, Clone)]
pub struct LoginRecord {
    pub user_id: i64,
    pub role_id: i64,
    pub role_name: String,
    pub staff_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub password_hash: String,
    pub is_active: bool,
}
