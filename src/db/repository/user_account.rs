use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

use super::{active_flag, ensure_changed};

/// Credentials and role for a username. Exact, case-sensitive match.
pub fn find_login_record(
    conn: &Connection,
    username: &str,
) -> Result<Option<LoginRecord>, DatabaseError> {
    let record = conn
        .query_row(
            "SELECT ua.UserId, ua.RoleId, r.RoleName, ua.StaffId, ua.PatientId,
                    ua.PasswordHash, ua.IsActive
             FROM UserAccount ua
             JOIN Role r ON r.RoleId = ua.RoleId
             WHERE ua.Username = ?1",
            params![username],
            |row| {
                Ok(LoginRecord {
                    user_id: row.get(0)?,
                    role_id: row.get(1)?,
                    role_name: row.get(2)?,
                    staff_id: row.get(3)?,
                    patient_id: row.get(4)?,
                    password_hash: row.get(5)?,
                    is_active: active_flag(row.get(6)?),
                })
            },
        )
        .optional()?;
    Ok(record)
}

pub fn list_user_accounts(conn: &Connection) -> Result<Vec<UserAccountRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT ua.UserId, ua.Username, ua.RoleId, r.RoleName,
                ua.StaffId, ua.PatientId, ua.IsActive
         FROM UserAccount ua
         JOIN Role r ON r.RoleId = ua.RoleId
         ORDER BY ua.UserId",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(UserAccountRow {
            user_id: row.get(0)?,
            username: row.get(1)?,
            role_id: row.get(2)?,
            role_name: row.get(3)?,
            staff_id: row.get(4)?,
            patient_id: row.get(5)?,
            is_active: active_flag(row.get(6)?),
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_user_account(
    conn: &Connection,
    user_id: i64,
) -> Result<Option<UserAccountRow>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT ua.UserId, ua.Username, ua.RoleId, r.RoleName,
                    ua.StaffId, ua.PatientId, ua.IsActive
             FROM UserAccount ua
             JOIN Role r ON r.RoleId = ua.RoleId
             WHERE ua.UserId = ?1",
            [user_id],
            |row| {
                Ok(UserAccountRow {
                    user_id: row.get(0)?,
                    username: row.get(1)?,
                    role_id: row.get(2)?,
                    role_name: row.get(3)?,
                    staff_id: row.get(4)?,
                    patient_id: row.get(5)?,
                    is_active: active_flag(row.get(6)?),
                })
            },
        )
        .optional()?;
    Ok(row)
}

pub fn count_user_accounts(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM UserAccount", [], |row| row.get(0))?;
    Ok(count)
}

/// Insert a user. `password_hash` must already be hashed.
pub fn insert_user_account(
    conn: &Connection,
    form: &UserForm,
    password_hash: &str,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO UserAccount (Username, PasswordHash, RoleId, StaffId, PatientId, IsActive)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            form.username,
            password_hash,
            form.role_id,
            form.staff_id,
            form.patient_id,
            form.is_active,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update a user. `None` keeps the stored password hash.
pub fn update_user_account(
    conn: &Connection,
    user_id: i64,
    form: &UserForm,
    password_hash: Option<&str>,
) -> Result<(), DatabaseError> {
    let changed = match password_hash {
        Some(hash) => conn.execute(
            "UPDATE UserAccount
             SET Username = ?1, PasswordHash = ?2, RoleId = ?3, StaffId = ?4,
                 PatientId = ?5, IsActive = ?6
             WHERE UserId = ?7",
            params![
                form.username,
                hash,
                form.role_id,
                form.staff_id,
                form.patient_id,
                form.is_active,
                user_id,
            ],
        )?,
        None => conn.execute(
            "UPDATE UserAccount
             SET Username = ?1, RoleId = ?2, StaffId = ?3, PatientId = ?4, IsActive = ?5
             WHERE UserId = ?6",
            params![
                form.username,
                form.role_id,
                form.staff_id,
                form.patient_id,
                form.is_active,
                user_id,
            ],
        )?,
    };
    ensure_changed(changed, "UserAccount", user_id)
}

pub fn set_user_active(conn: &Connection, user_id: i64, active: bool) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE UserAccount SET IsActive = ?1 WHERE UserId = ?2",
        params![active, user_id],
    )?;
    ensure_changed(changed, "UserAccount", user_id)
}

pub fn delete_user_account(conn: &Connection, user_id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM UserAccount WHERE UserId = ?1", [user_id])?;
    ensure_changed(changed, "UserAccount", user_id)
}
