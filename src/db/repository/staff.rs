use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

use super::{active_flag, blank_to_null, ensure_changed};

const STAFF_COLUMNS: &str =
    "StaffId, FirstName, LastName, Title, DepartmentId, Phone, Email, IsActive";

fn staff_from_row(row: &Row<'_>) -> rusqlite::Result<StaffRow> {
    Ok(StaffRow {
        staff_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        title: row.get(3)?,
        department_id: row.get(4)?,
        phone: row.get(5)?,
        email: row.get(6)?,
        is_active: active_flag(row.get(7)?),
    })
}

pub fn list_staff(conn: &Connection) -> Result<Vec<StaffRow>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {STAFF_COLUMNS} FROM Staff ORDER BY StaffId"))?;
    let rows = stmt.query_map([], staff_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_staff(conn: &Connection, staff_id: i64) -> Result<Option<StaffRow>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {STAFF_COLUMNS} FROM Staff WHERE StaffId = ?1"),
            [staff_id],
            staff_from_row,
        )
        .optional()?;
    Ok(row)
}

pub fn insert_staff(conn: &Connection, form: &StaffForm) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO Staff (FirstName, LastName, Title, DepartmentId, Phone, Email, IsActive)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            form.first_name.trim(),
            form.last_name.trim(),
            blank_to_null(&form.title),
            form.department_id,
            blank_to_null(&form.phone),
            blank_to_null(&form.email),
            form.is_active,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_staff(conn: &Connection, staff_id: i64, form: &StaffForm) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE Staff
         SET FirstName = ?1, LastName = ?2, Title = ?3, DepartmentId = ?4,
             Phone = ?5, Email = ?6, IsActive = ?7
         WHERE StaffId = ?8",
        params![
            form.first_name.trim(),
            form.last_name.trim(),
            blank_to_null(&form.title),
            form.department_id,
            blank_to_null(&form.phone),
            blank_to_null(&form.email),
            form.is_active,
            staff_id,
        ],
    )?;
    ensure_changed(changed, "Staff", staff_id)
}

pub fn set_staff_active(conn: &Connection, staff_id: i64, active: bool) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE Staff SET IsActive = ?1 WHERE StaffId = ?2",
        params![active, staff_id],
    )?;
    ensure_changed(changed, "Staff", staff_id)
}

pub fn delete_staff(conn: &Connection, staff_id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM Staff WHERE StaffId = ?1", [staff_id])?;
    ensure_changed(changed, "Staff", staff_id)
}
