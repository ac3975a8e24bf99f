use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

use super::{active_flag, blank_to_null, ensure_changed};

const PATIENT_COLUMNS: &str =
    "PatientId, FirstName, LastName, TCNo, BirthDate, Gender, Phone, Email, Address, IsActive";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        patient_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        tc_no: row.get(3)?,
        birth_date: row.get(4)?,
        gender: row.get(5)?,
        phone: row.get(6)?,
        email: row.get(7)?,
        address: row.get(8)?,
        is_active: active_flag(row.get(9)?),
    })
}

pub fn list_patients(conn: &Connection) -> Result<Vec<PatientRow>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {PATIENT_COLUMNS} FROM Patient ORDER BY PatientId"))?;
    let rows = stmt.query_map([], patient_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_patient(conn: &Connection, patient_id: i64) -> Result<Option<PatientRow>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM Patient WHERE PatientId = ?1"),
            [patient_id],
            patient_from_row,
        )
        .optional()?;
    Ok(row)
}

pub fn insert_patient(conn: &Connection, form: &PatientForm) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO Patient
         (FirstName, LastName, TCNo, BirthDate, Gender, Phone, Email, Address, IsActive)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            form.first_name.trim(),
            form.last_name.trim(),
            form.tc_no.trim(),
            form.birth_date.to_string(),
            form.gender.as_str(),
            blank_to_null(&form.phone),
            blank_to_null(&form.email),
            blank_to_null(&form.address),
            form.is_active,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_patient(
    conn: &Connection,
    patient_id: i64,
    update: &PatientUpdate,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE Patient
         SET FirstName = ?1, LastName = ?2, Phone = ?3, Email = ?4, IsActive = ?5
         WHERE PatientId = ?6",
        params![
            update.first_name.trim(),
            update.last_name.trim(),
            blank_to_null(&update.phone),
            blank_to_null(&update.email),
            update.is_active,
            patient_id,
        ],
    )?;
    ensure_changed(changed, "Patient", patient_id)
}

pub fn set_patient_active(
    conn: &Connection,
    patient_id: i64,
    active: bool,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE Patient SET IsActive = ?1 WHERE PatientId = ?2",
        params![active, patient_id],
    )?;
    ensure_changed(changed, "Patient", patient_id)
}

pub fn delete_patient(conn: &Connection, patient_id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM Patient WHERE PatientId = ?1", [patient_id])?;
    ensure_changed(changed, "Patient", patient_id)
}
