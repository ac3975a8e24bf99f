use rusqlite::{params, Connection, Row};

use crate::db::DatabaseError;
use crate::financial::CoverageBreakdown;
use crate::models::*;

use super::ensure_changed;

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ServiceRecordRow> {
    Ok(ServiceRecordRow {
        service_record_id: row.get(0)?,
        patient_id: row.get(1)?,
        patient_name: row.get(2)?,
        service_id: row.get(3)?,
        service_name: row.get(4)?,
        program_id: row.get(5)?,
        program_name: row.get(6)?,
        service_date: row.get(7)?,
        total_price: row.get(8)?,
        state_covered_amount: row.get(9)?,
        patient_payable_amount: row.get(10)?,
    })
}

const RECORD_SELECT: &str = "
    SELECT sr.ServiceRecordId,
           sr.PatientId,
           p.FirstName || ' ' || p.LastName,
           sr.ServiceId,
           hs.ServiceName,
           sr.ProgramId,
           sp.ProgramName,
           sr.ServiceDate,
           sr.TotalPrice,
           sr.StateCoveredAmount,
           sr.PatientPayableAmount
    FROM ServiceRecord sr
    JOIN Patient p ON p.PatientId = sr.PatientId
    JOIN HealthService hs ON hs.ServiceId = sr.ServiceId
    JOIN StateProgram sp ON sp.ProgramId = sr.ProgramId";

/// Records authored by one doctor, newest first.
pub fn list_service_records_for_doctor(
    conn: &Connection,
    doctor_id: i64,
) -> Result<Vec<ServiceRecordRow>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{RECORD_SELECT} WHERE sr.DoctorId = ?1 ORDER BY sr.ServiceRecordId DESC"
    ))?;
    let rows = stmt.query_map([doctor_id], record_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn insert_service_record(
    conn: &Connection,
    form: &ServiceRecordForm,
    doctor_id: i64,
    amounts: &CoverageBreakdown,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO ServiceRecord
         (PatientId, ServiceId, DoctorId, ProgramId, ServiceDate,
          TotalPrice, StateCoveredAmount, PatientPayableAmount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            form.patient_id,
            form.service_id,
            doctor_id,
            form.program_id,
            form.service_date.to_string(),
            amounts.total_price,
            amounts.state_covered_amount,
            amounts.patient_payable_amount,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update a record owned by `doctor_id`. Records of other doctors are
/// reported as not found.
pub fn update_service_record(
    conn: &Connection,
    record_id: i64,
    doctor_id: i64,
    form: &ServiceRecordForm,
    amounts: &CoverageBreakdown,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE ServiceRecord
         SET PatientId = ?1, ServiceId = ?2, ProgramId = ?3, ServiceDate = ?4,
             TotalPrice = ?5, StateCoveredAmount = ?6, PatientPayableAmount = ?7
         WHERE ServiceRecordId = ?8 AND DoctorId = ?9",
        params![
            form.patient_id,
            form.service_id,
            form.program_id,
            form.service_date.to_string(),
            amounts.total_price,
            amounts.state_covered_amount,
            amounts.patient_payable_amount,
            record_id,
            doctor_id,
        ],
    )?;
    ensure_changed(changed, "ServiceRecord", record_id)
}

pub fn delete_service_record(
    conn: &Connection,
    record_id: i64,
    doctor_id: i64,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM ServiceRecord WHERE ServiceRecordId = ?1 AND DoctorId = ?2",
        params![record_id, doctor_id],
    )?;
    ensure_changed(changed, "ServiceRecord", record_id)
}
