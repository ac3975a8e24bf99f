//! Doctor workspace: the signed-in doctor's service records.
//!
//! Records are always scoped by the session's staff id; another doctor's
//! record behaves as if it did not exist.

use rusqlite::Connection;
use serde::Serialize;

use super::{open_workspace, CommandError};
use crate::core_state::{CoreState, Workspace};
use crate::db;
use crate::financial::{self, CoverageBreakdown};
use crate::models::*;

#[derive(Debug, Clone, Serialize)]
pub struct DoctorOverview {
    pub records: Vec<ServiceRecordRow>,
}

pub fn load_overview(state: &CoreState) -> Result<DoctorOverview, CommandError> {
    Ok(DoctorOverview {
        records: list_service_records(state)?,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorLookups {
    pub patients: Vec<LookupOption>,
    pub services: Vec<ServiceOption>,
    pub programs: Vec<ProgramOption>,
}

pub fn load_lookups(state: &CoreState) -> Result<DoctorLookups, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Doctor)?;
    Ok(DoctorLookups {
        patients: db::load_active_patients(&conn)?,
        services: db::load_services(&conn)?,
        programs: db::load_programs(&conn)?,
    })
}

/// Role check, connection, and the doctor's staff id.
fn open_as_doctor(state: &CoreState) -> Result<(i64, Connection), CommandError> {
    let (session, conn) = open_workspace(state, Workspace::Doctor)?;
    let doctor_id = session.staff_id.ok_or_else(|| {
        CommandError::Informational("This account is not linked to a staff record.".into())
    })?;
    Ok((doctor_id, conn))
}

pub fn list_service_records(state: &CoreState) -> Result<Vec<ServiceRecordRow>, CommandError> {
    let (doctor_id, conn) = open_as_doctor(state)?;
    let records = db::list_service_records_for_doctor(&conn, doctor_id)?;
    tracing::debug!(doctor_id, count = records.len(), "Service records loaded");
    Ok(records)
}

/// Total a new record starts from: the service's base price.
pub fn default_total_price(state: &CoreState, service_id: i64) -> Result<f64, CommandError> {
    let (_, conn) = open_as_doctor(state)?;
    let services = db::load_services(&conn)?;
    Ok(financial::default_total_price(&services, Some(service_id)))
}

/// Amounts the form shows before saving.
pub fn preview_amounts(
    state: &CoreState,
    total_price: f64,
    program_id: Option<i64>,
) -> Result<CoverageBreakdown, CommandError> {
    let (_, conn) = open_as_doctor(state)?;
    let rate = match program_id {
        Some(id) => db::get_program_rate(&conn, id)?,
        None => None,
    };
    Ok(CoverageBreakdown::compute(total_price, rate))
}

fn ensure_reference_data(conn: &Connection) -> Result<(), CommandError> {
    if db::load_services(conn)?.is_empty() {
        return Err(CommandError::Informational(
            "No services found. Admin must add HealthService records first.".into(),
        ));
    }
    if db::load_programs(conn)?.is_empty() {
        return Err(CommandError::Informational(
            "No state programs found. Admin must add StateProgram records first.".into(),
        ));
    }
    if db::load_active_patients(conn)?.is_empty() {
        return Err(CommandError::Informational(
            "No patients found. Receptionist must add patients first.".into(),
        ));
    }
    Ok(())
}

/// Validate the form and derive the amounts from the program's stored rate.
fn compute_amounts(
    conn: &Connection,
    form: &ServiceRecordForm,
) -> Result<CoverageBreakdown, CommandError> {
    if form.total_price.is_nan() || form.total_price <= 0.0 {
        return Err(CommandError::Validation("TotalPrice must be > 0.".into()));
    }
    let rate = db::get_program_rate(conn, form.program_id)?
        .ok_or_else(|| CommandError::Validation("State program must be selected.".into()))?;
    Ok(CoverageBreakdown::compute(form.total_price, Some(rate)))
}

pub fn add_service_record(
    state: &CoreState,
    form: &ServiceRecordForm,
) -> Result<i64, CommandError> {
    let (doctor_id, conn) = open_as_doctor(state)?;
    ensure_reference_data(&conn)?;
    let amounts = compute_amounts(&conn, form)?;
    let record_id = db::insert_service_record(&conn, form, doctor_id, &amounts)?;
    tracing::info!(
        record_id,
        doctor_id,
        payable = amounts.patient_payable_amount,
        "Service record added"
    );
    Ok(record_id)
}

pub fn edit_service_record(
    state: &CoreState,
    record_id: i64,
    form: &ServiceRecordForm,
) -> Result<(), CommandError> {
    let (doctor_id, conn) = open_as_doctor(state)?;
    let amounts = compute_amounts(&conn, form)?;
    db::update_service_record(&conn, record_id, doctor_id, form, &amounts)?;
    tracing::info!(record_id, doctor_id, "Service record updated");
    Ok(())
}

pub fn delete_service_record(state: &CoreState, record_id: i64) -> Result<(), CommandError> {
    let (doctor_id, conn) = open_as_doctor(state)?;
    db::delete_service_record(&conn, record_id, doctor_id)?;
    tracing::info!(record_id, doctor_id, "Service record deleted");
    Ok(())
}
