//! Receptionist workspace: patients, room reservations and availability.

use chrono::{Datelike, Local, NaiveDate};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

use super::{open_workspace, required_text, CommandError};
use crate::core_state::{CoreState, Workspace};
use crate::db;
use crate::models::*;

#[derive(Debug, Clone, Serialize)]
pub struct ReceptionOverview {
    pub patients: Vec<PatientRow>,
    pub reservations: Vec<ReservationRow>,
    pub availability: Vec<RoomAvailability>,
}

pub fn load_overview(state: &CoreState) -> Result<ReceptionOverview, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    Ok(ReceptionOverview {
        patients: db::list_patients(&conn)?,
        reservations: db::list_reservations(&conn)?,
        availability: db::room_availability(&conn)?,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceptionLookups {
    pub statuses: Vec<LookupOption>,
    pub patients: Vec<LookupOption>,
    pub rooms: Vec<LookupOption>,
}

pub fn load_lookups(state: &CoreState) -> Result<ReceptionLookups, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    Ok(ReceptionLookups {
        statuses: db::load_reservation_statuses(&conn)?,
        patients: db::load_active_patients(&conn)?,
        rooms: db::load_active_rooms(&conn)?,
    })
}

// ── Patients ───────────────────────────────────────────────

pub fn list_patients(state: &CoreState) -> Result<Vec<PatientRow>, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    Ok(db::list_patients(&conn)?)
}

fn check_names(first_name: &str, last_name: &str) -> Result<(), CommandError> {
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(CommandError::Validation(
            "FirstName and LastName required.".into(),
        ));
    }
    Ok(())
}

pub fn add_patient(state: &CoreState, form: &PatientForm) -> Result<i64, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    check_names(&form.first_name, &form.last_name)?;
    required_text(&form.tc_no, "TCNo is required.")?;
    let patient_id = db::insert_patient(&conn, form)?;
    tracing::info!(patient_id, "Patient registered");
    Ok(patient_id)
}

pub fn edit_patient(
    state: &CoreState,
    patient_id: i64,
    update: &PatientUpdate,
) -> Result<(), CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    check_names(&update.first_name, &update.last_name)?;
    db::update_patient(&conn, patient_id, update)?;
    tracing::info!(patient_id, "Patient updated");
    Ok(())
}

pub fn toggle_patient_active(state: &CoreState, patient_id: i64) -> Result<bool, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    let patient = db::get_patient(&conn, patient_id)?
        .ok_or_else(|| CommandError::Informational("Select a patient first.".into()))?;
    db::set_patient_active(&conn, patient_id, !patient.is_active)?;
    tracing::info!(patient_id, active = !patient.is_active, "Patient active flag toggled");
    Ok(!patient.is_active)
}

pub fn delete_patient(state: &CoreState, patient_id: i64) -> Result<(), CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    db::delete_patient(&conn, patient_id)?;
    tracing::info!(patient_id, "Patient deleted");
    Ok(())
}

// ── Reservations ───────────────────────────────────────────

pub fn list_reservations(state: &CoreState) -> Result<Vec<ReservationRow>, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    Ok(db::list_reservations(&conn)?)
}

/// Dates are stored as `YYYY-MM-DD` text and compared as text, which only
/// orders correctly for four-digit years.
fn is_storable(date: NaiveDate) -> bool {
    (1..=9999).contains(&date.year())
}

fn check_dates(form: &ReservationForm) -> Result<(), CommandError> {
    if !is_storable(form.start_date) || !is_storable(form.end_date) {
        return Err(CommandError::Validation(
            "Dates must have a four-digit year.".into(),
        ));
    }
    if form.end_date <= form.start_date {
        return Err(CommandError::Validation("EndDate must be after StartDate.".into()));
    }
    Ok(())
}

/// Reject the stay when another active reservation holds the room.
fn ensure_room_free(
    conn: &Connection,
    form: &ReservationForm,
    exclude: Option<i64>,
) -> Result<(), CommandError> {
    let overlapping = db::count_overlapping_reservations(
        conn,
        form.room_id,
        form.start_date,
        form.end_date,
        exclude,
    )?;
    if overlapping > 0 {
        tracing::warn!(
            room_id = form.room_id,
            start = %form.start_date,
            end = %form.end_date,
            overlapping,
            "Reservation rejected: room not available"
        );
        return Err(CommandError::ReservationConflict);
    }
    Ok(())
}

/// Book a room. The overlap check and the insert share one IMMEDIATE
/// transaction, so two desks cannot book the same nights.
pub fn add_reservation(state: &CoreState, form: &ReservationForm) -> Result<i64, CommandError> {
    let (session, mut conn) = open_workspace(state, Workspace::Receptionist)?;
    check_dates(form)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    ensure_room_free(&tx, form, None)?;
    let reservation_id =
        db::insert_reservation(&tx, form, session.staff_id, Local::now().date_naive())?;
    tx.commit()?;

    tracing::info!(reservation_id, room_id = form.room_id, "Reservation added");
    Ok(reservation_id)
}

/// Update a reservation. Moving it into a non-cancelled status re-runs the
/// overlap check against every other reservation of the room.
pub fn edit_reservation(
    state: &CoreState,
    reservation_id: i64,
    form: &ReservationForm,
) -> Result<(), CommandError> {
    let (_, mut conn) = open_workspace(state, Workspace::Receptionist)?;
    check_dates(form)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    if db::get_reservation(&tx, reservation_id)?.is_none() {
        return Err(CommandError::Informational("Select a reservation first.".into()));
    }
    if !db::is_cancelled_status(&tx, form.status_id)? {
        ensure_room_free(&tx, form, Some(reservation_id))?;
    }
    db::update_reservation(&tx, reservation_id, form)?;
    tx.commit()?;

    tracing::info!(reservation_id, "Reservation updated");
    Ok(())
}

pub fn cancel_reservation(state: &CoreState, reservation_id: i64) -> Result<(), CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    let cancelled = db::find_cancelled_status_id(&conn)?.ok_or_else(|| {
        CommandError::Validation("No 'Cancelled' status found in ReservationStatus.".into())
    })?;
    db::set_reservation_status(&conn, reservation_id, cancelled)?;
    tracing::info!(reservation_id, "Reservation cancelled");
    Ok(())
}

pub fn delete_reservation(state: &CoreState, reservation_id: i64) -> Result<(), CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    db::delete_reservation(&conn, reservation_id)?;
    tracing::info!(reservation_id, "Reservation deleted");
    Ok(())
}

// ── Availability ───────────────────────────────────────────

pub fn room_availability(state: &CoreState) -> Result<Vec<RoomAvailability>, CommandError> {
    let (_, conn) = open_workspace(state, Workspace::Receptionist)?;
    db::room_availability(&conn).map_err(|e| {
        tracing::error!("Availability query failed: {e}");
        CommandError::from(e)
    })
}
