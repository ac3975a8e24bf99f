use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

use super::ensure_changed;

fn reservation_from_row(row: &Row<'_>) -> rusqlite::Result<ReservationRow> {
    Ok(ReservationRow {
        reservation_id: row.get(0)?,
        patient_id: row.get(1)?,
        patient_name: row.get(2)?,
        room_id: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        status_id: row.get(6)?,
        status_name: row.get(7)?,
    })
}

const RESERVATION_SELECT: &str = "
    SELECT res.ReservationId,
           res.PatientId,
           p.FirstName || ' ' || p.LastName,
           res.RoomId,
           res.StartDate,
           res.EndDate,
           res.StatusId,
           st.StatusName
    FROM Reservation res
    JOIN Patient p ON p.PatientId = res.PatientId
    JOIN ReservationStatus st ON st.StatusId = res.StatusId";

/// All reservations, newest first.
pub fn list_reservations(conn: &Connection) -> Result<Vec<ReservationRow>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{RESERVATION_SELECT} ORDER BY res.ReservationId DESC"))?;
    let rows = stmt.query_map([], reservation_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_reservation(
    conn: &Connection,
    reservation_id: i64,
) -> Result<Option<ReservationRow>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{RESERVATION_SELECT} WHERE res.ReservationId = ?1"),
            [reservation_id],
            reservation_from_row,
        )
        .optional()?;
    Ok(row)
}

/// Count non-cancelled reservations of `room_id` intersecting `[start, end)`.
///
/// Two stays overlap unless one ends on or before the day the other starts.
/// `exclude` skips one reservation (the one being edited).
pub fn count_overlapping_reservations(
    conn: &Connection,
    room_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    exclude: Option<i64>,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(1)
         FROM Reservation res
         JOIN ReservationStatus st ON st.StatusId = res.StatusId
         WHERE res.RoomId = ?1
           AND LOWER(st.StatusName) NOT LIKE 'cancel%'
           AND NOT (res.EndDate <= ?2 OR res.StartDate >= ?3)
           AND (?4 IS NULL OR res.ReservationId <> ?4)",
        params![room_id, start.to_string(), end.to_string(), exclude],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Whether `status_id` names a cancelled status.
pub fn is_cancelled_status(conn: &Connection, status_id: i64) -> Result<bool, DatabaseError> {
    let name: Option<String> = conn
        .query_row(
            "SELECT StatusName FROM ReservationStatus WHERE StatusId = ?1",
            [status_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name.is_some_and(|n| n.to_lowercase().starts_with("cancel")))
}

pub fn insert_reservation(
    conn: &Connection,
    form: &ReservationForm,
    created_by_staff_id: Option<i64>,
    created_date: NaiveDate,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO Reservation
         (PatientId, RoomId, CreatedByStaffId, StatusId, StartDate, EndDate, CreatedDate)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            form.patient_id,
            form.room_id,
            created_by_staff_id,
            form.status_id,
            form.start_date.to_string(),
            form.end_date.to_string(),
            created_date.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_reservation(
    conn: &Connection,
    reservation_id: i64,
    form: &ReservationForm,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE Reservation
         SET PatientId = ?1, RoomId = ?2, StartDate = ?3, EndDate = ?4, StatusId = ?5
         WHERE ReservationId = ?6",
        params![
            form.patient_id,
            form.room_id,
            form.start_date.to_string(),
            form.end_date.to_string(),
            form.status_id,
            reservation_id,
        ],
    )?;
    ensure_changed(changed, "Reservation", reservation_id)
}

pub fn set_reservation_status(
    conn: &Connection,
    reservation_id: i64,
    status_id: i64,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE Reservation SET StatusId = ?1 WHERE ReservationId = ?2",
        params![status_id, reservation_id],
    )?;
    ensure_changed(changed, "Reservation", reservation_id)
}

pub fn delete_reservation(conn: &Connection, reservation_id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM Reservation WHERE ReservationId = ?1",
        [reservation_id],
    )?;
    ensure_changed(changed, "Reservation", reservation_id)
}

/// Per-room reservation totals, including rooms that were never booked.
pub fn room_availability(conn: &Connection) -> Result<Vec<RoomAvailability>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT r.RoomId,
                COUNT(res.ReservationId),
                SUM(CASE WHEN st.StatusName NOT LIKE 'cancel%' THEN 1 ELSE 0 END),
                MAX(res.EndDate)
         FROM Room r
         LEFT JOIN Reservation res ON res.RoomId = r.RoomId
         LEFT JOIN ReservationStatus st ON st.StatusId = res.StatusId
         GROUP BY r.RoomId
         ORDER BY r.RoomId",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(RoomAvailability {
            room_id: row.get(0)?,
            total_reservations: row.get(1)?,
            active_reservations: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
            last_reservation_end: row.get(3)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}
