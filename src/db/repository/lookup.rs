//! Picker loaders: id/name pairs for every foreign key a form selects.
//!
//! People and rooms only list active rows (NULL counts as active).

use rusqlite::{Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

fn load_options(conn: &Connection, sql: &str) -> Result<Vec<LookupOption>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(LookupOption {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn load_roles(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(conn, "SELECT RoleId, RoleName FROM Role ORDER BY RoleId")
}

/// Role name for an id, if the role exists.
pub fn get_role_name(conn: &Connection, role_id: i64) -> Result<Option<String>, DatabaseError> {
    let name = conn
        .query_row(
            "SELECT RoleName FROM Role WHERE RoleId = ?1",
            [role_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name)
}

pub fn load_hospitals(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(conn, "SELECT HospitalId, HospitalName FROM Hospital ORDER BY HospitalId")
}

pub fn load_departments(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(
        conn,
        "SELECT DepartmentId, DepartmentName FROM Department ORDER BY DepartmentId",
    )
}

pub fn load_room_types(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(conn, "SELECT RoomTypeId, TypeName FROM RoomType ORDER BY RoomTypeId")
}

pub fn load_service_categories(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(
        conn,
        "SELECT ServiceCategoryId, CategoryName FROM ServiceCategory ORDER BY ServiceCategoryId",
    )
}

pub fn load_payment_types(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(
        conn,
        "SELECT PaymentTypeId, PaymentTypeName FROM PaymentType ORDER BY PaymentTypeId",
    )
}

pub fn load_reservation_statuses(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(
        conn,
        "SELECT StatusId, StatusName FROM ReservationStatus ORDER BY StatusId",
    )
}

/// Active staff as "First Last (Title)".
pub fn load_active_staff(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(
        conn,
        "SELECT StaffId,
                FirstName || ' ' || LastName
                    || CASE WHEN Title IS NULL OR Title = '' THEN '' ELSE ' (' || Title || ')' END
         FROM Staff
         WHERE IsActive = 1 OR IsActive IS NULL
         ORDER BY StaffId",
    )
}

pub fn load_active_patients(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(
        conn,
        "SELECT PatientId, FirstName || ' ' || LastName
         FROM Patient
         WHERE IsActive = 1 OR IsActive IS NULL
         ORDER BY PatientId",
    )
}

pub fn load_active_rooms(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(
        conn,
        "SELECT RoomId, 'Room ' || RoomNumber
         FROM Room
         WHERE IsActive = 1 OR IsActive IS NULL
         ORDER BY RoomId",
    )
}

/// Service records for the payment picker, newest first.
pub fn load_service_record_options(conn: &Connection) -> Result<Vec<LookupOption>, DatabaseError> {
    load_options(
        conn,
        "SELECT ServiceRecordId,
                'SR#' || ServiceRecordId
                    || ' | PatientId=' || PatientId
                    || ' | DoctorId=' || DoctorId
                    || ' | Payable=' || printf('%.2f', PatientPayableAmount)
         FROM ServiceRecord
         ORDER BY ServiceRecordId DESC",
    )
}

pub fn load_services(conn: &Connection) -> Result<Vec<ServiceOption>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT ServiceId, ServiceName, BasePrice FROM HealthService ORDER BY ServiceId",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ServiceOption {
            id: row.get(0)?,
            name: row.get(1)?,
            base_price: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn load_programs(conn: &Connection) -> Result<Vec<ProgramOption>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT ProgramId, ProgramName, CoverageRate FROM StateProgram ORDER BY ProgramId",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ProgramOption {
            id: row.get(0)?,
            name: row.get(1)?,
            coverage_rate: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Coverage rate of one program. `None` when the program does not exist.
pub fn get_program_rate(conn: &Connection, program_id: i64) -> Result<Option<f64>, DatabaseError> {
    let rate = conn
        .query_row(
            "SELECT CoverageRate FROM StateProgram WHERE ProgramId = ?1",
            [program_id],
            |row| row.get::<_, Option<f64>>(0),
        )
        .optional()?;
    Ok(rate.map(|r| r.unwrap_or(0.0)))
}

/// Id of the first status whose name starts with "cancel" (case-insensitive).
pub fn find_cancelled_status_id(conn: &Connection) -> Result<Option<i64>, DatabaseError> {
    let id = conn
        .query_row(
            "SELECT StatusId FROM ReservationStatus
             WHERE LOWER(StatusName) LIKE 'cancel%'
             ORDER BY StatusId LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}
