//! Seed helpers shared by the test modules.

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::crypto::hash_password_with_iterations;

/// Iteration count for test hashes; production hashing is far slower.
pub const TEST_ITERATIONS: u32 = 1_000;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn role_id(conn: &Connection, name: &str) -> i64 {
    conn.query_row("SELECT RoleId FROM Role WHERE RoleName = ?1", [name], |row| row.get(0))
        .unwrap()
}

pub fn status_id(conn: &Connection, name: &str) -> i64 {
    conn.query_row(
        "SELECT StatusId FROM ReservationStatus WHERE StatusName = ?1",
        [name],
        |row| row.get(0),
    )
    .unwrap()
}

pub fn department(conn: &Connection, name: &str) -> i64 {
    conn.execute("INSERT INTO Hospital (HospitalName) VALUES ('Central Hospital')", [])
        .unwrap();
    let hospital = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO Department (DepartmentName, HospitalId) VALUES (?1, ?2)",
        params![name, hospital],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn staff(conn: &Connection, first: &str, last: &str) -> i64 {
    conn.execute(
        "INSERT INTO Staff (FirstName, LastName, Title, IsActive) VALUES (?1, ?2, 'Dr.', 1)",
        params![first, last],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn patient(conn: &Connection, first: &str, last: &str, tc_no: &str) -> i64 {
    conn.execute(
        "INSERT INTO Patient (FirstName, LastName, TCNo, BirthDate, Gender, IsActive)
         VALUES (?1, ?2, ?3, '1990-05-01', 'Female', 1)",
        params![first, last, tc_no],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn user(
    conn: &Connection,
    username: &str,
    password: &str,
    role: &str,
    staff_id: Option<i64>,
    patient_id: Option<i64>,
    active: bool,
) -> i64 {
    let hash = hash_password_with_iterations(password, TEST_ITERATIONS).unwrap();
    conn.execute(
        "INSERT INTO UserAccount (Username, PasswordHash, RoleId, StaffId, PatientId, IsActive)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![username, hash, role_id(conn, role), staff_id, patient_id, active],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn room(conn: &Connection, number: &str) -> i64 {
    conn.execute(
        "INSERT INTO RoomType (TypeName, DefaultCapacity, BaseDailyPrice) VALUES ('Standard', 2, 500)",
        [],
    )
    .unwrap();
    let room_type = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO Room (RoomNumber, RoomTypeId, IsActive) VALUES (?1, ?2, 1)",
        params![number, room_type],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn reservation(
    conn: &Connection,
    patient_id: i64,
    room_id: i64,
    status: &str,
    start: &str,
    end: &str,
) -> i64 {
    conn.execute(
        "INSERT INTO Reservation (PatientId, RoomId, StatusId, StartDate, EndDate, CreatedDate)
         VALUES (?1, ?2, ?3, ?4, ?5, '2023-12-31')",
        params![patient_id, room_id, status_id(conn, status), start, end],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn service(conn: &Connection, name: &str, base_price: f64) -> i64 {
    conn.execute("INSERT INTO ServiceCategory (CategoryName) VALUES ('Imaging')", [])
        .unwrap();
    let category = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO HealthService (ServiceName, ServiceCategoryId, BasePrice) VALUES (?1, ?2, ?3)",
        params![name, category, base_price],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn program(conn: &Connection, name: &str, coverage_rate: f64) -> i64 {
    conn.execute(
        "INSERT INTO StateProgram (ProgramName, CoverageRate) VALUES (?1, ?2)",
        params![name, coverage_rate],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn payment_type(conn: &Connection, name: &str) -> i64 {
    conn.execute(
        "INSERT INTO PaymentType (PaymentTypeName) VALUES (?1)",
        params![name],
    )
    .unwrap();
    conn.last_insert_rowid()
}
