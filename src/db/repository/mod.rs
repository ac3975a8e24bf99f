//! Repository layer — entity-scoped database operations.
//!
//! Every function takes the caller's connection and runs hand-written,
//! parameterized SQL. Transactions are the caller's business.

mod lookup;
mod patient;
mod payment;
mod reservation;
mod service_record;
mod staff;
mod user_account;

pub use lookup::*;
pub use patient::*;
pub use payment::*;
pub use reservation::*;
pub use service_record::*;
pub use staff::*;
pub use user_account::*;

use crate::db::DatabaseError;

/// `IsActive` as a row reports it: NULL reads as inactive, the same way
/// login reads it, so one toggle turns a NULL row on.
fn active_flag(value: Option<i64>) -> bool {
    value.is_some_and(|v| v != 0)
}

/// Optional text columns store NULL rather than an empty string.
fn blank_to_null(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Writes that touch no row mean the id does not exist.
fn ensure_changed(changed: usize, entity_type: &str, id: i64) -> Result<(), DatabaseError> {
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{self, date};
    use crate::db::sqlite::open_memory_database;
    use crate::financial::CoverageBreakdown;
    use crate::models::enums::Gender;
    use crate::models::*;
    use rusqlite::Connection;
    use zeroize::Zeroizing;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    #[test]
    fn active_flag_treats_null_as_inactive() {
        assert!(!active_flag(None));
        assert!(active_flag(Some(1)));
        assert!(!active_flag(Some(0)));
    }

    #[test]
    fn blank_to_null_trims() {
        assert_eq!(blank_to_null("  "), None);
        assert_eq!(blank_to_null(" 555 "), Some("555"));
    }

    #[test]
    fn staff_insert_update_toggle_delete() {
        let conn = test_db();
        let dept = fixtures::department(&conn, "Cardiology");
        let id = insert_staff(&conn, &StaffForm {
            first_name: " Mehmet ".into(),
            last_name: "Yilmaz".into(),
            title: "Dr.".into(),
            department_id: Some(dept),
            phone: "".into(),
            email: "mehmet@example.org".into(),
            is_active: true,
        }).unwrap();

        let row = get_staff(&conn, id).unwrap().unwrap();
        assert_eq!(row.first_name, "Mehmet");
        assert_eq!(row.phone, None);
        assert!(row.is_active);

        update_staff(&conn, id, &StaffForm {
            first_name: "Mehmet".into(),
            last_name: "Yilmaz".into(),
            title: "Prof. Dr.".into(),
            department_id: Some(dept),
            phone: "555-0101".into(),
            email: "".into(),
            is_active: true,
        }).unwrap();
        let row = get_staff(&conn, id).unwrap().unwrap();
        assert_eq!(row.title.as_deref(), Some("Prof. Dr."));
        assert_eq!(row.email, None);

        set_staff_active(&conn, id, false).unwrap();
        assert!(!get_staff(&conn, id).unwrap().unwrap().is_active);
        assert!(load_active_staff(&conn).unwrap().is_empty());

        delete_staff(&conn, id).unwrap();
        assert!(get_staff(&conn, id).unwrap().is_none());
    }

    #[test]
    fn update_of_missing_row_is_not_found() {
        let conn = test_db();
        let err = set_patient_active(&conn, 999, false).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
        let err = delete_payment(&conn, 999).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn patient_insert_and_partial_update() {
        let conn = test_db();
        let id = insert_patient(&conn, &PatientForm {
            first_name: "Zeynep".into(),
            last_name: "Arslan".into(),
            tc_no: "12345678901".into(),
            birth_date: date("1985-03-12"),
            gender: Gender::Female,
            phone: "555-0199".into(),
            email: "".into(),
            address: "Ankara".into(),
            is_active: true,
        }).unwrap();

        update_patient(&conn, id, &PatientUpdate {
            first_name: "Zeynep".into(),
            last_name: "Arslan-Kaya".into(),
            phone: "".into(),
            email: "zeynep@example.org".into(),
            is_active: true,
        }).unwrap();

        let row = get_patient(&conn, id).unwrap().unwrap();
        assert_eq!(row.last_name, "Arslan-Kaya");
        assert_eq!(row.tc_no, "12345678901");
        assert_eq!(row.birth_date, Some(date("1985-03-12")));
        assert_eq!(row.gender.as_deref(), Some("Female"));
        assert_eq!(row.phone, None);
        assert_eq!(row.address.as_deref(), Some("Ankara"));
    }

    #[test]
    fn duplicate_national_id_is_a_database_error() {
        let conn = test_db();
        fixtures::patient(&conn, "A", "B", "111");
        let form = PatientForm {
            first_name: "C".into(),
            last_name: "D".into(),
            tc_no: "111".into(),
            birth_date: date("2000-01-01"),
            gender: Gender::Male,
            phone: "".into(),
            email: "".into(),
            address: "".into(),
            is_active: true,
        };
        assert!(matches!(insert_patient(&conn, &form), Err(DatabaseError::Sqlite(_))));
    }

    #[test]
    fn malformed_dates_fail_the_read() {
        let conn = test_db();
        let patient = fixtures::patient(&conn, "A", "B", "1");
        conn.execute("UPDATE Patient SET BirthDate = 'yesterday' WHERE PatientId = ?1", [patient])
            .unwrap();
        assert!(matches!(list_patients(&conn), Err(DatabaseError::Sqlite(_))));

        conn.execute("UPDATE Patient SET BirthDate = NULL WHERE PatientId = ?1", [patient])
            .unwrap();
        assert_eq!(get_patient(&conn, patient).unwrap().unwrap().birth_date, None);

        let room = fixtures::room(&conn, "101");
        let id = fixtures::reservation(&conn, patient, room, "Confirmed", "2024-01-01", "2024-01-05");
        conn.execute(
            "UPDATE Reservation SET StartDate = '01/01/2024' WHERE ReservationId = ?1",
            [id],
        )
        .unwrap();
        assert!(matches!(list_reservations(&conn), Err(DatabaseError::Sqlite(_))));
    }

    #[test]
    fn active_patient_loader_skips_inactive() {
        let conn = test_db();
        let a = fixtures::patient(&conn, "Active", "One", "1");
        let b = fixtures::patient(&conn, "Gone", "Two", "2");
        set_patient_active(&conn, b, false).unwrap();
        conn.execute("UPDATE Patient SET IsActive = NULL WHERE PatientId = ?1", [a]).unwrap();

        let options = load_active_patients(&conn).unwrap();
        assert_eq!(options, vec![LookupOption::new(a, "Active One")]);
    }

    #[test]
    fn user_update_without_password_keeps_hash() {
        let conn = test_db();
        let staff = fixtures::staff(&conn, "Ali", "Kaya");
        let id = fixtures::user(&conn, "ali", "1234", "Receptionist", Some(staff), None, true);
        let before = find_login_record(&conn, "ali").unwrap().unwrap().password_hash;

        let form = UserForm {
            username: "ali.kaya".into(),
            password: Zeroizing::default(),
            role_id: fixtures::role_id(&conn, "Receptionist"),
            staff_id: Some(staff),
            patient_id: None,
            is_active: true,
        };
        update_user_account(&conn, id, &form, None).unwrap();

        let after = find_login_record(&conn, "ali.kaya").unwrap().unwrap();
        assert_eq!(after.password_hash, before);
        assert!(find_login_record(&conn, "ali").unwrap().is_none());
    }

    #[test]
    fn user_list_joins_role_and_hides_hash() {
        let conn = test_db();
        let staff = fixtures::staff(&conn, "Sys", "Admin");
        fixtures::user(&conn, "admin", "pw", "Admin", Some(staff), None, true);
        let rows = list_user_accounts(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role_name, "Admin");
        assert_eq!(count_user_accounts(&conn).unwrap(), 1);
    }

    #[test]
    fn account_cannot_link_staff_and_patient() {
        let conn = test_db();
        let staff = fixtures::staff(&conn, "X", "Y");
        let patient = fixtures::patient(&conn, "P", "Q", "9");
        let form = UserForm {
            username: "both".into(),
            password: Zeroizing::new("pw".into()),
            role_id: fixtures::role_id(&conn, "Doctor"),
            staff_id: Some(staff),
            patient_id: Some(patient),
            is_active: true,
        };
        assert!(insert_user_account(&conn, &form, "hash").is_err());
    }

    #[test]
    fn overlap_counts_only_intersecting_active_reservations() {
        let conn = test_db();
        let patient = fixtures::patient(&conn, "P", "Q", "1");
        let room = fixtures::room(&conn, "101");
        let other_room = fixtures::room(&conn, "102");
        let existing = fixtures::reservation(&conn, patient, room, "Confirmed", "2024-01-01", "2024-01-05");
        fixtures::reservation(&conn, patient, room, "Cancelled", "2024-01-10", "2024-01-20");
        fixtures::reservation(&conn, patient, other_room, "Confirmed", "2024-01-03", "2024-01-06");

        let count = |s: &str, e: &str, exclude| {
            count_overlapping_reservations(&conn, room, date(s), date(e), exclude).unwrap()
        };

        assert_eq!(count("2024-01-03", "2024-01-06", None), 1);
        assert_eq!(count("2024-01-05", "2024-01-06", None), 0);
        assert_eq!(count("2023-12-28", "2024-01-01", None), 0);
        assert_eq!(count("2023-12-28", "2024-01-02", None), 1);
        assert_eq!(count("2024-01-12", "2024-01-14", None), 0);
        assert_eq!(count("2024-01-02", "2024-01-04", Some(existing)), 0);
    }

    #[test]
    fn cancelled_status_lookup_is_case_insensitive() {
        let conn = test_db();
        let cancelled = fixtures::status_id(&conn, "Cancelled");
        assert_eq!(find_cancelled_status_id(&conn).unwrap(), Some(cancelled));
        assert!(is_cancelled_status(&conn, cancelled).unwrap());
        assert!(!is_cancelled_status(&conn, fixtures::status_id(&conn, "Pending")).unwrap());

        conn.execute("DELETE FROM ReservationStatus WHERE StatusId = ?1", [cancelled]).unwrap();
        conn.execute("INSERT INTO ReservationStatus (StatusName) VALUES ('CANCELED')", []).unwrap();
        assert!(find_cancelled_status_id(&conn).unwrap().is_some());
    }

    #[test]
    fn reservation_list_joins_patient_and_status() {
        let conn = test_db();
        let patient = fixtures::patient(&conn, "Elif", "Sahin", "1");
        let room = fixtures::room(&conn, "201");
        let form = ReservationForm {
            patient_id: patient,
            room_id: room,
            status_id: fixtures::status_id(&conn, "Pending"),
            start_date: date("2024-02-01"),
            end_date: date("2024-02-03"),
        };
        let id = insert_reservation(&conn, &form, None, date("2024-01-20")).unwrap();

        let rows = list_reservations(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reservation_id, id);
        assert_eq!(rows[0].patient_name, "Elif Sahin");
        assert_eq!(rows[0].status_name, "Pending");
        assert_eq!(rows[0].end_date, date("2024-02-03"));
    }

    #[test]
    fn availability_reports_every_room() {
        let conn = test_db();
        let patient = fixtures::patient(&conn, "P", "Q", "1");
        let busy = fixtures::room(&conn, "101");
        let idle = fixtures::room(&conn, "102");
        fixtures::reservation(&conn, patient, busy, "Confirmed", "2024-01-01", "2024-01-05");
        fixtures::reservation(&conn, patient, busy, "Cancelled", "2024-02-01", "2024-02-09");

        let rows = room_availability(&conn).unwrap();
        assert_eq!(rows, vec![
            RoomAvailability {
                room_id: busy,
                total_reservations: 2,
                active_reservations: 1,
                last_reservation_end: Some(date("2024-02-09")),
            },
            RoomAvailability {
                room_id: idle,
                total_reservations: 0,
                active_reservations: 0,
                last_reservation_end: None,
            },
        ]);
    }

    #[test]
    fn service_records_are_scoped_to_their_doctor() {
        let conn = test_db();
        let doctor = fixtures::staff(&conn, "Doc", "One");
        let other = fixtures::staff(&conn, "Doc", "Two");
        let patient = fixtures::patient(&conn, "P", "Q", "1");
        let service = fixtures::service(&conn, "MRI", 1000.0);
        let program = fixtures::program(&conn, "General Health Insurance", 0.8);

        let form = ServiceRecordForm {
            patient_id: patient,
            service_id: service,
            program_id: program,
            service_date: date("2024-03-01"),
            total_price: 1000.0,
        };
        let amounts = CoverageBreakdown::compute(1000.0, Some(0.8));
        let id = insert_service_record(&conn, &form, doctor, &amounts).unwrap();

        let mine = list_service_records_for_doctor(&conn, doctor).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].service_name, "MRI");
        assert_eq!(mine[0].state_covered_amount, 800.0);
        assert_eq!(mine[0].patient_payable_amount, 200.0);
        assert!(list_service_records_for_doctor(&conn, other).unwrap().is_empty());

        assert!(matches!(
            delete_service_record(&conn, id, other),
            Err(DatabaseError::NotFound { .. })
        ));
        delete_service_record(&conn, id, doctor).unwrap();
        assert!(list_service_records_for_doctor(&conn, doctor).unwrap().is_empty());
    }

    #[test]
    fn payments_join_type_and_feed_picker() {
        let conn = test_db();
        let doctor = fixtures::staff(&conn, "Doc", "One");
        let patient = fixtures::patient(&conn, "P", "Q", "1");
        let service = fixtures::service(&conn, "Blood test", 120.0);
        let program = fixtures::program(&conn, "None", 0.0);
        let cash = fixtures::payment_type(&conn, "Cash");
        let record = insert_service_record(
            &conn,
            &ServiceRecordForm {
                patient_id: patient,
                service_id: service,
                program_id: program,
                service_date: date("2024-03-01"),
                total_price: 120.0,
            },
            doctor,
            &CoverageBreakdown::compute(120.0, Some(0.0)),
        )
        .unwrap();

        let options = load_service_record_options(&conn).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(
            options[0].name,
            format!("SR#{record} | PatientId={patient} | DoctorId={doctor} | Payable=120.00")
        );

        insert_payment(&conn, &PaymentForm {
            service_record_id: record,
            payment_type_id: cash,
            payment_date: date("2024-03-02"),
            amount: 120.0,
            payer: " Patient ".into(),
        }).unwrap();
        let payments = list_payments(&conn).unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].payment_type_name, "Cash");
        assert_eq!(payments[0].payer, "Patient");
    }

    #[test]
    fn program_rate_lookup() {
        let conn = test_db();
        let program = fixtures::program(&conn, "Green Card", 1.0);
        assert_eq!(get_program_rate(&conn, program).unwrap(), Some(1.0));
        assert_eq!(get_program_rate(&conn, 999).unwrap(), None);
        assert_eq!(load_programs(&conn).unwrap()[0].coverage_rate, 1.0);
    }
}
