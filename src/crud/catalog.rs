//! System definitions: reference tables the admin edits through the
//! generic engine.

use super::{CrudTable, FieldSpec};
use crate::db::repository::{
    load_departments, load_hospitals, load_room_types, load_service_categories,
};

/// Catalog names, in the order the admin workspace shows them.
pub const CATALOG_TABLES: &[&str] = &[
    "Hospital",
    "Department",
    "RoomType",
    "Room",
    "ServiceCategory",
    "HealthService",
    "StateProgram",
    "PaymentType",
];

/// Look up a catalog table by its table name.
pub fn catalog_table(name: &str) -> Option<CrudTable> {
    let table = match name {
        "Hospital" => CrudTable::new(
            "Hospitals",
            "Hospital",
            "HospitalId",
            &["HospitalName", "City", "Phone"],
        )
        .field(FieldSpec::text("HospitalName", "Hospital name").required())
        .field(FieldSpec::text("City", "City"))
        .field(FieldSpec::text("Phone", "Phone")),

        "Department" => CrudTable::new(
            "Departments",
            "Department",
            "DepartmentId",
            &["DepartmentName", "Description", "HospitalId"],
        )
        .field(FieldSpec::text("DepartmentName", "Department name").required())
        .field(FieldSpec::text("Description", "Description"))
        .field(FieldSpec::foreign_key("HospitalId", "Hospital", load_hospitals).required()),

        "RoomType" => CrudTable::new(
            "Room types",
            "RoomType",
            "RoomTypeId",
            &["TypeName", "Description", "DefaultCapacity", "BaseDailyPrice"],
        )
        .field(FieldSpec::text("TypeName", "Type name").required())
        .field(FieldSpec::text("Description", "Description"))
        .field(FieldSpec::integer("DefaultCapacity", "Default capacity").required())
        .field(FieldSpec::decimal("BaseDailyPrice", "Base daily price").required()),

        "Room" => CrudTable::new(
            "Rooms",
            "Room",
            "RoomId",
            &["RoomNumber", "RoomTypeId", "DepartmentId", "IsActive"],
        )
        .field(FieldSpec::text("RoomNumber", "Room number").required())
        .field(FieldSpec::foreign_key("RoomTypeId", "Room type", load_room_types).required())
        .field(FieldSpec::foreign_key("DepartmentId", "Department", load_departments))
        .field(FieldSpec::integer("IsActive", "Active (1/0)")),

        "ServiceCategory" => CrudTable::new(
            "Service categories",
            "ServiceCategory",
            "ServiceCategoryId",
            &["CategoryName", "Description"],
        )
        .field(FieldSpec::text("CategoryName", "Category name").required())
        .field(FieldSpec::text("Description", "Description")),

        "HealthService" => CrudTable::new(
            "Health services",
            "HealthService",
            "ServiceId",
            &["ServiceName", "ServiceCategoryId", "BasePrice"],
        )
        .field(FieldSpec::text("ServiceName", "Service name").required())
        .field(
            FieldSpec::foreign_key("ServiceCategoryId", "Category", load_service_categories)
                .required(),
        )
        .field(FieldSpec::decimal("BasePrice", "Base price").required()),

        "StateProgram" => CrudTable::new(
            "State programs",
            "StateProgram",
            "ProgramId",
            &["ProgramName", "Description", "CoverageRate"],
        )
        .field(FieldSpec::text("ProgramName", "Program name").required())
        .field(FieldSpec::text("Description", "Description"))
        .field(FieldSpec::decimal("CoverageRate", "Coverage rate (0-1)").required()),

        "PaymentType" => CrudTable::new(
            "Payment types",
            "PaymentType",
            "PaymentTypeId",
            &["PaymentTypeName", "Description"],
        )
        .field(FieldSpec::text("PaymentTypeName", "Payment type").required())
        .field(FieldSpec::text("Description", "Description")),

        _ => return None,
    };
    Some(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::{FieldValue, FormValues};
    use crate::db::repository::load_programs;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn every_catalog_name_resolves() {
        for name in CATALOG_TABLES {
            let table = catalog_table(name).unwrap();
            assert_eq!(&table.table, name);
            assert!(!table.fields.is_empty());
            assert!(table.check_identifiers().is_ok());
        }
        assert!(catalog_table("UserAccount").is_none());
    }

    #[test]
    fn catalog_tables_are_queryable() {
        let conn = open_memory_database().unwrap();
        for name in CATALOG_TABLES {
            let grid = catalog_table(name).unwrap().list(&conn).unwrap();
            assert!(grid.rows.is_empty(), "{name} should start empty");
        }
    }

    #[test]
    fn state_program_added_through_catalog_feeds_doctor_picker() {
        let conn = open_memory_database().unwrap();
        let table = catalog_table("StateProgram").unwrap();
        let form: FormValues = [
            ("ProgramName".to_owned(), FieldValue::from("General Health Insurance")),
            ("CoverageRate".to_owned(), FieldValue::from(0.8)),
        ]
        .into_iter()
        .collect();
        let key = table.add(&conn, &form).unwrap();

        let programs = load_programs(&conn).unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].id, key);
        assert_eq!(programs[0].coverage_rate, 0.8);
    }

    #[test]
    fn room_needs_a_room_type() {
        let conn = open_memory_database().unwrap();
        let rooms = catalog_table("Room").unwrap();
        let form: FormValues = [("RoomNumber".to_owned(), FieldValue::from("101"))]
            .into_iter()
            .collect();
        let err = rooms.add(&conn, &form).unwrap_err();
        assert_eq!(err.to_string(), "Room type must be selected.");
    }
}
