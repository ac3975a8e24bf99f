use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::Gender;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRow {
    pub patient_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub tc_no: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
}

/// Registration form. `tc_no` is the national identity number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientForm {
    pub first_name: String,
    pub last_name: String,
    pub tc_no: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub is_active: bool,
}

/// Fields the receptionist may change after registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub is_active: bool,
}
