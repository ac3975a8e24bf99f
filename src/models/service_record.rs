use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Service record as listed in the doctor's grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecordRow {
    pub service_record_id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub service_id: i64,
    pub service_name: String,
    pub program_id: i64,
    pub program_name: String,
    pub service_date: NaiveDate,
    pub total_price: f64,
    pub state_covered_amount: f64,
    pub patient_payable_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecordForm {
    pub patient_id: i64,
    pub service_id: i64,
    pub program_id: i64,
    pub service_date: NaiveDate,
    pub total_price: f64,
}
