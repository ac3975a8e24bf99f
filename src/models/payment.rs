use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub payment_id: i64,
    pub service_record_id: i64,
    pub payment_date: NaiveDate,
    pub amount: f64,
    pub payment_type_name: String,
    pub payer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentForm {
    pub service_record_id: i64,
    pub payment_type_id: i64,
    pub payment_date: NaiveDate,
    pub amount: f64,
    pub payer: String,
}
