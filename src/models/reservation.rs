use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRow {
    pub reservation_id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub room_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status_id: i64,
    pub status_name: String,
}

/// Add/edit form. The stay covers `[start_date, end_date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationForm {
    pub patient_id: i64,
    pub room_id: i64,
    pub status_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAvailability {
    pub room_id: i64,
    pub total_reservations: i64,
    pub active_reservations: i64,
    pub last_reservation_end: Option<NaiveDate>,
}
