use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRow {
    pub staff_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub department_id: Option<i64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffForm {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub department_id: Option<i64>,
    pub phone: String,
    pub email: String,
    pub is_active: bool,
}
