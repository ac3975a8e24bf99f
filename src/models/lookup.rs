use serde::{Deserialize, Serialize};

/// Id/name pair feeding a picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupOption {
    pub id: i64,
    pub name: String,
}

impl LookupOption {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Health service with the price used to prefill a service record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOption {
    pub id: i64,
    pub name: String,
    pub base_price: f64,
}

/// State program with its coverage rate (0.80 = 80%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramOption {
    pub id: i64,
    pub name: String,
    pub coverage_rate: f64,
}
