//! Derived service-record amounts.
//!
//! `StateCoveredAmount = TotalPrice × CoverageRate` and
//! `PatientPayableAmount = TotalPrice − TotalPrice × CoverageRate`,
//! each rounded to two decimal places. Recomputed on every save.

use serde::{Deserialize, Serialize};

use crate::models::ServiceOption;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageBreakdown {
    pub total_price: f64,
    pub coverage_rate: f64,
    pub state_covered_amount: f64,
    pub patient_payable_amount: f64,
}

impl CoverageBreakdown {
    /// Split `total_price` between the state program and the patient.
    ///
    /// With no program the state covers nothing and the patient pays the total.
    pub fn compute(total_price: f64, coverage_rate: Option<f64>) -> Self {
        let rate = coverage_rate.unwrap_or(0.0);
        let covered = total_price * rate;
        Self {
            total_price,
            coverage_rate: rate,
            state_covered_amount: round_cents(covered),
            patient_payable_amount: round_cents(total_price - covered),
        }
    }
}

/// Round half away from zero to two decimals.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price a new record starts from: the selected service's base price.
pub fn default_total_price(services: &[ServiceOption], service_id: Option<i64>) -> f64 {
    service_id
        .and_then(|id| services.iter().find(|s| s.id == id))
        .map_or(0.0, |s| s.base_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn eighty_percent_coverage_of_one_thousand() {
        let amounts = CoverageBreakdown::compute(1000.0, Some(0.8));
        assert_eq!(amounts.state_covered_amount, 800.00);
        assert_eq!(amounts.patient_payable_amount, 200.00);
    }

    #[test]
    fn no_program_means_patient_pays_everything() {
        let amounts = CoverageBreakdown::compute(250.5, None);
        assert_eq!(amounts.state_covered_amount, 0.0);
        assert_eq!(amounts.patient_payable_amount, 250.5);
    }

    #[test]
    fn amounts_are_rounded_to_cents() {
        let amounts = CoverageBreakdown::compute(99.99, Some(0.333));
        assert_eq!(amounts.state_covered_amount, 33.30);
        assert_eq!(amounts.patient_payable_amount, 66.69);
    }

    #[test]
    fn full_coverage_leaves_nothing_payable() {
        let amounts = CoverageBreakdown::compute(420.0, Some(1.0));
        assert_eq!(amounts.state_covered_amount, 420.0);
        assert_eq!(amounts.patient_payable_amount, 0.0);
    }

    #[test]
    fn default_total_follows_selected_service() {
        let services = vec![
            ServiceOption { id: 1, name: "MRI".into(), base_price: 1500.0 },
            ServiceOption { id: 2, name: "X-Ray".into(), base_price: 300.0 },
        ];
        assert_eq!(default_total_price(&services, Some(2)), 300.0);
        assert_eq!(default_total_price(&services, Some(9)), 0.0);
        assert_eq!(default_total_price(&services, None), 0.0);
    }

    proptest! {
        /// Covered and payable always add back up to the total, within a cent.
        #[test]
        fn split_sums_to_total(
            cents in 1u32..10_000_000,
            rate in 0.0..=1.0f64,
        ) {
            let total = f64::from(cents) / 100.0;
            let amounts = CoverageBreakdown::compute(total, Some(rate));
            let sum = amounts.state_covered_amount + amounts.patient_payable_amount;
            prop_assert!((sum - total).abs() <= 0.011, "{sum} vs {total}");
            prop_assert!(amounts.state_covered_amount >= 0.0);
            prop_assert!(amounts.patient_payable_amount >= 0.0);
        }
    }
}
