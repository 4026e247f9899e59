use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =========================================================
// Rollup types
// =========================================================

/// Cases and spend attributed to one vendor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorShare {
    pub cases: f64,
    pub spend: f64,
}

/// Per-surgeon volume and vendor mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurgeonProfile {
    pub name: String,
    /// Estimated from primary-component rows only.
    pub total_cases: f64,
    pub total_spend: f64,
    pub facility: Option<String>,
    pub region: Option<String>,
    pub vendors: BTreeMap<String, VendorShare>,
    pub primary_vendor: String,
    /// Share of cases with `primary_vendor`, in `[0, 1]`.
    pub primary_vendor_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummary {
    pub vendor: String,
    pub total_spend: f64,
    pub total_cases: f64,
    pub row_count: usize,
    pub surgeon_count: usize,
    pub facility_count: usize,
    pub category_count: usize,
    /// Surgeons whose primary vendor this is.
    pub primary_surgeon_count: usize,
    pub percent_of_system: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalSummary {
    pub facility: String,
    pub region: Option<String>,
    pub total_spend: f64,
    pub total_cases: f64,
    pub surgeon_count: usize,
    pub vendors: BTreeMap<String, VendorShare>,
    pub cost_per_case: f64,
    pub percent_of_system: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub region: String,
    pub total_spend: f64,
    pub total_cases: f64,
    pub facility_count: usize,
    pub surgeon_count: usize,
    pub vendors: BTreeMap<String, VendorShare>,
    pub percent_of_system: f64,
}

/// Output of the rollup builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rollups {
    pub vendors: BTreeMap<String, VendorSummary>,
    /// Sorted by spend, highest first.
    pub surgeons: Vec<SurgeonProfile>,
    pub hospitals: BTreeMap<String, HospitalSummary>,
    pub regions: BTreeMap<String, RegionSummary>,
}

impl Rollups {
    pub fn total_spend(&self) -> f64 {
        self.surgeons.iter().map(|s| s.total_spend).sum()
    }

    pub fn total_cases(&self) -> f64 {
        self.surgeons.iter().map(|s| s.total_cases).sum()
    }
}

pub const VENDORS: &str = "vendors";
pub const SURGEONS: &str = "surgeons";
pub const HOSPITALS: &str = "hospitals";
pub const REGIONS: &str = "regions";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollup_totals_sum_surgeons() {
        let profile = |name: &str, cases: f64, spend: f64| SurgeonProfile {
            name: name.to_string(),
            total_cases: cases,
            total_spend: spend,
            facility: None,
            region: None,
            vendors: BTreeMap::new(),
            primary_vendor: "STRYKER".to_string(),
            primary_vendor_percent: 1.0,
        };
        let rollups = Rollups {
            surgeons: vec![profile("A", 3.0, 100.0), profile("B", 0.0, 50.0)],
            ..Default::default()
        };
        assert_eq!(rollups.total_spend(), 150.0);
        assert_eq!(rollups.total_cases(), 3.0);
    }

    #[test]
    fn test_missing_facility_serializes_as_null() {
        let profile = SurgeonProfile {
            name: "Dr. Lee".to_string(),
            total_cases: 1.0,
            total_spend: 10.0,
            facility: None,
            region: Some("West".to_string()),
            vendors: BTreeMap::new(),
            primary_vendor: "STRYKER".to_string(),
            primary_vendor_percent: 1.0,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["facility"].is_null());
        assert_eq!(json["primaryVendorPercent"], 1.0);
    }
}
