use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pricing::{MatrixPricingEntry, VendorPriceStat};
use super::rollups::{HospitalSummary, RegionSummary, SurgeonProfile, VendorSummary};
use super::scenarios::Scenario;
use crate::models::NormalizedRow;

// =========================================================
// Dashboard document
// =========================================================

/// Rows, cases and spend for one procedure type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcedureShare {
    pub rows: usize,
    pub cases: f64,
    pub spend: f64,
}

/// Signals the admin page surfaces next to the totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Categories only one vendor supplies; no price comparison possible.
    pub single_vendor_categories: Vec<String>,
    /// Canonical names that passed through without an alias hit.
    pub unrecognized_vendors: Vec<String>,
    /// Rows whose category is a fallback bucket rather than a rule hit.
    pub fallback_category_count: usize,
    pub zero_case_surgeons: usize,
    pub unassigned_facility_rows: usize,
    pub unassigned_region_rows: usize,
    /// Total spend is below the configured plausibility floor.
    pub low_spend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub generated_at: DateTime<Utc>,
    pub dataset_checksum: String,
    pub total_rows: usize,
    pub total_spend: f64,
    pub total_cases: f64,
    pub cost_per_case: f64,
    pub vendor_count: usize,
    pub surgeon_count: usize,
    pub hospital_count: usize,
    pub region_count: usize,
    pub category_count: usize,
    pub procedure_mix: BTreeMap<String, ProcedureShare>,
    /// Bottom-up line-item opportunity from matrix pricing.
    pub total_matrix_savings: f64,
    /// Largest scenario savings, a strategic assumption. Not reconciled
    /// with `total_matrix_savings`.
    pub best_scenario_savings: f64,
    pub data_quality: DataQuality,
}

/// The artifact the dashboard fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDocument {
    pub metadata: DatasetMetadata,
    pub vendors: BTreeMap<String, VendorSummary>,
    pub surgeons: Vec<SurgeonProfile>,
    pub hospitals: BTreeMap<String, HospitalSummary>,
    pub regions: BTreeMap<String, RegionSummary>,
    pub scenarios: Vec<Scenario>,
    pub matrix_pricing: Vec<MatrixPricingEntry>,
    pub matrix_pricing_detailed: BTreeMap<String, Vec<VendorPriceStat>>,
    pub components: Vec<NormalizedRow>,
}

pub const METADATA: &str = "metadata";
pub const COMPONENTS: &str = "components";

/// Every top-level key of the document, in serialization order.
pub const DOCUMENT_SECTIONS: [&str; 9] = [
    METADATA,
    super::rollups::VENDORS,
    super::rollups::SURGEONS,
    super::rollups::HOSPITALS,
    super::rollups::REGIONS,
    super::scenarios::SCENARIOS,
    super::pricing::MATRIX_PRICING,
    super::pricing::MATRIX_PRICING_DETAILED,
    COMPONENTS,
];
