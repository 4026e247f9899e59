//! Vendor-consolidation scenario catalogue.
//!
//! Savings percentages, adoption rates and implementation figures are
//! business assumptions fixed in [`CATALOGUE`]. They are not derived from
//! matrix pricing; the two savings figures are separate models and the
//! dashboard shows them side by side.

use std::collections::{BTreeMap, BTreeSet};

use crate::sections::rollups::VendorSummary;
use crate::sections::scenarios::{
    Complexity, Implementation, RiskLevel, Scenario, ScenarioKind,
};
use crate::transformations::vendor::{JOHNSON_AND_JOHNSON, SMITH_AND_NEPHEW, STRYKER, ZIMMER_BIOMET};

use super::stats::{desc, safe_ratio};

/// Which vendors a scenario keeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VendorSelection {
    AllObserved,
    Fixed(&'static [&'static str]),
    TopBySpend(usize),
}

/// One row of the scenario table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub selection: VendorSelection,
    /// Scenario is generated only when at least this many vendors are observed.
    pub min_vendors: usize,
    pub savings_percent: f64,
    pub adoption_rate: f64,
    pub complexity: Complexity,
    pub timeline_months: u32,
    pub cost_millions: f64,
}

pub const CATALOGUE: [ScenarioDefinition; 7] = [
    ScenarioDefinition {
        id: "status-quo",
        name: "Status Quo",
        description: "Keep every current vendor relationship",
        selection: VendorSelection::AllObserved,
        min_vendors: 0,
        savings_percent: 0.0,
        adoption_rate: 1.0,
        complexity: Complexity::None,
        timeline_months: 0,
        cost_millions: 0.0,
    },
    ScenarioDefinition {
        id: "tri-vendor",
        name: "Tri-Vendor",
        description: "Consolidate to Zimmer Biomet, Stryker and Johnson & Johnson",
        selection: VendorSelection::Fixed(&[ZIMMER_BIOMET, STRYKER, JOHNSON_AND_JOHNSON]),
        min_vendors: 0,
        savings_percent: 12.0,
        adoption_rate: 0.85,
        complexity: Complexity::Medium,
        timeline_months: 12,
        cost_millions: 1.5,
    },
    ScenarioDefinition {
        id: "dual-premium",
        name: "Dual Premium",
        description: "Consolidate to the two premium vendors, Zimmer Biomet and Stryker",
        selection: VendorSelection::Fixed(&[ZIMMER_BIOMET, STRYKER]),
        min_vendors: 0,
        savings_percent: 18.0,
        adoption_rate: 0.75,
        complexity: Complexity::High,
        timeline_months: 18,
        cost_millions: 2.5,
    },
    ScenarioDefinition {
        id: "dual-value",
        name: "Dual Value",
        description: "Consolidate to the value pairing of Johnson & Johnson and Smith & Nephew",
        selection: VendorSelection::Fixed(&[JOHNSON_AND_JOHNSON, SMITH_AND_NEPHEW]),
        min_vendors: 0,
        savings_percent: 22.0,
        adoption_rate: 0.65,
        complexity: Complexity::High,
        timeline_months: 18,
        cost_millions: 2.8,
    },
    ScenarioDefinition {
        id: "dual-innovation",
        name: "Dual Innovation",
        description: "Consolidate to Stryker and Johnson & Johnson for robotics and enabling technology",
        selection: VendorSelection::Fixed(&[STRYKER, JOHNSON_AND_JOHNSON]),
        min_vendors: 0,
        savings_percent: 16.0,
        adoption_rate: 0.78,
        complexity: Complexity::High,
        timeline_months: 15,
        cost_millions: 2.2,
    },
    ScenarioDefinition {
        id: "tri-source",
        name: "Tri-Source (Top 3)",
        description: "Keep the three vendors with the most spend in this dataset",
        selection: VendorSelection::TopBySpend(3),
        min_vendors: 4,
        savings_percent: 10.0,
        adoption_rate: 0.88,
        complexity: Complexity::Medium,
        timeline_months: 9,
        cost_millions: 1.2,
    },
    ScenarioDefinition {
        id: "quad-source",
        name: "Quad-Source (Top 4)",
        description: "Keep the four vendors with the most spend in this dataset",
        selection: VendorSelection::TopBySpend(4),
        min_vendors: 5,
        savings_percent: 6.0,
        adoption_rate: 0.92,
        complexity: Complexity::Low,
        timeline_months: 6,
        cost_millions: 0.6,
    },
];

/// Generate the scenarios that apply to this vendor rollup.
///
/// Deterministic: the same rollup and totals always produce the same list.
pub fn generate(
    vendor_rollup: &BTreeMap<String, VendorSummary>,
    total_spend: f64,
    total_cases: f64,
) -> Vec<Scenario> {
    let by_spend = vendors_by_spend(vendor_rollup);

    let scenarios: Vec<Scenario> = CATALOGUE
        .iter()
        .filter(|def| vendor_rollup.len() >= def.min_vendors)
        .map(|def| {
            let vendors = match def.selection {
                VendorSelection::AllObserved => vendor_rollup.keys().cloned().collect(),
                VendorSelection::Fixed(names) => names.iter().map(|n| n.to_string()).collect(),
                VendorSelection::TopBySpend(n) => by_spend.iter().take(n).cloned().collect(),
            };
            build_scenario(def, vendors, vendor_rollup, total_spend, total_cases)
        })
        .collect();

    log::debug!(
        "Generated {} scenarios for {} vendors",
        scenarios.len(),
        vendor_rollup.len()
    );
    scenarios
}

fn vendors_by_spend(vendor_rollup: &BTreeMap<String, VendorSummary>) -> Vec<String> {
    let mut ranked: Vec<&VendorSummary> = vendor_rollup.values().collect();
    ranked.sort_by(|a, b| desc(a.total_spend, b.total_spend).then_with(|| a.vendor.cmp(&b.vendor)));
    ranked.into_iter().map(|v| v.vendor.clone()).collect()
}

fn build_scenario(
    def: &ScenarioDefinition,
    vendors: Vec<String>,
    vendor_rollup: &BTreeMap<String, VendorSummary>,
    total_spend: f64,
    total_cases: f64,
) -> Scenario {
    let kind = match def.selection {
        VendorSelection::AllObserved => ScenarioKind::StatusQuo,
        VendorSelection::Fixed(_) => ScenarioKind::Consolidation,
        VendorSelection::TopBySpend(_) => ScenarioKind::UploadDriven,
    };

    let retained_share = if kind == ScenarioKind::StatusQuo {
        1.0
    } else {
        let kept: BTreeSet<&str> = vendors.iter().map(String::as_str).collect();
        let retained_spend: f64 = vendor_rollup
            .values()
            .filter(|v| kept.contains(v.vendor.as_str()))
            .map(|v| v.total_spend)
            .sum();
        safe_ratio(retained_spend, total_spend)
    };

    let annual_savings = total_spend * def.savings_percent / 100.0;
    // adoption-based until a volume-weighted score is attached
    let risk_score = (1.0 - def.adoption_rate) * 10.0;

    Scenario {
        id: def.id.to_string(),
        name: def.name.to_string(),
        description: def.description.to_string(),
        kind,
        vendors,
        savings_percent: def.savings_percent,
        annual_savings,
        risk_adjusted_savings: annual_savings * def.adoption_rate,
        npv_5_year: annual_savings * 5.0 - def.cost_millions * 1_000_000.0,
        adoption_rate: def.adoption_rate,
        risk_level: RiskLevel::from_score(risk_score),
        risk_score,
        spend_retained_percent: retained_share * 100.0,
        estimated_cases_switching: total_cases * (1.0 - retained_share),
        implementation: Implementation {
            complexity: def.complexity,
            timeline_months: def.timeline_months,
            cost_millions: def.cost_millions,
        },
        volume_weighted_risk: None,
    }
}
