//! Volume-weighted adoption risk of a consolidation scenario.
//!
//! A surgeon must switch when their primary vendor is not kept by the
//! scenario. The score is a fixed weighted sum, not a calibrated model:
//!
//! ```text
//! volumeWeightedScore = (5*high + 3*medium + 1*low) / totalSurgeons
//! loyaltyScore        = loyalistsAffected / surgeonsAffected * 3
//! caseRiskScore       = casesAtRiskPercent / 100 * 2
//! riskScore           = clamp(sum, 0, 10)
//! ```

use std::collections::BTreeSet;

use crate::sections::rollups::SurgeonProfile;
use crate::sections::scenarios::{RiskLevel, Scenario, VolumeTier, VolumeWeightedRisk};

use super::stats::safe_ratio;

/// Primary-vendor share at or above which a surgeon is a loyalist.
pub const LOYALIST_THRESHOLD: f64 = 0.90;
pub const LOYALTY_WEIGHT: f64 = 3.0;
pub const CASE_RISK_WEIGHT: f64 = 2.0;
pub const MAX_RISK_SCORE: f64 = 10.0;

/// Score the surgeons that would have to switch vendors.
pub fn score(
    surgeons: &[SurgeonProfile],
    scenario_vendors: &[String],
    total_cases: f64,
) -> VolumeWeightedRisk {
    let kept: BTreeSet<&str> = scenario_vendors.iter().map(String::as_str).collect();
    let mut risk = VolumeWeightedRisk::default();
    let mut weighted_tiers = 0.0;

    for surgeon in surgeons {
        let tier = VolumeTier::from_cases(surgeon.total_cases);
        let must_switch = !kept.contains(surgeon.primary_vendor.as_str());

        if !must_switch {
            if tier >= VolumeTier::Medium {
                risk.sherpas_available += 1;
            }
            continue;
        }

        risk.surgeons_affected += 1;
        match tier {
            VolumeTier::High => risk.high_volume_surgeons_affected += 1,
            VolumeTier::Medium => risk.medium_volume_surgeons_affected += 1,
            VolumeTier::Low => risk.low_volume_surgeons_affected += 1,
        }
        weighted_tiers += tier.weight();
        risk.cases_at_risk += surgeon.total_cases;
        risk.revenue_at_risk += surgeon.total_spend;
        if surgeon.primary_vendor_percent >= LOYALIST_THRESHOLD {
            risk.loyalists_affected += 1;
        }
    }

    risk.cases_at_risk_percent = safe_ratio(risk.cases_at_risk, total_cases) * 100.0;
    risk.volume_weighted_score = safe_ratio(weighted_tiers, surgeons.len() as f64);
    risk.loyalty_score = safe_ratio(
        risk.loyalists_affected as f64,
        risk.surgeons_affected as f64,
    ) * LOYALTY_WEIGHT;
    risk.case_risk_score = risk.cases_at_risk_percent / 100.0 * CASE_RISK_WEIGHT;

    let raw = risk.volume_weighted_score + risk.loyalty_score + risk.case_risk_score;
    risk.risk_score = if raw.is_finite() {
        raw.clamp(0.0, MAX_RISK_SCORE)
    } else {
        MAX_RISK_SCORE
    };
    risk
}

/// Attach the volume-weighted risk to a scenario and derive its level.
pub fn with_volume_weighted_risk(
    mut scenario: Scenario,
    surgeons: &[SurgeonProfile],
    total_cases: f64,
) -> Scenario {
    let risk = score(surgeons, &scenario.vendors, total_cases);
    scenario.risk_score = risk.risk_score;
    scenario.risk_level = RiskLevel::from_score(risk.risk_score);
    log::debug!(
        "Scenario {}: {} surgeons affected, risk {:.2}",
        scenario.id,
        risk.surgeons_affected,
        risk.risk_score
    );
    scenario.volume_weighted_risk = Some(risk);
    scenario
}
