use serde::{Deserialize, Serialize};

// =========================================================
// Scenario types
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Complexity {
    None,
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::None => "None",
            Complexity::Low => "Low",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Low below 3, Medium below 6, High otherwise.
    pub fn from_score(score: f64) -> Self {
        if score < 3.0 {
            RiskLevel::Low
        } else if score < 6.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Where a scenario's vendor list comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Every vendor currently in use.
    StatusQuo,
    /// A fixed vendor combination.
    Consolidation,
    /// Top vendors by spend in the uploaded data.
    UploadDriven,
}

/// Surgeon volume tier by annual primary cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolumeTier {
    Low,
    Medium,
    High,
}

impl VolumeTier {
    pub const HIGH_MIN_CASES: f64 = 500.0;
    pub const MEDIUM_MIN_CASES: f64 = 200.0;

    pub fn from_cases(cases: f64) -> Self {
        if cases >= Self::HIGH_MIN_CASES {
            VolumeTier::High
        } else if cases >= Self::MEDIUM_MIN_CASES {
            VolumeTier::Medium
        } else {
            VolumeTier::Low
        }
    }

    /// Weight in the volume component of the risk score.
    pub fn weight(&self) -> f64 {
        match self {
            VolumeTier::High => 5.0,
            VolumeTier::Medium => 3.0,
            VolumeTier::Low => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Implementation {
    pub complexity: Complexity,
    pub timeline_months: u32,
    pub cost_millions: f64,
}

/// Adoption risk of a scenario, weighted by who has to switch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeWeightedRisk {
    pub high_volume_surgeons_affected: usize,
    pub medium_volume_surgeons_affected: usize,
    pub low_volume_surgeons_affected: usize,
    pub surgeons_affected: usize,
    pub cases_at_risk: f64,
    pub cases_at_risk_percent: f64,
    pub revenue_at_risk: f64,
    pub loyalists_affected: usize,
    /// Non-switching medium/high volume surgeons able to mentor peers.
    pub sherpas_available: usize,
    pub volume_weighted_score: f64,
    pub loyalty_score: f64,
    pub case_risk_score: f64,
    /// Bounded to `[0, 10]`.
    pub risk_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: ScenarioKind,
    pub vendors: Vec<String>,
    pub savings_percent: f64,
    pub annual_savings: f64,
    pub risk_adjusted_savings: f64,
    /// Five years of savings minus implementation cost, undiscounted.
    pub npv_5_year: f64,
    pub adoption_rate: f64,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub spend_retained_percent: f64,
    pub estimated_cases_switching: f64,
    pub implementation: Implementation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_weighted_risk: Option<VolumeWeightedRisk>,
}

pub const SCENARIOS: &str = "scenarios";
