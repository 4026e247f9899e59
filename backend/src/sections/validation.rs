use serde::{Deserialize, Serialize};

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Criticality {
    Warning,
    Error,
}

impl Criticality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Warning => "Warning",
            Criticality::Error => "Error",
        }
    }
}

/// Issue category for grouping validation problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// A top-level section is absent or has the wrong JSON type.
    Structure,
    /// Totals that look implausible.
    Totals,
    Pricing,
    Surgeons,
    Scenarios,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Structure => "structure",
            IssueCategory::Totals => "totals",
            IssueCategory::Pricing => "pricing",
            IssueCategory::Surgeons => "surgeons",
            IssueCategory::Scenarios => "scenarios",
        }
    }
}

/// Validation issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub issue_type: String,
    pub category: IssueCategory,
    pub criticality: Criticality,
    pub section: Option<String>,
    pub current_value: Option<String>,
    pub expected_value: Option<String>,
    pub description: String,
}

/// Validation report data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub sections_checked: usize,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        match issue.criticality {
            Criticality::Error => self.errors.push(issue),
            Criticality::Warning => self.warnings.push(issue),
        }
    }
}
