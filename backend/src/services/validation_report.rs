//! Structure and data-quality checks over a dashboard artifact.
//!
//! Works on untyped JSON so that a hand-edited or stale file on disk can be
//! checked without failing deserialization on the first problem.

use serde_json::Value;

use crate::config::ValidationSettings;
use crate::sections::dashboard::{COMPONENTS, DOCUMENT_SECTIONS, METADATA};
use crate::sections::pricing::{MATRIX_PRICING, MATRIX_PRICING_DETAILED};
use crate::sections::rollups::{HOSPITALS, REGIONS, SURGEONS, VENDORS};
use crate::sections::scenarios::SCENARIOS;
use crate::sections::validation::{Criticality, IssueCategory, ValidationIssue, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsonKind {
    Object,
    Array,
}

impl JsonKind {
    fn as_str(&self) -> &'static str {
        match self {
            JsonKind::Object => "object",
            JsonKind::Array => "array",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            JsonKind::Object => value.is_object(),
            JsonKind::Array => value.is_array(),
        }
    }
}

fn expected_kind(section: &str) -> JsonKind {
    match section {
        SURGEONS | SCENARIOS | MATRIX_PRICING | COMPONENTS => JsonKind::Array,
        _ => JsonKind::Object,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn issue(
    criticality: Criticality,
    category: IssueCategory,
    issue_type: &str,
    section: &str,
    description: String,
) -> ValidationIssue {
    ValidationIssue {
        issue_type: issue_type.to_string(),
        category,
        criticality,
        section: Some(section.to_string()),
        current_value: None,
        expected_value: None,
        description,
    }
}

/// Check a document for missing sections, type mismatches and suspicious data.
pub fn validate_document(document: &Value, settings: &ValidationSettings) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(root) = document.as_object() else {
        report.push(ValidationIssue {
            section: None,
            current_value: Some(json_type_name(document).to_string()),
            expected_value: Some("object".to_string()),
            ..issue(
                Criticality::Error,
                IssueCategory::Structure,
                "document_not_object",
                "",
                "Dashboard document must be a JSON object".to_string(),
            )
        });
        return report;
    };

    for section in DOCUMENT_SECTIONS {
        report.sections_checked += 1;
        let expected = expected_kind(section);
        match root.get(section) {
            None => report.push(ValidationIssue {
                expected_value: Some(expected.as_str().to_string()),
                ..issue(
                    Criticality::Error,
                    IssueCategory::Structure,
                    "missing_section",
                    section,
                    format!("Section '{}' is missing", section),
                )
            }),
            Some(value) if !expected.matches(value) => report.push(ValidationIssue {
                current_value: Some(json_type_name(value).to_string()),
                expected_value: Some(expected.as_str().to_string()),
                ..issue(
                    Criticality::Error,
                    IssueCategory::Structure,
                    "type_mismatch",
                    section,
                    format!("Section '{}' must be an {}", section, expected.as_str()),
                )
            }),
            Some(_) => {}
        }
    }

    check_totals(root.get(METADATA), settings, &mut report);

    if settings.warn_single_vendor_categories {
        if let Some(detailed) = root.get(MATRIX_PRICING_DETAILED).and_then(Value::as_object) {
            let single: Vec<&str> = detailed
                .iter()
                .filter(|(_, stats)| stats.as_array().map(|a| a.len() == 1).unwrap_or(false))
                .map(|(category, _)| category.as_str())
                .collect();
            if !single.is_empty() {
                report.push(ValidationIssue {
                    current_value: Some(single.len().to_string()),
                    ..issue(
                        Criticality::Warning,
                        IssueCategory::Pricing,
                        "single_vendor_categories",
                        MATRIX_PRICING_DETAILED,
                        format!(
                            "{} categories have a single vendor and no price comparison: {}",
                            single.len(),
                            single.join(", ")
                        ),
                    )
                });
            }
        }
    }

    if settings.warn_zero_case_surgeons {
        if let Some(surgeons) = root.get(SURGEONS).and_then(Value::as_array) {
            let zero_case = surgeons
                .iter()
                .filter(|s| s.get("totalCases").and_then(Value::as_f64) == Some(0.0))
                .count();
            if zero_case > 0 {
                report.push(ValidationIssue {
                    current_value: Some(zero_case.to_string()),
                    ..issue(
                        Criticality::Warning,
                        IssueCategory::Surgeons,
                        "zero_case_surgeons",
                        SURGEONS,
                        format!(
                            "{} surgeons have spend but no primary-component cases",
                            zero_case
                        ),
                    )
                });
            }
        }
    }

    if root
        .get(SCENARIOS)
        .and_then(Value::as_array)
        .map(|s| s.is_empty())
        .unwrap_or(false)
    {
        report.push(issue(
            Criticality::Warning,
            IssueCategory::Scenarios,
            "no_scenarios",
            SCENARIOS,
            "No consolidation scenarios were generated".to_string(),
        ));
    }

    // rollup sections that exist but are empty usually mean an empty upload
    for section in [VENDORS, HOSPITALS, REGIONS] {
        if root
            .get(section)
            .and_then(Value::as_object)
            .map(|m| m.is_empty())
            .unwrap_or(false)
        {
            report.push(issue(
                Criticality::Warning,
                IssueCategory::Totals,
                "empty_section",
                section,
                format!("Section '{}' is empty", section),
            ));
        }
    }

    log::debug!(
        "Validated document: {} errors, {} warnings",
        report.errors.len(),
        report.warnings.len()
    );
    report
}

fn check_totals(metadata: Option<&Value>, settings: &ValidationSettings, report: &mut ValidationReport) {
    let Some(metadata) = metadata.and_then(Value::as_object) else {
        return;
    };

    match metadata.get("totalSpend").and_then(Value::as_f64) {
        Some(spend) if spend < settings.min_total_spend => report.push(ValidationIssue {
            current_value: Some(format!("{:.2}", spend)),
            expected_value: Some(format!(">= {:.2}", settings.min_total_spend)),
            ..issue(
                Criticality::Warning,
                IssueCategory::Totals,
                "low_total_spend",
                METADATA,
                "Total spend is suspiciously low".to_string(),
            )
        }),
        Some(_) => {}
        None => report.push(issue(
            Criticality::Error,
            IssueCategory::Structure,
            "missing_field",
            METADATA,
            "metadata.totalSpend must be a number".to_string(),
        )),
    }

    match metadata.get("totalCases").and_then(Value::as_f64) {
        Some(cases) if cases == 0.0 => report.push(ValidationIssue {
            current_value: Some("0".to_string()),
            ..issue(
                Criticality::Warning,
                IssueCategory::Totals,
                "zero_cases",
                METADATA,
                "No primary-component rows: case counts are all zero".to_string(),
            )
        }),
        Some(_) => {}
        None => report.push(issue(
            Criticality::Error,
            IssueCategory::Structure,
            "missing_field",
            METADATA,
            "metadata.totalCases must be a number".to_string(),
        )),
    }
}
