//! Usage line items at the ingestion boundary and after normalization.

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder for missing facility/region/surgeon keys in rollups.
pub const UNASSIGNED: &str = "Unassigned";

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One purchased line item as uploaded.
///
/// Rows are typed at the ingestion boundary (see [`crate::parsing`]) and are
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUsageRow {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vendor: String,
    #[serde(default, alias = "component", deserialize_with = "null_as_empty")]
    pub component_raw: String,
    #[serde(default)]
    pub component_category: Option<String>,
    pub quantity: f64,
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub surgeon: String,
    #[serde(default)]
    pub facility: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub procedure_type: String,
}

impl RawUsageRow {
    pub fn new(
        vendor: impl Into<String>,
        component_raw: impl Into<String>,
        quantity: f64,
        price: f64,
        surgeon: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            component_raw: component_raw.into(),
            component_category: None,
            quantity,
            price,
            surgeon: surgeon.into(),
            facility: None,
            region: None,
            procedure_type: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.component_category = Some(category.into());
        self
    }

    pub fn with_facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = Some(facility.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_procedure_type(mut self, procedure_type: impl Into<String>) -> Self {
        self.procedure_type = procedure_type.into();
        self
    }

    /// Extended line value.
    pub fn spend(&self) -> f64 {
        self.quantity * self.price
    }
}

/// A usage row with canonical vendor and category.
///
/// This is also the flat per-row record of the document's `components`
/// section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRow {
    pub vendor: String,
    pub vendor_raw: String,
    pub component_raw: String,
    pub category: String,
    /// `false` when the category is a fallback bucket rather than a rule hit.
    pub category_matched: bool,
    pub quantity: f64,
    pub price: f64,
    pub spend: f64,
    pub surgeon: String,
    pub facility: Option<String>,
    pub region: Option<String>,
    pub procedure_type: String,
    pub is_primary: bool,
}

impl NormalizedRow {
    /// Case contribution of this row under the primary-component rule.
    pub fn cases(&self) -> f64 {
        if self.is_primary {
            self.quantity
        } else {
            0.0
        }
    }

    pub fn facility_key(&self) -> &str {
        self.facility.as_deref().unwrap_or(UNASSIGNED)
    }

    pub fn region_key(&self) -> &str {
        self.region.as_deref().unwrap_or(UNASSIGNED)
    }
}

/// Trimmed value, `None` when blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_is_quantity_times_price() {
        let row = RawUsageRow::new("ZIMMER", "Acetabular Cup", 2.0, 1200.0, "Dr. Lee");
        assert_eq!(row.spend(), 2400.0);
    }

    #[test]
    fn test_deserialize_camel_case_with_nulls() {
        let json = r#"{
            "vendor": "STRYKER",
            "component": "ACETAB CUP",
            "componentCategory": null,
            "quantity": 1,
            "price": 1400.5,
            "surgeon": null,
            "facility": "General"
        }"#;
        let row: RawUsageRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.component_raw, "ACETAB CUP");
        assert_eq!(row.surgeon, "");
        assert_eq!(row.facility.as_deref(), Some("General"));
        assert!(row.region.is_none());
        assert_eq!(row.procedure_type, "");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  East ")), Some("East".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
