//! Canonicalization of uploaded rows.
//!
//! - [`component`]: free-text implant description -> category label
//! - [`vendor`]: vendor spelling variants -> vendor identity
//! - [`primary`]: which categories count toward case volume

pub mod component;
pub mod primary;
pub mod vendor;

pub use component::{normalize_component, ComponentNormalizer, ComponentRule};
pub use primary::{infer_procedure_family, is_primary_component, primary_family, ProcedureFamily};
pub use vendor::{normalize_vendor, VendorAlias, VendorNormalizer};

use crate::error::PipelineResult;
use crate::models::usage::{non_blank, NormalizedRow, RawUsageRow, UNASSIGNED};

/// Component and vendor normalizers used together for one run.
#[derive(Debug, Clone, Default)]
pub struct Normalizers {
    pub component: ComponentNormalizer,
    pub vendor: VendorNormalizer,
}

impl Normalizers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizers extended with configured rules and aliases.
    pub fn with_extensions(
        component_rules: Vec<ComponentRule>,
        vendor_aliases: Vec<VendorAlias>,
    ) -> PipelineResult<Self> {
        Ok(Self {
            component: ComponentNormalizer::with_extra_rules(component_rules)?,
            vendor: VendorNormalizer::with_extra_aliases(vendor_aliases)?,
        })
    }

    /// Resolve canonical vendor, category, spend and case eligibility.
    ///
    /// The description is preferred when it hits a category rule; otherwise a
    /// supplied category column is tried before settling for the
    /// description's fallback bucket.
    pub fn normalize_row(&self, row: &RawUsageRow) -> NormalizedRow {
        let described = self.component.classify(&row.component_raw);
        let (category, category_matched) = if described.rule_matched {
            (described.label, true)
        } else {
            match non_blank(row.component_category.as_deref()) {
                Some(column) => {
                    let from_column = self.component.classify(&column);
                    (from_column.label, from_column.rule_matched)
                }
                None => (described.label, false),
            }
        };

        let procedure_type = non_blank(Some(&row.procedure_type))
            .map(|p| p.to_uppercase())
            .unwrap_or_else(|| infer_procedure_family(&category).to_string());

        let surgeon = non_blank(Some(&row.surgeon)).unwrap_or_else(|| UNASSIGNED.to_string());

        NormalizedRow {
            vendor: self.vendor.normalize(&row.vendor),
            vendor_raw: row.vendor.clone(),
            component_raw: row.component_raw.clone(),
            is_primary: is_primary_component(&category),
            category,
            category_matched,
            quantity: row.quantity,
            price: row.price,
            spend: row.spend(),
            surgeon,
            facility: non_blank(row.facility.as_deref()),
            region: non_blank(row.region.as_deref()),
            procedure_type,
        }
    }

    pub fn normalize_rows(&self, rows: &[RawUsageRow]) -> Vec<NormalizedRow> {
        rows.iter().map(|row| self.normalize_row(row)).collect()
    }
}
