//! Header-to-field mapping for uploaded spreadsheets.
//!
//! Exports from different purchasing systems label the same data differently
//! ("Manufacturer", "Supplier Name", "VENDOR"). Headers are compared on a key
//! made of their lowercase alphanumeric characters, first exactly against the
//! alias list and then by containment, so "Surgeon Name" still maps to
//! `surgeon`.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// A field of [`crate::models::RawUsageRow`] that can be read from a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageField {
    Vendor,
    Component,
    Category,
    Quantity,
    Price,
    Surgeon,
    Facility,
    Region,
    ProcedureType,
}

impl UsageField {
    pub const ALL: [UsageField; 9] = [
        UsageField::Vendor,
        UsageField::Component,
        UsageField::Category,
        UsageField::Quantity,
        UsageField::Price,
        UsageField::Surgeon,
        UsageField::Facility,
        UsageField::Region,
        UsageField::ProcedureType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageField::Vendor => "vendor",
            UsageField::Component => "component",
            UsageField::Category => "category",
            UsageField::Quantity => "quantity",
            UsageField::Price => "price",
            UsageField::Surgeon => "surgeon",
            UsageField::Facility => "facility",
            UsageField::Region => "region",
            UsageField::ProcedureType => "procedure_type",
        }
    }

    /// Columns without which a row cannot be interpreted.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            UsageField::Vendor
                | UsageField::Component
                | UsageField::Quantity
                | UsageField::Price
                | UsageField::Surgeon
        )
    }

    fn builtin_aliases(&self) -> &'static [&'static str] {
        match self {
            UsageField::Vendor => &["vendor", "manufacturer", "supplier", "mfr", "vendorname"],
            UsageField::Component => &[
                "component",
                "componentraw",
                "description",
                "itemdescription",
                "product",
                "productdescription",
                "item",
            ],
            UsageField::Category => &[
                "category",
                "componentcategory",
                "productcategory",
                "itemcategory",
            ],
            UsageField::Quantity => &["quantity", "qty", "units", "count"],
            UsageField::Price => &["price", "unitprice", "unitcost", "cost", "priceeach"],
            UsageField::Surgeon => &["surgeon", "physician", "provider", "doctor", "surgeonname"],
            UsageField::Facility => &["facility", "hospital", "site", "location"],
            UsageField::Region => &["region", "market", "territory"],
            UsageField::ProcedureType => &["proceduretype", "procedure", "proceduretypename"],
        }
    }
}

impl std::fmt::Display for UsageField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsageField {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = header_key(s);
        UsageField::ALL
            .iter()
            .copied()
            .find(|field| header_key(field.as_str()) == key)
            .ok_or_else(|| PipelineError::Configuration(format!("unknown usage column '{}'", s)))
    }
}

/// Comparison key for a header: lowercase ASCII alphanumerics only.
pub fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolved column positions for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: BTreeMap<UsageField, usize>,
}

impl ColumnMap {
    /// Map headers using the built-in aliases only.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> PipelineResult<Self> {
        Self::from_headers_with(headers, &[])
    }

    /// Map headers with additional `(field, alias)` pairs checked first.
    ///
    /// Every header is claimed by at most one field. Fails with
    /// [`PipelineError::MissingColumn`] for the first required field that no
    /// header matches.
    pub fn from_headers_with<S: AsRef<str>>(
        headers: &[S],
        extra_aliases: &[(UsageField, String)],
    ) -> PipelineResult<Self> {
        let keys: Vec<String> = headers.iter().map(|h| header_key(h.as_ref())).collect();
        let aliases_for = |field: UsageField| -> Vec<String> {
            extra_aliases
                .iter()
                .filter(|(f, _)| *f == field)
                .map(|(_, alias)| header_key(alias))
                .chain(field.builtin_aliases().iter().map(|a| a.to_string()))
                .filter(|alias| !alias.is_empty())
                .collect()
        };

        let mut indices: BTreeMap<UsageField, usize> = BTreeMap::new();
        let claimed = |indices: &BTreeMap<UsageField, usize>, idx: usize| {
            indices.values().any(|&taken| taken == idx)
        };

        // exact matches for every field before any containment match
        for field in UsageField::ALL {
            for alias in aliases_for(field) {
                let hit = keys
                    .iter()
                    .position(|key| *key == alias)
                    .filter(|&idx| !claimed(&indices, idx));
                if let Some(idx) = hit {
                    indices.insert(field, idx);
                    break;
                }
            }
        }

        for field in UsageField::ALL {
            if indices.contains_key(&field) {
                continue;
            }
            for alias in aliases_for(field) {
                let hit = keys
                    .iter()
                    .enumerate()
                    .find(|(idx, key)| key.contains(alias.as_str()) && !claimed(&indices, *idx))
                    .map(|(idx, _)| idx);
                if let Some(idx) = hit {
                    indices.insert(field, idx);
                    break;
                }
            }
        }

        if let Some(missing) = UsageField::ALL
            .iter()
            .find(|field| field.is_required() && !indices.contains_key(field))
        {
            return Err(PipelineError::MissingColumn {
                column: missing.to_string(),
                headers: headers
                    .iter()
                    .map(|h| h.as_ref().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        log::debug!("Resolved usage columns: {:?}", indices);
        Ok(Self { indices })
    }

    pub fn index(&self, field: UsageField) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
