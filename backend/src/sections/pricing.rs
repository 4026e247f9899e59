use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =========================================================
// Pricing types
// =========================================================

/// Observed price span for one vendor in one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Price statistics for one (category, vendor) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPriceStat {
    pub vendor: String,
    pub median_price: f64,
    /// Units purchased (sum of quantity), not line items.
    pub sample_count: f64,
    pub row_count: usize,
    pub total_spend: f64,
    pub price_range: PriceRange,
}

/// Cross-vendor savings opportunity for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixPricingEntry {
    pub category: String,
    pub current_avg_price: f64,
    pub matrix_price: f64,
    pub potential_savings: f64,
    pub total_spend: f64,
    pub sample_total: f64,
    pub vendor_count: usize,
    /// Vendor whose median sets the matrix price.
    pub best_vendor: String,
}

/// Output of the pricing aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingAggregation {
    pub matrix_pricing: Vec<MatrixPricingEntry>,
    pub matrix_pricing_detailed: BTreeMap<String, Vec<VendorPriceStat>>,
}

impl PricingAggregation {
    pub fn total_potential_savings(&self) -> f64 {
        self.matrix_pricing.iter().map(|e| e.potential_savings).sum()
    }

    /// Categories priced by exactly one vendor.
    pub fn single_vendor_categories(&self) -> Vec<String> {
        self.matrix_pricing_detailed
            .iter()
            .filter(|(_, stats)| stats.len() == 1)
            .map(|(category, _)| category.clone())
            .collect()
    }
}

/// Document key of the savings-ranked list.
pub const MATRIX_PRICING: &str = "matrixPricing";
/// Document key of the per-category vendor statistics.
pub const MATRIX_PRICING_DETAILED: &str = "matrixPricingDetailed";

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(vendor: &str, median: f64) -> VendorPriceStat {
        VendorPriceStat {
            vendor: vendor.to_string(),
            median_price: median,
            sample_count: 1.0,
            row_count: 1,
            total_spend: median,
            price_range: PriceRange {
                min: median,
                max: median,
            },
        }
    }

    #[test]
    fn test_vendor_price_stat_serializes_camel_case() {
        let json = serde_json::to_value(stat("STRYKER", 1400.0)).unwrap();
        assert_eq!(json["medianPrice"], 1400.0);
        assert_eq!(json["priceRange"]["min"], 1400.0);
        assert!(json.get("median_price").is_none());
    }

    #[test]
    fn test_single_vendor_categories() {
        let mut detailed = BTreeMap::new();
        detailed.insert(
            "ACETABULAR CUP".to_string(),
            vec![stat("ZIMMER BIOMET", 1200.0), stat("STRYKER", 1400.0)],
        );
        detailed.insert("BONE CEMENT".to_string(), vec![stat("STRYKER", 90.0)]);
        let aggregation = PricingAggregation {
            matrix_pricing: vec![],
            matrix_pricing_detailed: detailed,
        };
        assert_eq!(aggregation.single_vendor_categories(), vec!["BONE CEMENT"]);
        assert_eq!(aggregation.total_potential_savings(), 0.0);
    }
}
