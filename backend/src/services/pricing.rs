//! Vendor price statistics and matrix-pricing savings per category.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{NormalizedRow, RawUsageRow};
use crate::sections::pricing::{MatrixPricingEntry, PriceRange, PricingAggregation, VendorPriceStat};
use crate::transformations::Normalizers;

use super::stats::{desc, median_of_sorted, safe_ratio, sort_f64};

#[derive(Default)]
struct VendorPrices {
    prices: Vec<f64>,
    quantity: f64,
    spend: f64,
}

/// Aggregate raw rows with the built-in normalizers.
pub fn aggregate(rows: &[RawUsageRow]) -> PricingAggregation {
    aggregate_normalized(&Normalizers::new().normalize_rows(rows))
}

/// Group by category then vendor and derive matrix pricing.
///
/// The median of a vendor's prices is `sorted[n / 2]`. A category's current
/// average is the quantity-weighted mean of vendor medians and its matrix
/// price the lowest vendor median. Categories with no positive savings
/// (single-vendor categories included) appear only in the detailed map.
pub fn aggregate_normalized(rows: &[NormalizedRow]) -> PricingAggregation {
    let mut grouped: BTreeMap<&str, BTreeMap<&str, VendorPrices>> = BTreeMap::new();
    for row in rows {
        let acc = grouped
            .entry(row.category.as_str())
            .or_default()
            .entry(row.vendor.as_str())
            .or_default();
        acc.prices.push(row.price);
        acc.quantity += row.quantity;
        acc.spend += row.spend;
    }

    let mut matrix_pricing = Vec::new();
    let mut matrix_pricing_detailed = BTreeMap::new();

    for (category, vendors) in grouped {
        let mut stats: Vec<VendorPriceStat> = vendors
            .into_iter()
            .filter_map(|(vendor, mut acc)| {
                sort_f64(&mut acc.prices);
                let median_price = median_of_sorted(&acc.prices)?;
                Some(VendorPriceStat {
                    vendor: vendor.to_string(),
                    median_price,
                    sample_count: acc.quantity,
                    row_count: acc.prices.len(),
                    total_spend: acc.spend,
                    price_range: PriceRange {
                        min: acc.prices[0],
                        max: acc.prices[acc.prices.len() - 1],
                    },
                })
            })
            .collect();
        stats.sort_by(|a, b| {
            a.median_price
                .partial_cmp(&b.median_price)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.vendor.cmp(&b.vendor))
        });

        if let Some(entry) = matrix_entry(category, &stats) {
            matrix_pricing.push(entry);
        }
        matrix_pricing_detailed.insert(category.to_string(), stats);
    }

    matrix_pricing.sort_by(|a, b| {
        desc(a.potential_savings, b.potential_savings).then_with(|| a.category.cmp(&b.category))
    });

    log::debug!(
        "Priced {} categories, {} with savings opportunities",
        matrix_pricing_detailed.len(),
        matrix_pricing.len()
    );

    PricingAggregation {
        matrix_pricing,
        matrix_pricing_detailed,
    }
}

/// Savings entry for one category; `stats` sorted by median ascending.
fn matrix_entry(category: &str, stats: &[VendorPriceStat]) -> Option<MatrixPricingEntry> {
    let best = stats.first()?;
    let matrix_price = best.median_price;

    let sample_total: f64 = stats.iter().map(|s| s.sample_count).sum();
    let weighted: f64 = stats.iter().map(|s| s.median_price * s.sample_count).sum();
    let total_spend: f64 = stats.iter().map(|s| s.total_spend).sum();

    let current_avg_price = safe_ratio(weighted, sample_total);
    // identical medians leave nothing to save, whatever the rounding
    let potential_savings = if stats.iter().all(|s| s.median_price == matrix_price) {
        0.0
    } else {
        sample_total * (current_avg_price - matrix_price)
    };

    if potential_savings <= 0.0 || total_spend <= 0.0 {
        return None;
    }

    Some(MatrixPricingEntry {
        category: category.to_string(),
        current_avg_price,
        matrix_price,
        potential_savings,
        total_spend,
        sample_total,
        vendor_count: stats.len(),
        best_vendor: best.vendor.clone(),
    })
}
