//! End-to-end document assembly.
//!
//! Normalizes once, then feeds the same rows to the pricing aggregator and
//! the rollup builder, generates scenarios from the vendor rollup and scores
//! each against the surgeon profiles.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::artifact::dataset_checksum;
use crate::config::{AnalyticsConfig, ValidationSettings};
use crate::error::PipelineResult;
use crate::models::{NormalizedRow, RawUsageRow};
use crate::sections::dashboard::{DashboardDocument, DataQuality, DatasetMetadata, ProcedureShare};
use crate::sections::pricing::PricingAggregation;
use crate::sections::rollups::Rollups;
use crate::sections::scenarios::Scenario;
use crate::transformations::Normalizers;

use super::stats::safe_ratio;
use super::{pricing, risk, rollups, scenarios};

/// Builds a [`DashboardDocument`] from raw rows.
#[derive(Debug, Clone)]
pub struct DashboardBuilder {
    normalizers: Normalizers,
    validation: ValidationSettings,
    include_components: bool,
    generated_at: Option<DateTime<Utc>>,
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self {
            normalizers: Normalizers::default(),
            validation: ValidationSettings::default(),
            include_components: true,
            generated_at: None,
        }
    }
}

impl DashboardBuilder {
    pub fn new(config: &AnalyticsConfig) -> PipelineResult<Self> {
        Ok(Self {
            normalizers: config.normalizers()?,
            validation: config.validation.clone(),
            include_components: config.output.include_components,
            generated_at: None,
        })
    }

    /// Pin `generatedAt` so repeated builds are byte-identical.
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    pub fn with_components(mut self, include: bool) -> Self {
        self.include_components = include;
        self
    }

    pub fn normalizers(&self) -> &Normalizers {
        &self.normalizers
    }

    /// Run the whole pipeline. Total: an empty row set yields an empty
    /// document with zeroed metadata.
    pub fn build(&self, rows: &[RawUsageRow]) -> DashboardDocument {
        log::info!("Building dashboard from {} usage rows", rows.len());

        let normalized = self.normalizers.normalize_rows(rows);
        let pricing = pricing::aggregate_normalized(&normalized);
        let rollups = rollups::build_rollups_normalized(&normalized);

        let total_spend: f64 = normalized.iter().map(|r| r.spend).sum();
        let total_cases: f64 = normalized.iter().map(|r| r.cases()).sum();

        let scenarios: Vec<Scenario> = scenarios::generate(&rollups.vendors, total_spend, total_cases)
            .into_iter()
            .map(|s| risk::with_volume_weighted_risk(s, &rollups.surgeons, total_cases))
            .collect();

        let data_quality = self.data_quality(&normalized, &pricing, &rollups, total_spend);
        let metadata = DatasetMetadata {
            generated_at: self.generated_at.unwrap_or_else(Utc::now),
            dataset_checksum: dataset_checksum(rows),
            total_rows: rows.len(),
            total_spend,
            total_cases,
            cost_per_case: safe_ratio(total_spend, total_cases),
            vendor_count: rollups.vendors.len(),
            surgeon_count: rollups.surgeons.len(),
            hospital_count: rollups.hospitals.len(),
            region_count: rollups.regions.len(),
            category_count: pricing.matrix_pricing_detailed.len(),
            procedure_mix: procedure_mix(&normalized),
            total_matrix_savings: pricing.total_potential_savings(),
            best_scenario_savings: scenarios
                .iter()
                .map(|s| s.annual_savings)
                .fold(0.0, f64::max),
            data_quality,
        };

        log::info!(
            "Dashboard ready: {} vendors, {} surgeons, {} scenarios, {:.2} matrix savings",
            metadata.vendor_count,
            metadata.surgeon_count,
            scenarios.len(),
            metadata.total_matrix_savings
        );

        DashboardDocument {
            metadata,
            vendors: rollups.vendors,
            surgeons: rollups.surgeons,
            hospitals: rollups.hospitals,
            regions: rollups.regions,
            scenarios,
            matrix_pricing: pricing.matrix_pricing,
            matrix_pricing_detailed: pricing.matrix_pricing_detailed,
            components: if self.include_components {
                normalized
            } else {
                Vec::new()
            },
        }
    }

    fn data_quality(
        &self,
        normalized: &[NormalizedRow],
        pricing: &PricingAggregation,
        rollups: &Rollups,
        total_spend: f64,
    ) -> DataQuality {
        let unrecognized_vendors: BTreeSet<&str> = normalized
            .iter()
            .filter(|row| !self.normalizers.vendor.is_recognized(&row.vendor_raw))
            .map(|row| row.vendor.as_str())
            .collect();

        let quality = DataQuality {
            single_vendor_categories: pricing.single_vendor_categories(),
            unrecognized_vendors: unrecognized_vendors.into_iter().map(str::to_string).collect(),
            fallback_category_count: normalized.iter().filter(|r| !r.category_matched).count(),
            zero_case_surgeons: rollups
                .surgeons
                .iter()
                .filter(|s| s.total_cases == 0.0)
                .count(),
            unassigned_facility_rows: normalized.iter().filter(|r| r.facility.is_none()).count(),
            unassigned_region_rows: normalized.iter().filter(|r| r.region.is_none()).count(),
            low_spend: total_spend < self.validation.min_total_spend,
        };

        if quality.low_spend {
            log::warn!(
                "Total spend {:.2} is below the plausibility floor {:.2}",
                total_spend,
                self.validation.min_total_spend
            );
        }
        if !quality.unrecognized_vendors.is_empty() {
            log::warn!(
                "Vendors without an alias: {}",
                quality.unrecognized_vendors.join(", ")
            );
        }
        if quality.fallback_category_count > 0 {
            log::debug!(
                "{} rows fell back to leading-word categories",
                quality.fallback_category_count
            );
        }
        quality
    }
}

fn procedure_mix(rows: &[NormalizedRow]) -> BTreeMap<String, ProcedureShare> {
    let mut mix: BTreeMap<String, ProcedureShare> = BTreeMap::new();
    for row in rows {
        let share = mix.entry(row.procedure_type.clone()).or_default();
        share.rows += 1;
        share.cases += row.cases();
        share.spend += row.spend;
    }
    mix
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn example_rows() -> Vec<RawUsageRow> {
        vec![
            RawUsageRow::new("ZIMMER", "Acetabular Cup 32mm", 1.0, 1200.0, "Dr. Lee"),
            RawUsageRow::new("STRYKER", "ACETAB CUP SIZE 34", 1.0, 1400.0, "Dr. Lee"),
            RawUsageRow::new("ZIMMER", "Femoral Stem Long", 1.0, 2000.0, "Dr. Lee"),
        ]
    }

    fn pinned() -> DashboardBuilder {
        DashboardBuilder::default()
            .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    }

    #[test]
    fn test_metadata_totals() {
        let doc = pinned().build(&example_rows());
        let meta = &doc.metadata;
        assert_eq!(meta.total_rows, 3);
        assert_relative_eq!(meta.total_spend, 4600.0);
        assert_relative_eq!(meta.total_cases, 3.0);
        assert_relative_eq!(meta.cost_per_case, 4600.0 / 3.0);
        assert_eq!(meta.vendor_count, 2);
        assert_eq!(meta.category_count, 2);
        assert_relative_eq!(meta.total_matrix_savings, 200.0);
        assert_eq!(meta.procedure_mix["HIP"].rows, 3);
        assert_eq!(doc.components.len(), 3);
    }

    #[test]
    fn test_data_quality_flags() {
        let mut rows = example_rows();
        rows.push(RawUsageRow::new("Exactech", "Wound Drain", 1.0, 15.0, "Dr. Roe"));
        let doc = pinned().build(&rows);
        let quality = &doc.metadata.data_quality;
        assert_eq!(quality.single_vendor_categories, vec!["FEMORAL STEM", "WOUND DRAIN"]);
        assert_eq!(quality.unrecognized_vendors, vec!["EXACTECH"]);
        assert_eq!(quality.fallback_category_count, 1);
        assert_eq!(quality.zero_case_surgeons, 1);
        assert_eq!(quality.unassigned_facility_rows, 4);
        assert!(quality.low_spend);
    }

    #[test]
    fn test_every_scenario_carries_volume_risk() {
        let doc = pinned().build(&example_rows());
        assert_eq!(doc.scenarios.len(), 5);
        for scenario in &doc.scenarios {
            let risk = scenario.volume_weighted_risk.as_ref().unwrap();
            assert_eq!(scenario.risk_score, risk.risk_score);
            assert!((0.0..=10.0).contains(&scenario.risk_score));
        }
        // Dr. Lee is a Zimmer surgeon: the value pair forces a switch
        let dual_value = doc.scenarios.iter().find(|s| s.id == "dual-value").unwrap();
        assert_eq!(dual_value.volume_weighted_risk.as_ref().unwrap().surgeons_affected, 1);
    }

    #[test]
    fn test_pinned_builds_are_identical() {
        let first = serde_json::to_string(&pinned().build(&example_rows())).unwrap();
        let second = serde_json::to_string(&pinned().build(&example_rows())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_components_can_be_omitted() {
        let doc = pinned().with_components(false).build(&example_rows());
        assert!(doc.components.is_empty());
        assert_eq!(doc.metadata.total_rows, 3);
    }

    #[test]
    fn test_empty_input_is_total() {
        let doc = pinned().build(&[]);
        assert_eq!(doc.metadata.total_spend, 0.0);
        assert_eq!(doc.metadata.cost_per_case, 0.0);
        assert!(doc.surgeons.is_empty());
        assert_eq!(doc.scenarios.len(), 5);
    }
}
