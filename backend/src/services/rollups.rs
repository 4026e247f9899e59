//! Surgeon, vendor, hospital and region rollups.
//!
//! Every row contributes its spend. Only rows whose category passes
//! [`crate::transformations::is_primary_component`] contribute case volume,
//! so a hip replacement billed as cup + liner + head + stem + screws counts
//! as two primary line items rather than five.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{NormalizedRow, RawUsageRow};
use crate::sections::rollups::{
    HospitalSummary, RegionSummary, Rollups, SurgeonProfile, VendorShare, VendorSummary,
};
use crate::transformations::Normalizers;

use super::stats::{desc, safe_ratio};

#[derive(Default)]
struct SurgeonAcc {
    cases: f64,
    spend: f64,
    facility: Option<String>,
    region: Option<String>,
    vendors: BTreeMap<String, VendorShare>,
}

#[derive(Default)]
struct VendorAcc<'a> {
    cases: f64,
    spend: f64,
    rows: usize,
    surgeons: BTreeSet<&'a str>,
    facilities: BTreeSet<&'a str>,
    categories: BTreeSet<&'a str>,
}

#[derive(Default)]
struct SiteAcc<'a> {
    cases: f64,
    spend: f64,
    region: Option<&'a str>,
    surgeons: BTreeSet<&'a str>,
    facilities: BTreeSet<&'a str>,
    vendors: BTreeMap<String, VendorShare>,
}

fn add_share(shares: &mut BTreeMap<String, VendorShare>, vendor: &str, cases: f64, spend: f64) {
    let share = shares.entry(vendor.to_string()).or_default();
    share.cases += cases;
    share.spend += spend;
}

/// Build rollups from raw rows with the built-in normalizers.
pub fn build_rollups(rows: &[RawUsageRow]) -> Rollups {
    build_rollups_normalized(&Normalizers::new().normalize_rows(rows))
}

/// Build all four rollups in one pass over normalized rows.
pub fn build_rollups_normalized(rows: &[NormalizedRow]) -> Rollups {
    let mut surgeons: BTreeMap<&str, SurgeonAcc> = BTreeMap::new();
    let mut vendors: BTreeMap<&str, VendorAcc> = BTreeMap::new();
    let mut hospitals: BTreeMap<&str, SiteAcc> = BTreeMap::new();
    let mut regions: BTreeMap<&str, SiteAcc> = BTreeMap::new();
    let mut total_spend = 0.0;

    for row in rows {
        let cases = row.cases();
        total_spend += row.spend;

        let surgeon = surgeons.entry(row.surgeon.as_str()).or_default();
        surgeon.cases += cases;
        surgeon.spend += row.spend;
        // first non-null wins
        if surgeon.facility.is_none() {
            surgeon.facility = row.facility.clone();
        }
        if surgeon.region.is_none() {
            surgeon.region = row.region.clone();
        }
        add_share(&mut surgeon.vendors, &row.vendor, cases, row.spend);

        let vendor = vendors.entry(row.vendor.as_str()).or_default();
        vendor.cases += cases;
        vendor.spend += row.spend;
        vendor.rows += 1;
        vendor.surgeons.insert(row.surgeon.as_str());
        vendor.facilities.insert(row.facility_key());
        vendor.categories.insert(row.category.as_str());

        let hospital = hospitals.entry(row.facility_key()).or_default();
        hospital.cases += cases;
        hospital.spend += row.spend;
        if hospital.region.is_none() {
            hospital.region = row.region.as_deref();
        }
        hospital.surgeons.insert(row.surgeon.as_str());
        add_share(&mut hospital.vendors, &row.vendor, cases, row.spend);

        let region = regions.entry(row.region_key()).or_default();
        region.cases += cases;
        region.spend += row.spend;
        region.surgeons.insert(row.surgeon.as_str());
        region.facilities.insert(row.facility_key());
        add_share(&mut region.vendors, &row.vendor, cases, row.spend);
    }

    let mut surgeon_profiles: Vec<SurgeonProfile> = surgeons
        .into_iter()
        .map(|(name, acc)| surgeon_profile(name, acc))
        .collect();
    surgeon_profiles.sort_by(|a, b| desc(a.total_spend, b.total_spend).then_with(|| a.name.cmp(&b.name)));

    let mut primary_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for profile in &surgeon_profiles {
        *primary_counts.entry(profile.primary_vendor.as_str()).or_default() += 1;
    }

    let vendor_summaries = vendors
        .into_iter()
        .map(|(name, acc)| {
            let summary = VendorSummary {
                vendor: name.to_string(),
                total_spend: acc.spend,
                total_cases: acc.cases,
                row_count: acc.rows,
                surgeon_count: acc.surgeons.len(),
                facility_count: acc.facilities.len(),
                category_count: acc.categories.len(),
                primary_surgeon_count: primary_counts.get(name).copied().unwrap_or(0),
                percent_of_system: safe_ratio(acc.spend, total_spend) * 100.0,
            };
            (name.to_string(), summary)
        })
        .collect();

    let hospital_summaries = hospitals
        .into_iter()
        .map(|(facility, acc)| {
            let summary = HospitalSummary {
                facility: facility.to_string(),
                region: acc.region.map(str::to_string),
                total_spend: acc.spend,
                total_cases: acc.cases,
                surgeon_count: acc.surgeons.len(),
                cost_per_case: safe_ratio(acc.spend, acc.cases),
                percent_of_system: safe_ratio(acc.spend, total_spend) * 100.0,
                vendors: acc.vendors,
            };
            (facility.to_string(), summary)
        })
        .collect();

    let region_summaries = regions
        .into_iter()
        .map(|(region, acc)| {
            let summary = RegionSummary {
                region: region.to_string(),
                total_spend: acc.spend,
                total_cases: acc.cases,
                facility_count: acc.facilities.len(),
                surgeon_count: acc.surgeons.len(),
                percent_of_system: safe_ratio(acc.spend, total_spend) * 100.0,
                vendors: acc.vendors,
            };
            (region.to_string(), summary)
        })
        .collect();

    log::debug!(
        "Built rollups for {} surgeons over {} rows",
        surgeon_profiles.len(),
        rows.len()
    );

    Rollups {
        vendors: vendor_summaries,
        surgeons: surgeon_profiles,
        hospitals: hospital_summaries,
        regions: region_summaries,
    }
}

fn surgeon_profile(name: &str, acc: SurgeonAcc) -> SurgeonProfile {
    let (primary_vendor, primary_cases) = primary_vendor(&acc.vendors);
    SurgeonProfile {
        name: name.to_string(),
        total_cases: acc.cases,
        total_spend: acc.spend,
        facility: acc.facility,
        region: acc.region,
        primary_vendor_percent: safe_ratio(primary_cases, acc.cases),
        primary_vendor,
        vendors: acc.vendors,
    }
}

/// Vendor with the most cases; spend then name break ties.
fn primary_vendor(shares: &BTreeMap<String, VendorShare>) -> (String, f64) {
    let mut best: Option<(&String, &VendorShare)> = None;
    for (vendor, share) in shares {
        let better = match best {
            None => true,
            Some((_, current)) => match share.cases.partial_cmp(&current.cases) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => share.spend > current.spend,
                _ => false,
            },
        };
        if better {
            best = Some((vendor, share));
        }
    }
    best.map(|(vendor, share)| (vendor.clone(), share.cases))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNASSIGNED;
    use approx::assert_relative_eq;

    fn example_rows() -> Vec<RawUsageRow> {
        vec![
            RawUsageRow::new("ZIMMER", "Acetabular Cup 32mm", 1.0, 1200.0, "Dr. Lee")
                .with_facility("General")
                .with_region("West"),
            RawUsageRow::new("STRYKER", "ACETAB CUP SIZE 34", 1.0, 1400.0, "Dr. Lee")
                .with_facility("Mercy"),
            RawUsageRow::new("ZIMMER", "Femoral Stem Long", 1.0, 2000.0, "Dr. Lee"),
        ]
    }

    #[test]
    fn test_example_surgeon_cases_and_spend() {
        let rollups = build_rollups(&example_rows());
        assert_eq!(rollups.surgeons.len(), 1);
        let lee = &rollups.surgeons[0];
        assert_relative_eq!(lee.total_cases, 3.0);
        assert_relative_eq!(lee.total_spend, 4600.0);
        assert_eq!(lee.primary_vendor, "ZIMMER BIOMET");
        assert_relative_eq!(lee.primary_vendor_percent, 2.0 / 3.0);
        assert_eq!(lee.vendors["STRYKER"].cases, 1.0);
    }

    #[test]
    fn test_first_non_null_facility_and_region_win() {
        let rollups = build_rollups(&example_rows());
        let lee = &rollups.surgeons[0];
        assert_eq!(lee.facility.as_deref(), Some("General"));
        assert_eq!(lee.region.as_deref(), Some("West"));
    }

    #[test]
    fn test_ancillary_rows_add_spend_not_cases() {
        let rows = vec![
            RawUsageRow::new("STRYKER", "Tibial Tray", 1.0, 3000.0, "Dr. Kim"),
            RawUsageRow::new("STRYKER", "Cancellous Bone Screw 6.5mm", 4.0, 80.0, "Dr. Kim"),
            RawUsageRow::new("STRYKER", "Bone Cement", 2.0, 90.0, "Dr. Kim"),
        ];
        let rollups = build_rollups(&rows);
        let kim = &rollups.surgeons[0];
        assert_eq!(kim.total_cases, 1.0);
        assert_relative_eq!(kim.total_spend, 3000.0 + 320.0 + 180.0);
        assert_eq!(rollups.vendors["STRYKER"].total_cases, 1.0);
        assert_eq!(rollups.vendors["STRYKER"].category_count, 3);
    }

    #[test]
    fn test_zero_case_surgeon_has_zero_primary_percent() {
        let rows = vec![RawUsageRow::new("STRYKER", "Bone Cement", 2.0, 90.0, "Dr. Roe")];
        let rollups = build_rollups(&rows);
        assert_eq!(rollups.surgeons[0].primary_vendor, "STRYKER");
        assert_eq!(rollups.surgeons[0].primary_vendor_percent, 0.0);
    }

    #[test]
    fn test_primary_vendor_tie_breaks_on_spend() {
        let rows = vec![
            RawUsageRow::new("ZIMMER", "Tibial Tray", 1.0, 2000.0, "Dr. Kim"),
            RawUsageRow::new("STRYKER", "Tibial Tray", 1.0, 2500.0, "Dr. Kim"),
        ];
        let rollups = build_rollups(&rows);
        assert_eq!(rollups.surgeons[0].primary_vendor, "STRYKER");
        assert_relative_eq!(rollups.surgeons[0].primary_vendor_percent, 0.5);
    }

    #[test]
    fn test_hospitals_and_regions_default_to_unassigned() {
        let rollups = build_rollups(&example_rows());
        assert_eq!(rollups.hospitals.len(), 3);
        assert_relative_eq!(rollups.hospitals[UNASSIGNED].total_spend, 2000.0);
        assert_relative_eq!(rollups.hospitals["General"].cost_per_case, 1200.0);
        assert_eq!(rollups.hospitals["General"].region.as_deref(), Some("West"));
        assert_relative_eq!(rollups.regions[UNASSIGNED].total_spend, 3400.0);
        assert_eq!(rollups.regions[UNASSIGNED].facility_count, 2);
    }

    #[test]
    fn test_vendor_percent_of_system_sums_to_100() {
        let rollups = build_rollups(&example_rows());
        let total: f64 = rollups.vendors.values().map(|v| v.percent_of_system).sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-9);
        assert_eq!(rollups.vendors["ZIMMER BIOMET"].primary_surgeon_count, 1);
        assert_eq!(rollups.vendors["STRYKER"].primary_surgeon_count, 0);
    }

    #[test]
    fn test_surgeons_sorted_by_spend() {
        let rows = vec![
            RawUsageRow::new("STRYKER", "Bone Cement", 1.0, 10.0, "Dr. Small"),
            RawUsageRow::new("STRYKER", "Bone Cement", 1.0, 500.0, "Dr. Big"),
        ];
        let rollups = build_rollups(&rows);
        assert_eq!(rollups.surgeons[0].name, "Dr. Big");
    }

    #[test]
    fn test_empty_input() {
        let rollups = build_rollups(&[]);
        assert!(rollups.surgeons.is_empty());
        assert!(rollups.vendors.is_empty());
        assert_eq!(rollups.total_spend(), 0.0);
    }
}
