//! Public API surface.
//!
//! Consolidates the types and entry points a caller needs to build, write
//! and check a dashboard document.

pub use crate::artifact::{calculate_checksum, read_document, write_document};
pub use crate::config::AnalyticsConfig;
pub use crate::error::{ParseError, PipelineError, PipelineResult};
pub use crate::models::{NormalizedRow, RawUsageRow};
pub use crate::parsing::{load_usage_rows, parse_usage_csv, parse_usage_json_str};
pub use crate::sections::dashboard::DashboardDocument;
pub use crate::sections::dashboard::DataQuality;
pub use crate::sections::dashboard::DatasetMetadata;
pub use crate::sections::dashboard::ProcedureShare;
pub use crate::sections::pricing::MatrixPricingEntry;
pub use crate::sections::pricing::PriceRange;
pub use crate::sections::pricing::PricingAggregation;
pub use crate::sections::pricing::VendorPriceStat;
pub use crate::sections::rollups::HospitalSummary;
pub use crate::sections::rollups::RegionSummary;
pub use crate::sections::rollups::Rollups;
pub use crate::sections::rollups::SurgeonProfile;
pub use crate::sections::rollups::VendorShare;
pub use crate::sections::rollups::VendorSummary;
pub use crate::sections::scenarios::Complexity;
pub use crate::sections::scenarios::Implementation;
pub use crate::sections::scenarios::RiskLevel;
pub use crate::sections::scenarios::Scenario;
pub use crate::sections::scenarios::ScenarioKind;
pub use crate::sections::scenarios::VolumeTier;
pub use crate::sections::scenarios::VolumeWeightedRisk;
pub use crate::sections::validation::ValidationIssue;
pub use crate::sections::validation::ValidationReport;
pub use crate::services::DashboardBuilder;
pub use crate::transformations::{
    is_primary_component, normalize_component, normalize_vendor, Normalizers,
};
