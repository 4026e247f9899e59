//! Service layer: the analytical core and document assembly.
//!
//! Each service is a pure function (or a builder around one) of its input
//! rows. Accumulators live for one call; nothing persists between runs.

pub mod dashboard;
pub mod pricing;
pub mod risk;
pub mod rollups;
pub mod scenarios;
pub(crate) mod stats;
pub mod validation_report;

pub use dashboard::DashboardBuilder;
pub use pricing::{aggregate, aggregate_normalized};
pub use risk::{score, with_volume_weighted_risk};
pub use rollups::{build_rollups, build_rollups_normalized};
pub use scenarios::{generate, ScenarioDefinition, VendorSelection, CATALOGUE};
pub use validation_report::validate_document;
