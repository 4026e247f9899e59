//! # Implant Analytics
//!
//! Vendor consolidation analytics for orthopedic implant usage data.
//!
//! This crate turns purchasing line items (vendor, component description,
//! surgeon, price, quantity) into the static JSON document a browser
//! dashboard renders: vendor price matrices, surgeon loyalty profiles,
//! consolidation scenarios and their adoption risk.
//!
//! ## Features
//!
//! - **Ingestion**: CSV exports with fuzzy header mapping, or typed JSON rows
//! - **Normalization**: rule-table canonicalization of component and vendor names
//! - **Pricing**: per-vendor medians and matrix-pricing savings per category
//! - **Rollups**: surgeon, vendor, hospital and region totals with
//!   primary-component case estimation
//! - **Scenarios**: a fixed consolidation catalogue scored by volume-weighted risk
//! - **Validation**: structure and data-quality checks over a written artifact
//!
//! ## Architecture
//!
//! - [`parsing`]: CSV/JSON readers producing [`models::RawUsageRow`]s
//! - [`transformations`]: component, vendor and primary-component rules
//! - [`services`]: aggregation, scenario generation, risk scoring, document assembly
//! - [`sections`]: serializable document sections
//! - [`artifact`]: writing and reading the JSON artifact
//! - [`config`]: `analytics.toml` settings
//!
//! ## Example
//!
//! ```
//! use implant_analytics::models::RawUsageRow;
//! use implant_analytics::services::DashboardBuilder;
//!
//! let rows = vec![
//!     RawUsageRow::new("ZIMMER", "Acetabular Cup 32mm", 1.0, 1200.0, "Dr. Lee"),
//!     RawUsageRow::new("STRYKER", "ACETAB CUP SIZE 34", 1.0, 1400.0, "Dr. Lee"),
//! ];
//! let document = DashboardBuilder::default().build(&rows);
//! assert_eq!(document.matrix_pricing[0].matrix_price, 1200.0);
//! ```

// PipelineError carries an ErrorContext for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod artifact;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod sections;
pub mod services;
pub mod transformations;
