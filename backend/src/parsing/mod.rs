//! Ingestion boundary: spreadsheet exports and JSON rows to [`RawUsageRow`]s.
//!
//! Everything downstream of this module works on typed rows; malformed
//! numeric cells are rejected here with a [`crate::error::ParseError`].

pub mod columns;
pub mod csv_parser;
pub mod json_parser;


pub use columns::{header_key, ColumnMap, UsageField};
pub use csv_parser::{parse_amount, parse_usage_csv, parse_usage_csv_file, parse_usage_csv_with};
pub use json_parser::{parse_usage_json_file, parse_usage_json_str};

use std::path::Path;

use crate::error::PipelineResult;
use crate::models::RawUsageRow;

/// Load rows from a `.json` file or, for any other extension, a CSV file.
pub fn load_usage_rows<P: AsRef<Path>>(
    path: P,
    extra_aliases: &[(UsageField, String)],
) -> PipelineResult<Vec<RawUsageRow>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    log::debug!("Loading usage rows from {}", path.display());
    if is_json {
        parse_usage_json_file(path)
    } else {
        parse_usage_csv_file(path, extra_aliases)
    }
}
