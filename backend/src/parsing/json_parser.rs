//! Typed JSON rows loader.
//!
//! Accepts an array of camelCase row objects, the shape the admin upload
//! produced after spreadsheet extraction.

use std::path::Path;

use serde_path_to_error::Segment;

use crate::error::{ErrorContext, ParseError, PipelineError, PipelineResult};
use crate::models::RawUsageRow;

/// Parse a JSON array of usage rows.
///
/// Type errors are reported as [`ParseError`] with the array index and the
/// offending field. Negative quantities or prices are rejected the same way.
pub fn parse_usage_json_str(json: &str) -> PipelineResult<Vec<RawUsageRow>> {
    let deserializer = &mut serde_json::Deserializer::from_str(json);
    let rows: Vec<RawUsageRow> = serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let mut row = None;
        let mut column = None;
        for segment in err.path().iter() {
            match segment {
                Segment::Seq { index } if row.is_none() => row = Some(*index),
                Segment::Map { key } => column = Some(key.clone()),
                _ => {}
            }
        }
        match row {
            Some(row) => PipelineError::Parse(ParseError::new(
                row,
                column.unwrap_or_else(|| "<row>".to_string()),
                "",
                err.inner().to_string(),
            )),
            None => PipelineError::Serialization(format!(
                "invalid usage JSON at {}: {}",
                err.path(),
                err.inner()
            )),
        }
    })?;

    for (idx, row) in rows.iter().enumerate() {
        for (column, value) in [("quantity", row.quantity), ("price", row.price)] {
            if value < 0.0 {
                return Err(ParseError::new(idx, column, value.to_string(), "negative value").into());
            }
        }
    }

    log::info!("Parsed {} usage rows from JSON", rows.len());
    Ok(rows)
}

/// Load usage rows from a JSON file path.
pub fn parse_usage_json_file<P: AsRef<Path>>(path: P) -> PipelineResult<Vec<RawUsageRow>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::io(e, ErrorContext::new("read_usage_json").with_path(path)))?;
    parse_usage_json_str(&content)
}
