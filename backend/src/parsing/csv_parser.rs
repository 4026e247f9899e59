//! CSV usage export loader.

use std::io::Read;
use std::path::Path;

use crate::error::{ErrorContext, ParseError, PipelineError, PipelineResult};
use crate::models::RawUsageRow;

use super::columns::{ColumnMap, UsageField};

/// Load usage rows from a CSV reader using the built-in header aliases.
pub fn parse_usage_csv<R: Read>(reader: R) -> PipelineResult<Vec<RawUsageRow>> {
    parse_usage_csv_with(reader, &[])
}

/// Load usage rows from a CSV reader with additional header aliases.
///
/// Lines whose cells are all blank are skipped. Quantity and price accept
/// currency formatting (`$1,200.00`); anything else that is not a
/// non-negative number fails with a [`ParseError`] naming the 0-based data
/// row and the column header.
pub fn parse_usage_csv_with<R: Read>(
    reader: R,
    extra_aliases: &[(UsageField, String)],
) -> PipelineResult<Vec<RawUsageRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| PipelineError::Serialization(format!("CSV header error: {}", e)))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    let columns = ColumnMap::from_headers_with(&headers, extra_aliases)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| {
            PipelineError::Serialization(format!("CSV parse error at line {}: {}", row_idx + 2, e))
        })?;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            skipped += 1;
            continue;
        }

        let cell = |field: UsageField| -> Option<&str> {
            columns
                .index(field)
                .and_then(|idx| record.get(idx))
                .map(str::trim)
        };
        let text = |field: UsageField| cell(field).unwrap_or_default().to_string();
        let optional = |field: UsageField| {
            cell(field)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let number = |field: UsageField| -> Result<f64, ParseError> {
            let header = columns
                .index(field)
                .and_then(|idx| headers.get(idx))
                .map(String::as_str)
                .unwrap_or_else(|| field.as_str());
            let raw = cell(field).unwrap_or_default();
            parse_amount(raw).map_err(|reason| ParseError::new(row_idx, header, raw, reason))
        };

        rows.push(RawUsageRow {
            vendor: text(UsageField::Vendor),
            component_raw: text(UsageField::Component),
            component_category: optional(UsageField::Category),
            quantity: number(UsageField::Quantity)?,
            price: number(UsageField::Price)?,
            surgeon: text(UsageField::Surgeon),
            facility: optional(UsageField::Facility),
            region: optional(UsageField::Region),
            procedure_type: text(UsageField::ProcedureType),
        });
    }

    log::info!(
        "Parsed {} usage rows from CSV ({} blank lines skipped)",
        rows.len(),
        skipped
    );
    Ok(rows)
}

/// Load usage rows from a CSV file path.
pub fn parse_usage_csv_file<P: AsRef<Path>>(
    path: P,
    extra_aliases: &[(UsageField, String)],
) -> PipelineResult<Vec<RawUsageRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| PipelineError::io(e, ErrorContext::new("read_usage_csv").with_path(path)))?;
    parse_usage_csv_with(file, extra_aliases)
}

/// Non-negative finite amount, tolerating `$`, thousands separators and spaces.
pub fn parse_amount(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' ' | '\u{a0}'))
        .collect();
    if cleaned.is_empty() {
        return Err("empty value".to_string());
    }
    let value: f64 = cleaned
        .parse()
        .map_err(|_| "not a number".to_string())?;
    if !value.is_finite() {
        return Err("not a finite number".to_string());
    }
    if value < 0.0 {
        return Err("negative value".to_string());
    }
    Ok(value)
}
