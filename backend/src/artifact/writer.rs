//! Dashboard artifact persistence.
//!
//! Every build writes a complete replacement file: the document is written
//! next to the target and renamed over it, so a reader never sees a partial
//! artifact.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ErrorContext, PipelineError, PipelineResult};
use crate::sections::dashboard::DashboardDocument;

/// Encode a document as JSON text.
pub fn to_json_string(document: &DashboardDocument, pretty: bool) -> PipelineResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    Ok(text)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "dashboard.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write the document to `path`, replacing any previous artifact.
///
/// Returns the number of bytes written.
pub fn write_document<P: AsRef<Path>>(
    path: P,
    document: &DashboardDocument,
    pretty: bool,
) -> PipelineResult<usize> {
    let path = path.as_ref();
    let text = to_json_string(document, pretty)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            PipelineError::io(e, ErrorContext::new("create_output_dir").with_path(parent))
        })?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, &text)
        .map_err(|e| PipelineError::io(e, ErrorContext::new("write_document").with_path(&tmp)))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        PipelineError::io(
            e,
            ErrorContext::new("replace_document")
                .with_path(path)
                .with_details(format!("temporary file {}", tmp.display())),
        )
    })?;

    log::info!("Wrote dashboard artifact {} ({} bytes)", path.display(), text.len());
    Ok(text.len())
}

/// Read an artifact as untyped JSON, for validation.
pub fn read_document<P: AsRef<Path>>(path: P) -> PipelineResult<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| PipelineError::io(e, ErrorContext::new("read_document").with_path(path)))?;
    let value = serde_json::from_str(&content)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawUsageRow;
    use crate::services::DashboardBuilder;
    use chrono::{TimeZone, Utc};

    fn document() -> DashboardDocument {
        DashboardBuilder::default()
            .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .build(&[RawUsageRow::new("STRYKER", "Tibial Tray", 1.0, 2500.0, "Dr. A")])
    }

    #[test]
    fn test_compact_and_pretty_encodings() {
        let doc = document();
        let compact = to_json_string(&doc, false).unwrap();
        let pretty = to_json_string(&doc, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        let a: Value = serde_json::from_str(&compact).unwrap();
        let b: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rewrite_replaces_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, "stale").unwrap();

        let bytes = write_document(&path, &document(), false).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len() as usize, bytes);
        assert!(!temp_path(&path).exists());
        assert_eq!(read_document(&path).unwrap()["metadata"]["totalRows"], 1);
    }

    #[test]
    fn test_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(read_document(&missing), Err(PipelineError::Io { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{not json").unwrap();
        assert!(matches!(
            read_document(&broken),
            Err(PipelineError::Serialization(_))
        ));
    }
}
