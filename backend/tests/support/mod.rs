#![allow(dead_code)]

use std::collections::HashSet;
use std::io::Write;
use std::sync::Mutex;

use implant_analytics::models::RawUsageRow;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to the process-global
/// environment, since `AnalyticsConfig` reads `ANALYTICS_CONFIG`.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// The three-row hip example: two cups from different vendors and a stem.
pub fn hip_example_rows() -> Vec<RawUsageRow> {
    vec![
        RawUsageRow::new("ZIMMER", "Acetabular Cup 32mm", 1.0, 1200.0, "Dr. Lee"),
        RawUsageRow::new("STRYKER", "ACETAB CUP SIZE 34", 1.0, 1400.0, "Dr. Lee"),
        RawUsageRow::new("ZIMMER", "Femoral Stem Long", 1.0, 2000.0, "Dr. Lee"),
    ]
}

/// A small multi-site system: two hospitals, three surgeons, four vendors.
pub fn system_rows() -> Vec<RawUsageRow> {
    let site = |row: RawUsageRow, facility: &str, region: &str| {
        row.with_facility(facility).with_region(region)
    };
    vec![
        site(RawUsageRow::new("Zimmer Inc", "Acetabular Cup 54", 2.0, 3000.0, "Dr. Lee"), "General", "West"),
        site(RawUsageRow::new("Zimmer Inc", "Femoral Stem 12", 2.0, 4000.0, "Dr. Lee"), "General", "West"),
        site(RawUsageRow::new("Zimmer Inc", "Femoral Head 36", 2.0, 900.0, "Dr. Lee"), "General", "West"),
        site(RawUsageRow::new("Stryker Ortho", "ACETAB SHELL 56", 1.0, 3400.0, "Dr. Patel"), "General", "West"),
        site(RawUsageRow::new("Stryker Ortho", "Tibial Tray 4", 3.0, 2500.0, "Dr. Patel"), "General", "West"),
        site(RawUsageRow::new("DePuy Synthes", "Tibial Baseplate 4", 2.0, 2100.0, "Dr. Kim"), "Mercy", "East"),
        site(RawUsageRow::new("DePuy Synthes", "Femoral Component Knee L", 2.0, 3900.0, "Dr. Kim"), "Mercy", "East"),
        site(RawUsageRow::new("Smith & Nephew", "Femoral Component Knee R", 1.0, 3600.0, "Dr. Kim"), "Mercy", "East"),
        site(RawUsageRow::new("Smith & Nephew", "Bone Cement 40g", 4.0, 150.0, "Dr. Kim"), "Mercy", "East"),
    ]
}

/// Write `content` to a named temporary file with the given suffix.
pub fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
