//! Analytics configuration file support.
//!
//! Every section is optional; an empty file (or no file at all) yields the
//! built-in behavior.
//!
//! ```toml
//! [columns.aliases]
//! surgeon = ["Attending", "Operating MD"]
//!
//! [[normalization.component_rules]]
//! label = "ACETABULAR LINER"
//! all_of = ["ACETABULAR", "LINER"]
//!
//! [[normalization.vendor_aliases]]
//! canonical = "EXACTECH"
//! contains_all = ["EXACTECH"]
//!
//! [validation]
//! min_total_spend = 10000.0
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::parsing::UsageField;
use crate::transformations::{ComponentRule, Normalizers, VendorAlias};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "ANALYTICS_CONFIG";

/// Analytics configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub columns: ColumnSettings,
    #[serde(default)]
    pub normalization: NormalizationSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Run-level switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Produce an artifact even when the input has no rows.
    #[serde(default)]
    pub allow_empty_input: bool,
}

/// Extra header aliases, keyed by field name (`vendor`, `procedure_type`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnSettings {
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
}

/// Rules and aliases checked before the built-in tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizationSettings {
    #[serde(default)]
    pub component_rules: Vec<ComponentRule>,
    #[serde(default)]
    pub vendor_aliases: Vec<VendorAlias>,
}

/// Thresholds for data-quality warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Total spend below this is flagged as suspiciously low.
    #[serde(default = "default_min_total_spend")]
    pub min_total_spend: f64,
    #[serde(default = "default_true")]
    pub warn_single_vendor_categories: bool,
    #[serde(default = "default_true")]
    pub warn_zero_case_surgeons: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_total_spend: default_min_total_spend(),
            warn_single_vendor_categories: true,
            warn_zero_case_surgeons: true,
        }
    }
}

/// Artifact shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_true")]
    pub pretty: bool,
    /// Emit the flat per-row `components` list.
    #[serde(default = "default_true")]
    pub include_components: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: true,
            include_components: true,
        }
    }
}

fn default_min_total_spend() -> f64 {
    10_000.0
}

fn default_true() -> bool {
    true
}

impl AnalyticsConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AnalyticsConfig)` if successful
    /// * `Err(PipelineError::Configuration)` if the file cannot be read, parsed or
    ///   contains invalid rules
    pub fn from_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded analytics configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and check configuration text.
    pub fn from_toml_str(content: &str) -> PipelineResult<Self> {
        let config: AnalyticsConfig = toml::from_str(content).map_err(|e| {
            PipelineError::Configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.column_aliases()?;
        config.normalizers()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Uses `$ANALYTICS_CONFIG` when set, otherwise searches for
    /// `analytics.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> PipelineResult<Self> {
        match Self::default_path() {
            Some(path) => Self::from_file(path),
            None => Err(PipelineError::Configuration(
                "No analytics.toml found in standard locations".to_string(),
            )),
        }
    }

    /// An explicit file, else the default location, else built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> PipelineResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) => Self::from_file(path),
            None => {
                log::debug!("No analytics.toml found, using built-in configuration");
                Ok(Self::default())
            }
        }
    }

    fn default_path() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            if !explicit.trim().is_empty() {
                return Some(PathBuf::from(explicit));
            }
        }

        let search_paths = [
            PathBuf::from("analytics.toml"),
            PathBuf::from("backend/analytics.toml"),
            PathBuf::from("../analytics.toml"),
        ];
        search_paths.into_iter().find(|path| path.exists())
    }

    /// `[columns.aliases]` as typed `(field, alias)` pairs.
    pub fn column_aliases(&self) -> PipelineResult<Vec<(UsageField, String)>> {
        let mut pairs = Vec::new();
        for (field, aliases) in &self.columns.aliases {
            let field: UsageField = field.parse()?;
            pairs.extend(aliases.iter().map(|alias| (field, alias.clone())));
        }
        Ok(pairs)
    }

    /// Normalizers extended with `[normalization]` rules and aliases.
    pub fn normalizers(&self) -> PipelineResult<Normalizers> {
        Normalizers::with_extensions(
            self.normalization.component_rules.clone(),
            self.normalization.vendor_aliases.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AnalyticsConfig::from_toml_str("").unwrap();
        assert_eq!(config.validation.min_total_spend, 10_000.0);
        assert!(config.output.pretty);
        assert!(config.output.include_components);
        assert!(!config.pipeline.allow_empty_input);
        assert!(config.column_aliases().unwrap().is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[pipeline]
allow_empty_input = true

[columns.aliases]
surgeon = ["Attending"]
procedure_type = ["Case Type"]

[[normalization.component_rules]]
label = "ACETABULAR LINER"
all_of = ["ACETABULAR", "LINER"]

[[normalization.vendor_aliases]]
canonical = "EXACTECH"
contains_all = ["EXACTECH"]

[validation]
min_total_spend = 500.0
warn_zero_case_surgeons = false

[output]
pretty = false
"#;
        let config = AnalyticsConfig::from_toml_str(toml).unwrap();
        assert!(config.pipeline.allow_empty_input);
        assert_eq!(config.validation.min_total_spend, 500.0);
        assert!(!config.validation.warn_zero_case_surgeons);
        assert!(config.validation.warn_single_vendor_categories);
        assert!(!config.output.pretty);

        let aliases = config.column_aliases().unwrap();
        assert!(aliases.contains(&(UsageField::Surgeon, "Attending".to_string())));
        assert!(aliases.contains(&(UsageField::ProcedureType, "Case Type".to_string())));

        let normalizers = config.normalizers().unwrap();
        assert_eq!(
            normalizers.component.normalize("Acetabular Liner 36mm"),
            "ACETABULAR LINER"
        );
        assert!(normalizers.vendor.is_recognized("Exactech Inc"));
    }

    #[test]
    fn test_unknown_column_field_is_rejected() {
        let toml = "[columns.aliases]\ncolour = [\"Hue\"]\n";
        assert!(matches!(
            AnalyticsConfig::from_toml_str(toml),
            Err(PipelineError::Configuration(_))
        ));
    }

    #[test]
    fn test_unstable_rule_label_is_rejected() {
        let toml = r#"
[[normalization.component_rules]]
label = "FEMORAL THING"
all_of = ["FEMORAL"]
"#;
        assert!(AnalyticsConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = AnalyticsConfig::from_file("/nonexistent/analytics.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
