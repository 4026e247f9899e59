//! Component description canonicalization.
//!
//! Free-text implant descriptions ("Acetab Cup 32mm Sterile REF 1234-56") are
//! reduced to a small set of category labels ("ACETABULAR CUP") so that
//! prices can be compared across vendors. Normalization runs in a fixed order:
//!
//! 1. uppercase, trim, punctuation to spaces (decimal points inside numbers survive)
//! 2. strip boilerplate: sterility markers, sizes, laterality, catalog codes,
//!    trailing numeric suffixes
//! 3. whole-word abbreviation expansion (ACETAB -> ACETABULAR, ...)
//! 4. whitespace collapse
//! 5. ordered category rules, first match wins
//! 6. fallback bucket: first four words longer than two characters
//!
//! The fallback is intentionally lossy: exotic components that hit no rule
//! are clustered by their leading words rather than kept verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Label returned for empty or fully-stripped descriptions.
pub const UNKNOWN_COMPONENT: &str = "UNKNOWN";

const FALLBACK_WORDS: usize = 4;
const MAX_FALLBACK_PASSES: usize = 8;

static BOILERPLATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bNON STERILE\b",
        r"\bSTERILE\b",
        r"\bLATEX FREE\b",
        r"\bDISPOSABLE\b",
        r"\bSINGLE USE\b",
        // 10 X 20, 10X20MM
        r"\b\d+(?:\.\d+)?\s*X\s*\d+(?:\.\d+)?(?:\s*(?:MM|CM))?\b",
        // 32MM, 6.5 CM, 12 DEG
        r"\b\d+(?:\.\d+)?\s*(?:MM|CM|DEG|DEGREE|DEGREES)\b",
        r"\bSIZE\s+[A-Z0-9.]+\b",
        r"\bSZ\s*\d+(?:\.\d+)?\b",
        r"\b(?:LEFT|RIGHT|LT|RT)\b",
        // REF 1234 56, CAT ABC12, MODEL NO 5521
        r"\b(?:REF|CAT|CATALOG|MODEL|LOT|PART|SKU)(?:\s+NO)?\s+[A-Z0-9]*\d[A-Z0-9.]*(?:\s+\d[\d.]*)*\b",
        r"(?:\s+\d[\d.]*)+\s*$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

const TERM_STANDARDIZATION: &[(&str, &str)] = &[
    ("ACETAB", "ACETABULAR"),
    ("ACET", "ACETABULAR"),
    ("FEM", "FEMORAL"),
    ("FEMUR", "FEMORAL"),
    ("TIB", "TIBIAL"),
    ("TIBIA", "TIBIAL"),
    ("PAT", "PATELLAR"),
    ("PATELLA", "PATELLAR"),
    ("HUM", "HUMERAL"),
    ("HUMERUS", "HUMERAL"),
    ("GLEN", "GLENOID"),
    ("BASEPLT", "BASEPLATE"),
    ("INS", "INSERT"),
    ("HD", "HEAD"),
];

/// One entry of the ordered category table.
///
/// A rule matches a cleaned description when every word in `all_of` is
/// present and, if `any_of` is non-empty, at least one of its words is too.
/// A rule with both lists empty never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRule {
    pub label: String,
    #[serde(default)]
    pub all_of: Vec<String>,
    #[serde(default)]
    pub any_of: Vec<String>,
}

impl ComponentRule {
    pub fn new(label: &str, all_of: &[&str], any_of: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            all_of: all_of.iter().map(|w| w.to_string()).collect(),
            any_of: any_of.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Whether this rule accepts the given cleaned tokens.
    pub fn matches(&self, tokens: &[&str]) -> bool {
        if self.all_of.is_empty() && self.any_of.is_empty() {
            return false;
        }
        let present = |word: &String| tokens.iter().any(|t| *t == word.as_str());
        self.all_of.iter().all(present)
            && (self.any_of.is_empty() || self.any_of.iter().any(present))
    }

    fn uppercased(self) -> Self {
        Self {
            label: self.label.trim().to_uppercase(),
            all_of: self.all_of.iter().map(|w| w.trim().to_uppercase()).collect(),
            any_of: self.any_of.iter().map(|w| w.trim().to_uppercase()).collect(),
        }
    }
}

/// The built-in category table, in match order.
pub fn builtin_rules() -> Vec<ComponentRule> {
    vec![
        ComponentRule::new("ACETABULAR CUP", &["ACETABULAR", "CUP"], &[]),
        ComponentRule::new("ACETABULAR SHELL", &["ACETABULAR", "SHELL"], &[]),
        ComponentRule::new("FEMORAL HEAD", &["FEMORAL", "HEAD"], &[]),
        ComponentRule::new("FEMORAL STEM", &["FEMORAL", "STEM"], &[]),
        ComponentRule::new("TIBIAL TRAY", &["TIBIAL"], &["TRAY", "BASEPLATE"]),
        ComponentRule::new("TIBIAL INSERT", &["TIBIAL", "INSERT"], &[]),
        ComponentRule::new("FEMORAL KNEE COMP", &["FEMORAL", "KNEE"], &[]),
        ComponentRule::new("PATELLAR COMP", &["PATELLAR"], &[]),
        ComponentRule::new("GLENOID COMP", &["GLENOID"], &[]),
        ComponentRule::new("HUMERAL COMP", &["HUMERAL"], &[]),
    ]
}

/// Result of classifying a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMatch {
    pub label: String,
    /// `true` when a category rule produced the label, `false` for the
    /// fallback bucket.
    pub rule_matched: bool,
}

/// Rule-table driven component normalizer.
#[derive(Debug, Clone)]
pub struct ComponentNormalizer {
    rules: Vec<ComponentRule>,
}

impl Default for ComponentNormalizer {
    fn default() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }
}

impl ComponentNormalizer {
    /// Normalizer with the built-in table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer with a custom table.
    ///
    /// Every label must normalize to itself under the table, otherwise
    /// normalization would not be idempotent and the table is rejected.
    pub fn with_rules(rules: Vec<ComponentRule>) -> PipelineResult<Self> {
        let normalizer = Self {
            rules: rules.into_iter().map(ComponentRule::uppercased).collect(),
        };

        for rule in &normalizer.rules {
            if rule.label.is_empty() {
                return Err(PipelineError::Configuration(
                    "component rule with empty label".to_string(),
                ));
            }
            let renormalized = normalizer.normalize(&rule.label);
            if renormalized != rule.label {
                return Err(PipelineError::Configuration(format!(
                    "component rule label '{}' normalizes to '{}'",
                    rule.label, renormalized
                )));
            }
        }

        Ok(normalizer)
    }

    /// Custom rules checked before the built-in table.
    pub fn with_extra_rules(extra: Vec<ComponentRule>) -> PipelineResult<Self> {
        let mut rules = extra;
        rules.extend(builtin_rules());
        Self::with_rules(rules)
    }

    pub fn rules(&self) -> &[ComponentRule] {
        &self.rules
    }

    /// Canonical category label for a description. Never empty.
    pub fn normalize(&self, raw: &str) -> String {
        self.classify(raw).label
    }

    /// Canonical label plus whether a category rule was hit.
    pub fn classify(&self, raw: &str) -> ComponentMatch {
        let upper = raw.trim().to_uppercase();
        if upper.is_empty() {
            return ComponentMatch {
                label: UNKNOWN_COMPONENT.to_string(),
                rule_matched: false,
            };
        }

        let cleaned = clean(&upper);
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();

        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(&tokens)) {
            return ComponentMatch {
                label: rule.label.clone(),
                rule_matched: true,
            };
        }

        ComponentMatch {
            label: fallback_bucket(cleaned),
            rule_matched: false,
        }
    }
}

/// Normalize with the built-in table.
pub fn normalize_component(raw: &str) -> String {
    static DEFAULT: Lazy<ComponentNormalizer> = Lazy::new(ComponentNormalizer::new);
    DEFAULT.normalize(raw)
}

/// Steps 1-4 on an already uppercased description.
fn clean(upper: &str) -> String {
    let mut text = scrub_punctuation(upper);
    for pattern in BOILERPLATE_PATTERNS.iter() {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    standardize_terms(&text)
}

fn scrub_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if c.is_ascii_alphanumeric() {
                c
            } else if c == '.'
                && i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_ascii_digit()
                && chars[i + 1].is_ascii_digit()
            {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Whole-word abbreviation expansion; also collapses whitespace.
fn standardize_terms(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            TERM_STANDARDIZATION
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| *full)
                .unwrap_or(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_numeric_token(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Leading-words bucket for descriptions no rule recognizes.
///
/// Dropping short tokens can bring boilerplate back together ("LATEX 12
/// FREE"), so the truncated text is cleaned again until it is stable.
fn fallback_bucket(cleaned: String) -> String {
    let mut current = cleaned;
    let mut candidate = String::new();

    for _ in 0..MAX_FALLBACK_PASSES {
        candidate = current
            .split_whitespace()
            .filter(|word| word.len() > 2 && !is_numeric_token(word))
            .take(FALLBACK_WORDS)
            .collect::<Vec<_>>()
            .join(" ");

        let recleaned = clean(&candidate);
        if recleaned == candidate {
            break;
        }
        current = recleaned;
    }

    if candidate.is_empty() {
        UNKNOWN_COMPONENT.to_string()
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_labels_are_fixed_points() {
        let normalizer = ComponentNormalizer::new();
        for rule in normalizer.rules() {
            assert_eq!(normalizer.normalize(&rule.label), rule.label);
        }
    }

    #[test]
    fn test_empty_and_blank_are_unknown() {
        assert_eq!(normalize_component(""), UNKNOWN_COMPONENT);
        assert_eq!(normalize_component("   "), UNKNOWN_COMPONENT);
        assert_eq!(normalize_component("STERILE 32MM"), UNKNOWN_COMPONENT);
    }

    #[test]
    fn test_sizes_and_abbreviations() {
        assert_eq!(normalize_component("Acetabular Cup 32mm"), "ACETABULAR CUP");
        assert_eq!(normalize_component("ACETAB CUP SIZE 34"), "ACETABULAR CUP");
        assert_eq!(normalize_component("Femoral Stem Long"), "FEMORAL STEM");
    }

    #[test]
    fn test_boilerplate_is_stripped() {
        assert_eq!(
            normalize_component("Tib Baseplate, Left, Sterile REF 1234-56"),
            "TIBIAL TRAY"
        );
        assert_eq!(
            normalize_component("Latex-Free Fem Hd 36mm +4"),
            "FEMORAL HEAD"
        );
        assert_eq!(normalize_component("Patella 3-Peg 38mm"), "PATELLAR COMP");
    }

    #[test]
    fn test_rule_order_first_match_wins() {
        // both HEAD and STEM present: FEMORAL HEAD is earlier in the table
        assert_eq!(normalize_component("FEMORAL HEAD STEM TAPER"), "FEMORAL HEAD");
        // TIBIAL TRAY precedes TIBIAL INSERT
        assert_eq!(normalize_component("TIBIAL TRAY INSERT KIT"), "TIBIAL TRAY");
    }

    #[test]
    fn test_fallback_takes_leading_long_words() {
        assert_eq!(
            normalize_component("Cancellous Bone Screw 6.5 x 40mm Self Tapping"),
            "CANCELLOUS BONE SCREW SELF"
        );
        assert_eq!(normalize_component("Bone Cement 40g"), "BONE CEMENT 40G");
    }

    #[test]
    fn test_fallback_reclean_is_stable() {
        let once = normalize_component("Latex 12 Free Drape Kit");
        assert_eq!(normalize_component(&once), once);
    }

    #[test]
    fn test_classify_reports_rule_hit() {
        let normalizer = ComponentNormalizer::new();
        assert!(normalizer.classify("Glenoid Component Pegged").rule_matched);
        assert!(!normalizer.classify("Wound Drain").rule_matched);
    }

    #[test]
    fn test_extra_rules_take_precedence() {
        let normalizer = ComponentNormalizer::with_extra_rules(vec![ComponentRule::new(
            "POLY LINER",
            &["LINER"],
            &[],
        )])
        .unwrap();
        assert_eq!(normalizer.normalize("Acetabular Liner 10 deg"), "POLY LINER");
        assert_eq!(normalizer.normalize("POLY LINER"), "POLY LINER");
    }

    #[test]
    fn test_rule_with_unstable_label_is_rejected() {
        let result = ComponentNormalizer::with_extra_rules(vec![ComponentRule::new(
            "FEMORAL ANYTHING",
            &["FEMORAL"],
            &[],
        )]);
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn test_empty_rule_never_matches() {
        let rule = ComponentRule::new("X", &[], &[]);
        assert!(!rule.matches(&["X", "ANYTHING"]));
    }
}
