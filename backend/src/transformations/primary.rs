//! Primary-component classification.
//!
//! Usage exports are SKU line items: one hip replacement shows up as a cup,
//! a liner, a head, a stem and a handful of screws. Only the structural
//! implants (cup/shell and stem for hips, tray and femoral component for
//! knees) count toward case volume; everything else still counts toward
//! spend.
//!
//! Case volume derived this way is an estimate. It undercounts when the
//! primary SKUs are missing from the export.

use serde::{Deserialize, Serialize};

/// Procedure family of an implant category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcedureFamily {
    Hip,
    Knee,
    Shoulder,
    Other,
}

impl ProcedureFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureFamily::Hip => "HIP",
            ProcedureFamily::Knee => "KNEE",
            ProcedureFamily::Shoulder => "SHOULDER",
            ProcedureFamily::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for ProcedureFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn has_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// Family of a primary implant category, `None` for ancillary items.
pub fn primary_family(category: &str) -> Option<ProcedureFamily> {
    let c = category.to_uppercase();

    let hip = (has_any(&c, &["ACETABULAR", "ACETAB"]) && has_any(&c, &["CUP", "SHELL"]))
        || (has_any(&c, &["FEMORAL", "FEM"]) && c.contains("STEM") && !c.contains("KNEE"))
        || (c.contains("HIP") && has_any(&c, &["CUP", "SHELL", "STEM"]));
    if hip {
        return Some(ProcedureFamily::Hip);
    }

    let knee = (has_any(&c, &["TIBIAL", "TIB"]) && has_any(&c, &["TRAY", "BASEPLATE", "PLATE"]))
        || (has_any(&c, &["FEMORAL", "FEM"]) && has_any(&c, &["KNEE", "COMP"]))
        || (c.contains("KNEE") && has_any(&c, &["FEMORAL", "TIBIAL"]));
    if knee {
        return Some(ProcedureFamily::Knee);
    }

    None
}

/// Whether rows of this category count toward case volume.
pub fn is_primary_component(category: &str) -> bool {
    primary_family(category).is_some()
}

/// Best-effort procedure family for rows without a procedure type.
pub fn infer_procedure_family(category: &str) -> ProcedureFamily {
    if let Some(family) = primary_family(category) {
        return family;
    }
    let c = category.to_uppercase();
    if has_any(&c, &["ACETABULAR", "HIP", "FEMORAL HEAD", "FEMORAL STEM"]) {
        ProcedureFamily::Hip
    } else if has_any(&c, &["TIBIAL", "PATELLAR", "KNEE"]) {
        ProcedureFamily::Knee
    } else if has_any(&c, &["GLENOID", "HUMERAL", "SHOULDER"]) {
        ProcedureFamily::Shoulder
    } else {
        ProcedureFamily::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_categories_classification() {
        let expected = [
            ("ACETABULAR CUP", Some(ProcedureFamily::Hip)),
            ("ACETABULAR SHELL", Some(ProcedureFamily::Hip)),
            ("FEMORAL HEAD", None),
            ("FEMORAL STEM", Some(ProcedureFamily::Hip)),
            ("TIBIAL TRAY", Some(ProcedureFamily::Knee)),
            ("TIBIAL INSERT", None),
            ("FEMORAL KNEE COMP", Some(ProcedureFamily::Knee)),
            ("PATELLAR COMP", None),
            ("GLENOID COMP", None),
            ("HUMERAL COMP", None),
            ("UNKNOWN", None),
        ];
        for (category, family) in expected {
            assert_eq!(primary_family(category), family, "category {}", category);
        }
    }

    #[test]
    fn test_abbreviated_and_fallback_names() {
        assert!(is_primary_component("ACETAB SHELL POROUS"));
        assert!(is_primary_component("HIP STEM CEMENTED"));
        assert!(is_primary_component("TIB PLATE"));
        assert!(is_primary_component("KNEE TIBIAL BEARING"));
        assert!(is_primary_component("FEMORAL COMPONENT CR"));
    }

    #[test]
    fn test_ancillary_items_do_not_count() {
        for category in ["CANCELLOUS BONE SCREW", "BONE CEMENT", "ACETABULAR LINER", "DRAPE KIT"] {
            assert!(!is_primary_component(category), "category {}", category);
        }
    }

    #[test]
    fn test_knee_stem_is_not_a_hip_stem() {
        assert_eq!(primary_family("FEMORAL KNEE STEM"), Some(ProcedureFamily::Knee));
    }

    #[test]
    fn test_infer_procedure_family() {
        assert_eq!(infer_procedure_family("FEMORAL HEAD"), ProcedureFamily::Hip);
        assert_eq!(infer_procedure_family("TIBIAL INSERT"), ProcedureFamily::Knee);
        assert_eq!(infer_procedure_family("PATELLAR COMP"), ProcedureFamily::Knee);
        assert_eq!(infer_procedure_family("GLENOID COMP"), ProcedureFamily::Shoulder);
        assert_eq!(infer_procedure_family("BONE CEMENT"), ProcedureFamily::Other);
    }
}
