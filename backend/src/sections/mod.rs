//! Serializable sections of the dashboard document.
//!
//! Each module owns the types of one or more top-level keys and exposes the
//! key names as constants.

pub mod dashboard;
pub mod pricing;
pub mod rollups;
pub mod scenarios;
pub mod validation;

#[cfg(test)]
mod tests {
    #[test]
    fn test_section_keys() {
        assert_eq!(super::pricing::MATRIX_PRICING, "matrixPricing");
        assert_eq!(
            super::pricing::MATRIX_PRICING_DETAILED,
            "matrixPricingDetailed"
        );
        assert_eq!(super::rollups::SURGEONS, "surgeons");
        assert_eq!(super::scenarios::SCENARIOS, "scenarios");
        assert_eq!(super::dashboard::DOCUMENT_SECTIONS.len(), 9);
        assert_eq!(super::dashboard::DOCUMENT_SECTIONS[0], "metadata");
        assert_eq!(super::dashboard::DOCUMENT_SECTIONS[8], "components");
    }
}
