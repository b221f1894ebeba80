//! Severity classifier.
//!
//! Decides red vs yellow for a matched threat pattern from lexical signals
//! in the full contract text plus category-aware rules. Green flags never
//! pass through here; they are unconditionally benign.

use crate::patterns::{ContractCategory, FlagSeverity, ThreatCategory, ThreatPattern};

/// Lexical indicators of aggressive rights language. Plain substring match
/// over the lowercased contract text.
pub const HIGH_SEVERITY_INDICATORS: &[&str] = &[
    "perpetual",
    "irrevocable",
    "in perpetuity",
    "all rights",
    "work made for hire",
    "assign",
    "transfer",
    "binding arbitration",
    "waive",
    "forever",
    "any purpose",
    "sole discretion",
];

/// Terms indicating AI / synthetic-performance exposure. Substring match,
/// same as the indicators above ("ai" deliberately matches inside longer
/// words; the heuristic over-triggers rather than under-triggers).
pub const AI_RELATED_TERMS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "synthetic",
    "voice clone",
    "deepfake",
    "digital replica",
];

/// Pattern categories that, combined with AI language in a voice/screen
/// contract, enable synthetic recreation of a performance.
const AI_EXPLOITATIVE_CATEGORIES: &[ThreatCategory] = &[
    ThreatCategory::DerivativeWorks,
    ThreatCategory::FutureTechnologiesClause,
    ThreatCategory::PerpetualIrrevocableLicense,
    ThreatCategory::ExpansivePartnerLicense,
];

/// Categories escalated to red whenever high-severity language is present
/// anywhere in the contract.
const CRITICAL_CATEGORIES: &[ThreatCategory] = &[
    ThreatCategory::AssignmentOfRights,
    ThreatCategory::PerpetualIrrevocableLicense,
    ThreatCategory::UnilateralModificationClause,
    ThreatCategory::IndemnificationClause,
];

/// Classify a matched pattern as red or yellow. First applicable rule wins:
/// AI exploitation override, then critical category + high-severity language,
/// then multiple matched keywords + high-severity language, else yellow.
///
/// `matched_keywords` are the keywords matched for this pattern only, not
/// across the whole document.
pub fn classify(
    pattern: &ThreatPattern,
    contract_text: &str,
    category: ContractCategory,
    matched_keywords: &[&str],
) -> FlagSeverity {
    let lower = contract_text.to_lowercase();

    let has_high_severity_language = HIGH_SEVERITY_INDICATORS
        .iter()
        .any(|term| lower.contains(term));

    let is_ai_exploitative = matches!(
        category,
        ContractCategory::GeneralVo | ContractCategory::FilmTv
    ) && AI_EXPLOITATIVE_CATEGORIES.contains(&pattern.category)
        && AI_RELATED_TERMS.iter().any(|term| lower.contains(term));

    if is_ai_exploitative {
        return FlagSeverity::Red;
    }

    if CRITICAL_CATEGORIES.contains(&pattern.category) && has_high_severity_language {
        return FlagSeverity::Red;
    }

    if matched_keywords.len() >= 2 && has_high_severity_language {
        return FlagSeverity::Red;
    }

    FlagSeverity::Yellow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::threat_matrix;

    fn pattern_for(category: ThreatCategory) -> ThreatPattern {
        threat_matrix()
            .into_iter()
            .find(|p| p.category == category)
            .unwrap()
    }

    #[test]
    fn test_ai_exploitation_is_always_red() {
        let pattern = pattern_for(ThreatCategory::DerivativeWorks);
        // No high-severity indicators at all; the AI override alone decides.
        let text = "Company may remix the recording using machine learning tools.";

        let severity = classify(&pattern, text, ContractCategory::GeneralVo, &["remix"]);
        assert_eq!(severity, FlagSeverity::Red);

        let severity = classify(&pattern, text, ContractCategory::FilmTv, &["remix"]);
        assert_eq!(severity, FlagSeverity::Red);
    }

    #[test]
    fn test_ai_override_does_not_apply_to_stage_contracts() {
        let pattern = pattern_for(ThreatCategory::DerivativeWorks);
        let text = "Company may remix the recording using machine learning tools.";

        let severity = classify(&pattern, text, ContractCategory::StageTheatre, &["remix"]);
        assert_eq!(severity, FlagSeverity::Yellow);
    }

    #[test]
    fn test_ai_override_requires_exploitative_category() {
        // Arbitration is not in the AI-exploitative set, and "machine
        // learning" is not a high-severity indicator.
        let pattern = pattern_for(ThreatCategory::ArbitrationClause);
        let text = "Disputes about the machine learning feature go to mediation.";

        let severity = classify(
            &pattern,
            text,
            ContractCategory::GeneralVo,
            &["mandatory arbitration"],
        );
        assert_eq!(severity, FlagSeverity::Yellow);
    }

    #[test]
    fn test_critical_category_with_high_severity_language() {
        let pattern = pattern_for(ThreatCategory::AssignmentOfRights);
        let text = "Artist hereby assigns all rights in the Work to Company.";

        let severity = classify(&pattern, text, ContractCategory::StageTheatre, &["assigns"]);
        assert_eq!(severity, FlagSeverity::Red);
    }

    #[test]
    fn test_non_critical_single_keyword_stays_yellow() {
        // Vague purpose is not critical; one keyword, even with high-severity
        // language elsewhere, stays yellow.
        let pattern = pattern_for(ThreatCategory::VaguePurposeClause);
        let text = "The Work may be used for marketing. Rights are perpetual.";

        let severity = classify(
            &pattern,
            text,
            ContractCategory::StageTheatre,
            &["for marketing"],
        );
        assert_eq!(severity, FlagSeverity::Yellow);
    }

    #[test]
    fn test_two_keywords_with_high_severity_language_escalates() {
        let pattern = pattern_for(ThreatCategory::VaguePurposeClause);
        let text = "The Work may be used for marketing and for any purpose Company deems fit.";

        let severity = classify(
            &pattern,
            text,
            ContractCategory::StageTheatre,
            &["for marketing", "for any purpose"],
        );
        assert_eq!(severity, FlagSeverity::Red);
    }

    #[test]
    fn test_no_signals_yields_yellow() {
        let pattern = pattern_for(ThreatCategory::ArbitrationClause);
        let text = "Disputes resolve through arbitration in the county of residence.";

        let severity = classify(
            &pattern,
            text,
            ContractCategory::StageTheatre,
            &["resolve through arbitration"],
        );
        assert_eq!(severity, FlagSeverity::Yellow);
    }

    #[test]
    fn test_indicator_match_is_case_insensitive() {
        let pattern = pattern_for(ThreatCategory::IndemnificationClause);
        let text = "ARTIST SHALL INDEMNIFY COMPANY AND WAIVE ALL CLAIMS.";

        let severity = classify(
            &pattern,
            text,
            ContractCategory::StageTheatre,
            &["Artist shall indemnify"],
        );
        assert_eq!(severity, FlagSeverity::Red);
    }
}
