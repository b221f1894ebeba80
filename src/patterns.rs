use colored::Color;
use serde::{Deserialize, Serialize};

/// The kind of engagement the contract covers. Chosen by the artist before
/// analysis; voice-over and film/TV work get stricter treatment of AI and
/// derivative-use language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractCategory {
    GeneralVo,
    FilmTv,
    StageTheatre,
}

impl ContractCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractCategory::GeneralVo => "general_vo",
            ContractCategory::FilmTv => "film_tv",
            ContractCategory::StageTheatre => "stage_theatre",
        }
    }

    /// Human-facing label used in reports.
    pub fn title(&self) -> &'static str {
        match self {
            ContractCategory::GeneralVo => "General / VO",
            ContractCategory::FilmTv => "Film / TV",
            ContractCategory::StageTheatre => "Stage / Theatre",
        }
    }
}

/// One fixed category per threat pattern. Matching is keyword-driven; the
/// category tag drives severity rules and de-duplication, not matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatCategory {
    AssignmentOfRights,
    PerpetualIrrevocableLicense,
    FutureTechnologiesClause,
    DerivativeWorks,
    VaguePurposeClause,
    ExpansivePartnerLicense,
    UnilateralModificationClause,
    IndemnificationClause,
    ArbitrationClause,
}

impl ThreatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatCategory::AssignmentOfRights => "assignment_of_rights",
            ThreatCategory::PerpetualIrrevocableLicense => "perpetual_irrevocable_license",
            ThreatCategory::FutureTechnologiesClause => "future_technologies_clause",
            ThreatCategory::DerivativeWorks => "derivative_works",
            ThreatCategory::VaguePurposeClause => "vague_purpose_clause",
            ThreatCategory::ExpansivePartnerLicense => "expansive_partner_license",
            ThreatCategory::UnilateralModificationClause => "unilateral_modification_clause",
            ThreatCategory::IndemnificationClause => "indemnification_clause",
            ThreatCategory::ArbitrationClause => "arbitration_clause",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagSeverity {
    Green,
    Yellow,
    Red,
}

impl FlagSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagSeverity::Green => "green",
            FlagSeverity::Yellow => "yellow",
            FlagSeverity::Red => "red",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            FlagSeverity::Green => Color::Green,
            FlagSeverity::Yellow => Color::Yellow,
            FlagSeverity::Red => Color::Red,
        }
    }
}

/// A threat pattern: trigger keywords plus the explanatory and remediation
/// prose shown to the artist. Exactly one per [`ThreatCategory`]; the catalog
/// is configuration data, never mutated at runtime.
#[derive(Debug, Clone, Copy)]
pub struct ThreatPattern {
    pub category: ThreatCategory,
    /// Ordered matching vocabulary. Entries are literal words or phrases;
    /// any regex metacharacters are escaped before compilation.
    pub keywords: &'static [&'static str],
    pub title: &'static str,
    pub description: &'static str,
    pub revision_template: &'static str,
}

/// A positive ("green flag") pattern. No category, no severity; always benign.
#[derive(Debug, Clone, Copy)]
pub struct GreenFlagPattern {
    pub keywords: &'static [&'static str],
    pub title: &'static str,
    pub description: &'static str,
}

/// A detected threat, built fresh per scan. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedThreat {
    pub category: ThreatCategory,
    pub severity: FlagSeverity,
    pub title: String,
    pub clause_text: String,
    pub analysis: String,
    pub revision_suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedGreenFlag {
    pub title: String,
    pub clause_text: String,
    pub analysis: String,
}

/// The scanner's sole output. Threats are ordered with all red entries
/// before all yellow entries, catalog order preserved within each group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub threats: Vec<DetectedThreat>,
    pub green_flags: Vec<DetectedGreenFlag>,
}

/// Presentation-level flag: a detected threat or green flag with a generated
/// unique id. This is the unit rendered, exported, and stored in the vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatFlag {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ThreatCategory>,
    pub severity: FlagSeverity,
    pub title: String,
    pub clause_text: String,
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_suggestion: Option<String>,
}

/// A completed analysis: the flags plus scan metadata, as persisted and
/// exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAnalysis {
    pub id: String,
    pub category: ContractCategory,
    pub contract_text: String,
    pub analyzed_at: chrono::DateTime<chrono::Utc>,
    pub flags: Vec<ThreatFlag>,
    pub overall_risk_level: crate::risk::RiskLevel,
}

/// The threat matrix: one pattern per category, in fixed order. Phrases with
/// punctuation (e.g. "work-for-hire") are matched literally.
pub fn threat_matrix() -> Vec<ThreatPattern> {
    vec![
        ThreatPattern {
            category: ThreatCategory::AssignmentOfRights,
            keywords: &[
                "assigns",
                "transfers",
                "work made for hire",
                "work-for-hire",
                "all rights",
                "assign all right",
                "transfer of ownership",
                "convey all rights",
            ],
            title: "Assignment of Rights",
            description: "This clause transfers ownership of your work. You're selling the property outright, not just licensing it.",
            revision_template: "Suggested revision: 'Artist grants Company a non-exclusive license to use the Work for [specific purpose], with Artist retaining all underlying rights and ownership.'",
        },
        ThreatPattern {
            category: ThreatCategory::PerpetualIrrevocableLicense,
            keywords: &[
                "perpetual",
                "irrevocable",
                "in perpetuity",
                "forever",
                "indefinite",
                "permanent license",
                "non-terminable",
            ],
            title: "Perpetual Irrevocable License",
            description: "This is functionally identical to a buyout. They can use your work forever without ever paying you again, and you can never revoke permission.",
            revision_template: "Suggested revision: 'Company is granted a [3-year] license to use the Work, renewable upon mutual agreement and additional compensation. Artist may terminate with [90 days] written notice.'",
        },
        ThreatPattern {
            category: ThreatCategory::FutureTechnologiesClause,
            keywords: &[
                "hereafter developed",
                "now known or hereafter",
                "future technologies",
                "any media now known or later developed",
                "in any medium whether now known",
                "technologies not yet invented",
                "future formats",
            ],
            title: "Future Technologies Clause",
            description: "This is a blank check for the future. They can use your work in AI training, VR, metaverse, or technologies that don't even exist yet, without asking or paying you.",
            revision_template: "Suggested revision: 'License is limited to media and technologies specifically listed: [Film, Television, Streaming]. Any use in formats developed after this agreement requires separate negotiation and compensation. Explicitly excluded: AI training, synthetic voice generation, deepfakes, and digital replicas.'",
        },
        ThreatPattern {
            category: ThreatCategory::DerivativeWorks,
            keywords: &[
                "modify",
                "adapt",
                "create derivative works",
                "alter",
                "transform",
                "prepare derivative",
                "remix",
                "revise",
                "create adaptations",
            ],
            title: "Derivative Works Clause",
            description: "This is the 'voice clone' or 'remix' clause. They can modify, adapt, or create entirely new works based on yours without your involvement or additional payment.",
            revision_template: "Suggested revision: 'Company may use the Work as delivered, without modification. Any adaptations, derivatives, or substantial alterations require Artist's written approval and separate compensation at Artist's standard rate. Explicitly excluded: synthetic voice generation, AI remixing, or performance alteration.'",
        },
        ThreatPattern {
            category: ThreatCategory::VaguePurposeClause,
            keywords: &[
                "for promotional purposes",
                "in connection with the platform",
                "for broader development",
                "for marketing",
                "for any purpose",
                "in support of",
                "related to the project",
            ],
            title: "Vague Purpose Clause",
            description: "Expansive usage rights hidden behind vague language. What exactly is 'promotional purposes'? This could mean anything from social media to billboards to product packaging.",
            revision_template: "Suggested revision: 'Company may use the Work exclusively for [specific deliverable: Episode 3 of Series Name]. Any additional uses (promotional, marketing, ancillary products) require prior written consent and additional licensing fees.'",
        },
        ThreatPattern {
            category: ThreatCategory::ExpansivePartnerLicense,
            keywords: &[
                "affiliated partners",
                "assignees",
                "sublicensable",
                "third parties",
                "licensees",
                "subsidiaries and affiliates",
                "transferable",
                "assign to any party",
            ],
            title: "Expansive Partner License",
            description: "This is a chain-of-custody failure. They can hand your work to anyone they want, including competitors, subsidiaries, and random third parties, and you have no control or visibility.",
            revision_template: "Suggested revision: 'License is non-transferable and non-sublicensable. Company may not assign, transfer, or sublicense rights without Artist's prior written consent. Any approved transfers must maintain all Artist protections and compensation terms.'",
        },
        ThreatPattern {
            category: ThreatCategory::UnilateralModificationClause,
            keywords: &[
                "reserve the right to modify",
                "may change these terms",
                "at our sole discretion",
                "modify without notice",
                "update this agreement",
                "change terms at any time",
                "unilaterally amend",
            ],
            title: "Unilateral Modification Clause",
            description: "The 'God Clause.' They can change the rules whenever they want, and you're just expected to accept it. This strips you of any contractual certainty.",
            revision_template: "Suggested revision: 'This agreement may only be modified by written amendment signed by both parties. Any proposed changes must be provided to Artist [30 days] in advance, and Artist may terminate if changes are unacceptable.'",
        },
        ThreatPattern {
            category: ThreatCategory::IndemnificationClause,
            keywords: &[
                "indemnify and hold harmless the Company",
                "defend and indemnify",
                "hold harmless",
                "indemnify against all claims",
                "Artist shall indemnify",
            ],
            title: "Broad Indemnification Clause",
            description: "This makes you liable for their mistakes. If they use your work improperly and get sued, you're on the hook for their legal fees and damages.",
            revision_template: "Suggested revision: 'Each party shall indemnify the other only for claims arising from their own breach, negligence, or willful misconduct. Artist's indemnification is limited to claims that the Work infringes third-party IP rights, capped at compensation received.'",
        },
        ThreatPattern {
            category: ThreatCategory::ArbitrationClause,
            keywords: &[
                "binding arbitration",
                "arbitration agreement",
                "waive right to jury trial",
                "resolve through arbitration",
                "arbitrator's decision is final",
                "mandatory arbitration",
                "arbitration only",
            ],
            title: "Mandatory Arbitration Clause",
            description: "This strips your right to sue in open court. Arbitration heavily favors corporations with deep pockets, and decisions can't be appealed.",
            revision_template: "Suggested revision: 'Disputes shall first be negotiated in good faith. If unresolved, either party may pursue resolution in [your state] courts. Both parties retain all legal rights and remedies.'",
        },
    ]
}

/// Positive patterns. Emitted per matched pattern, with no de-duplication
/// and no severity classification.
pub fn green_flag_patterns() -> Vec<GreenFlagPattern> {
    vec![
        GreenFlagPattern {
            keywords: &[
                "SAG-AFTRA",
                "equity",
                "union contract",
                "guild agreement",
                "WGA",
                "DGA",
            ],
            title: "Union-Backed Agreement",
            description: "This contract appears to follow standard union guidelines. These are generally protective of artist rights.",
        },
        GreenFlagPattern {
            keywords: &[
                "limited license",
                "specific use",
                "defined term",
                "royalties",
                "residuals",
            ],
            title: "Fair Licensing Terms",
            description: "This clause includes reasonable limitations on usage, which is standard and fair for the industry.",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_one_pattern_per_category() {
        let matrix = threat_matrix();
        assert_eq!(matrix.len(), 9);

        let categories: HashSet<_> = matrix.iter().map(|p| p.category).collect();
        assert_eq!(categories.len(), 9);
    }

    #[test]
    fn test_patterns_have_keywords_and_prose() {
        for pattern in threat_matrix() {
            assert!(!pattern.keywords.is_empty(), "{} has no keywords", pattern.title);
            assert!(!pattern.description.is_empty());
            assert!(!pattern.revision_template.is_empty());
        }
        for pattern in green_flag_patterns() {
            assert!(!pattern.keywords.is_empty(), "{} has no keywords", pattern.title);
            assert!(!pattern.description.is_empty());
        }
    }

    #[test]
    fn test_green_flag_table_size() {
        assert!(green_flag_patterns().len() >= 2);
    }

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&ThreatCategory::AssignmentOfRights).unwrap();
        assert_eq!(json, "\"assignment_of_rights\"");

        let parsed: ThreatCategory = serde_json::from_str("\"derivative_works\"").unwrap();
        assert_eq!(parsed, ThreatCategory::DerivativeWorks);

        let json = serde_json::to_string(&ContractCategory::GeneralVo).unwrap();
        assert_eq!(json, "\"general_vo\"");

        let json = serde_json::to_string(&FlagSeverity::Red).unwrap();
        assert_eq!(json, "\"red\"");
    }

    #[test]
    fn test_flag_serializes_camel_case() {
        let flag = ThreatFlag {
            id: "abc123".to_string(),
            category: Some(ThreatCategory::ArbitrationClause),
            severity: FlagSeverity::Yellow,
            title: "Mandatory Arbitration Clause".to_string(),
            clause_text: "...binding arbitration...".to_string(),
            analysis: "strips court rights".to_string(),
            revision_suggestion: None,
        };
        let json = serde_json::to_string(&flag).unwrap();
        assert!(json.contains("\"clauseText\""));
        assert!(json.contains("\"arbitration_clause\""));
        assert!(!json.contains("revisionSuggestion"));
    }
}
