//! Risk aggregation.
//!
//! Flattens a scan result into presentation flags with generated ids and
//! derives the single overall verdict from the red/yellow counts.

use chrono::Utc;
use colored::Color;
use serde::{Deserialize, Serialize};

use crate::patterns::{AnalysisResult, ContractAnalysis, ContractCategory, FlagSeverity, ThreatFlag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Caution,
    Danger,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Caution => "caution",
            RiskLevel::Danger => "danger",
        }
    }

    /// Human-facing label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "Low Risk",
            RiskLevel::Caution => "Moderate Risk",
            RiskLevel::Danger => "High Risk",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            RiskLevel::Safe => Color::Green,
            RiskLevel::Caution => Color::Yellow,
            RiskLevel::Danger => Color::Red,
        }
    }
}

/// Per-severity counts plus the derived verdict, for the summary block of a
/// report.
#[derive(Debug, Clone, Copy)]
pub struct RiskSummary {
    pub overall_risk: RiskLevel,
    pub red_flags: usize,
    pub yellow_flags: usize,
    pub green_flags: usize,
}

/// Derive the overall verdict from the red and yellow counts. Green flags
/// never raise the risk level.
pub fn overall_risk(red_count: usize, yellow_count: usize) -> RiskLevel {
    if red_count >= 3 {
        RiskLevel::Danger
    } else if red_count > 0 || yellow_count >= 3 {
        RiskLevel::Caution
    } else {
        RiskLevel::Safe
    }
}

/// Count severities across the combined flag set and derive the verdict.
pub fn summarize(flags: &[ThreatFlag]) -> RiskSummary {
    let red_flags = flags
        .iter()
        .filter(|f| f.severity == FlagSeverity::Red)
        .count();
    let yellow_flags = flags
        .iter()
        .filter(|f| f.severity == FlagSeverity::Yellow)
        .count();
    let green_flags = flags
        .iter()
        .filter(|f| f.severity == FlagSeverity::Green)
        .count();

    RiskSummary {
        overall_risk: overall_risk(red_flags, yellow_flags),
        red_flags,
        yellow_flags,
        green_flags,
    }
}

/// Flatten a scan result into display flags: threats first (already ordered
/// red before yellow), then green flags, each with a generated unique id.
pub fn into_flags(result: &AnalysisResult, contract_text: &str) -> Vec<ThreatFlag> {
    let mut flags = Vec::with_capacity(result.threats.len() + result.green_flags.len());

    for threat in &result.threats {
        flags.push(ThreatFlag {
            id: flag_id(contract_text, &threat.title, flags.len()),
            category: Some(threat.category),
            severity: threat.severity,
            title: threat.title.clone(),
            clause_text: threat.clause_text.clone(),
            analysis: threat.analysis.clone(),
            revision_suggestion: Some(threat.revision_suggestion.clone()),
        });
    }

    for green in &result.green_flags {
        flags.push(ThreatFlag {
            id: flag_id(contract_text, &green.title, flags.len()),
            category: None,
            severity: FlagSeverity::Green,
            title: green.title.clone(),
            clause_text: green.clause_text.clone(),
            analysis: green.analysis.clone(),
            revision_suggestion: None,
        });
    }

    flags
}

/// Assemble the completed, persistable analysis record.
pub fn build_analysis(
    contract_text: &str,
    category: ContractCategory,
    result: &AnalysisResult,
) -> ContractAnalysis {
    let flags = into_flags(result, contract_text);
    let summary = summarize(&flags);
    let analyzed_at = Utc::now();

    ContractAnalysis {
        id: analysis_id(contract_text, analyzed_at.timestamp_millis()),
        category,
        contract_text: contract_text.to_string(),
        analyzed_at,
        flags,
        overall_risk_level: summary.overall_risk,
    }
}

/// Short unique id for a flag: content hash over the scan text, the flag
/// title, and its position in the flag list.
fn flag_id(contract_text: &str, title: &str, index: usize) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(contract_text.as_bytes());
    hasher.update(title.as_bytes());
    hasher.update(&index.to_le_bytes());
    let mut id = hasher.finalize().to_hex().to_string();
    id.truncate(16);
    id
}

fn analysis_id(contract_text: &str, timestamp_millis: i64) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(contract_text.as_bytes());
    hasher.update(&timestamp_millis.to_le_bytes());
    let mut id = hasher.finalize().to_hex().to_string();
    id.truncate(16);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{DetectedGreenFlag, DetectedThreat, ThreatCategory};

    fn flag(severity: FlagSeverity) -> ThreatFlag {
        ThreatFlag {
            id: "t".to_string(),
            category: None,
            severity,
            title: String::new(),
            clause_text: String::new(),
            analysis: String::new(),
            revision_suggestion: None,
        }
    }

    fn flags(red: usize, yellow: usize, green: usize) -> Vec<ThreatFlag> {
        let mut out = Vec::new();
        out.extend((0..red).map(|_| flag(FlagSeverity::Red)));
        out.extend((0..yellow).map(|_| flag(FlagSeverity::Yellow)));
        out.extend((0..green).map(|_| flag(FlagSeverity::Green)));
        out
    }

    #[test]
    fn test_aggregation_boundaries() {
        // Exactly the boundary cases of the verdict rule.
        assert_eq!(overall_risk(3, 0), RiskLevel::Danger);
        assert_eq!(overall_risk(2, 0), RiskLevel::Caution);
        assert_eq!(overall_risk(1, 0), RiskLevel::Caution);
        assert_eq!(overall_risk(0, 3), RiskLevel::Caution);
        assert_eq!(overall_risk(0, 2), RiskLevel::Safe);
        assert_eq!(overall_risk(0, 0), RiskLevel::Safe);
    }

    #[test]
    fn test_green_flags_never_raise_risk() {
        let summary = summarize(&flags(0, 0, 5));
        assert_eq!(summary.overall_risk, RiskLevel::Safe);
        assert_eq!(summary.green_flags, 5);
    }

    #[test]
    fn test_summarize_counts() {
        let summary = summarize(&flags(3, 1, 2));
        assert_eq!(summary.red_flags, 3);
        assert_eq!(summary.yellow_flags, 1);
        assert_eq!(summary.green_flags, 2);
        assert_eq!(summary.overall_risk, RiskLevel::Danger);
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            threats: vec![DetectedThreat {
                category: ThreatCategory::AssignmentOfRights,
                severity: FlagSeverity::Red,
                title: "Assignment of Rights".to_string(),
                clause_text: "...assigns all rights...".to_string(),
                analysis: "ownership transfer".to_string(),
                revision_suggestion: "Suggested revision: license instead.".to_string(),
            }],
            green_flags: vec![DetectedGreenFlag {
                title: "Union-Backed Agreement".to_string(),
                clause_text: "SAG-AFTRA".to_string(),
                analysis: "union coverage".to_string(),
            }],
        }
    }

    #[test]
    fn test_into_flags_order_and_severity() {
        let flags = into_flags(&sample_result(), "text");
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[0].severity, FlagSeverity::Red);
        assert_eq!(flags[0].category, Some(ThreatCategory::AssignmentOfRights));
        assert!(flags[0].revision_suggestion.is_some());
        assert_eq!(flags[1].severity, FlagSeverity::Green);
        assert_eq!(flags[1].category, None);
        assert!(flags[1].revision_suggestion.is_none());
    }

    #[test]
    fn test_flag_ids_are_unique() {
        let result = sample_result();
        let flags = into_flags(&result, "text");
        assert_ne!(flags[0].id, flags[1].id);

        // Two flags with the same title still get distinct ids.
        let mut doubled = result.clone();
        doubled.green_flags.push(doubled.green_flags[0].clone());
        let flags = into_flags(&doubled, "text");
        assert_ne!(flags[1].id, flags[2].id);
    }

    #[test]
    fn test_build_analysis_carries_verdict() {
        let analysis = build_analysis("text", ContractCategory::GeneralVo, &sample_result());
        assert_eq!(analysis.category, ContractCategory::GeneralVo);
        assert_eq!(analysis.flags.len(), 2);
        // One red flag: caution.
        assert_eq!(analysis.overall_risk_level, RiskLevel::Caution);
        assert!(!analysis.id.is_empty());
    }

    #[test]
    fn test_risk_level_wire_names() {
        assert_eq!(serde_json::to_string(&RiskLevel::Danger).unwrap(), "\"danger\"");
        let parsed: RiskLevel = serde_json::from_str("\"caution\"").unwrap();
        assert_eq!(parsed, RiskLevel::Caution);
    }
}
