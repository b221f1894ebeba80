use colored::*;

use crate::patterns::{ContractAnalysis, FlagSeverity, ThreatFlag};
use crate::risk::{summarize, RiskSummary};

/// Fixed footer on every exported report.
pub const LEGAL_DISCLAIMER: &str = "LEGAL DISCLAIMER: This is a pattern-based diagnostic tool and not a substitute for legal advice from a qualified attorney.";

pub struct AnalysisReporter {
    format: String,
}

impl AnalysisReporter {
    pub fn new(format: &str) -> Self {
        Self {
            format: format.to_string(),
        }
    }

    /// Render a completed analysis to stdout in the configured format.
    pub fn print_analysis(&self, analysis: &ContractAnalysis) {
        match self.format.as_str() {
            "json" => self.print_json(analysis),
            _ => self.print_text(analysis),
        }
    }

    fn print_json(&self, analysis: &ContractAnalysis) {
        match serde_json::to_string_pretty(analysis) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{} Failed to serialize analysis: {}", "❌".red(), e),
        }
    }

    fn print_text(&self, analysis: &ContractAnalysis) {
        let summary = summarize(&analysis.flags);

        println!(
            "\n{} {}",
            "🎭 CONTRACT ANALYSIS REPORT".bright_blue().bold(),
            analysis.category.title().bright_white().bold()
        );
        println!("{}", "━".repeat(80).bright_blue());

        let red: Vec<&ThreatFlag> = flags_of(analysis, FlagSeverity::Red);
        let yellow: Vec<&ThreatFlag> = flags_of(analysis, FlagSeverity::Yellow);
        let green: Vec<&ThreatFlag> = flags_of(analysis, FlagSeverity::Green);

        if !red.is_empty() {
            self.print_flag_section(
                "🚨 Red Flags - Dangerous Clauses",
                "These clauses are predatory and should be renegotiated or removed before signing.",
                &red,
            );
        }
        if !yellow.is_empty() {
            self.print_flag_section(
                "⚠️  Yellow Flags - Iffy Clauses",
                "These clauses are vague or potentially unfavorable. Consider seeking clarification or revision.",
                &yellow,
            );
        }
        if !green.is_empty() {
            self.print_flag_section(
                "✅ Green Flags - Standard Clauses",
                "These clauses are standard, fair, and typical for the industry.",
                &green,
            );
        }

        if analysis.flags.is_empty() {
            println!(
                "\n{} {}",
                "✅".green(),
                "No known threat patterns detected in this contract.".green()
            );
        }

        self.print_summary(&summary);
    }

    fn print_flag_section(&self, heading: &str, intro: &str, flags: &[&ThreatFlag]) {
        println!("\n{}", heading.bold());
        println!("{}", intro.dimmed());

        for flag in flags {
            println!(
                "\n  {} {}",
                severity_icon(flag.severity),
                flag.title.color(flag.severity.color()).bold()
            );
            println!(
                "     {}: \"{}\"",
                "Clause".bright_magenta().bold(),
                flag.clause_text
            );
            println!("     {}: {}", "Analysis".bright_cyan().bold(), flag.analysis);
            if let Some(revision) = &flag.revision_suggestion {
                println!("     {}: {}", "Revision".bright_green().bold(), revision);
            }
        }
    }

    fn print_summary(&self, summary: &RiskSummary) {
        println!("\n{}", "━".repeat(80).bright_blue());
        println!("{}", "📊 ANALYSIS SUMMARY".bright_blue().bold());

        println!(
            "  🚨 Red flags: {}",
            summary.red_flags.to_string().bright_red().bold()
        );
        println!(
            "  ⚠️  Yellow flags: {}",
            summary.yellow_flags.to_string().bright_yellow().bold()
        );
        println!(
            "  ✅ Green flags: {}",
            summary.green_flags.to_string().bright_green().bold()
        );

        println!(
            "\n  {} {}",
            "Overall Risk:".bold(),
            summary
                .overall_risk
                .label()
                .color(summary.overall_risk.color())
                .bold()
        );

        println!("\n{}", "━".repeat(80).bright_blue());
        println!("{}", LEGAL_DISCLAIMER.dimmed());
    }
}

fn flags_of(analysis: &ContractAnalysis, severity: FlagSeverity) -> Vec<&ThreatFlag> {
    analysis
        .flags
        .iter()
        .filter(|f| f.severity == severity)
        .collect()
}

fn severity_icon(severity: FlagSeverity) -> &'static str {
    match severity {
        FlagSeverity::Red => "🚨",
        FlagSeverity::Yellow => "⚠️ ",
        FlagSeverity::Green => "✅",
    }
}

/// Serialize an analysis into the downloadable plain-text report: header,
/// counts, one section per flag, disclaimer footer. A pure formatting
/// function of already-computed data.
pub fn generate_text_report(analysis: &ContractAnalysis) -> String {
    let summary = summarize(&analysis.flags);

    let mut report = String::new();
    report.push_str("Stagehand - Contract Analysis Report\n");
    report.push_str(&format!(
        "Generated: {}\n",
        analysis.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("Category: {}\n", analysis.category.title()));
    report.push_str(&format!(
        "Overall Risk: {}\n",
        summary.overall_risk.label()
    ));
    report.push('\n');

    report.push_str(&format!("Total Flags: {}\n", analysis.flags.len()));
    report.push_str(&format!("- Red Flags (Dangerous): {}\n", summary.red_flags));
    report.push_str(&format!("- Yellow Flags (Iffy): {}\n", summary.yellow_flags));
    report.push_str(&format!("- Green Flags (Safe): {}\n", summary.green_flags));

    for flag in &analysis.flags {
        report.push_str("\n---\n");
        report.push_str(&format!(
            "{}: {}\n\n",
            flag.severity.as_str().to_uppercase(),
            flag.title
        ));
        report.push_str(&format!("Clause: \"{}\"\n\n", flag.clause_text));
        report.push_str(&format!("Analysis: {}\n", flag.analysis));
        if let Some(revision) = &flag.revision_suggestion {
            report.push_str(&format!("\nSuggested Revision: {}\n", revision));
        }
    }

    report.push_str("\n---\n");
    report.push_str(LEGAL_DISCLAIMER);
    report.push('\n');

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{ContractCategory, ThreatCategory};
    use crate::risk::RiskLevel;
    use chrono::Utc;

    fn sample_analysis() -> ContractAnalysis {
        ContractAnalysis {
            id: "abc".to_string(),
            category: ContractCategory::FilmTv,
            contract_text: "Artist assigns all rights.".to_string(),
            analyzed_at: Utc::now(),
            flags: vec![
                ThreatFlag {
                    id: "f1".to_string(),
                    category: Some(ThreatCategory::AssignmentOfRights),
                    severity: FlagSeverity::Red,
                    title: "Assignment of Rights".to_string(),
                    clause_text: "...assigns all rights...".to_string(),
                    analysis: "Transfers ownership.".to_string(),
                    revision_suggestion: Some("Suggested revision: license instead.".to_string()),
                },
                ThreatFlag {
                    id: "f2".to_string(),
                    category: None,
                    severity: FlagSeverity::Green,
                    title: "Union-Backed Agreement".to_string(),
                    clause_text: "SAG-AFTRA".to_string(),
                    analysis: "Union coverage.".to_string(),
                    revision_suggestion: None,
                },
            ],
            overall_risk_level: RiskLevel::Caution,
        }
    }

    #[test]
    fn test_text_report_structure() {
        let report = generate_text_report(&sample_analysis());

        assert!(report.contains("Category: Film / TV"));
        assert!(report.contains("Overall Risk: Moderate Risk"));
        assert!(report.contains("Total Flags: 2"));
        assert!(report.contains("- Red Flags (Dangerous): 1"));
        assert!(report.contains("- Yellow Flags (Iffy): 0"));
        assert!(report.contains("- Green Flags (Safe): 1"));
        assert!(report.contains("RED: Assignment of Rights"));
        assert!(report.contains("GREEN: Union-Backed Agreement"));
        assert!(report.contains("Suggested Revision:"));
        assert!(report.ends_with(&format!("{}\n", LEGAL_DISCLAIMER)));
    }

    #[test]
    fn test_text_report_omits_missing_revision() {
        let mut analysis = sample_analysis();
        analysis.flags.truncate(1);
        analysis.flags[0].revision_suggestion = None;

        let report = generate_text_report(&analysis);
        assert!(!report.contains("Suggested Revision:"));
    }

    #[test]
    fn test_text_report_is_pure() {
        let analysis = sample_analysis();
        assert_eq!(
            generate_text_report(&analysis),
            generate_text_report(&analysis)
        );
    }
}
