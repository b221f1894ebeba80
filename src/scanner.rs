use std::collections::HashSet;

use regex::Regex;

use crate::patterns::{
    green_flag_patterns, threat_matrix, AnalysisResult, ContractCategory, DetectedGreenFlag,
    DetectedThreat, FlagSeverity, GreenFlagPattern, ThreatCategory, ThreatPattern,
};
use crate::severity;

/// Bytes of surrounding text captured on each side of a keyword match.
const CONTEXT_RADIUS: usize = 150;

/// Appended to the analysis of derivative-works / future-technologies flags
/// on voice and screen contracts.
const AI_CLONING_CAUTION: &str = " ⚠️ CRITICAL FOR VOICE/PERFORMANCE WORK: This language could enable AI voice cloning, deepfakes, or synthetic recreation of your performance without your consent or additional compensation.";

/// A catalog pattern with its keywords compiled to case-insensitive,
/// word-boundary-anchored regexes. Compiled once at scanner construction.
struct ThreatRule {
    pattern: ThreatPattern,
    keywords: Vec<(&'static str, Regex)>,
}

struct GreenRule {
    pattern: GreenFlagPattern,
    keywords: Vec<(&'static str, Regex)>,
}

/// Scans contract text against the pattern catalog and produces the ordered
/// flag set. Pure and synchronous; the catalog is read-only after
/// construction, so one scanner can serve concurrent scans.
pub struct ClauseScanner {
    threat_rules: Vec<ThreatRule>,
    green_rules: Vec<GreenRule>,
    verbose: bool,
}

/// Compile a keyword into a word-boundary-anchored, case-insensitive regex.
/// Every metacharacter is escaped first, so compilation cannot fail for any
/// literal keyword or phrase.
fn keyword_regex(keyword: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}", regex::escape(keyword))).unwrap()
}

impl ClauseScanner {
    pub fn new(verbose: bool) -> Self {
        Self::with_catalog(threat_matrix(), green_flag_patterns(), verbose)
    }

    /// Build a scanner over an explicit catalog. Tests use this to scan with
    /// reduced or synthetic pattern tables.
    pub fn with_catalog(
        threat_patterns: Vec<ThreatPattern>,
        green_patterns: Vec<GreenFlagPattern>,
        verbose: bool,
    ) -> Self {
        let threat_rules = threat_patterns
            .into_iter()
            .map(|pattern| ThreatRule {
                keywords: pattern
                    .keywords
                    .iter()
                    .map(|kw| (*kw, keyword_regex(kw)))
                    .collect(),
                pattern,
            })
            .collect();

        let green_rules = green_patterns
            .into_iter()
            .map(|pattern| GreenRule {
                keywords: pattern
                    .keywords
                    .iter()
                    .map(|kw| (*kw, keyword_regex(kw)))
                    .collect(),
                pattern,
            })
            .collect();

        Self {
            threat_rules,
            green_rules,
            verbose,
        }
    }

    /// Scan contract text under the given category.
    ///
    /// Emits at most one threat per category (first pattern in catalog order
    /// wins), every green flag with at least one keyword hit, and orders the
    /// threat list with all red entries before all yellow entries. Never
    /// fails; empty input yields an empty result.
    pub fn scan(&self, contract_text: &str, category: ContractCategory) -> AnalysisResult {
        if self.verbose {
            println!(
                "🔍 Scanning {} characters against {} threat patterns",
                contract_text.chars().count(),
                self.threat_rules.len()
            );
        }

        let mut threats = Vec::new();
        let mut green_flags = Vec::new();
        let mut detected_categories: HashSet<ThreatCategory> = HashSet::new();

        for rule in &self.threat_rules {
            let (matched, first_span) = match_keywords(&rule.keywords, contract_text);

            if matched.is_empty() || detected_categories.contains(&rule.pattern.category) {
                continue;
            }
            detected_categories.insert(rule.pattern.category);

            let clause_text = match first_span {
                Some((start, len)) => extract_clause_context(contract_text, start, len),
                None => format!(
                    "Contract contains language related to: {}",
                    join_keywords(&matched, 3)
                ),
            };

            let severity = severity::classify(&rule.pattern, contract_text, category, &matched);

            let mut analysis = rule.pattern.description.to_string();
            if matched.len() >= 2 {
                analysis.push_str(&format!(
                    " Detected multiple concerning terms: {}.",
                    join_keywords(&matched, 3)
                ));
            }
            if voice_or_screen(category)
                && matches!(
                    rule.pattern.category,
                    ThreatCategory::DerivativeWorks | ThreatCategory::FutureTechnologiesClause
                )
            {
                analysis.push_str(AI_CLONING_CAUTION);
            }

            if self.verbose {
                println!(
                    "  {} {} ({} keyword{})",
                    severity_icon(severity),
                    rule.pattern.title,
                    matched.len(),
                    if matched.len() == 1 { "" } else { "s" }
                );
            }

            threats.push(DetectedThreat {
                category: rule.pattern.category,
                severity,
                title: rule.pattern.title.to_string(),
                clause_text,
                analysis,
                revision_suggestion: rule.pattern.revision_template.to_string(),
            });
        }

        for rule in &self.green_rules {
            let (matched, first_span) = match_keywords(&rule.keywords, contract_text);

            if matched.is_empty() {
                continue;
            }

            let clause_text = match first_span {
                Some((start, len)) => extract_clause_context(contract_text, start, len),
                None => format!("Contract contains: {}", matched.join(", ")),
            };

            if self.verbose {
                println!("  ✅ {}", rule.pattern.title);
            }

            green_flags.push(DetectedGreenFlag {
                title: rule.pattern.title.to_string(),
                clause_text,
                analysis: rule.pattern.description.to_string(),
            });
        }

        // Stable sort: catalog order is preserved within each severity group.
        threats.sort_by_key(|t| match t.severity {
            FlagSeverity::Red => 0,
            _ => 1,
        });

        AnalysisResult {
            threats,
            green_flags,
        }
    }
}

/// Run a rule's keywords over the text. Returns every keyword with at least
/// one hit, plus the span of the first occurrence of the first keyword (in
/// list order) that matched.
fn match_keywords<'a>(
    keywords: &[(&'a str, Regex)],
    text: &str,
) -> (Vec<&'a str>, Option<(usize, usize)>) {
    let mut matched = Vec::new();
    let mut first_span = None;

    for (keyword, regex) in keywords {
        if let Some(m) = regex.find(text) {
            matched.push(*keyword);
            if first_span.is_none() {
                first_span = Some((m.start(), m.len()));
            }
        }
    }

    (matched, first_span)
}

fn join_keywords(matched: &[&str], limit: usize) -> String {
    matched
        .iter()
        .take(limit)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn voice_or_screen(category: ContractCategory) -> bool {
    matches!(
        category,
        ContractCategory::GeneralVo | ContractCategory::FilmTv
    )
}

fn severity_icon(severity: FlagSeverity) -> &'static str {
    match severity {
        FlagSeverity::Red => "🚨",
        FlagSeverity::Yellow => "⚠️ ",
        FlagSeverity::Green => "✅",
    }
}

/// Slice a window of text around a keyword match for display as evidence.
///
/// Takes up to [`CONTEXT_RADIUS`] bytes on each side of the match span,
/// clamped to the text bounds and snapped outward to UTF-8 character
/// boundaries (match offsets are byte positions). The window is trimmed and
/// an ellipsis marker is added on each side that was clamped.
pub fn extract_clause_context(text: &str, match_start: usize, match_len: usize) -> String {
    let mut start = match_start.saturating_sub(CONTEXT_RADIUS);
    let mut end = (match_start + match_len + CONTEXT_RADIUS).min(text.len());

    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }

    let clause = text[start..end].trim();

    let mut out = String::with_capacity(clause.len() + 6);
    if start > 0 {
        out.push_str("...");
    }
    out.push_str(clause);
    if end < text.len() {
        out.push_str("...");
    }
    out
}
