//! Cloud AI analyzer integration.
//!
//! Optional second opinion from a generative-AI text endpoint. The remote
//! path is advisory only: any failure (missing key, network, bad status,
//! malformed response) degrades to an empty result instead of propagating.
//! Callers must obtain explicit user consent before invoking this module,
//! since the contract text leaves the machine.

use colored::*;
use serde::Deserialize;
use thiserror::Error;

use crate::patterns::{
    threat_matrix, AnalysisResult, ContractCategory, DetectedGreenFlag, DetectedThreat,
    FlagSeverity, ThreatCategory,
};

/// Environment variable naming the endpoint base URL.
pub const ENV_BASE_URL: &str = "STAGEHAND_AI_BASE_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "STAGEHAND_AI_API_KEY";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analyzer returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("malformed analyzer response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("analyzer response carried no text")]
    EmptyResponse,
}

/// Wire shape of the analyzer's structured answer. Field names follow the
/// endpoint's JSON contract, not ours.
#[derive(Debug, Default, Deserialize)]
pub struct AiAnalysisResponse {
    #[serde(default)]
    pub threats: Vec<AiThreat>,
    #[serde(default, rename = "greenFlags")]
    pub green_flags: Vec<AiGreenFlag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiThreat {
    pub category: ThreatCategory,
    pub severity: FlagSeverity,
    pub title: String,
    pub clause_text: String,
    pub analysis: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiGreenFlag {
    pub title: String,
    pub clause_text: String,
    pub analysis: String,
}

/// Envelope of the generation endpoint: the generated text is itself a JSON
/// document with the threat/green-flag shape.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: Option<String>,
}

pub struct AiAnalyzer {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl AiAnalyzer {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Build an analyzer from the environment, or `None` when it is not
    /// configured.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var(ENV_BASE_URL).ok()?;
        let api_key = std::env::var(ENV_API_KEY).ok()?;
        Some(Self::new(base_url, api_key))
    }

    /// Ask the remote analyzer for a second opinion. Never fails: any error
    /// is reported as a warning and an empty result is returned.
    pub fn analyze(&self, contract_text: &str, category: ContractCategory) -> AnalysisResult {
        match self.request(contract_text, category) {
            Ok(response) => convert_response(response),
            Err(e) => {
                eprintln!(
                    "{} AI analysis unavailable ({}); continuing with pattern results only",
                    "⚠️ ".yellow(),
                    e
                );
                AnalysisResult::default()
            }
        }
    }

    fn request(
        &self,
        contract_text: &str,
        category: ContractCategory,
    ) -> Result<AiAnalysisResponse, AiError> {
        let prompt = build_prompt(contract_text, category);
        let body = serde_json::json!({
            "prompt": prompt,
            "responseMimeType": "application/json",
        });

        let resp = self
            .client
            .post(format!("{}/v1/generate", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AiError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateResponse = resp.json()?;
        let text = envelope.text.ok_or(AiError::EmptyResponse)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Convert the analyzer's answer into the pattern engine's result shape.
/// Remote threats carry no redraft text, so the catalog template for the
/// claimed category is substituted.
pub fn convert_response(response: AiAnalysisResponse) -> AnalysisResult {
    let matrix = threat_matrix();
    let template_for = |category: ThreatCategory| {
        matrix
            .iter()
            .find(|p| p.category == category)
            .map(|p| p.revision_template.to_string())
            .unwrap_or_default()
    };

    AnalysisResult {
        threats: response
            .threats
            .into_iter()
            .map(|t| DetectedThreat {
                revision_suggestion: template_for(t.category),
                category: t.category,
                severity: t.severity,
                title: t.title,
                clause_text: t.clause_text,
                analysis: t.analysis,
            })
            .collect(),
        green_flags: response
            .green_flags
            .into_iter()
            .map(|g| DetectedGreenFlag {
                title: g.title,
                clause_text: g.clause_text,
                analysis: g.analysis,
            })
            .collect(),
    }
}

/// Structured prompt requesting the same nine-category taxonomy the pattern
/// engine uses, as a JSON object.
pub fn build_prompt(contract_text: &str, category: ContractCategory) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a contract analysis expert specializing in work-for-hire agreements \
         for performing artists (actors, voice actors, writers, designers). Analyze the \
         following contract and identify any concerning clauses.\n\n",
    );
    prompt.push_str(&format!("Contract Category: {}\n\n", category.as_str()));

    prompt.push_str("Focus on these threat categories:\n");
    for (i, pattern) in threat_matrix().iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} ({}) - example keywords: {}\n",
            i + 1,
            pattern.title,
            pattern.category.as_str(),
            pattern
                .keywords
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    if matches!(
        category,
        ContractCategory::GeneralVo | ContractCategory::FilmTv
    ) {
        prompt.push_str(
            "\nIMPORTANT: This is a voice/screen contract. Pay extra attention to clauses \
             enabling AI training, synthetic voice generation, future media formats, \
             perpetual licenses, and sublicensable rights that could spread to AI companies.\n",
        );
    }

    prompt.push_str(
        "\nAlso identify GREEN FLAGS (positive clauses): union-backed agreements \
         (SAG-AFTRA, Equity, WGA, DGA) and fair licensing terms (limited license, \
         specific use, defined term, royalties, residuals).\n",
    );

    prompt.push_str("\nContract Text:\n");
    prompt.push_str(contract_text);

    prompt.push_str(
        "\n\nRespond with a JSON object: {\"threats\": [{\"category\": \"<one of the \
         snake_case categories above>\", \"severity\": \"red\"|\"yellow\", \"title\": \
         \"...\", \"clauseText\": \"exact clause from contract\", \"analysis\": \"plain \
         English explanation\"}], \"greenFlags\": [{\"title\": \"...\", \"clauseText\": \
         \"...\", \"analysis\": \"...\"}]}",
    );

    prompt
}
