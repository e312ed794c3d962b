use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::StudyAssistant;
use crate::error::{LearnError, require};
use crate::prompts;

static SUMMARY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)Summary:(.*)$").expect("summary regex"));
static KEYWORDS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)Keywords:(.*)$").expect("keywords regex"));

/// Summary and keywords extracted for a submitted concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptAnalysis {
    pub summary: String,
    pub keywords: Vec<String>,
    /// Unparsed reply, kept for display when the labels are missing.
    pub raw: String,
}

impl ConceptAnalysis {
    /// Pull the `Summary:` and `Keywords:` lines out of a reply. Missing
    /// lines yield an empty summary or keyword list.
    pub fn parse(reply: &str) -> Self {
        let summary = SUMMARY_LINE
            .captures(reply)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        let keywords = KEYWORDS_LINE
            .captures(reply)
            .and_then(|c| c.get(1))
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            summary,
            keywords,
            raw: reply.to_string(),
        }
    }
}

impl StudyAssistant {
    /// Summarize a concept (optionally with a lecture transcript) and list
    /// keywords for quiz generation.
    pub async fn analyze_concept(
        &self,
        concept: &str,
        transcript: Option<&str>,
        domains: &[String],
    ) -> Result<ConceptAnalysis, LearnError> {
        require(concept, "concept")?;
        if domains.iter().all(|d| d.trim().is_empty()) {
            return Err(LearnError::InvalidInput(
                "at least one domain is required".into(),
            ));
        }
        let reply = self
            .ask(prompts::concept_analysis(concept, transcript, domains), Some(0.5), 512)
            .await?;
        Ok(ConceptAnalysis::parse(&reply))
    }
}
