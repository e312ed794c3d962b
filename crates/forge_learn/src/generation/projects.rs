use forge_ai::decode_or;
use serde::{Deserialize, Serialize};

use super::StudyAssistant;
use crate::error::{LearnError, require};
use crate::prompts;
use crate::types::Level;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectIdea {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub difficulty: String,
}

/// Starter code offered alongside the project ideas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boilerplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub code: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    /// Display string such as `"1.2k"`; models sometimes send a number.
    #[serde(default, deserialize_with = "stars_as_text")]
    pub stars: String,
}

fn stars_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSuggestions {
    pub projects: Vec<ProjectIdea>,
    pub boilerplate: Boilerplate,
    pub repositories: Vec<Repository>,
}

impl ProjectSuggestions {
    /// One sample of each section, served when the reply is unusable.
    pub fn fallback() -> Self {
        Self {
            projects: vec![ProjectIdea {
                title: "Sample Project".into(),
                description: "Build a small application that puts the concept into practice.".into(),
                difficulty: "Easy".into(),
            }],
            boilerplate: Boilerplate {
                name: "Basic Template".into(),
                description: "Minimal starting point".into(),
                code: "// Start coding here".into(),
                language: "JavaScript".into(),
            },
            repositories: vec![Repository {
                name: "Sample Repo".into(),
                description: "Reference implementation".into(),
                url: "https://github.com".into(),
                stars: "100".into(),
            }],
        }
    }
}

impl StudyAssistant {
    /// Project ideas, starter code and reference repositories for a
    /// learner at `level`.
    pub async fn suggest_projects(
        &self,
        level: Level,
        domain: &str,
        concept: &str,
    ) -> Result<ProjectSuggestions, LearnError> {
        require(domain, "domain")?;
        require(concept, "concept")?;
        let reply = self
            .ask(prompts::project_suggestions(level, domain, concept), Some(0.3), 1024)
            .await?;
        Ok(decode_or(&reply, "project suggestions", ProjectSuggestions::fallback))
    }
}
