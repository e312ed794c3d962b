//! Model-backed study content: concept analysis, quiz generation, project
//! suggestions, hints, solution walkthroughs and free-form mentoring.
//!
//! Each operation sends one prompt and decodes the reply. A reply that
//! cannot be decoded is replaced by a static fallback; a provider failure is
//! returned to the caller.

pub mod analysis;
pub mod hints;
pub mod projects;
pub mod quiz;
pub mod solution;

use std::sync::Arc;

use forge_ai::{AiProvider, ChatRequest};
use tracing::debug;

use crate::error::{LearnError, require};
use crate::prompts;

pub use analysis::ConceptAnalysis;
pub use hints::Hint;
pub use projects::{Boilerplate, ProjectIdea, ProjectSuggestions, Repository};
pub use solution::{Solution, SolutionStep};

/// Front door for the content-generation operations.
pub struct StudyAssistant {
    provider: Arc<dyn AiProvider>,
    model: String,
}

impl StudyAssistant {
    pub fn new(provider: Arc<dyn AiProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Send one prompt and return the raw reply text.
    async fn ask(
        &self,
        prompt: String,
        temperature: Option<f32>,
        max_tokens: u32,
    ) -> Result<String, LearnError> {
        let mut request = ChatRequest::prompt(self.model.clone(), prompt).with_max_tokens(max_tokens);
        request.temperature = temperature;
        let response = self.provider.chat(&request).await?;
        debug!(
            provider = self.provider.name(),
            completion_tokens = response.usage.completion_tokens,
            "Received generation reply"
        );
        Ok(response.content)
    }

    /// Markdown guidance for a student stuck on a project.
    pub async fn mentor_help(&self, question: &str) -> Result<String, LearnError> {
        require(question, "question")?;
        self.ask(prompts::mentor_help(question), None, 2048).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingProvider, ScriptedProvider};

    #[tokio::test]
    async fn mentor_help_returns_reply_verbatim() {
        let provider = Arc::new(ScriptedProvider::new("## Step 1\nCheck your loop bound."));
        let assistant = StudyAssistant::new(provider.clone(), "gemini-2.0-flash");
        let reply = assistant.mentor_help("my loop never ends").await.unwrap();

        assert_eq!(reply, "## Step 1\nCheck your loop bound.");
        let request = provider.last_request().unwrap();
        assert!(request.temperature.is_none());
        assert_eq!(request.model, "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn mentor_help_requires_question() {
        let assistant = StudyAssistant::new(Arc::new(ScriptedProvider::new("x")), "m");
        let err = assistant.mentor_help("  ").await.unwrap_err();
        assert!(matches!(err, LearnError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn mentor_help_propagates_provider_error() {
        let assistant = StudyAssistant::new(Arc::new(FailingProvider), "m");
        let err = assistant.mentor_help("why?").await.unwrap_err();
        assert!(matches!(err, LearnError::Provider(_)));
    }
}
