//! Answer evaluation: deterministic scoring plus an optional advisory
//! level check by the text-generation provider.

use std::sync::Arc;
use std::time::Duration;

use forge_ai::{AiProvider, ChatRequest};
use tracing::{debug, info, warn};

use crate::error::LearnError;
use crate::prompts;
use crate::scoring::{self, Score};
use crate::types::{AnswerSet, Level, LevelSource, Quiz, ScoreResult};

/// Sampling settings for the refinement request.
const REFINEMENT_TEMPERATURE: f32 = 0.2;
const REFINEMENT_MAX_TOKENS: u32 = 50;

/// Tuning for [`AnswerEvaluator`].
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Model id sent with the refinement request.
    pub model: String,
    /// Upper bound on the refinement call.
    pub timeout: Duration,
    /// Set to `false` to skip the provider call entirely.
    pub refine: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".into(),
            timeout: Duration::from_secs(5),
            refine: true,
        }
    }
}

/// Scores quiz answers and assigns a [`Level`].
///
/// The provider call is a single best-effort attempt bounded by
/// `config.timeout`. Its failure, timeout, or an unrecognizable reply
/// leaves the bucketed level in place; only an invalid quiz is an error.
pub struct AnswerEvaluator {
    provider: Option<Arc<dyn AiProvider>>,
    config: EvaluatorConfig,
}

impl AnswerEvaluator {
    pub fn new(provider: Option<Arc<dyn AiProvider>>, config: EvaluatorConfig) -> Self {
        Self { provider, config }
    }

    /// An evaluator that never contacts a provider.
    pub fn offline() -> Self {
        Self::new(
            None,
            EvaluatorConfig {
                refine: false,
                ..Default::default()
            },
        )
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Score `answers` against `quiz` and settle on a level.
    pub async fn evaluate(
        &self,
        quiz: &Quiz,
        answers: &AnswerSet,
    ) -> Result<ScoreResult, LearnError> {
        let score = scoring::score(quiz, answers)?;
        let bucketed = score.level();
        info!(
            earned = score.points_earned,
            possible = score.points_possible,
            percentage = format_args!("{:.1}", score.percentage()),
            level = %bucketed,
            "Scored quiz answers"
        );

        let (level, level_source) = match self.refine(quiz, answers, &score, bucketed).await {
            Some(refined) => (refined, LevelSource::Refined),
            None => (bucketed, LevelSource::Deterministic),
        };

        Ok(ScoreResult {
            points_earned: score.points_earned,
            points_possible: score.points_possible,
            percentage: score.percentage(),
            level,
            level_source,
        })
    }

    /// [`evaluate`](Self::evaluate), keeping only the final level.
    pub async fn evaluate_level(
        &self,
        quiz: &Quiz,
        answers: &AnswerSet,
    ) -> Result<Level, LearnError> {
        Ok(self.evaluate(quiz, answers).await?.level)
    }

    /// Ask the provider for its opinion. `None` keeps the bucketed level.
    async fn refine(
        &self,
        quiz: &Quiz,
        answers: &AnswerSet,
        score: &Score,
        bucketed: Level,
    ) -> Option<Level> {
        if !self.config.refine {
            return None;
        }
        let provider = self.provider.as_ref()?;

        let request = ChatRequest::prompt(
            self.config.model.clone(),
            prompts::level_refinement(quiz, answers, score, bucketed),
        )
        .with_temperature(REFINEMENT_TEMPERATURE)
        .with_max_tokens(REFINEMENT_MAX_TOKENS);

        match tokio::time::timeout(self.config.timeout, provider.chat(&request)).await {
            Ok(Ok(response)) => match Level::find_in(&response.content) {
                Some(level) => {
                    if level != bucketed {
                        info!(from = %bucketed, to = %level, "Provider adjusted level");
                    }
                    Some(level)
                }
                None => {
                    debug!(reply = %response.content, "No level label in provider reply");
                    None
                }
            },
            Ok(Err(e)) => {
                warn!(provider = provider.name(), error = %e, "Level refinement failed");
                None
            }
            Err(_) => {
                warn!(
                    provider = provider.name(),
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "Level refinement timed out"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingProvider, ScriptedProvider, SlowProvider, mcq};
    use crate::types::FillBlankItem;

    fn evaluator(provider: Arc<dyn AiProvider>) -> AnswerEvaluator {
        AnswerEvaluator::new(
            Some(provider),
            EvaluatorConfig {
                timeout: Duration::from_millis(200),
                ..Default::default()
            },
        )
    }

    fn one_mcq_quiz() -> Quiz {
        Quiz {
            multiple_choice: vec![mcq("q1", "B")],
            ..Default::default()
        }
    }

    fn recursion_quiz() -> Quiz {
        Quiz {
            multiple_choice: vec![mcq("m1", "A"), mcq("m2", "C")],
            fill_in_blank: Some(vec![FillBlankItem {
                id: "fb1".into(),
                question: "A function calling itself is ____".into(),
                correct_text: "recursion".into(),
            }]),
            real_world_question: None,
        }
    }

    #[tokio::test]
    async fn single_correct_mcq_is_advanced() {
        let answers: AnswerSet = [("q1", "B")].into_iter().collect();
        let result = AnswerEvaluator::offline()
            .evaluate(&one_mcq_quiz(), &answers)
            .await
            .unwrap();

        assert_eq!(result.points_earned, 2);
        assert_eq!(result.points_possible, 2);
        assert!((result.percentage - 100.0).abs() < f64::EPSILON);
        assert_eq!(result.level, Level::Advanced);
        assert_eq!(result.level_source, LevelSource::Deterministic);
    }

    #[tokio::test]
    async fn normalized_fill_blank_scores_beginner() {
        let answers: AnswerSet = [("m1", "B"), ("m2", "D"), ("fb1", "Recursion ")]
            .into_iter()
            .collect();
        let result = AnswerEvaluator::offline()
            .evaluate(&recursion_quiz(), &answers)
            .await
            .unwrap();

        assert_eq!(result.points_earned, 2);
        assert_eq!(result.points_possible, 6);
        assert_eq!(format!("{:.1}", result.percentage), "33.3");
        assert_eq!(result.level, Level::Beginner);
    }

    #[tokio::test]
    async fn provider_label_overrides_bucketed_level() {
        let provider = Arc::new(ScriptedProvider::new("After review: intermediate."));
        let answers: AnswerSet = [("q1", "B")].into_iter().collect();
        let result = evaluator(provider.clone())
            .evaluate(&one_mcq_quiz(), &answers)
            .await
            .unwrap();

        assert_eq!(result.level, Level::Intermediate);
        assert_eq!(result.level_source, LevelSource::Refined);
        // Score fields are never touched by refinement.
        assert_eq!(result.points_earned, 2);

        let request = provider.last_request().unwrap();
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, 50);
        assert!(request.user_text().contains("Score: 2/2 (100.0%)"));
        assert!(request.user_text().contains("Current Level Assessment: Advanced"));
    }

    #[tokio::test]
    async fn provider_confirming_level_is_still_refined() {
        let provider = Arc::new(ScriptedProvider::new("Advanced"));
        let answers: AnswerSet = [("q1", "B")].into_iter().collect();
        let result = evaluator(provider)
            .evaluate(&one_mcq_quiz(), &answers)
            .await
            .unwrap();
        assert_eq!(result.level, Level::Advanced);
        assert_eq!(result.level_source, LevelSource::Refined);
    }

    #[tokio::test]
    async fn unrecognized_reply_keeps_bucketed_level() {
        let provider = Arc::new(ScriptedProvider::new("Expert!"));
        let answers: AnswerSet = [("q1", "A")].into_iter().collect();
        let result = evaluator(provider)
            .evaluate(&one_mcq_quiz(), &answers)
            .await
            .unwrap();
        assert_eq!(result.level, Level::Beginner);
        assert_eq!(result.level_source, LevelSource::Deterministic);
    }

    #[tokio::test]
    async fn network_error_is_swallowed() {
        let answers: AnswerSet = [("q1", "B")].into_iter().collect();
        let result = evaluator(Arc::new(FailingProvider))
            .evaluate(&one_mcq_quiz(), &answers)
            .await
            .unwrap();
        assert_eq!(result.level, Level::Advanced);
        assert_eq!(result.level_source, LevelSource::Deterministic);
    }

    #[tokio::test]
    async fn slow_provider_times_out_to_bucketed_level() {
        let provider = Arc::new(SlowProvider::new(Duration::from_secs(10), "Beginner"));
        let answers: AnswerSet = [("q1", "B")].into_iter().collect();
        let started = std::time::Instant::now();
        let result = evaluator(provider)
            .evaluate(&one_mcq_quiz(), &answers)
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(result.level, Level::Advanced);
        assert_eq!(result.level_source, LevelSource::Deterministic);
    }

    #[tokio::test]
    async fn empty_quiz_fails_before_calling_provider() {
        let provider = Arc::new(ScriptedProvider::new("Advanced"));
        let err = evaluator(provider.clone())
            .evaluate(&Quiz::default(), &AnswerSet::new())
            .await
            .unwrap_err();

        assert!(matches!(err, LearnError::InvalidQuiz(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn refinement_disabled_skips_provider() {
        let provider = Arc::new(ScriptedProvider::new("Beginner"));
        let evaluator = AnswerEvaluator::new(
            Some(provider.clone()),
            EvaluatorConfig {
                refine: false,
                ..Default::default()
            },
        );
        let answers: AnswerSet = [("q1", "B")].into_iter().collect();
        let level = evaluator
            .evaluate_level(&one_mcq_quiz(), &answers)
            .await
            .unwrap();

        assert_eq!(level, Level::Advanced);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn evaluation_is_idempotent() {
        let provider = Arc::new(ScriptedProvider::new("Intermediate"));
        let evaluator = evaluator(provider);
        let quiz = recursion_quiz();
        let answers: AnswerSet = [("m1", "A"), ("fb1", "recursion")].into_iter().collect();

        let first = evaluator.evaluate(&quiz, &answers).await.unwrap();
        let second = evaluator.evaluate(&quiz, &answers).await.unwrap();
        assert_eq!(first, second);
    }
}
