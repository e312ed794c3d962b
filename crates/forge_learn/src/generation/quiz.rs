use forge_ai::decode_with;
use tracing::{info, warn};

use super::StudyAssistant;
use crate::error::{LearnError, require};
use crate::prompts;
use crate::types::{Difficulty, McqItem, Quiz};

/// Number of multiple-choice questions a generated quiz must carry.
pub const GENERATED_MCQ_COUNT: usize = 7;

/// Difficulty mix of a generated quiz, with the correct letter used by the
/// fallback questions of each tier.
const TIERS: [(Difficulty, usize, &str); 3] = [
    (Difficulty::Easy, 2, "A"),
    (Difficulty::Medium, 3, "B"),
    (Difficulty::Hard, 2, "C"),
];

fn tier_name(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
    }
}

/// Placeholder quiz used when the model reply cannot be decoded.
pub fn fallback_quiz(concept: &str) -> Quiz {
    let multiple_choice = TIERS
        .iter()
        .flat_map(|&(difficulty, count, correct)| {
            let tier = tier_name(difficulty);
            (1..=count).map(move |n| McqItem {
                id: format!("mcq_{tier}_{n}"),
                question: format!("Sample {tier} question {n} on {concept}?"),
                options: ["A", "B", "C", "D"].iter().map(|o| o.to_string()).collect(),
                correct_option: correct.to_string(),
                difficulty: Some(difficulty),
                explanation: Some(format!("Explanation for {tier} question {n}.")),
            })
        })
        .collect();
    Quiz {
        multiple_choice,
        ..Default::default()
    }
}

fn check_generated(quiz: &Quiz) -> Result<(), String> {
    let count = quiz.multiple_choice.len();
    if count != GENERATED_MCQ_COUNT {
        return Err(format!(
            "expected {GENERATED_MCQ_COUNT} multiple-choice questions, got {count}"
        ));
    }
    Ok(())
}

impl StudyAssistant {
    /// Generate a seven-question multiple-choice quiz for a concept.
    pub async fn generate_quiz(
        &self,
        concept: &str,
        domains: &[String],
        summary: &str,
    ) -> Result<Quiz, LearnError> {
        require(concept, "concept")?;
        require(summary, "summary")?;
        if domains.iter().all(|d| d.trim().is_empty()) {
            return Err(LearnError::InvalidInput(
                "at least one domain is required".into(),
            ));
        }

        let reply = self
            .ask(prompts::quiz_generation(concept, domains, summary), Some(0.3), 1024)
            .await?;
        match decode_with(&reply, check_generated) {
            Ok(quiz) => {
                info!(concept, questions = GENERATED_MCQ_COUNT, "Generated quiz");
                Ok(quiz)
            }
            Err(e) => {
                warn!(concept, error = %e, "Quiz reply unusable, serving placeholder quiz");
                Ok(fallback_quiz(concept))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingProvider, ScriptedProvider};
    use std::sync::Arc;

    fn domains() -> Vec<String> {
        vec!["Software".into()]
    }

    fn generated_reply(count: usize) -> String {
        let items: Vec<String> = (1..=count)
            .map(|n| {
                format!(
                    r#"{{"id":"mcq{n}","difficulty":"medium","question":"Q{n}?","options":["w","x","y","z"],"correct":"B","explanation":"because"}}"#
                )
            })
            .collect();
        format!("```json\n{{\"mcqs\": [{}]}}\n```", items.join(","))
    }

    #[test]
    fn fallback_has_tiered_ids_and_answers() {
        let quiz = fallback_quiz("Recursion");
        let ids: Vec<&str> = quiz.question_ids().collect();

        assert_eq!(
            ids,
            vec![
                "mcq_easy_1",
                "mcq_easy_2",
                "mcq_medium_1",
                "mcq_medium_2",
                "mcq_medium_3",
                "mcq_hard_1",
                "mcq_hard_2",
            ]
        );
        assert_eq!(quiz.multiple_choice[0].correct_option, "A");
        assert_eq!(quiz.multiple_choice[2].correct_option, "B");
        assert_eq!(quiz.multiple_choice[6].correct_option, "C");
        assert_eq!(quiz.multiple_choice[6].difficulty, Some(Difficulty::Hard));
        assert!(quiz.multiple_choice[0].question.contains("Recursion"));
        assert!(quiz.fill_in_blank.is_none());
    }

    #[tokio::test]
    async fn decodes_seven_question_reply() {
        let provider = Arc::new(ScriptedProvider::new(generated_reply(7)));
        let assistant = StudyAssistant::new(provider.clone(), "m");
        let quiz = assistant
            .generate_quiz("Recursion", &domains(), "Self-reference")
            .await
            .unwrap();

        assert_eq!(quiz.multiple_choice.len(), 7);
        assert_eq!(quiz.multiple_choice[0].id, "mcq1");
        assert_eq!(quiz.multiple_choice[0].correct_option, "B");
        assert_eq!(quiz.multiple_choice[0].difficulty, Some(Difficulty::Medium));

        let request = provider.last_request().unwrap();
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, 1024);
    }

    #[tokio::test]
    async fn capitalized_difficulty_keeps_generated_quiz() {
        let reply = generated_reply(7).replace(r#""difficulty":"medium""#, r#""difficulty":"Easy""#);
        let assistant = StudyAssistant::new(Arc::new(ScriptedProvider::new(reply)), "m");
        let quiz = assistant
            .generate_quiz("Recursion", &domains(), "Self-reference")
            .await
            .unwrap();

        assert_eq!(quiz.multiple_choice[0].id, "mcq1");
        assert_eq!(quiz.multiple_choice[0].difficulty, Some(Difficulty::Easy));
    }

    #[tokio::test]
    async fn wrong_question_count_serves_fallback() {
        let assistant = StudyAssistant::new(Arc::new(ScriptedProvider::new(generated_reply(5))), "m");
        let quiz = assistant
            .generate_quiz("Recursion", &domains(), "Self-reference")
            .await
            .unwrap();
        assert_eq!(quiz, fallback_quiz("Recursion"));
    }

    #[tokio::test]
    async fn prose_reply_serves_fallback() {
        let assistant = StudyAssistant::new(
            Arc::new(ScriptedProvider::new("Sorry, I can't produce a quiz right now.")),
            "m",
        );
        let quiz = assistant
            .generate_quiz("Closures", &domains(), "Captured scope")
            .await
            .unwrap();
        assert_eq!(quiz.multiple_choice[0].id, "mcq_easy_1");
    }

    #[tokio::test]
    async fn provider_failure_is_an_error() {
        let assistant = StudyAssistant::new(Arc::new(FailingProvider), "m");
        let err = assistant
            .generate_quiz("Recursion", &domains(), "Self-reference")
            .await
            .unwrap_err();
        assert!(matches!(err, LearnError::Provider(_)));
    }

    #[tokio::test]
    async fn blank_summary_is_rejected() {
        let provider = Arc::new(ScriptedProvider::new(generated_reply(7)));
        let assistant = StudyAssistant::new(provider.clone(), "m");
        let err = assistant
            .generate_quiz("Recursion", &domains(), " ")
            .await
            .unwrap_err();
        assert!(matches!(err, LearnError::InvalidInput(_)));
        assert_eq!(provider.calls(), 0);
    }
}
