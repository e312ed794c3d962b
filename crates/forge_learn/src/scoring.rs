//! Deterministic quiz scoring and level bucketing.

use tracing::warn;

use crate::error::LearnError;
use crate::fuzzy::fuzzy_match;
use crate::types::{AnswerSet, Level, Quiz};

/// Points for a multiple-choice question.
pub const MCQ_POINTS: u32 = 2;
/// Points for each fill-in-blank question.
pub const FILL_BLANK_POINTS: u32 = 2;
/// Points for the real-world question.
pub const REAL_WORLD_POINTS: u32 = 1;

/// Totals for one quiz + answer set, before any refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub points_earned: u32,
    pub points_possible: u32,
}

impl Score {
    pub fn percentage(&self) -> f64 {
        f64::from(self.points_earned) / f64::from(self.points_possible) * 100.0
    }

    pub fn level(&self) -> Level {
        Level::from_percentage(self.percentage())
    }

    fn add(&mut self, weight: u32, credited: bool) {
        self.points_possible += weight;
        if credited {
            self.points_earned += weight;
        }
    }
}

/// Reject quizzes that cannot be scored.
pub fn validate(quiz: &Quiz) -> Result<(), LearnError> {
    if quiz.multiple_choice.is_empty() {
        return Err(LearnError::InvalidQuiz(
            "quiz has no multiple-choice questions".into(),
        ));
    }
    let dupes = quiz.duplicate_ids();
    if !dupes.is_empty() {
        warn!(ids = ?dupes, "Quiz contains duplicate question ids");
    }
    Ok(())
}

/// Score every question all-or-nothing.
///
/// MCQs compare exactly (case-sensitive). Fill-in-blank and real-world
/// answers go through [`fuzzy_match`]. Missing answers earn nothing. A
/// real-world item without an id or expected answer carries no weight.
pub fn score(quiz: &Quiz, answers: &AnswerSet) -> Result<Score, LearnError> {
    validate(quiz)?;

    let mut score = Score {
        points_earned: 0,
        points_possible: 0,
    };

    for mcq in &quiz.multiple_choice {
        let correct = answers.get(&mcq.id) == Some(mcq.correct_option.as_str());
        score.add(MCQ_POINTS, correct);
    }

    for blank in quiz.fill_in_blank.iter().flatten() {
        let correct = fuzzy_match(answers.get(&blank.id), Some(blank.correct_text.as_str()));
        score.add(FILL_BLANK_POINTS, correct);
    }

    let real_world = quiz
        .real_world_question
        .as_ref()
        .filter(|rw| rw.is_scorable());
    if let Some(real_world) = real_world {
        let correct = fuzzy_match(
            answers.get(&real_world.id),
            Some(real_world.expected_answer_text.as_str()),
        );
        score.add(REAL_WORLD_POINTS, correct);
    }

    Ok(score)
}
