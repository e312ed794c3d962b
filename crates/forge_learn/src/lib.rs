//! Answer evaluation and study-content generation.
//!
//! [`AnswerEvaluator`] scores a learner's quiz answers, buckets the result
//! into a [`Level`] and optionally lets the text-generation provider adjust
//! it. [`StudyAssistant`] produces the material around a quiz: concept
//! analysis, the quiz itself, project ideas, hints and walkthroughs.

pub mod error;
pub mod evaluator;
pub mod fuzzy;
pub mod generation;
pub mod prompts;
pub mod scoring;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::LearnError;
pub use evaluator::{AnswerEvaluator, EvaluatorConfig};
pub use fuzzy::{MatchKind, fuzzy_match};
pub use generation::{
    Boilerplate, ConceptAnalysis, Hint, ProjectIdea, ProjectSuggestions, Repository, Solution,
    SolutionStep, StudyAssistant,
};
pub use scoring::{FILL_BLANK_POINTS, MCQ_POINTS, REAL_WORLD_POINTS, Score, score};
pub use types::*;
