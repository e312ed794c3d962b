use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// A generated quiz: required multiple-choice questions plus optional
/// free-text sections.
///
/// Field aliases accept the camelCase shape the generation prompt asks the
/// model for (`mcqs`, `fillBlanks`, `realWorld`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(default, alias = "mcqs")]
    pub multiple_choice: Vec<McqItem>,
    /// `None` means the section is absent; `Some(vec![])` means present but empty.
    #[serde(default, alias = "fillBlanks", skip_serializing_if = "Option::is_none")]
    pub fill_in_blank: Option<Vec<FillBlankItem>>,
    #[serde(default, alias = "realWorld", skip_serializing_if = "Option::is_none")]
    pub real_world_question: Option<RealWorldItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

fn lenient_difficulty<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqItem {
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(alias = "correct")]
    pub correct_option: String,
    /// Any casing is accepted; an unknown label reads as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_difficulty",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankItem {
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(alias = "correct")]
    pub correct_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealWorldItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default, alias = "expectedAnswer")]
    pub expected_answer_text: String,
}

impl RealWorldItem {
    /// Only an item with both an id and an expected answer can be scored.
    pub fn is_scorable(&self) -> bool {
        !self.id.trim().is_empty() && !self.expected_answer_text.trim().is_empty()
    }
}

impl Quiz {
    /// Every question id in the quiz, in presentation order.
    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.multiple_choice
            .iter()
            .map(|q| q.id.as_str())
            .chain(
                self.fill_in_blank
                    .iter()
                    .flatten()
                    .map(|q| q.id.as_str()),
            )
            .chain(self.real_world_question.iter().map(|q| q.id.as_str()))
    }

    /// Ids that appear more than once across all sections.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        for id in self.question_ids() {
            if !seen.insert(id) && !dupes.iter().any(|d: &String| d == id) {
                dupes.push(id.to_string());
            }
        }
        dupes
    }

    pub fn question_count(&self) -> usize {
        self.question_ids().count()
    }
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

/// User answers keyed by question id. Missing keys mean "not answered".
///
/// Backed by a `BTreeMap` so serialization order is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, answer: impl Into<String>) {
        self.0.insert(id.into(), answer.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Discrete skill tier produced by evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

static LEVEL_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(beginner|intermediate|advanced)").expect("level regex is valid")
});

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Bucket a score percentage: `>= 80` Advanced, `>= 60` Intermediate,
    /// anything else Beginner.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::Advanced
        } else if percentage >= 60.0 {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }

    /// Find the first level word anywhere in `text`, ignoring case.
    pub fn find_in(text: &str) -> Option<Self> {
        LEVEL_WORD
            .find(text)
            .and_then(|m| m.as_str().parse().ok())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Where the final level in a [`ScoreResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSource {
    /// Percentage bucketing only.
    Deterministic,
    /// Replaced by the advisory text-generation call.
    Refined,
}

/// Outcome of evaluating one answer set against one quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub points_earned: u32,
    pub points_possible: u32,
    pub percentage: f64,
    pub level: Level,
    pub level_source: LevelSource,
}
