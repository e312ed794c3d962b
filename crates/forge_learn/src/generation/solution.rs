use forge_ai::decode_or;
use serde::{Deserialize, Serialize};

use super::StudyAssistant;
use crate::error::{LearnError, require};
use crate::prompts;
use crate::types::Level;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionStep {
    pub step: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Guided walkthrough of a project, explained rather than handed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub overview: String,
    pub steps: Vec<SolutionStep>,
    #[serde(default)]
    pub final_notes: String,
}

#[derive(Deserialize)]
struct SolutionReply {
    solution: Solution,
}

impl Solution {
    pub fn fallback() -> Self {
        fn step(n: u32, title: &str, description: &str, points: &[&str]) -> SolutionStep {
            SolutionStep {
                step: n,
                title: title.into(),
                description: description.into(),
                key_points: points.iter().map(|p| p.to_string()).collect(),
            }
        }
        Self {
            overview: "Work through the project in small, testable pieces.".into(),
            steps: vec![
                step(1, "Plan", "Write down the inputs, outputs and main components.", &[
                    "List the requirements",
                    "Sketch the data flow",
                ]),
                step(2, "Build", "Implement one component at a time and run it as you go.", &[
                    "Start with the simplest piece",
                ]),
                step(3, "Test", "Check normal cases first, then the edge cases.", &[
                    "Empty input",
                    "Large input",
                ]),
            ],
            final_notes: "Refactor once everything works.".into(),
        }
    }
}

impl StudyAssistant {
    /// Step-by-step solution for `project_title`, pitched at `level`.
    pub async fn reveal_solution(
        &self,
        project_title: &str,
        level: Level,
    ) -> Result<Solution, LearnError> {
        require(project_title, "project title")?;
        let reply = self
            .ask(prompts::solution_walkthrough(project_title, level), Some(0.4), 1024)
            .await?;
        Ok(decode_or(&reply, "solution", || SolutionReply {
            solution: Solution::fallback(),
        })
        .solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingProvider, ScriptedProvider};
    use std::sync::Arc;

    #[tokio::test]
    async fn decodes_wrapped_solution() {
        let reply = r#"```json
{"solution": {
  "overview": "Recurse on neighbours",
  "steps": [{"step": 1, "title": "Grid", "description": "Model the maze", "keyPoints": ["2D array"]}],
  "finalNotes": "Watch the stack depth"
}}
```"#;
        let provider = Arc::new(ScriptedProvider::new(reply));
        let assistant = StudyAssistant::new(provider.clone(), "m");
        let solution = assistant
            .reveal_solution("Maze Solver", Level::Beginner)
            .await
            .unwrap();

        assert_eq!(solution.overview, "Recurse on neighbours");
        assert_eq!(solution.steps[0].key_points, vec!["2D array"]);
        assert_eq!(solution.final_notes, "Watch the stack depth");
        assert_eq!(provider.last_request().unwrap().temperature, Some(0.4));
    }

    #[tokio::test]
    async fn unwrapped_solution_serves_fallback() {
        let reply = r#"{"overview": "x", "steps": []}"#;
        let assistant = StudyAssistant::new(Arc::new(ScriptedProvider::new(reply)), "m");
        let solution = assistant
            .reveal_solution("Maze Solver", Level::Advanced)
            .await
            .unwrap();

        assert_eq!(solution, Solution::fallback());
        assert_eq!(solution.steps.len(), 3);
    }

    #[tokio::test]
    async fn provider_failure_is_an_error() {
        let assistant = StudyAssistant::new(Arc::new(FailingProvider), "m");
        let err = assistant
            .reveal_solution("Maze Solver", Level::Advanced)
            .await
            .unwrap_err();
        assert!(matches!(err, LearnError::Provider(_)));
    }
}
