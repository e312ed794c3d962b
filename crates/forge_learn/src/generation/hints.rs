use forge_ai::decode_or;
use serde::{Deserialize, Serialize};

use super::StudyAssistant;
use crate::error::{LearnError, require};
use crate::prompts;

/// One progressive hint. Hints are returned easiest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Deserialize)]
struct HintReply {
    hints: Vec<Hint>,
}

fn fallback_hints() -> HintReply {
    let hint = |n: u8, text: &str, difficulty: &str| Hint {
        id: format!("hint{n}"),
        text: text.into(),
        difficulty: difficulty.into(),
    };
    HintReply {
        hints: vec![
            hint(1, "Break the problem into smaller parts.", "Easy"),
            hint(2, "Decide which data structures fit each part.", "Medium"),
            hint(3, "Work out the edge cases and test them one by one.", "Hard"),
        ],
    }
}

impl StudyAssistant {
    /// Three hints of increasing detail for a project.
    pub async fn project_hints(
        &self,
        concept: &str,
        project_title: &str,
    ) -> Result<Vec<Hint>, LearnError> {
        require(concept, "concept")?;
        require(project_title, "project title")?;
        let reply = self
            .ask(prompts::project_hints(concept, project_title), Some(0.3), 512)
            .await?;
        Ok(decode_or(&reply, "project hints", fallback_hints).hints)
    }
}
