//! Prompt text sent to the text-generation provider.
//!
//! Every builder is a pure function of its inputs so the same request
//! always produces the same prompt.

use crate::scoring::Score;
use crate::types::{AnswerSet, Level, Quiz};

/// Ask the model to confirm or override a bucketed level.
pub fn level_refinement(quiz: &Quiz, answers: &AnswerSet, score: &Score, level: Level) -> String {
    let quiz_json = serde_json::to_string_pretty(quiz).unwrap_or_default();
    let answers_json = serde_json::to_string_pretty(answers).unwrap_or_default();
    format!(
        "You are an expert education evaluator. Based on the following quiz results, provide a final assessment.

Quiz Questions and Correct Answers:
{quiz_json}

User Answers:
{answers_json}

Score: {earned}/{possible} ({percentage:.1}%)

Current Level Assessment: {level}

Please confirm if this level assessment is appropriate or suggest a different level (Beginner, Intermediate, Advanced). Consider the quality of answers, not just correctness.

Return only the level: \"Beginner\", \"Intermediate\", or \"Advanced\"",
        earned = score.points_earned,
        possible = score.points_possible,
        percentage = score.percentage(),
    )
}

pub fn concept_analysis(concept: &str, transcript: Option<&str>, domains: &[String]) -> String {
    let mut prompt = String::from(
        "You are an expert education assistant. Given the following input, summarize the concept and extract the most important keywords for evaluation.\n",
    );
    prompt.push_str(&format!("Concept: {concept}\n"));
    if let Some(transcript) = transcript.filter(|t| !t.trim().is_empty()) {
        prompt.push_str(&format!("Transcript: {transcript}\n"));
    }
    prompt.push_str(&format!("Domains: {}\n", domains.join(", ")));
    prompt.push_str(
        "\nReturn a short summary and a comma-separated list of keywords. Format:\nSummary: ...\nKeywords: ...",
    );
    prompt
}

pub fn quiz_generation(concept: &str, domains: &[String], summary: &str) -> String {
    format!(
        r#"You are an expert education assistant. Generate a quiz for the concept "{concept}" in the domain(s): {domains}.

Summary: {summary}

Generate exactly 7 multiple choice questions (MCQs) with 4 options each and correct answers. The difficulty level should be:
- 2 easy MCQs
- 3 medium MCQs
- 2 hard MCQs

Return ONLY valid JSON with the following format and no additional text:

{{
  "mcqs": [
    {{
      "id": "mcq1",
      "difficulty": "easy",
      "question": "Question text?",
      "options": ["A", "B", "C", "D"],
      "correct": "A",
      "explanation": "Brief explanation"
    }}
  ]
}}"#,
        domains = domains.join(", "),
    )
}

pub fn project_suggestions(level: Level, domain: &str, concept: &str) -> String {
    format!(
        r#"You are an expert project advisor. Suggest projects for a {level} level user learning {concept} in the {domain} domain.

Generate exactly:
1. 2-3 project ideas with titles and descriptions
2. One starter boilerplate code snippet
3. 3 relevant existing GitHub repositories

IMPORTANT: Return ONLY valid JSON without any additional text or formatting.

{{
  "projects": [
    {{ "title": "Project Title", "description": "Brief project description", "difficulty": "Easy" }}
  ],
  "boilerplate": {{
    "name": "Starter Template",
    "description": "Brief description of the boilerplate",
    "code": "// Starter code snippet here",
    "language": "JavaScript"
  }},
  "repositories": [
    {{ "name": "Repo Name", "description": "Brief description", "url": "https://github.com/username/repo", "stars": "1.2k" }}
  ]
}}"#
    )
}

pub fn project_hints(concept: &str, project_title: &str) -> String {
    format!(
        r#"You are an expert programming mentor. Generate 3 progressive hints for the project "{project_title}" related to the concept "{concept}".

Generate exactly 3 hints in increasing difficulty:
- Hint 1: A gentle nudge in the right direction
- Hint 2: More specific guidance about approach
- Hint 3: Detailed technical guidance

IMPORTANT: Return ONLY valid JSON without any additional text.

{{
  "hints": [
    {{ "id": "hint1", "text": "First hint text", "difficulty": "Easy" }},
    {{ "id": "hint2", "text": "Second hint text", "difficulty": "Medium" }},
    {{ "id": "hint3", "text": "Third hint text", "difficulty": "Hard" }}
  ]
}}"#
    )
}

pub fn solution_walkthrough(project_title: &str, level: Level) -> String {
    format!(
        r#"You are an expert programming mentor. Provide a detailed, educational solution for the project "{project_title}" tailored for a {level} level developer.

IMPORTANT: Provide a step-by-step solution that:
- Explains the reasoning behind each step
- Encourages understanding and creativity
- Is NOT a complete copy-paste solution
- Helps the user learn and think critically

Format the response as JSON:

{{
  "solution": {{
    "overview": "Brief overview of the approach",
    "steps": [
      {{
        "step": 1,
        "title": "Step Title",
        "description": "Detailed explanation of what to do and why",
        "keyPoints": ["Key point 1", "Key point 2"]
      }}
    ],
    "finalNotes": "Important considerations and next steps"
  }}
}}"#
    )
}

pub fn mentor_help(question: &str) -> String {
    format!(
        r#"You are an AI assistant helping a student who is stuck while building a project.
They are facing the following issue or question: "{question}".

Give a clear, simple solution or suggestion to move forward. Include:
- Step by step guide
- GitHub links or articles if relevant
- Beginner-friendly explanation, no emojis.
Provide the complete response in Markdown format."#
    )
}
