use forge_ai::ProviderError;

/// Errors surfaced by the learning services.
#[derive(Debug, thiserror::Error)]
pub enum LearnError {
    /// The quiz has no multiple-choice questions.
    #[error("Invalid quiz: {0}")]
    InvalidQuiz(String),

    /// A required request field is empty.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The text-generation provider failed on a non-advisory call.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Reject a blank required field.
pub(crate) fn require(value: &str, field: &str) -> Result<(), LearnError> {
    if value.trim().is_empty() {
        return Err(LearnError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}
