pub mod json_extract;
pub mod providers;
pub mod types;

// Re-export core types at crate root for convenience.
pub use json_extract::{ExtractError, decode, decode_or, decode_with};
pub use providers::gemini::GeminiProvider;
pub use providers::{AiProvider, ProviderError};
pub use types::*;
