pub mod config;
pub mod error;
pub mod logging;

pub use config::ForgeConfig;
pub use error::{ErrorCategory, ForgeError};
