// merge_flow/src/errors.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Hosting API client could not be built: {0}")]
  Http(#[from] reqwest::Error),

  // Effects fail without a payload; the leaf that failed has already logged why.
  #[error("Workflow '{operation}' produced no result (see earlier warnings for the failing call)")]
  EffectFailed { operation: &'static str },

  #[error("Internal Error: {0}")]
  Internal(String),
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
