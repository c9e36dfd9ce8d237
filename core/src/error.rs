// ctxflow/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;
use tracing::{event, Level};

/// The failure signal of a context effect.
///
/// It carries no payload. Callers that need diagnostic detail must put it in the
/// success channel (for example by succeeding with a tagged result).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("context effect produced no result")]
pub struct Empty;

/// Outcome of running a context effect: a value, or `Empty`.
pub type EffectResult<A> = std::result::Result<A, Empty>;

/// Diagnostic errors raised around the effect algebra: malformed environment
/// records and failures coming out of leaf operations.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Environment field missing: {field}")]
  MissingField { field: String },

  #[error("Environment field '{field}' has the wrong type (expected {expected})")]
  TypeMismatch { field: String, expected: &'static str },

  #[error("Environment record must be built from a JSON object, got {found}")]
  NotAnObject { found: String },

  #[error("Leaf operation '{operation}' failed. Source: {source}")]
  Leaf {
    operation: String,
    #[source]
    source: AnyhowError,
  },
}

// Dropping to `Empty` is the only way a diagnostic error enters the effect channel.
// Log it first, the payload is gone afterwards.
impl From<FlowError> for Empty {
  fn from(err: FlowError) -> Self {
    event!(Level::WARN, error = %err, "Effect failed, discarding error payload.");
    Empty
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
