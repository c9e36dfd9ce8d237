// ctxflow/src/combinators/fallback.rs

//! Failure-driven fallback (`or`) and sequential first-success search
//! (`for_every_first`).

use crate::combinators::basic::present;
use crate::core::effect::{ContextEffect, Effect, Environment};
use crate::error::Empty;
use std::sync::Arc;
use tracing::{event, Level};

/// Runs `first`; only if it fails, runs `second` against the same environment.
///
/// Left-biased and never concurrent. A success of any value (including `None`)
/// is kept as is.
pub fn or<Env, A>(first: impl ContextEffect<Env, A>, second: impl ContextEffect<Env, A>) -> Effect<Env, A>
where
  Env: Environment,
  A: Send + 'static,
{
  let first = Arc::new(first);
  let second = Arc::new(second);
  Effect::new(move |env: Env| {
    let first = Arc::clone(&first);
    let second = Arc::clone(&second);
    async move {
      match first.run(env.clone()).await {
        Ok(value) => Ok(value),
        Err(Empty) => {
          event!(Level::TRACE, "First alternative failed, running fallback.");
          second.run(env).await
        }
      }
    }
  })
}

/// Tries `f(item)` for each item in order and succeeds with the first `Some`.
///
/// The candidate effects are built when this function is called; they are run
/// one at a time, each only after the previous one failed or yielded `None`.
/// Nothing after the first `Some` runs. If every candidate fails or yields
/// `None` (or `items` is empty) the search fails, without saying how many
/// candidates were tried.
pub fn for_every_first<Env, T, A, F, E>(f: F, items: impl IntoIterator<Item = T>) -> Effect<Env, A>
where
  Env: Environment,
  A: Send + 'static,
  F: Fn(T) -> E,
  E: ContextEffect<Env, Option<A>>,
{
  let candidates: Arc<Vec<Effect<Env, Option<A>>>> = Arc::new(items.into_iter().map(|item| Effect::new(f(item))).collect());

  Effect::new(move |env: Env| {
    let candidates = Arc::clone(&candidates);
    async move {
      event!(Level::DEBUG, candidates = candidates.len(), "Starting first-success search.");
      for (index, candidate) in candidates.iter().enumerate() {
        match candidate.run(env.clone()).await.and_then(present) {
          Ok(value) => {
            event!(Level::DEBUG, candidate_index = index, "First-success search matched.");
            return Ok(value);
          }
          Err(Empty) => {
            event!(Level::TRACE, candidate_index = index, "Candidate produced nothing, moving on.");
          }
        }
      }
      event!(Level::DEBUG, "First-success search exhausted.");
      Err(Empty)
    }
  })
}
