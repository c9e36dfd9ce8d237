// ctxflow/src/combinators/scope.rs

//! Combinators that look at or reshape the environment: the `when` gate and
//! `extend_config`.

use crate::core::effect::{ContextEffect, Effect, Environment};
use crate::core::record::Overlay;
use crate::error::Empty;
use std::sync::Arc;
use tracing::{event, Level};

/// Succeeds with `value` when `predicate` holds for the environment, fails otherwise.
///
/// The predicate is a plain synchronous function of the environment, not an effect.
pub fn when<Env, A, P>(predicate: P, value: A) -> Effect<Env, A>
where
  Env: Environment,
  A: Clone + Send + Sync + 'static,
  P: Fn(&Env) -> bool + Send + Sync + 'static,
{
  Effect::new(move |env: Env| {
    let outcome = if predicate(&env) {
      Ok(value.clone())
    } else {
      event!(Level::TRACE, "Gate predicate rejected the environment.");
      Err(Empty)
    };
    async move { outcome }
  })
}

/// Runs `effect` against the caller's environment overlaid with `extra`.
///
/// Keys in `extra` win. The caller's environment is never modified; `effect`
/// receives a fresh value built by `Overlay::overlay`.
pub fn extend_config<Env, P, A>(extra: P, effect: impl ContextEffect<Env, A>) -> Effect<Env, A>
where
  Env: Environment + Overlay<P>,
  P: Send + Sync + 'static,
  A: Send + 'static,
{
  let effect = Arc::new(effect);
  Effect::new(move |env: Env| {
    let scoped = env.overlay(&extra);
    let effect = Arc::clone(&effect);
    async move { effect.run(scoped).await }
  })
}
