// ctxflow/src/combinators/lift.rs

//! Adapters at the edge of the algebra: lifting fallible async functions into
//! effects, and wrapping effects in tracing spans.

use crate::core::effect::{ContextEffect, Effect, Environment};
use crate::error::{Empty, FlowError};
use std::future::Future;
use std::sync::Arc;
use tracing::{event, span, Instrument, Level};

/// Lifts a fallible async function of the environment into a context effect.
///
/// An `Err` is logged under `operation` and then dropped: the effect fails with
/// `Empty`. This is the usual way to turn an HTTP call into a leaf effect.
pub fn attempt<Env, A, F, Fut>(operation: &'static str, f: F) -> Effect<Env, A>
where
  Env: Environment,
  A: Send + 'static,
  F: Fn(Env) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<A>> + Send + 'static,
{
  Effect::new(move |env: Env| {
    let fut = f(env);
    async move {
      fut.await.map_err(|source| {
        Empty::from(FlowError::Leaf {
          operation: operation.to_string(),
          source,
        })
      })
    }
  })
}

/// Runs `effect` inside a span called `name` and logs how it settled.
/// The outcome is returned unchanged.
pub fn traced<Env, A>(name: &'static str, effect: impl ContextEffect<Env, A>) -> Effect<Env, A>
where
  Env: Environment,
  A: Send + 'static,
{
  let effect = Arc::new(effect);
  Effect::new(move |env: Env| {
    let effect = Arc::clone(&effect);
    let effect_span = span!(Level::DEBUG, "context_effect", effect = name, output_type = std::any::type_name::<A>());
    async move {
      let outcome = effect.run(env).await;
      match &outcome {
        Ok(_) => event!(Level::DEBUG, "Effect succeeded."),
        Err(Empty) => event!(Level::DEBUG, "Effect failed."),
      }
      outcome
    }
    .instrument(effect_span)
  })
}
