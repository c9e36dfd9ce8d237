// ctxflow/src/combinators/basic.rs

//! Value injection, failure injection, result transformation and reader access.

use crate::core::effect::{ContextEffect, Effect, Environment};
use crate::error::{EffectResult, Empty};
use std::sync::Arc;

/// An effect that ignores the environment and succeeds with `value`.
pub fn pure<Env, A>(value: A) -> Effect<Env, A>
where
  Env: Environment,
  A: Clone + Send + Sync + 'static,
{
  Effect::new(move |_env: Env| {
    let value = value.clone();
    async move { Ok::<A, Empty>(value) }
  })
}

/// An effect that ignores the environment and fails.
///
/// The seed of fallback chains and of an empty first-success search.
pub fn empty<Env, A>() -> Effect<Env, A>
where
  Env: Environment,
  A: Send + 'static,
{
  Effect::new(|_env: Env| async { Err::<A, Empty>(Empty) })
}

/// Transforms the success value of `effect` with `f`. Failure passes through untouched.
///
/// `f` is expected to be total. A panic inside it is not caught here.
pub fn map<Env, A, B, F>(f: F, effect: impl ContextEffect<Env, A>) -> Effect<Env, B>
where
  Env: Environment,
  A: Send + 'static,
  B: Send + 'static,
  F: Fn(A) -> B + Send + Sync + 'static,
{
  let effect = Arc::new(effect);
  let f = Arc::new(f);
  Effect::new(move |env: Env| {
    let effect = Arc::clone(&effect);
    let f = Arc::clone(&f);
    async move { effect.run(env).await.map(|value| f(value)) }
  })
}

/// Succeeds with the environment itself.
pub fn ask<Env>() -> Effect<Env, Env>
where
  Env: Environment,
{
  Effect::new(|env: Env| async move { Ok::<Env, Empty>(env) })
}

/// Succeeds with a projection of the environment.
pub fn asks<Env, A, F>(f: F) -> Effect<Env, A>
where
  Env: Environment,
  A: Send + 'static,
  F: Fn(&Env) -> A + Send + Sync + 'static,
{
  Effect::new(move |env: Env| {
    let value = f(&env);
    async move { Ok::<A, Empty>(value) }
  })
}

/// Treats a successful `None` as failure.
///
/// This is the only place outside `for_every_first` where absence is turned into
/// failure, and it only happens when asked for.
pub fn some_or_empty<Env, A>(effect: impl ContextEffect<Env, Option<A>>) -> Effect<Env, A>
where
  Env: Environment,
  A: Send + 'static,
{
  let effect = Arc::new(effect);
  Effect::new(move |env: Env| {
    let effect = Arc::clone(&effect);
    async move { effect.run(env).await.and_then(present) }
  })
}

pub(crate) fn present<A>(value: Option<A>) -> EffectResult<A> {
  value.ok_or(Empty)
}
