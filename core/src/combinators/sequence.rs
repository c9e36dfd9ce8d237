// ctxflow/src/combinators/sequence.rs

//! Sequential composition: `then` (bind), the variadic `then!` macro and the
//! point-free `chain`.

use crate::core::effect::{ContextEffect, Effect, Environment};
use std::sync::Arc;

/// Runs `effect`, builds the next effect from its value with `continuation` and runs
/// that against the same environment.
///
/// A failure of `effect` short-circuits: `continuation` is never called.
/// The next effect is only built, let alone started, after `effect` has settled.
pub fn then<Env, A, B, K, Next>(effect: impl ContextEffect<Env, A>, continuation: K) -> Effect<Env, B>
where
  Env: Environment,
  A: Send + 'static,
  B: Send + 'static,
  K: Fn(A) -> Next + Send + Sync + 'static,
  Next: ContextEffect<Env, B>,
{
  let effect = Arc::new(effect);
  let continuation = Arc::new(continuation);
  Effect::new(move |env: Env| {
    let effect = Arc::clone(&effect);
    let continuation = Arc::clone(&continuation);
    async move {
      let value = effect.run(env.clone()).await?;
      let next = continuation(value);
      next.run(env).await
    }
  })
}

/// Composes two continuation-building functions into one: `chain(f, g)(a)` behaves
/// like `then(f(a), g)`.
pub fn chain<Env, A, B, C, F, G, FE, GE>(f: F, g: G) -> impl Fn(A) -> Effect<Env, C> + Send + Sync + 'static
where
  Env: Environment,
  B: Send + 'static,
  C: Send + 'static,
  F: Fn(A) -> FE + Send + Sync + 'static,
  FE: ContextEffect<Env, B>,
  G: Fn(B) -> GE + Send + Sync + 'static,
  GE: ContextEffect<Env, C>,
{
  let g = Arc::new(g);
  move |a: A| {
    let g = Arc::clone(&g);
    then(f(a), move |b: B| g(b))
  }
}

/// Left-to-right sequencing over any number of continuations.
///
/// `then!(e)` is `e` itself (erased into an `Effect`); `then!(e, f, g)` is
/// `then(then(e, f), g)`.
///
/// ```ignore
/// let pipeline = then!(
///   fetch_pull_request(),
///   |pr| extend_config(Record::new().with("id", pr.number), merge_pull_request()),
///   |merged| pure(merged.sha),
/// );
/// ```
#[macro_export]
macro_rules! then {
  ($effect:expr $(,)?) => {
    $crate::Effect::new($effect)
  };
  ($effect:expr, $continuation:expr $(, $rest:expr)* $(,)?) => {
    $crate::then!($crate::combinators::then($effect, $continuation) $(, $rest)*)
  };
}
