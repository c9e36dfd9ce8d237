// ctxflow/src/core/effect.rs

//! Defines the `ContextEffect<Env, A>` trait, the computation shape every combinator
//! works with, and `Effect<Env, A>`, its type-erased, cloneable form.

use crate::error::EffectResult;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Anything usable as the read-only environment of an effect.
///
/// Environments are cloned whenever a composed effect needs to hand the same
/// environment to more than one sub-computation, so cloning should be cheap
/// (the provided `Record` shares its storage behind an `Arc`).
pub trait Environment: Clone + Send + Sync + 'static {}

impl<T> Environment for T where T: Clone + Send + Sync + 'static {}

/// A computation that needs an environment `Env` and eventually produces an `A`
/// or fails with `Empty`.
///
/// Any `Fn(Env) -> impl Future<Output = EffectResult<A>>` closure or fn item
/// implements this trait, so leaf functions plug into every combinator without an
/// adapter. Running an effect twice performs its work twice; nothing is memoised.
#[async_trait]
pub trait ContextEffect<Env, A>: Send + Sync + 'static
where
  Env: Send + 'static,
  A: Send + 'static,
{
  /// Runs the computation against `env`. The returned future settles exactly once.
  async fn run(&self, env: Env) -> EffectResult<A>;
}

#[async_trait]
impl<Env, A, F, Fut> ContextEffect<Env, A> for F
where
  Env: Send + 'static,
  A: Send + 'static,
  F: Fn(Env) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = EffectResult<A>> + Send + 'static,
{
  async fn run(&self, env: Env) -> EffectResult<A> {
    (self)(env).await
  }
}

/// A type-erased context effect.
///
/// Every combinator returns one of these. Cloning shares the underlying
/// computation; it does not share any run state, since there is none.
pub struct Effect<Env, A>
where
  Env: Send + 'static,
  A: Send + 'static,
{
  inner: Arc<dyn ContextEffect<Env, A>>,
}

impl<Env, A> Effect<Env, A>
where
  Env: Send + 'static,
  A: Send + 'static,
{
  /// Erases any context effect into an `Effect`.
  pub fn new(effect: impl ContextEffect<Env, A>) -> Self {
    Self {
      inner: Arc::new(effect),
    }
  }

  /// Runs the effect against `env`.
  pub async fn run(&self, env: Env) -> EffectResult<A> {
    self.inner.run(env).await
  }
}

impl<Env, A> Clone for Effect<Env, A>
where
  Env: Send + 'static,
  A: Send + 'static,
{
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<Env, A> std::fmt::Debug for Effect<Env, A>
where
  Env: Send + 'static,
  A: Send + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Effect")
      .field("env_type", &std::any::type_name::<Env>())
      .field("output_type", &std::any::type_name::<A>())
      .finish()
  }
}

#[async_trait]
impl<Env, A> ContextEffect<Env, A> for Effect<Env, A>
where
  Env: Send + 'static,
  A: Send + 'static,
{
  async fn run(&self, env: Env) -> EffectResult<A> {
    self.inner.run(env).await
  }
}
