pub mod basic;
pub mod fallback;
pub mod lift;
pub mod scope;
pub mod sequence;

pub use basic::{ask, asks, empty, map, pure, some_or_empty};
pub use fallback::{for_every_first, or};
pub use lift::{attempt, traced};
pub use scope::{extend_config, when};
pub use sequence::{chain, then};

use crate::core::effect::{ContextEffect, Effect, Environment};
use crate::core::record::Overlay;

// Method forms of the free combinators, for left-to-right pipelines.
impl<Env, A> Effect<Env, A>
where
  Env: Environment,
  A: Send + 'static,
{
  pub fn map<B, F>(self, f: F) -> Effect<Env, B>
  where
    B: Send + 'static,
    F: Fn(A) -> B + Send + Sync + 'static,
  {
    map(f, self)
  }

  pub fn then<B, K, Next>(self, continuation: K) -> Effect<Env, B>
  where
    B: Send + 'static,
    K: Fn(A) -> Next + Send + Sync + 'static,
    Next: ContextEffect<Env, B>,
  {
    then(self, continuation)
  }

  pub fn or(self, fallback: impl ContextEffect<Env, A>) -> Effect<Env, A> {
    or(self, fallback)
  }

  pub fn extend_config<P>(self, extra: P) -> Effect<Env, A>
  where
    Env: Overlay<P>,
    P: Send + Sync + 'static,
  {
    extend_config(extra, self)
  }

  pub fn traced(self, name: &'static str) -> Effect<Env, A> {
    traced(name, self)
  }
}
