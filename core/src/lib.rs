// src/lib.rs

//! ctxflow: asynchronous context effects for Rust.
//!
//! A context effect is a computation that needs a read-only environment
//! (server, owner, repository, credentials...) and eventually produces a value
//! or fails without a payload. ctxflow provides:
//!  - The `ContextEffect<Env, A>` trait, implemented by any async closure of the environment.
//!  - `Effect<Env, A>`, the cloneable type-erased form every combinator returns.
//!  - A small algebra: `pure`, `empty`, `map`, `then` / `then!`, `chain`, `or`,
//!    `when`, `extend_config` and `for_every_first`.
//!  - `Record`, an immutable JSON-valued environment record with copy-on-write overlays.
//!  - Edge adapters: `attempt` for lifting `anyhow`-failing async functions and
//!    `traced` for wrapping an effect in a tracing span.
//!
//! Composition never runs sibling effects concurrently: `then`, `or` and
//! `for_every_first` keep at most one underlying call in flight.

pub mod combinators;
pub mod core;
pub mod error;

// --- Re-exports for the Public API ---

pub use crate::core::effect::{ContextEffect, Effect, Environment};
pub use crate::core::record::{fields, Overlay, Record};

pub use crate::combinators::{
  ask, asks, attempt, chain, empty, extend_config, for_every_first, map, or, pure, some_or_empty, then, traced, when,
};

pub use crate::error::{EffectResult, Empty, FlowError, FlowResult};

/// Everything needed to write and compose effects.
pub mod prelude {
  pub use crate::combinators::{
    ask, asks, attempt, chain, empty, extend_config, for_every_first, map, or, pure, some_or_empty, traced, when,
  };
  pub use crate::core::effect::{ContextEffect, Effect, Environment};
  pub use crate::core::record::{fields, Overlay, Record};
  pub use crate::error::{EffectResult, Empty};
  // Brings in both the `then` function and the variadic `then!` macro.
  pub use crate::then;
}

/*
    Typical use:
    1. Write leaf effects as async closures over the environment (or with `attempt`
       when the body returns `anyhow::Result`).
    2. Compose them: `then!(fetch, |pr| ..., |merged| ...)`, `or(primary, fallback)`,
       `for_every_first(|candidate| ..., candidates)`.
    3. Pin fields for a sub-computation with `extend_config(Record::new().with("id", 7), effect)`.
    4. Build one `Record` per top-level call and `.run(record).await` the composed effect.
*/
