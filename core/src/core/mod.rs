pub mod effect;
pub mod record;

// Re-export key types for easier access from other ctxflow modules (and lib.rs)
pub use effect::{ContextEffect, Effect, Environment};
pub use record::{fields, Overlay, Record};
