// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use ctxflow::{Effect, Empty, Record};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Invocation log shared between a test and the leaf effects it builds ---
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&self, label: impl Into<String>) {
    self.0.lock().push(label.into());
  }

  pub fn calls(&self) -> Vec<String> {
    self.0.lock().clone()
  }

  pub fn count(&self, label: &str) -> usize {
    self.0.lock().iter().filter(|l| l.as_str() == label).count()
  }
}

// --- Common leaf effects ---

/// Records `label`, yields to the runtime once, then succeeds with `value`.
pub fn leaf_ok<A>(log: &CallLog, label: &'static str, value: A) -> Effect<Record, A>
where
  A: Clone + Send + Sync + 'static,
{
  let log = log.clone();
  Effect::new(move |_env: Record| {
    let log = log.clone();
    let value = value.clone();
    async move {
      log.push(label);
      tokio::task::yield_now().await;
      Ok::<A, Empty>(value)
    }
  })
}

/// Records `label`, yields to the runtime once, then fails.
pub fn leaf_fail<A>(log: &CallLog, label: &'static str) -> Effect<Record, A>
where
  A: Send + 'static,
{
  let log = log.clone();
  Effect::new(move |_env: Record| {
    let log = log.clone();
    async move {
      log.push(label);
      tokio::task::yield_now().await;
      Err::<A, Empty>(Empty)
    }
  })
}

/// Reads a string field from the environment, failing if it is absent.
pub fn read_field(field: &'static str) -> Effect<Record, String> {
  Effect::new(move |env: Record| async move { env.str_field(field).map(str::to_string).map_err(Empty::from) })
}

pub fn sample_record() -> Record {
  Record::from_json(json!({
    "server": "https://api.github.com",
    "owner": "octo",
    "repo": "widgets",
    "default_branch": "main",
    "user_branch": "feature",
    "token": "secret",
  }))
  .unwrap()
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::TRACE)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counter for checking execution counts across tests ---
pub static LEAF_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  LEAF_EXEC_COUNTER.store(0, Ordering::SeqCst);
}

/// A leaf that bumps `LEAF_EXEC_COUNTER` and succeeds with the number of runs so far.
pub fn counting_leaf() -> Effect<Record, usize> {
  Effect::new(|_env: Record| async {
    let runs = LEAF_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst) + 1;
    Ok::<usize, Empty>(runs)
  })
}
