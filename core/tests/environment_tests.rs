// tests/environment_tests.rs
mod common;

use common::*;
use ctxflow::prelude::*;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_extend_config_overrides_without_mutating_caller() {
  setup_tracing();
  let seen: Arc<Mutex<Option<Record>>> = Arc::new(Mutex::new(None));
  let seen_in_effect = Arc::clone(&seen);
  let observer = move |env: Record| {
    let seen = Arc::clone(&seen_in_effect);
    async move {
      *seen.lock() = Some(env);
      Ok::<(), Empty>(())
    }
  };

  let caller_env = Record::from_json(json!({"server": "A", "owner": "B"})).unwrap();
  let effect = extend_config(Record::new().with(fields::OWNER, "C"), observer);
  assert_eq!(effect.run(caller_env.clone()).await, Ok(()));

  let observed = seen.lock().clone().expect("observer should have run");
  assert_eq!(observed, Record::from_json(json!({"server": "A", "owner": "C"})).unwrap());
  assert_eq!(caller_env, Record::from_json(json!({"server": "A", "owner": "B"})).unwrap());
}

#[tokio::test]
async fn test_extend_config_adds_new_fields_and_scopes_them() {
  setup_tracing();
  let pinned = extend_config(Record::new().with(fields::ID, 42), asks(|r: &Record| r.u64_field(fields::ID).ok()));
  let outside = asks(|r: &Record| r.contains(fields::ID));

  let pipeline = then(pinned, move |id| map(move |visible| (id, visible), outside.clone()));
  assert_eq!(pipeline.run(sample_record()).await, Ok((Some(42), false)));
}

#[tokio::test]
async fn test_nested_extend_config_inner_wins() {
  setup_tracing();
  let effect = extend_config(
    Record::new().with(fields::OWNER, "outer"),
    extend_config(Record::new().with(fields::OWNER, "inner"), read_field(fields::OWNER)),
  );
  assert_eq!(effect.run(sample_record()).await, Ok("inner".to_string()));
}

#[tokio::test]
async fn test_when_gates_on_environment() {
  setup_tracing();
  let gate = when(|r: &Record| r.get("flag") == Some(&json!(true)), 42);

  let on = Record::from_json(json!({"flag": true})).unwrap();
  let off = Record::from_json(json!({"flag": false})).unwrap();
  assert_eq!(gate.run(on).await, Ok(42));
  assert_eq!(gate.run(off).await, Err(Empty));
  assert_eq!(gate.run(Record::new()).await, Err(Empty));
}

#[tokio::test]
async fn test_merge_decision_scenario() {
  setup_tracing();
  let decision = or(
    when(
      |r: &Record| r.str_field("userBranch").ok() == Some("branch-behind"),
      "needs-merge",
    ),
    pure("no-merge-needed"),
  );

  let behind = Record::new().with("userBranch", "branch-behind");
  let same = Record::new().with("userBranch", "branch-is-same");
  assert_eq!(decision.run(behind).await, Ok("needs-merge"));
  assert_eq!(decision.run(same).await, Ok("no-merge-needed"));
}

// A typed environment works as long as it can be overlaid.
#[derive(Clone, Debug, PartialEq)]
struct RepoEnv {
  owner: String,
  repo: String,
}

#[derive(Clone, Default)]
struct RepoPatch {
  owner: Option<String>,
}

impl Overlay<RepoPatch> for RepoEnv {
  fn overlay(&self, patch: &RepoPatch) -> Self {
    RepoEnv {
      owner: patch.owner.clone().unwrap_or_else(|| self.owner.clone()),
      ..self.clone()
    }
  }
}

#[tokio::test]
async fn test_typed_environment_with_custom_overlay() {
  setup_tracing();
  let slug = asks(|env: &RepoEnv| format!("{}/{}", env.owner, env.repo));
  let forked = extend_config(
    RepoPatch {
      owner: Some("fork".to_string()),
    },
    slug.clone(),
  );
  let env = RepoEnv {
    owner: "octo".to_string(),
    repo: "widgets".to_string(),
  };

  assert_eq!(forked.run(env.clone()).await, Ok("fork/widgets".to_string()));
  assert_eq!(slug.run(env.clone()).await, Ok("octo/widgets".to_string()));
  assert_eq!(env.owner, "octo");
}
