// tests/combinator_tests.rs
mod common;

use common::*;
use ctxflow::prelude::*;
use serial_test::serial;

#[tokio::test]
async fn test_pure_ignores_environment() {
  setup_tracing();
  let effect = pure::<Record, _>("value");
  assert_eq!(effect.run(Record::new()).await, Ok("value"));
  assert_eq!(effect.run(sample_record()).await, Ok("value"));
}

#[tokio::test]
async fn test_empty_always_fails() {
  setup_tracing();
  let effect = empty::<Record, u32>();
  assert_eq!(effect.run(sample_record()).await, Err(Empty));
}

#[tokio::test]
async fn test_then_with_no_continuations_matches_effect() {
  setup_tracing();
  let log = CallLog::new();
  let ok = leaf_ok(&log, "ok", 7u32);
  let failing = leaf_fail::<u32>(&log, "fail");

  assert_eq!(then!(ok.clone()).run(sample_record()).await, ok.run(sample_record()).await);
  assert_eq!(then!(failing.clone()).run(sample_record()).await, failing.run(sample_record()).await);
}

#[tokio::test]
async fn test_map_identity_matches_effect() {
  setup_tracing();
  let log = CallLog::new();
  let ok = leaf_ok(&log, "ok", String::from("x"));
  let failing = leaf_fail::<String>(&log, "fail");

  assert_eq!(map(|x| x, ok.clone()).run(sample_record()).await, ok.run(sample_record()).await);
  assert_eq!(
    map(|x| x, failing.clone()).run(sample_record()).await,
    failing.run(sample_record()).await
  );
}

#[tokio::test]
async fn test_map_transforms_success_and_skips_failure() {
  setup_tracing();
  let log = CallLog::new();
  let doubled = map(|n: u32| n * 2, leaf_ok(&log, "ok", 21u32));
  assert_eq!(doubled.run(sample_record()).await, Ok(42));

  let never_called = map(|_: u32| -> u32 { panic!("map function must not run on failure") }, leaf_fail(&log, "fail"));
  assert_eq!(never_called.run(sample_record()).await, Err(Empty));
}

#[tokio::test]
async fn test_then_sequencing_is_associative() {
  setup_tracing();
  let f = |n: u32| pure::<Record, _>(n + 1);
  let g = |n: u32| pure::<Record, _>(n * 10);
  let g_fails_on_big = |n: u32| if n > 5 { empty::<Record, u32>() } else { pure(n) };

  let nested = then!(then!(pure::<Record, _>(1u32), f), g);
  let flat = then!(pure::<Record, _>(1u32), f, g);
  assert_eq!(nested.run(sample_record()).await, Ok(20));
  assert_eq!(flat.run(sample_record()).await, Ok(20));

  let nested_fail = then!(then!(pure::<Record, _>(9u32), f), g_fails_on_big);
  let flat_fail = then!(pure::<Record, _>(9u32), f, g_fails_on_big);
  assert_eq!(nested_fail.run(sample_record()).await, Err(Empty));
  assert_eq!(flat_fail.run(sample_record()).await, Err(Empty));
}

#[tokio::test]
async fn test_then_short_circuits_remaining_continuations() {
  setup_tracing();
  let log = CallLog::new();
  let first_log = log.clone();
  let second_log = log.clone();
  let pipeline = then!(
    leaf_ok(&log, "start", 1u32),
    move |_| leaf_fail::<u32>(&first_log, "broken"),
    move |_| leaf_ok(&second_log, "unreachable", 3u32),
  );

  assert_eq!(pipeline.run(sample_record()).await, Err(Empty));
  assert_eq!(log.calls(), vec!["start", "broken"]);
}

#[tokio::test]
async fn test_then_runs_continuations_in_order_against_same_environment() {
  setup_tracing();
  let pipeline = then!(
    read_field(fields::OWNER),
    |owner| map(move |repo| format!("{}/{}", owner, repo), read_field(fields::REPO)),
    |slug| map(move |branch| format!("{}@{}", slug, branch), read_field(fields::USER_BRANCH)),
  );
  assert_eq!(pipeline.run(sample_record()).await, Ok("octo/widgets@feature".to_string()));
}

#[tokio::test]
async fn test_chain_matches_explicit_then() {
  setup_tracing();
  let lookup = |key: &'static str| read_field(key);
  let shout = |value: String| pure::<Record, _>(value.to_uppercase());

  let chained = chain(lookup, shout);
  let explicit = then(lookup(fields::OWNER), shout);
  assert_eq!(chained(fields::OWNER).run(sample_record()).await, Ok("OCTO".to_string()));
  assert_eq!(explicit.run(sample_record()).await, Ok("OCTO".to_string()));

  // A failure in the first half stops the second.
  assert_eq!(chained("missing").run(sample_record()).await, Err(Empty));
}

#[tokio::test]
async fn test_none_is_ordinary_data_outside_search() {
  setup_tracing();
  let log = CallLog::new();
  let none_then = then(pure::<Record, Option<u32>>(None), |value: Option<u32>| pure(value.is_none()));
  assert_eq!(none_then.run(sample_record()).await, Ok(true));

  let none_or = or(pure::<Record, Option<u32>>(None), leaf_ok(&log, "fallback", Some(5u32)));
  assert_eq!(none_or.run(sample_record()).await, Ok(None));
  assert_eq!(log.count("fallback"), 0);
}

#[tokio::test]
async fn test_some_or_empty_turns_none_into_failure() {
  setup_tracing();
  assert_eq!(some_or_empty(pure::<Record, _>(Some(3u8))).run(Record::new()).await, Ok(3));
  assert_eq!(
    some_or_empty(pure::<Record, Option<u8>>(None)).run(Record::new()).await,
    Err(Empty)
  );
}

#[tokio::test]
async fn test_ask_and_asks_read_environment() {
  setup_tracing();
  let env = sample_record();
  assert_eq!(ask::<Record>().run(env.clone()).await, Ok(env.clone()));
  assert_eq!(asks(|r: &Record| r.len()).run(env).await, Ok(6));
}

#[tokio::test]
async fn test_fluent_methods_match_free_functions() {
  setup_tracing();
  let log = CallLog::new();
  let pipeline = leaf_fail::<u32>(&log, "primary")
    .or(leaf_ok(&log, "secondary", 4u32))
    .map(|n| n + 1)
    .then(|n| pure(n * 2))
    .traced("fluent_pipeline");

  assert_eq!(pipeline.run(sample_record()).await, Ok(10));
  assert_eq!(log.calls(), vec!["primary", "secondary"]);
}

#[tokio::test]
#[serial]
async fn test_effects_are_not_memoized() {
  setup_tracing();
  reset_counters();
  let effect = counting_leaf();
  assert_eq!(effect.run(Record::new()).await, Ok(1));
  assert_eq!(effect.run(Record::new()).await, Ok(2));

  // Composition shares the computation, not its results.
  let composed = then(effect.clone(), move |_| effect.clone());
  assert_eq!(composed.run(Record::new()).await, Ok(4));
}
