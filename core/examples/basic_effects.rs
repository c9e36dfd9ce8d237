// ctxflow/examples/basic_effects.rs

use ctxflow::prelude::*;
use tracing::info;

// 1. A leaf effect: reads the environment, pretends to look a branch up remotely.
fn branch_head(field: &'static str) -> Effect<Record, String> {
  Effect::new(move |env: Record| {
    let head = env.str_field(field).map(|branch| format!("{}@abc123", branch));
    async move { Ok::<_, Empty>(head?) }
  })
}

// 2. A leaf effect that yields `None` for most inputs.
fn lockfile_in(dir: &'static str) -> Effect<Record, Option<String>> {
  pure((dir == "crates/app").then(|| format!("{}/Cargo.lock", dir)))
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  info!("--- Basic Context Effects Example ---");

  let env = Record::new()
    .with(fields::OWNER, "octo")
    .with(fields::REPO, "widgets")
    .with(fields::DEFAULT_BRANCH, "main")
    .with(fields::USER_BRANCH, "feature");

  // 3. Sequence: the second step only starts after the first one settled.
  let both_heads = then!(
    branch_head(fields::DEFAULT_BRANCH),
    |default_head: String| branch_head(fields::USER_BRANCH).map(move |user_head| (default_head.clone(), user_head)),
  );
  info!(result = ?both_heads.run(env.clone()).await, "Sequenced two leaf effects.");

  // 4. Fallback: a missing field fails the first alternative, the second one runs.
  let title = or(branch_head(fields::TITLE), pure("untitled".to_string()));
  info!(result = ?title.run(env.clone()).await, "Fell back to a default.");

  // 5. Scoped environment: `title` is only visible inside the overlay.
  let scoped = extend_config(Record::new().with(fields::TITLE, "release"), branch_head(fields::TITLE));
  info!(result = ?scoped.run(env.clone()).await, "Ran with an extended environment.");
  info!(has_title = env.contains(fields::TITLE), "Caller's environment is unchanged.");

  // 6. First success: candidates run in order, the search stops at the first `Some`.
  let lockfile = for_every_first(lockfile_in, ["crates/core", "crates/app", "crates/cli"]);
  info!(result = ?lockfile.run(env.clone()).await, "First directory with a lockfile.");

  // 7. Gate on the environment.
  let dry_run = or(when(|env: &Record| env.contains(fields::DRY_RUN), "dry run"), pure("live"));
  info!(mode = ?dry_run.run(env.with(fields::DRY_RUN, true)).await, "Selected mode.");
}
