// merge_flow/src/workflows.rs

//! The check-then-merge workflows, composed from hosting-API leaf effects.
//!
//! Each workflow is a single `Effect<Record, _>`. The record supplies server,
//! repository, branches and token; `base`/`head`/`id`/`filename` are pinned for
//! sub-computations with `extend_config`.

use crate::decision::{BranchStatus, Direction};
use crate::hosting::{Comparison, HostingApi, PullRequest, User};
use ctxflow::prelude::*;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum MergeOutcome {
  /// The target already contains the source.
  UpToDate { status: BranchStatus },
  /// A merge is needed but `dry_run` was set.
  DryRun { status: BranchStatus },
  Merged { number: u64, sha: String },
  Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
  pub login: String,
  pub default_into_user: BranchStatus,
  pub user_into_default: BranchStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum WatchedChange {
  /// No watch list configured.
  Unwatched,
  Changed(String),
  Unchanged,
}

/// Runs `effect` with `base`/`head` pinned to the branches of `direction`.
fn between_branches<A: Send + 'static>(direction: Direction, effect: Effect<Record, A>) -> Effect<Record, A> {
  let patch = Effect::new(move |env: Record| {
    let patch = direction.branch_patch(&env).map_err(Empty::from);
    async move { patch }
  });
  then(patch, move |patch: Record| extend_config(patch, effect.clone()))
}

fn branch_status<H: HostingApi>(api: &H) -> Effect<Record, BranchStatus> {
  api
    .compare_branches()
    .map(|comparison: Comparison| BranchStatus::from_comparison(&comparison))
}

/// Reuses the open pull request from `head` into `base`, or opens one.
fn open_pull_request<H: HostingApi>(api: &H) -> Effect<Record, PullRequest> {
  or(some_or_empty(api.find_pull_request()), api.create_pull_request())
}

fn merge_open_pull_request<H: HostingApi>(api: Arc<H>) -> Effect<Record, MergeOutcome> {
  let merger = Arc::clone(&api);
  then(open_pull_request(&*api), move |pr: PullRequest| {
    let number = pr.number;
    extend_config(Record::new().with(fields::ID, number), merger.merge_pull_request())
      .map(move |commit| MergeOutcome::Merged { number, sha: commit.sha })
  })
}

fn is_dry_run(env: &Record) -> bool {
  env.bool_field(fields::DRY_RUN).unwrap_or(false)
}

/// Compares `base...head` and merges through a pull request when the base is behind.
fn check_then_merge<H: HostingApi>(api: Arc<H>) -> Effect<Record, MergeOutcome> {
  then(branch_status(&*api), move |status: BranchStatus| {
    if !status.needs_merge() {
      return pure(MergeOutcome::UpToDate { status });
    }
    or(
      when(is_dry_run, MergeOutcome::DryRun { status }),
      merge_open_pull_request(Arc::clone(&api)),
    )
  })
}

/// Comma-separated `filename` field, blank entries dropped.
fn watch_list(env: &Record) -> Vec<String> {
  env
    .str_field(fields::FILENAME)
    .map(|list| {
      list
        .split(',')
        .map(str::trim)
        .filter(|file| !file.is_empty())
        .map(String::from)
        .collect()
    })
    .unwrap_or_default()
}

fn watched_change<H: HostingApi>(api: Arc<H>) -> Effect<Record, WatchedChange> {
  then(asks(watch_list), move |files: Vec<String>| {
    if files.is_empty() {
      return pure(WatchedChange::Unwatched);
    }
    let api = Arc::clone(&api);
    let first_changed = for_every_first(
      move |file: String| extend_config(Record::new().with(fields::FILENAME, file), api.file_changed()),
      files,
    );
    or(first_changed.map(WatchedChange::Changed), pure(WatchedChange::Unchanged))
  })
}

/// Brings the default branch into the user branch when the user branch is behind.
pub fn merge_default_into_user<H: HostingApi>(api: Arc<H>) -> Effect<Record, MergeOutcome> {
  traced(
    "merge_default_into_user",
    between_branches(Direction::DefaultIntoUser, check_then_merge(api)),
  )
}

/// Brings the user branch into the default branch when the default branch is behind.
///
/// With a watch list in `filename`, the merge only happens if one of the listed
/// files changed; otherwise the outcome is `Skipped`.
pub fn merge_user_into_default<H: HostingApi>(api: Arc<H>) -> Effect<Record, MergeOutcome> {
  let merge = check_then_merge(Arc::clone(&api));
  let gated = then(watched_change(api), move |change: WatchedChange| match change {
    WatchedChange::Unchanged => pure(MergeOutcome::Skipped {
      reason: "none of the watched files changed".to_string(),
    }),
    WatchedChange::Changed(file) => {
      tracing::debug!(%file, "Watched file changed, continuing with merge check.");
      merge.clone()
    }
    WatchedChange::Unwatched => merge.clone(),
  });
  traced(
    "merge_user_into_default",
    between_branches(Direction::UserIntoDefault, gated),
  )
}

/// Who is authenticated, and where both branches stand.
pub fn branch_report<H: HostingApi>(api: Arc<H>) -> Effect<Record, StatusReport> {
  let into_user = between_branches(Direction::DefaultIntoUser, branch_status(&*api));
  let into_default = between_branches(Direction::UserIntoDefault, branch_status(&*api));
  then!(
    api.current_user(),
    move |user: User| into_user.clone().map(move |status| (user.login.clone(), status)),
    move |(login, default_into_user): (String, BranchStatus)| {
      into_default.clone().map(move |user_into_default| StatusReport {
        login: login.clone(),
        default_into_user,
        user_into_default,
      })
    },
  )
}

/// Pull request `id`, regardless of what the caller's record holds for `id`.
pub fn pull_request<H: HostingApi>(api: &H, id: u64) -> Effect<Record, PullRequest> {
  extend_config(Record::new().with(fields::ID, id), api.fetch_pull_request())
}
