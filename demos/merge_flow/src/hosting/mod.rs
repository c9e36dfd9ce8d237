// merge_flow/src/hosting/mod.rs

//! Leaf effects against the source-control hosting API.
//!
//! Every operation is a context effect over the environment `Record`; request
//! parameters (`id`, `base`, `head`, `filename`...) are read from the record, so
//! workflows pin them with `extend_config` instead of passing arguments around.

mod github;
mod types;

pub use github::GitHub;
pub use types::{BranchRef, ChangedFile, Comparison, MergeCommit, PullRequest, User};

use ctxflow::{Effect, Record};

/// The hosting-API operations the workflows are built from.
///
/// Implemented by `GitHub` for real runs and by in-memory stubs in tests.
pub trait HostingApi: Send + Sync + 'static {
  /// The authenticated user.
  fn current_user(&self) -> Effect<Record, User>;

  /// The pull request numbered `id`.
  fn fetch_pull_request(&self) -> Effect<Record, PullRequest>;

  /// The open pull request from `head` into `base`, if there is one.
  fn find_pull_request(&self) -> Effect<Record, Option<PullRequest>>;

  /// Opens a pull request from `head` into `base`, titled `title` (or a generated
  /// title) with `description` as its body.
  fn create_pull_request(&self) -> Effect<Record, PullRequest>;

  /// Merges pull request `id`.
  fn merge_pull_request(&self) -> Effect<Record, MergeCommit>;

  /// Compares `base...head`.
  fn compare_branches(&self) -> Effect<Record, Comparison>;

  /// `Some(filename)` when `filename` changed between `base` and `head`.
  fn file_changed(&self) -> Effect<Record, Option<String>>;
}
