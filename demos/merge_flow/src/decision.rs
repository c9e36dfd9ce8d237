// merge_flow/src/decision.rs

//! Classifies a branch comparison and decides whether a merge is needed.

use crate::hosting::Comparison;
use ctxflow::{fields, FlowResult, Record};
use serde::Serialize;

/// Where the target branch stands relative to the source branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BranchStatus {
  /// Target lacks commits from the source.
  Behind,
  /// Target has commits the source lacks, and nothing is missing.
  Ahead,
  Same,
  /// Both sides have commits the other lacks.
  Diverged,
}

impl BranchStatus {
  /// Reads a `target...source` comparison (target as base, source as head).
  pub fn from_comparison(comparison: &Comparison) -> Self {
    match (comparison.ahead_by, comparison.behind_by) {
      (0, 0) => BranchStatus::Same,
      (_, 0) => BranchStatus::Behind,
      (0, _) => BranchStatus::Ahead,
      _ => BranchStatus::Diverged,
    }
  }

  pub fn needs_merge(self) -> bool {
    matches!(self, BranchStatus::Behind | BranchStatus::Diverged)
  }

  pub fn label(self) -> &'static str {
    match self {
      BranchStatus::Behind => "branch-behind",
      BranchStatus::Ahead => "branch-ahead",
      BranchStatus::Same => "branch-is-same",
      BranchStatus::Diverged => "branch-diverged",
    }
  }
}

impl std::fmt::Display for BranchStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

/// Which configured branch is merged into which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
  DefaultIntoUser,
  UserIntoDefault,
}

impl Direction {
  /// Record key naming the branch whose commits are brought over.
  pub fn source_field(self) -> &'static str {
    match self {
      Direction::DefaultIntoUser => fields::DEFAULT_BRANCH,
      Direction::UserIntoDefault => fields::USER_BRANCH,
    }
  }

  /// Record key naming the branch that receives the merge.
  pub fn target_field(self) -> &'static str {
    match self {
      Direction::DefaultIntoUser => fields::USER_BRANCH,
      Direction::UserIntoDefault => fields::DEFAULT_BRANCH,
    }
  }

  /// The `base`/`head` pair for this direction: the target is the base, the source the head.
  pub fn branch_patch(self, env: &Record) -> FlowResult<Record> {
    Ok(
      Record::new()
        .with(fields::BASE, env.str_field(self.target_field())?)
        .with(fields::HEAD, env.str_field(self.source_field())?),
    )
  }
}
