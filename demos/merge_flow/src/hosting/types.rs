// merge_flow/src/hosting/types.rs

//! Payloads returned by the hosting API. Only the fields the workflows read are kept.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
  #[serde(rename = "ref")]
  pub name: String,
  pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
  pub number: u64,
  pub html_url: String,
  pub title: String,
  pub state: String,
  pub head: BranchRef,
  pub base: BranchRef,
}

/// Response of the merge endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeCommit {
  pub sha: String,
  pub merged: bool,
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
  pub filename: String,
}

/// Result of comparing `base...head`.
///
/// `ahead_by` counts commits on `head` missing from `base`, `behind_by` the reverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
  pub status: String,
  pub ahead_by: u64,
  pub behind_by: u64,
  #[serde(default)]
  pub files: Vec<ChangedFile>,
}

impl Comparison {
  pub fn touches(&self, filename: &str) -> bool {
    self.files.iter().any(|f| f.filename == filename)
  }
}
