// ctxflow/src/core/record.rs

//! The environment record: an immutable, string-keyed set of JSON values that
//! composed effects read their configuration from.

use crate::error::{FlowError, FlowResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Well-known record keys used by hosting-API workflows.
pub mod fields {
  pub const SERVER: &str = "server";
  pub const OWNER: &str = "owner";
  pub const REPO: &str = "repo";
  pub const DEFAULT_BRANCH: &str = "default_branch";
  pub const USER_BRANCH: &str = "user_branch";
  pub const TOKEN: &str = "token";
  /// Pull request number.
  pub const ID: &str = "id";
  pub const FILENAME: &str = "filename";
  pub const DESCRIPTION: &str = "description";
  pub const TITLE: &str = "title";
  pub const BASE: &str = "base";
  pub const HEAD: &str = "head";
  pub const DRY_RUN: &str = "dry_run";
}

/// Copy-with-override of an environment.
///
/// `overlay` must return a new value; `self` is left as it was. Keys present in
/// `patch` take precedence.
pub trait Overlay<Patch>: Sized {
  fn overlay(&self, patch: &Patch) -> Self;
}

/// An immutable environment record.
///
/// Clones share storage. `with` and `overlay` copy on write, so no holder of a
/// record ever sees it change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record(Arc<BTreeMap<String, Value>>);

impl Record {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a record from a JSON object.
  pub fn from_json(value: Value) -> FlowResult<Self> {
    match value {
      Value::Object(map) => Ok(map.into_iter().collect()),
      other => Err(FlowError::NotAnObject {
        found: json_kind(&other).to_string(),
      }),
    }
  }

  /// Returns a new record with `key` set to `value`.
  pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    Arc::make_mut(&mut self.0).insert(key.into(), value.into());
    self
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn contains(&self, key: &str) -> bool {
    self.0.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn str_field(&self, key: &str) -> FlowResult<&str> {
    self
      .require(key)?
      .as_str()
      .ok_or_else(|| mismatch(key, "string"))
  }

  /// Reads an optional string field. A present field of another type is still an error.
  pub fn opt_str_field(&self, key: &str) -> FlowResult<Option<&str>> {
    match self.get(key) {
      None | Some(Value::Null) => Ok(None),
      Some(value) => value.as_str().map(Some).ok_or_else(|| mismatch(key, "string")),
    }
  }

  /// Reads a boolean flag. A missing field reads as `false`.
  pub fn bool_field(&self, key: &str) -> FlowResult<bool> {
    match self.get(key) {
      None | Some(Value::Null) => Ok(false),
      Some(value) => value.as_bool().ok_or_else(|| mismatch(key, "boolean")),
    }
  }

  /// Reads an unsigned integer, also accepting its decimal string form
  /// (ids often arrive as command-line strings).
  pub fn u64_field(&self, key: &str) -> FlowResult<u64> {
    let value = self.require(key)?;
    value
      .as_u64()
      .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
      .ok_or_else(|| mismatch(key, "unsigned integer"))
  }

  pub fn server(&self) -> FlowResult<&str> {
    self.str_field(fields::SERVER)
  }

  pub fn owner(&self) -> FlowResult<&str> {
    self.str_field(fields::OWNER)
  }

  pub fn repo(&self) -> FlowResult<&str> {
    self.str_field(fields::REPO)
  }

  pub fn token(&self) -> FlowResult<&str> {
    self.str_field(fields::TOKEN)
  }

  fn require(&self, key: &str) -> FlowResult<&Value> {
    self.get(key).ok_or_else(|| FlowError::MissingField {
      field: key.to_string(),
    })
  }
}

impl Overlay<Record> for Record {
  fn overlay(&self, patch: &Record) -> Self {
    if patch.is_empty() {
      return self.clone();
    }
    let mut merged = (*self.0).clone();
    merged.extend(patch.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    Record(Arc::new(merged))
  }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Record(Arc::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect()))
  }
}

impl TryFrom<Value> for Record {
  type Error = FlowError;

  fn try_from(value: Value) -> FlowResult<Self> {
    Record::from_json(value)
  }
}

fn mismatch(key: &str, expected: &'static str) -> FlowError {
  FlowError::TypeMismatch {
    field: key.to_string(),
    expected,
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
