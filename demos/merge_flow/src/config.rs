// merge_flow/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use ctxflow::{fields, Record};
use dotenvy::dotenv;
use std::env;

const DEFAULT_SERVER: &str = "https://api.github.com";
const DEFAULT_BRANCH: &str = "main";

#[derive(Clone)]
pub struct AppConfig {
  pub server: String,
  pub owner: String,
  pub repo: String,
  pub default_branch: String,
  pub user_branch: String,
  pub token: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server = get_env("FLOW_SERVER").unwrap_or_else(|_| DEFAULT_SERVER.to_string());
    let owner = get_env("FLOW_OWNER")?;
    let repo = get_env("FLOW_REPO")?;
    let default_branch = get_env("FLOW_DEFAULT_BRANCH").unwrap_or_else(|_| DEFAULT_BRANCH.to_string());
    let user_branch = get_env("FLOW_USER_BRANCH")?;
    let token = get_env("FLOW_TOKEN")?;

    if default_branch == user_branch {
      return Err(AppError::Config(format!(
        "FLOW_USER_BRANCH must differ from the default branch '{}'",
        default_branch
      )));
    }

    tracing::info!(%server, %owner, %repo, "Application configuration loaded successfully.");

    Ok(Self {
      server: server.trim_end_matches('/').to_string(),
      owner,
      repo,
      default_branch,
      user_branch,
      token,
    })
  }

  /// The environment record every workflow run starts from.
  pub fn to_record(&self) -> Record {
    Record::new()
      .with(fields::SERVER, self.server.as_str())
      .with(fields::OWNER, self.owner.as_str())
      .with(fields::REPO, self.repo.as_str())
      .with(fields::DEFAULT_BRANCH, self.default_branch.as_str())
      .with(fields::USER_BRANCH, self.user_branch.as_str())
      .with(fields::TOKEN, self.token.as_str())
  }
}

// The token never reaches logs.
impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("server", &self.server)
      .field("owner", &self.owner)
      .field("repo", &self.repo)
      .field("default_branch", &self.default_branch)
      .field("user_branch", &self.user_branch)
      .field("token", &"[REDACTED]")
      .finish()
  }
}
