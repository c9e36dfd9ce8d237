// merge_flow/src/hosting/github.rs

//! GitHub REST implementation of `HostingApi` over reqwest.

use super::types::{Comparison, MergeCommit, PullRequest, User};
use super::HostingApi;
use anyhow::Context as _;
use ctxflow::{attempt, fields, then, traced, Effect, Empty, Record};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

const USER_AGENT: &str = "merge-flow";
const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// GitHub service. Holds only the HTTP client; server, repository and
/// credentials come from the environment of each run.
#[derive(Clone)]
pub struct GitHub {
  http: Client,
}

impl GitHub {
  pub fn new() -> Result<Self, reqwest::Error> {
    let http = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(Self { http })
  }
}

fn repo_url(env: &Record, path: &str) -> anyhow::Result<String> {
  Ok(format!("{}/repos/{}/{}{}", env.server()?, env.owner()?, env.repo()?, path))
}

/// Sends an authenticated request and decodes a JSON body. Non-2xx statuses are errors.
async fn send_json<T: DeserializeOwned>(request: RequestBuilder, env: &Record, what: &str) -> anyhow::Result<T> {
  let response = request
    .bearer_auth(env.token()?)
    .header(ACCEPT, GITHUB_JSON)
    .header(API_VERSION_HEADER, API_VERSION)
    .send()
    .await
    .with_context(|| format!("{} request could not be sent", what))?;

  let status = response.status();
  debug!(operation = what, %status, "Hosting API responded.");
  let response = response
    .error_for_status()
    .with_context(|| format!("{} was rejected", what))?;

  response
    .json::<T>()
    .await
    .with_context(|| format!("{} returned an unexpected body", what))
}

impl HostingApi for GitHub {
  fn current_user(&self) -> Effect<Record, User> {
    let http = self.http.clone();
    traced(
      "current_user",
      attempt("current_user", move |env: Record| {
        let http = http.clone();
        async move {
          let url = format!("{}/user", env.server()?);
          send_json(http.get(url), &env, "GET /user").await
        }
      }),
    )
  }

  fn fetch_pull_request(&self) -> Effect<Record, PullRequest> {
    let http = self.http.clone();
    traced(
      "fetch_pull_request",
      attempt("fetch_pull_request", move |env: Record| {
        let http = http.clone();
        async move {
          let id = env.u64_field(fields::ID)?;
          let url = repo_url(&env, &format!("/pulls/{}", id))?;
          send_json(http.get(url), &env, "GET pull request").await
        }
      }),
    )
  }

  fn find_pull_request(&self) -> Effect<Record, Option<PullRequest>> {
    let http = self.http.clone();
    traced(
      "find_pull_request",
      attempt("find_pull_request", move |env: Record| {
        let http = http.clone();
        async move {
          let url = repo_url(&env, "/pulls")?;
          // The list endpoint filters `head` by "owner:branch".
          let head = format!("{}:{}", env.owner()?, env.str_field(fields::HEAD)?);
          let base = env.str_field(fields::BASE)?.to_string();
          let request = http.get(url).query(&[("state", "open"), ("head", head.as_str()), ("base", base.as_str())]);
          let open: Vec<PullRequest> = send_json(request, &env, "GET open pull requests").await?;
          Ok::<_, anyhow::Error>(open.into_iter().next())
        }
      }),
    )
  }

  fn create_pull_request(&self) -> Effect<Record, PullRequest> {
    let http = self.http.clone();
    traced(
      "create_pull_request",
      attempt("create_pull_request", move |env: Record| {
        let http = http.clone();
        async move {
          let url = repo_url(&env, "/pulls")?;
          let head = env.str_field(fields::HEAD)?;
          let base = env.str_field(fields::BASE)?;
          let title = match env.opt_str_field(fields::TITLE)? {
            Some(title) => title.to_string(),
            None => format!("Merge {} into {}", head, base),
          };
          let body = json!({
            "title": title,
            "head": head,
            "base": base,
            "body": env.opt_str_field(fields::DESCRIPTION)?,
          });
          send_json(http.post(url).json(&body), &env, "POST pull request").await
        }
      }),
    )
  }

  fn merge_pull_request(&self) -> Effect<Record, MergeCommit> {
    let http = self.http.clone();
    traced(
      "merge_pull_request",
      attempt("merge_pull_request", move |env: Record| {
        let http = http.clone();
        async move {
          let id = env.u64_field(fields::ID)?;
          let url = repo_url(&env, &format!("/pulls/{}/merge", id))?;
          let body = json!({ "merge_method": "merge" });
          let commit: MergeCommit = send_json(http.put(url).json(&body), &env, "PUT merge").await?;
          anyhow::ensure!(commit.merged, "pull request {} was not merged: {}", id, commit.message);
          Ok::<_, anyhow::Error>(commit)
        }
      }),
    )
  }

  fn compare_branches(&self) -> Effect<Record, Comparison> {
    let http = self.http.clone();
    traced(
      "compare_branches",
      attempt("compare_branches", move |env: Record| {
        let http = http.clone();
        async move {
          let base = env.str_field(fields::BASE)?;
          let head = env.str_field(fields::HEAD)?;
          let url = repo_url(&env, &format!("/compare/{}...{}", base, head))?;
          send_json(http.get(url), &env, "GET compare").await
        }
      }),
    )
  }

  fn file_changed(&self) -> Effect<Record, Option<String>> {
    then(self.compare_branches(), |comparison: Comparison| {
      Effect::new(move |env: Record| {
        let touched = env
          .str_field(fields::FILENAME)
          .map(|filename| comparison.touches(filename).then(|| filename.to_string()))
          .map_err(Empty::from);
        async move { touched }
      })
    })
  }
}
