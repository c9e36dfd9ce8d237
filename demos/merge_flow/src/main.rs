// merge_flow/src/main.rs

// Declare modules for the application
mod config;
mod decision;
mod errors;
mod hosting;
mod workflows;

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};
use crate::hosting::GitHub;

use clap::{Args, Parser, Subcommand};
use ctxflow::{fields, Effect, Record};
use serde::Serialize;
use std::sync::Arc;
use tracing::{instrument, Level};
use tracing_subscriber::fmt::format::FmtSpan;

/// Keeps a personal branch and the default branch of a hosted repository in sync.
#[derive(Debug, Parser)]
#[command(name = "merge-flow", version)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Show the authenticated user and where both branches stand.
  Status,
  /// Merge the default branch into the user branch if the user branch is behind.
  DefaultIntoUser(MergeArgs),
  /// Merge the user branch into the default branch if the default branch is behind.
  UserIntoDefault {
    #[command(flatten)]
    merge: MergeArgs,
    /// Only merge when one of these files changed (repeatable).
    #[arg(long = "watch", value_name = "FILE")]
    watch: Vec<String>,
  },
  /// Print a pull request.
  Pull {
    id: u64,
  },
}

#[derive(Debug, Args)]
struct MergeArgs {
  /// Report what would be merged without opening or merging anything.
  #[arg(long)]
  dry_run: bool,
  /// Title for a newly opened pull request.
  #[arg(long)]
  title: Option<String>,
  /// Body for a newly opened pull request.
  #[arg(long)]
  description: Option<String>,
}

impl MergeArgs {
  fn apply(&self, record: Record) -> Record {
    let record = record.with(fields::DRY_RUN, self.dry_run);
    let record = match &self.title {
      Some(title) => record.with(fields::TITLE, title.as_str()),
      None => record,
    };
    match &self.description {
      Some(description) => record.with(fields::DESCRIPTION, description.as_str()),
      None => record,
    }
  }
}

/// Runs `effect` once against `record` and turns a payload-less failure into an `AppError`.
async fn run_effect<A: Send + 'static>(operation: &'static str, effect: Effect<Record, A>, record: Record) -> AppResult<A> {
  effect
    .run(record)
    .await
    .map_err(|_| AppError::EffectFailed { operation })
}

fn print_json(value: &impl Serialize) -> AppResult<()> {
  let rendered = serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.to_string()))?;
  println!("{}", rendered);
  Ok(())
}

#[instrument(name = "merge_flow::run_command", skip(config, api))]
async fn run_command(command: Command, config: &AppConfig, api: Arc<GitHub>) -> AppResult<()> {
  let record = config.to_record();

  match command {
    Command::Status => {
      let report = run_effect("status", workflows::branch_report(api), record).await?;
      print_json(&report)
    }
    Command::DefaultIntoUser(merge) => {
      let outcome = run_effect(
        "default-into-user",
        workflows::merge_default_into_user(api),
        merge.apply(record),
      )
      .await?;
      print_json(&outcome)
    }
    Command::UserIntoDefault { merge, watch } => {
      let mut record = merge.apply(record);
      if !watch.is_empty() {
        record = record.with(fields::FILENAME, watch.join(","));
      }
      let outcome = run_effect("user-into-default", workflows::merge_user_into_default(api), record).await?;
      print_json(&outcome)
    }
    Command::Pull { id } => {
      let pr = run_effect("pull", workflows::pull_request(&*api, id), record).await?;
      print_json(&pr)
    }
  }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let result = async {
    let config = AppConfig::from_env()?;
    let api = Arc::new(GitHub::new()?);
    run_command(cli.command, &config, api).await
  }
  .await;

  match result {
    Ok(()) => std::process::ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!(error = %e, "merge-flow failed.");
      std::process::ExitCode::FAILURE
    }
  }
}
