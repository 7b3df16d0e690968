//! `cohort` — participant reconciliation from the command line.
//!
//! # Usage
//!
//! ```
//! cohort --url https://dashboard.example.org --app 1 --study 7 report
//! cohort --config ~/.config/cohort/config.toml export > taps.json
//! cohort --url http://localhost:9000 --app 1 serve --listen 127.0.0.1:8735
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cohort_client::{HttpSource, SourceConfig};
use cohort_core::source::FetchScope;
use cohort_service::Coordinator;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cohort", about = "Participant reconciliation and activity summaries")]
struct Args {
  /// Path to a TOML config file (url, username, password, app, study).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the upstream dashboard API.
  #[arg(long, env = "COHORT_URL")]
  url: Option<String>,

  /// API username (basic auth; omit for none).
  #[arg(long, env = "COHORT_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "COHORT_PASSWORD")]
  password: Option<String>,

  /// Application scope to fetch.
  #[arg(long, env = "COHORT_APP")]
  app: Option<i64>,

  /// Target study for enrollment windows.
  #[arg(long, env = "COHORT_STUDY")]
  study: Option<i64>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run one pass and print a per-subject summary.
  Report,
  /// Run one pass and print the merged export rows as JSON.
  Export,
  /// Serve the JSON API over HTTP.
  Serve {
    #[arg(long, default_value = "127.0.0.1:8735")]
    listen: String,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file. Flags and env override it.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
  #[serde(default)]
  app:      Option<i64>,
  #[serde(default)]
  study:    Option<i64>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let source_config = SourceConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .context("no upstream URL; pass --url or set it in the config file")?,
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };
  let app_id = args
    .app
    .or(file_cfg.app)
    .context("no application scope; pass --app or set it in the config file")?;
  let scope = FetchScope { app_id, study_id: args.study.or(file_cfg.study) };

  let source = HttpSource::new(source_config)?;
  let coordinator = Coordinator::new(source);

  match args.command {
    Command::Report => {
      let snapshot = coordinator.run_pass(scope).await?;
      print_report(&snapshot);
    }
    Command::Export => {
      let snapshot = coordinator.run_pass(scope).await?;
      serde_json::to_writer_pretty(std::io::stdout().lock(), &snapshot.export)
        .context("writing export rows")?;
      println!();
    }
    Command::Serve { listen } => {
      let router = cohort_api::api_router(coordinator, scope);
      let listener = TcpListener::bind(&listen)
        .await
        .with_context(|| format!("binding {listen}"))?;
      tracing::info!(%listen, "serving cohort API");
      axum::serve(listener, router).await.context("serving API")?;
    }
  }

  Ok(())
}

fn print_report(snapshot: &cohort_service::Snapshot) {
  println!(
    "pass {} at {} — {} subject(s)",
    snapshot.epoch,
    snapshot.taken_at.to_rfc3339(),
    snapshot.subjects.len()
  );
  for report in &snapshot.subjects {
    let side = if report.subject.enrollment_is_placeholder() {
      "device only"
    } else {
      "enrolled"
    };
    println!(
      "{:<12} {:<12} tap permission: {:<5} expires: {:<10} week: {:<4} active: {}",
      report.subject.participant_code,
      side,
      report.subject.tap_permission,
      report.expiry_label,
      report.activity.rolling_week_total,
      report.activity.active_today,
    );
    let days: Vec<String> = report
      .activity
      .buckets
      .iter()
      .map(|b| format!("{} {}", b.label, b.count))
      .collect();
    println!("             {}", days.join(" | "));
  }
}
