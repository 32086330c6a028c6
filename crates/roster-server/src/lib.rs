//! Roster HTTP server.
//!
//! Loads [`ServerConfig`], picks a [`Directory`] provider and serves the
//! [`roster_api`] router under `/api`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::{Router, routing::get};
use config::ConfigError;
use roster_api::{ApiState, api_router};
use roster_client::BackendConfig;
use roster_core::{directory::Directory, membership::resolve_membership};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Where department, user, task and leave records come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
  /// A local JSON snapshot file.
  #[default]
  Snapshot,
  /// The HR backend's REST API.
  Http,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub provider:             Provider,
  pub snapshot_path:        PathBuf,
  pub backend_url:          String,
  pub backend_token:        Option<String>,
  pub request_timeout_secs: u64,
  pub default_page_size:    usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "127.0.0.1".to_string(),
      port:                 5240,
      provider:             Provider::Snapshot,
      snapshot_path:        PathBuf::from("roster.json"),
      backend_url:          "http://localhost:5000/api".to_string(),
      backend_token:        None,
      request_timeout_secs: 30,
      default_page_size:    10,
    }
  }
}

impl ServerConfig {
  /// Layer the file at `path` (if it exists) under `ROSTER_*` variables.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ROSTER").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn backend(&self) -> BackendConfig {
    BackendConfig {
      base_url: self.backend_url.clone(),
      token:    self.backend_token.clone(),
      timeout:  Duration::from_secs(self.request_timeout_secs),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: `/health` plus the API nested under `/api`, with
/// request tracing.
pub fn app<S>(store: Arc<S>, default_page_size: usize) -> Router
where
  S: Directory + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", api_router(ApiState::new(store, default_page_size)))
    .layer(TraceLayer::new_for_http())
}

// ─── Check mode ───────────────────────────────────────────────────────────────

/// What `--check` found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
  pub departments: usize,
  pub users:       usize,
  pub tasks:       usize,
  /// Ids of departments with no head, managers or members.
  pub empty:       Vec<String>,
}

/// Load every collection once and resolve each department's membership.
pub async fn check<S: Directory>(store: &S) -> Result<CheckReport, S::Error> {
  let departments = store.list_departments().await?;
  let users = store.list_users().await?;
  let tasks = store.list_tasks().await?;

  let mut empty = Vec::new();
  for department in &departments {
    let membership = resolve_membership(Some(department), Some(users.as_slice()));
    tracing::debug!(
      department = %department.id,
      head = ?membership.head.as_ref().map(|head| &head.id),
      managers = membership.managers.len(),
      members = membership.members.len(),
      "resolved"
    );
    if membership.is_empty() {
      empty.push(department.id.clone());
    }
  }

  let report = CheckReport {
    departments: departments.len(),
    users: users.len(),
    tasks: tasks.len(),
    empty,
  };
  tracing::info!(
    departments = report.departments,
    users = report.users,
    tasks = report.tasks,
    empty = report.empty.len(),
    "directory check complete"
  );
  Ok(report)
}
