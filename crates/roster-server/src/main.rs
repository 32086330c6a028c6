//! roster-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! configured directory provider, and serves the Roster API over HTTP.
//!
//! ```text
//! roster-server --config config.toml
//! roster-server --check            # resolve every department once and exit
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use roster_client::BackendClient;
use roster_core::directory::Directory;
use roster_server::{Provider, ServerConfig, app, check, expand_tilde};
use roster_store_snapshot::SnapshotStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster department directory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load the provider, resolve every department once, log a summary and
  /// exit.
  #[arg(long)]
  check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).with_context(|| {
    format!("failed to load configuration from {}", cli.config.display())
  })?;

  match server_cfg.provider {
    Provider::Snapshot => {
      let path = expand_tilde(&server_cfg.snapshot_path);
      let store = SnapshotStore::open(&path)
        .await
        .with_context(|| format!("failed to open snapshot at {path:?}"))?;
      run(store, &server_cfg, cli.check).await
    }
    Provider::Http => {
      let client = BackendClient::new(server_cfg.backend())
        .context("failed to build backend client")?;
      tracing::info!(backend = %server_cfg.backend_url, "using HTTP backend");
      run(client, &server_cfg, cli.check).await
    }
  }
}

async fn run<S>(store: S, server_cfg: &ServerConfig, check_only: bool) -> anyhow::Result<()>
where
  S: Directory + 'static,
{
  if check_only {
    check(&store).await.context("directory check failed")?;
    return Ok(());
  }

  let app = app(Arc::new(store), server_cfg.default_page_size);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
