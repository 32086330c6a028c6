//! Error type for `roster-store-snapshot`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read or write {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("department not found: {0}")]
  DepartmentNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
