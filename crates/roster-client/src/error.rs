//! Error type for `roster-client`.

use reqwest::{Method, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid backend url {url:?}: {reason}")]
  InvalidUrl { url: String, reason: String },

  #[error("request to backend failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{method} {path} returned {status}")]
  Status {
    method: Method,
    path:   String,
    status: StatusCode,
  },

  #[error("not found: {0}")]
  NotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
