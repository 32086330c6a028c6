//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A membership or leave rule was violated.
  #[error(transparent)]
  Rule(#[from] roster_core::Error),

  #[error("failed to encode response: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("directory error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(err))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Rule(roster_core::Error::UnknownLeaveRequest(_)) => {
        StatusCode::NOT_FOUND
      }
      ApiError::Rule(roster_core::Error::InvalidTransition { .. }) => {
        StatusCode::CONFLICT
      }
      ApiError::Rule(_) => StatusCode::BAD_REQUEST,
      ApiError::Encode(e) => {
        tracing::error!(error = %e, "failed to encode response");
        StatusCode::INTERNAL_SERVER_ERROR
      }
      ApiError::Store(e) => {
        tracing::warn!(error = %e, "directory call failed");
        StatusCode::BAD_GATEWAY
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
