//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::directory::Directory`].
//! Auth, TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(ApiState::new(store, 10)))
//! ```

pub mod departments;
pub mod error;
pub mod etag;
pub mod leave;


use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use roster_core::directory::Directory;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:             Arc<S>,
  /// Page size used when a list query omits `pageSize`.
  pub default_page_size: usize,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, default_page_size: usize) -> Self {
    Self { store, default_page_size }
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:             Arc::clone(&self.store),
      default_page_size: self.default_page_size,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: Directory + 'static,
{
  Router::new()
    // Departments
    .route("/departments", get(departments::list::<S>))
    .route("/departments/{id}", get(departments::get_one::<S>))
    .route(
      "/departments/{id}/membership",
      get(departments::membership::<S>).put(departments::update_membership::<S>),
    )
    .route("/departments/{id}/candidates", get(departments::candidates::<S>))
    .route("/departments/{id}/leave-summary", get(leave::summary::<S>))
    // Leave requests
    .route("/leave-requests", get(leave::list::<S>))
    .route("/leave-requests/{id}/{decision}", post(leave::decide::<S>))
    .with_state(state)
}
