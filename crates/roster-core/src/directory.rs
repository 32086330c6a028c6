//! The `Directory` trait: where departments, users, tasks and leave requests
//! come from.
//!
//! Implemented by providers (`roster-store-snapshot`, `roster-client`).
//! `roster-api` depends on this abstraction, not on any concrete provider.
//! Records returned by one call are treated as an immutable snapshot.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  assignment::MembershipUpdate,
  department::Department,
  leave::{LeaveDecision, LeaveRequest},
  task::Task,
  user::User,
};

/// Abstraction over a source of HR records.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait Directory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn list_departments(
    &self,
  ) -> impl Future<Output = Result<Vec<Department>, Self::Error>> + Send + '_;

  /// Returns `None` if no department has this id.
  fn get_department<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Department>, Self::Error>> + Send + 'a;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn list_tasks(
    &self,
  ) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send + '_;

  fn list_leave_requests(
    &self,
  ) -> impl Future<Output = Result<Vec<LeaveRequest>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Replace the membership lists of a department and return the stored
  /// record. Callers normalise and validate `update` first.
  fn update_membership<'a>(
    &'a self,
    department_id: &'a str,
    update: MembershipUpdate,
  ) -> impl Future<Output = Result<Department, Self::Error>> + Send + 'a;

  /// Apply `decision` to the stored leave request `id` and return the saved
  /// record. Reading the current status, checking the transition and writing
  /// the result happen as one step: of two racing decisions on a pending
  /// request, only one succeeds.
  ///
  /// The outer error is a provider failure. The inner one is
  /// [`Error::UnknownLeaveRequest`](crate::Error::UnknownLeaveRequest) or a
  /// refused transition.
  fn decide_leave_request<'a>(
    &'a self,
    id: &'a str,
    decision: LeaveDecision,
    reviewer_id: Option<&'a str>,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<crate::Result<LeaveRequest>, Self::Error>>
  + Send
  + 'a;
}
