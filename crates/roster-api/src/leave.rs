//! Handlers for leave requests.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/leave-requests` | Optional `?status=` and `?department_id=` |
//! | `GET`  | `/departments/{id}/leave-summary` | Optional `?date=YYYY-MM-DD`, default today |
//! | `POST` | `/leave-requests/{id}/{decision}` | `approve\|reject\|cancel`; body `{"reviewerId":"..."}` |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{NaiveDate, Utc};
use roster_core::{
  directory::Directory,
  leave::{LeaveDecision, LeaveRequest, LeaveStatus, LeaveSummary, summarize},
  membership::resolve_membership,
};
use serde::Deserialize;

use crate::{ApiState, departments::load_department, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub status:        Option<LeaveStatus>,
  /// Only requests from people in this department's resolved membership.
  #[serde(alias = "departmentId")]
  pub department_id: Option<String>,
}

/// `GET /leave-requests[?status=<status>][&department_id=<id>]`
pub async fn list<S: Directory>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<LeaveRequest>>, ApiError> {
  let store = &*state.store;
  let mut requests = store.list_leave_requests().await.map_err(ApiError::store)?;

  if let Some(status) = params.status {
    requests.retain(|request| request.status == status);
  }
  if let Some(department_id) = params.department_id.as_deref() {
    let department = load_department(store, department_id).await?;
    let users = store.list_users().await.map_err(ApiError::store)?;
    let membership = resolve_membership(Some(&department), Some(users.as_slice()));
    requests.retain(|request| membership.contains(&request.user_id));
  }
  Ok(Json(requests))
}

// ─── Summary ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
  pub date: Option<NaiveDate>,
}

/// `GET /departments/{id}/leave-summary[?date=YYYY-MM-DD]`
pub async fn summary<S: Directory>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Query(params): Query<SummaryParams>,
) -> Result<Json<LeaveSummary>, ApiError> {
  let store = &*state.store;
  let department = load_department(store, &id).await?;
  let (users, requests) =
    tokio::try_join!(store.list_users(), store.list_leave_requests())
      .map_err(ApiError::store)?;

  let membership = resolve_membership(Some(&department), Some(users.as_slice()));
  let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
  Ok(Json(summarize(&membership, &requests, date)))
}

// ─── Decide ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionBody {
  pub reviewer_id: Option<String>,
}

/// `POST /leave-requests/{id}/{decision}`, body `{"reviewerId":"u1"}`
pub async fn decide<S: Directory>(
  State(state): State<ApiState<S>>,
  Path((id, decision)): Path<(String, LeaveDecision)>,
  Json(body): Json<DecisionBody>,
) -> Result<Json<LeaveRequest>, ApiError> {
  let store = &*state.store;
  let reviewer_id = body.reviewer_id.filter(|reviewer| !reviewer.is_empty());
  if decision != LeaveDecision::Cancel && reviewer_id.is_none() {
    return Err(ApiError::BadRequest(format!(
      "reviewerId is required to {decision} a leave request"
    )));
  }

  let saved = store
    .decide_leave_request(&id, decision, reviewer_id.as_deref(), Utc::now())
    .await
    .map_err(ApiError::store)??;
  tracing::info!(leave_request = %saved.id, %decision, "leave request decided");
  Ok(Json(saved))
}
