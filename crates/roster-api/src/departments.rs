//! Handlers for `/departments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/departments` | `?search=&size=&performance=&sort=&direction=&page=&pageSize=` |
//! | `GET`  | `/departments/{id}` | 404 if not found |
//! | `GET`  | `/departments/{id}/membership` | `ETag`; honours `If-None-Match` |
//! | `PUT`  | `/departments/{id}/membership` | Body: `{"headId":..,"managerIds":[..],"memberIds":[..]}` |
//! | `GET`  | `/departments/{id}/candidates` | `?slot=head\|manager\|member` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::Utc;
use roster_core::{
  analytics::{DepartmentAnalytics, analyze},
  assignment::{MembershipUpdate, Slot, candidates as eligible},
  department::Department,
  directory::Directory,
  membership::{ResolvedMembership, resolve_membership},
  task::Task,
  user::User,
  view::{DepartmentRow, Page, ViewParams, build_rows, derive_page},
};
use serde::{Deserialize, Serialize};

use crate::{
  ApiState,
  error::ApiError,
  etag::{if_none_match, membership_etag},
};

/// Fetch department `id` or fail with 404.
pub(crate) async fn load_department<S: Directory>(
  store: &S,
  id: &str,
) -> Result<Department, ApiError> {
  store
    .get_department(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("department {id} not found")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /departments`
pub async fn list<S: Directory>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ViewParams>,
) -> Result<Json<Page<DepartmentRow>>, ApiError> {
  let store = &*state.store;
  let (departments, users, tasks) = tokio::try_join!(
    store.list_departments(),
    store.list_users(),
    store.list_tasks(),
  )
  .map_err(ApiError::store)?;

  let rows = build_rows(&departments, &users, &tasks, Utc::now());
  Ok(Json(derive_page(rows, &params, state.default_page_size)))
}

// ─── Detail ───────────────────────────────────────────────────────────────────

/// A department with everything derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDetail {
  pub department: Department,
  pub membership: ResolvedMembership,
  pub analytics:  DepartmentAnalytics,
  pub is_empty:   bool,
}

impl DepartmentDetail {
  fn build(department: Department, users: &[User], tasks: &[Task]) -> Self {
    let membership = resolve_membership(Some(&department), Some(users));
    let analytics = analyze(Some(&department), tasks, Utc::now());
    Self {
      is_empty: membership.is_empty(),
      department,
      membership,
      analytics,
    }
  }
}

/// `GET /departments/{id}`
pub async fn get_one<S: Directory>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<DepartmentDetail>, ApiError> {
  let store = &*state.store;
  let department = load_department(store, &id).await?;
  let (users, tasks) = tokio::try_join!(store.list_users(), store.list_tasks())
    .map_err(ApiError::store)?;
  Ok(Json(DepartmentDetail::build(department, &users, &tasks)))
}

// ─── Membership ───────────────────────────────────────────────────────────────

/// `GET /departments/{id}/membership`
pub async fn membership<S: Directory>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let store = &*state.store;
  let department = load_department(store, &id).await?;
  let users = store.list_users().await.map_err(ApiError::store)?;

  let membership = resolve_membership(Some(&department), Some(users.as_slice()));
  let etag = membership_etag(&membership)?;

  if if_none_match(&headers, &etag) {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }
  Ok(([(header::ETAG, etag)], Json(membership)).into_response())
}

/// `PUT /departments/{id}/membership`
///
/// The update is normalised, checked against the current users, and only
/// then handed to the directory.
pub async fn update_membership<S: Directory>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Json(update): Json<MembershipUpdate>,
) -> Result<Json<DepartmentDetail>, ApiError> {
  let store = &*state.store;
  load_department(store, &id).await?;
  let users = store.list_users().await.map_err(ApiError::store)?;

  let update = update.normalize();
  update.validate(&users)?;

  let stored = store
    .update_membership(&id, update)
    .await
    .map_err(ApiError::store)?;
  let tasks = store.list_tasks().await.map_err(ApiError::store)?;
  Ok(Json(DepartmentDetail::build(stored, &users, &tasks)))
}

// ─── Candidates ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CandidateParams {
  pub slot: Slot,
}

/// `GET /departments/{id}/candidates?slot=<slot>`
pub async fn candidates<S: Directory>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Query(params): Query<CandidateParams>,
) -> Result<Json<Vec<User>>, ApiError> {
  let store = &*state.store;
  load_department(store, &id).await?;
  let users = store.list_users().await.map_err(ApiError::store)?;
  Ok(Json(eligible(params.slot, &users).into_iter().cloned().collect()))
}
