//! Async HTTP client for the HR backend.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use roster_core::{
  assignment::MembershipUpdate,
  department::Department,
  directory::Directory,
  leave::{LeaveDecision, LeaveRequest},
  task::Task,
  user::User,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Error, Result};

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
  /// e.g. `http://localhost:5000/api`
  pub base_url: String,
  /// Sent as `Authorization: Bearer <token>` when set.
  pub token:    Option<String>,
  pub timeout:  Duration,
}

/// The backend answers list and item calls either with the bare payload or
/// wrapped as `{"data": ...}`.
///
/// `Wrapped` is tried first: records default every missing field, so a
/// wrapped item would otherwise also parse as an empty bare one.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
  Wrapped { data: T },
  Bare(T),
}

impl<T> Envelope<T> {
  fn into_inner(self) -> T {
    match self {
      Self::Wrapped { data: inner } | Self::Bare(inner) => inner,
    }
  }
}

/// [`Directory`] over the backend's REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct BackendClient {
  client: Client,
  base:   Url,
  token:  Option<String>,
}

impl BackendClient {
  pub fn new(config: BackendConfig) -> Result<Self> {
    let invalid = |reason: &str| Error::InvalidUrl {
      url:    config.base_url.clone(),
      reason: reason.to_owned(),
    };
    let base =
      Url::parse(&config.base_url).map_err(|e| invalid(&e.to_string()))?;
    if base.cannot_be_a_base() {
      return Err(invalid("cannot be a base url"));
    }

    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, base, token: config.token })
  }

  /// Append percent-encoded `segments` to the base url.
  fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
    let req = self.client.request(method, self.url(segments));
    match &self.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  /// Send `req`; `Ok(None)` on 404, an error on any other failure status.
  async fn send<T: DeserializeOwned>(
    &self,
    method: Method,
    segments: &[&str],
    body: Option<&(impl Serialize + Sync)>,
  ) -> Result<Option<T>> {
    let path = format!("/{}", segments.join("/"));

    let mut req = self.request(method.clone(), segments);
    if let Some(body) = body {
      req = req.json(body);
    }

    tracing::debug!(%method, %path, "calling backend");
    let resp = req.send().await?;
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !status.is_success() {
      return Err(Error::Status { method, path, status });
    }
    let envelope: Envelope<T> = resp.json().await?;
    Ok(Some(envelope.into_inner()))
  }

  async fn get_list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
    let list: Option<Vec<T>> =
      self.send(Method::GET, &[collection], None::<&()>).await?;
    list.ok_or_else(|| Error::NotFound(format!("/{collection}")))
  }
}

impl Directory for BackendClient {
  type Error = Error;

  async fn list_departments(&self) -> Result<Vec<Department>> {
    self.get_list("departments").await
  }

  async fn get_department(&self, id: &str) -> Result<Option<Department>> {
    self
      .send(Method::GET, &["departments", id], None::<&()>)
      .await
  }

  async fn list_users(&self) -> Result<Vec<User>> { self.get_list("users").await }

  async fn list_tasks(&self) -> Result<Vec<Task>> { self.get_list("tasks").await }

  async fn list_leave_requests(&self) -> Result<Vec<LeaveRequest>> {
    self.get_list("leave-requests").await
  }

  async fn update_membership(
    &self,
    department_id: &str,
    update: MembershipUpdate,
  ) -> Result<Department> {
    self
      .send(Method::PUT, &["departments", department_id], Some(&update))
      .await?
      .ok_or_else(|| Error::NotFound(format!("department {department_id}")))
  }

  /// The backend has no conditional update, so this reads the request,
  /// checks the transition locally and writes the result back.
  async fn decide_leave_request(
    &self,
    id: &str,
    decision: LeaveDecision,
    reviewer_id: Option<&str>,
    now: DateTime<Utc>,
  ) -> Result<roster_core::Result<LeaveRequest>> {
    let unknown = || roster_core::Error::UnknownLeaveRequest(id.to_owned());

    let requests: Vec<LeaveRequest> = self.get_list("leave-requests").await?;
    let Some(mut request) = requests.into_iter().find(|request| request.id == id)
    else {
      return Ok(Err(unknown()));
    };
    if let Err(refused) = request.decide(decision, reviewer_id, now) {
      return Ok(Err(refused));
    }

    let saved = self
      .send(Method::PUT, &["leave-requests", id], Some(&request))
      .await?;
    Ok(saved.ok_or_else(unknown))
  }
}
