//! [`SnapshotStore`]: the snapshot implementation of [`Directory`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use chrono::{DateTime, Utc};
use roster_core::{
  assignment::MembershipUpdate,
  department::Department,
  directory::Directory,
  leave::{LeaveDecision, LeaveRequest},
  task::Task,
  timestamp::LooseDate,
  user::User,
};
use tokio::sync::RwLock;

use crate::{Error, Result, snapshot::Snapshot};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster directory held in memory.
///
/// Cloning is cheap; the inner state is reference-counted.
#[derive(Clone)]
pub struct SnapshotStore {
  state: Arc<RwLock<Snapshot>>,
  /// Where writes are flushed; `None` for purely in-memory stores.
  path:  Option<Arc<PathBuf>>,
}

impl SnapshotStore {
  /// Load the snapshot at `path`. Writes are flushed back to the same file.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let bytes = tokio::fs::read(&path).await.map_err(|source| Error::Io {
      path: path.clone(),
      source,
    })?;
    let snapshot = Snapshot::from_json(&bytes)?;

    tracing::info!(
      path = %path.display(),
      departments = snapshot.departments.len(),
      users = snapshot.users.len(),
      tasks = snapshot.tasks.len(),
      leave_requests = snapshot.leave_requests.len(),
      "loaded snapshot"
    );

    Ok(Self {
      state: Arc::new(RwLock::new(snapshot)),
      path:  Some(Arc::new(path)),
    })
  }

  /// Wrap an in-memory snapshot.
  pub fn in_memory(snapshot: Snapshot) -> Self {
    Self { state: Arc::new(RwLock::new(snapshot)), path: None }
  }

  /// A copy of the current state.
  pub async fn snapshot(&self) -> Snapshot { self.state.read().await.clone() }

  /// Write `snapshot` to the backing file, if any, via a temporary sibling
  /// so readers never observe a half-written file.
  async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
    let Some(path) = self.path.as_deref() else {
      return Ok(());
    };
    let bytes = snapshot.to_json()?;
    let tmp = path.with_extension("json.tmp");
    let io_err = |source| Error::Io { path: path.clone(), source };

    tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    tracing::debug!(path = %path.display(), "flushed snapshot");
    Ok(())
  }
}

// ─── Directory impl ──────────────────────────────────────────────────────────

impl Directory for SnapshotStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_departments(&self) -> Result<Vec<Department>> {
    Ok(self.state.read().await.departments.clone())
  }

  async fn get_department(&self, id: &str) -> Result<Option<Department>> {
    Ok(
      self
        .state
        .read()
        .await
        .departments
        .iter()
        .find(|department| department.id == id)
        .cloned(),
    )
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    Ok(self.state.read().await.users.clone())
  }

  async fn list_tasks(&self) -> Result<Vec<Task>> {
    Ok(self.state.read().await.tasks.clone())
  }

  async fn list_leave_requests(&self) -> Result<Vec<LeaveRequest>> {
    Ok(self.state.read().await.leave_requests.clone())
  }

  // ── Writes ────────────────────────────────────────────────────────────────
  //
  // Each write edits a copy of the state and swaps it in only once the copy
  // has been flushed, so a failed flush leaves memory matching the file.

  async fn update_membership(
    &self,
    department_id: &str,
    update: MembershipUpdate,
  ) -> Result<Department> {
    let mut state = self.state.write().await;
    let mut next = state.clone();

    let department = next
      .departments
      .iter_mut()
      .find(|department| department.id == department_id)
      .ok_or_else(|| Error::DepartmentNotFound(department_id.to_owned()))?;
    update.apply_to(department);
    department.updated_at = Some(LooseDate::from(Utc::now()));
    let stored = department.clone();

    self.persist(&next).await?;
    *state = next;
    tracing::info!(
      department = %stored.id,
      head = ?stored.head_id,
      managers = stored.manager_ids.len(),
      members = stored.member_ids.len(),
      "updated department membership"
    );
    Ok(stored)
  }

  async fn decide_leave_request(
    &self,
    id: &str,
    decision: LeaveDecision,
    reviewer_id: Option<&str>,
    now: DateTime<Utc>,
  ) -> Result<roster_core::Result<LeaveRequest>> {
    let mut state = self.state.write().await;
    let mut next = state.clone();

    let Some(request) = next.leave_requests.iter_mut().find(|request| request.id == id)
    else {
      return Ok(Err(roster_core::Error::UnknownLeaveRequest(id.to_owned())));
    };
    if let Err(refused) = request.decide(decision, reviewer_id, now) {
      return Ok(Err(refused));
    }
    let stored = request.clone();

    self.persist(&next).await?;
    *state = next;
    tracing::info!(
      leave_request = %stored.id,
      status = %stored.status,
      "saved leave request"
    );
    Ok(Ok(stored))
  }
}
