//! Tests for `SnapshotStore`, in memory and against a scratch file.

use std::path::PathBuf;

use chrono::Utc;
use roster_core::{
  assignment::MembershipUpdate,
  department::Department,
  directory::Directory,
  leave::{LeaveDecision, LeaveRequest, LeaveStatus},
  membership::resolve_membership,
  user::{Role, User},
};
use serde_json::json;

use crate::{Error, Snapshot, SnapshotStore};

fn sample() -> Snapshot {
  Snapshot {
    departments:    vec![
      Department {
        head_id: Some("u1".into()),
        ..Department::new("d1", "Engineering")
      },
      Department::new("d2", "Sales"),
    ],
    users:          vec![
      User::in_department("u1", "Ada", Role::DepartmentHead, "d1"),
      User::in_department("u2", "Bo", Role::Manager, "d1"),
      User::in_department("u3", "Cy", Role::Member, "d1"),
    ],
    tasks:          Vec::new(),
    leave_requests: vec![LeaveRequest::new("l1", "u3", "2024-06-10", "2024-06-12")],
  }
}

fn scratch_path(name: &str) -> PathBuf {
  std::env::temp_dir().join(format!(
    "roster-store-{}-{name}.json",
    std::process::id()
  ))
}

fn scratch_dir(name: &str) -> PathBuf {
  std::env::temp_dir().join(format!("roster-store-{}-{name}", std::process::id()))
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lists_every_collection() {
  let store = SnapshotStore::in_memory(sample());
  assert_eq!(store.list_departments().await.unwrap().len(), 2);
  assert_eq!(store.list_users().await.unwrap().len(), 3);
  assert!(store.list_tasks().await.unwrap().is_empty());
  assert_eq!(store.list_leave_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_department_by_id() {
  let store = SnapshotStore::in_memory(sample());
  let found = store.get_department("d2").await.unwrap();
  assert_eq!(found.map(|d| d.name), Some("Sales".to_string()));
  assert!(store.get_department("missing").await.unwrap().is_none());
}

// ─── Membership writes ───────────────────────────────────────────────────────

#[tokio::test]
async fn update_membership_replaces_lists() {
  let store = SnapshotStore::in_memory(sample());
  let update = MembershipUpdate {
    head_id:     Some("u2".into()),
    manager_ids: vec![],
    member_ids:  vec!["u3".into()],
  }
  .normalize();

  let stored = store.update_membership("d1", update).await.unwrap();
  assert_eq!(stored.head_id.as_deref(), Some("u2"));
  assert_eq!(stored.member_ids, ["u2", "u3"]);
  assert!(stored.updated_at.is_some());

  // Explicit lists now win over role inference.
  let users = store.list_users().await.unwrap();
  let resolved = resolve_membership(Some(&stored), Some(users.as_slice()));
  assert_eq!(resolved.head.map(|u| u.id), Some("u2".to_string()));
  assert!(resolved.managers.is_empty());
  assert_eq!(resolved.members.len(), 1);
}

#[tokio::test]
async fn update_membership_of_unknown_department_fails() {
  let store = SnapshotStore::in_memory(sample());
  let err = store
    .update_membership("nope", MembershipUpdate::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DepartmentNotFound(id) if id == "nope"));
}

// ─── Leave writes ────────────────────────────────────────────────────────────

#[tokio::test]
async fn decide_leave_request_stores_the_transition() {
  let store = SnapshotStore::in_memory(sample());
  let decided = store
    .decide_leave_request("l1", LeaveDecision::Approve, Some("u1"), Utc::now())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(decided.status, LeaveStatus::Approved);
  assert_eq!(decided.reviewed_by.as_deref(), Some("u1"));

  let stored = store.list_leave_requests().await.unwrap();
  assert_eq!(stored, [decided]);
}

#[tokio::test]
async fn refused_decision_leaves_request_untouched() {
  let store = SnapshotStore::in_memory(sample());
  store
    .decide_leave_request("l1", LeaveDecision::Reject, Some("u1"), Utc::now())
    .await
    .unwrap()
    .unwrap();

  let refused = store
    .decide_leave_request("l1", LeaveDecision::Approve, Some("u2"), Utc::now())
    .await
    .unwrap()
    .unwrap_err();
  assert!(matches!(
    refused,
    roster_core::Error::InvalidTransition { status: LeaveStatus::Rejected, .. }
  ));
  let stored = store.list_leave_requests().await.unwrap();
  assert_eq!(stored[0].status, LeaveStatus::Rejected);
  assert_eq!(stored[0].reviewed_by.as_deref(), Some("u1"));
}

#[tokio::test]
async fn deciding_unknown_leave_request_is_refused() {
  let store = SnapshotStore::in_memory(sample());
  let refused = store
    .decide_leave_request("l9", LeaveDecision::Cancel, None, Utc::now())
    .await
    .unwrap()
    .unwrap_err();
  assert!(matches!(refused, roster_core::Error::UnknownLeaveRequest(id) if id == "l9"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn racing_decisions_apply_once() {
  let store = SnapshotStore::in_memory(sample());
  let now = Utc::now();
  let (approve, reject) = tokio::join!(
    store.decide_leave_request("l1", LeaveDecision::Approve, Some("u1"), now),
    store.decide_leave_request("l1", LeaveDecision::Reject, Some("u2"), now),
  );
  let outcomes = [approve.unwrap(), reject.unwrap()];

  let decided: Vec<&LeaveRequest> =
    outcomes.iter().filter_map(|outcome| outcome.as_ref().ok()).collect();
  assert_eq!(decided.len(), 1);
  assert!(outcomes.iter().any(|outcome| matches!(
    outcome,
    Err(roster_core::Error::InvalidTransition { .. })
  )));

  let stored = store.list_leave_requests().await.unwrap();
  assert_eq!(&stored[0], decided[0]);
}

// ─── Files ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_reads_backend_shaped_json() {
  let path = scratch_path("open");
  let body = json!({
    "departments": [
      { "id": "d1", "name": "Ops", "managerIds": null, "createdAt": 1704067200000_i64 }
    ],
    "users": [
      { "id": "u1", "role": "manager", "departmentId": { "_id": "d1" } }
    ]
  });
  std::fs::write(&path, body.to_string()).unwrap();

  let store = SnapshotStore::open(&path).await.unwrap();
  let departments = store.list_departments().await.unwrap();
  let users = store.list_users().await.unwrap();
  let resolved = resolve_membership(departments.first(), Some(users.as_slice()));
  assert_eq!(resolved.managers.len(), 1);
  assert!(store.list_tasks().await.unwrap().is_empty());

  std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn writes_are_flushed_to_disk() {
  let path = scratch_path("flush");
  std::fs::write(&path, sample().to_json().unwrap()).unwrap();

  let store = SnapshotStore::open(&path).await.unwrap();
  let update = MembershipUpdate {
    head_id:     None,
    manager_ids: vec!["u2".into()],
    member_ids:  vec![],
  }
  .normalize();
  store.update_membership("d2", update).await.unwrap();

  let reopened = SnapshotStore::open(&path).await.unwrap();
  let d2 = reopened.get_department("d2").await.unwrap().unwrap();
  assert_eq!(d2.manager_ids, ["u2"]);
  assert_eq!(d2.member_ids, ["u2"]);

  std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn failed_flush_keeps_previous_state() {
  let dir = scratch_dir("gone");
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("roster.json");
  std::fs::write(&path, sample().to_json().unwrap()).unwrap();
  let store = SnapshotStore::open(&path).await.unwrap();
  std::fs::remove_dir_all(&dir).unwrap();

  let update = MembershipUpdate {
    head_id:     Some("u2".into()),
    manager_ids: vec![],
    member_ids:  vec![],
  }
  .normalize();
  let err = store.update_membership("d1", update).await.unwrap_err();
  assert!(matches!(err, Error::Io { .. }));
  let d1 = store.get_department("d1").await.unwrap().unwrap();
  assert_eq!(d1.head_id.as_deref(), Some("u1"));

  let err = store
    .decide_leave_request("l1", LeaveDecision::Approve, Some("u1"), Utc::now())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Io { .. }));
  let requests = store.list_leave_requests().await.unwrap();
  assert_eq!(requests[0].status, LeaveStatus::Pending);
  assert!(requests[0].reviewed_by.is_none());
}

#[tokio::test]
async fn open_missing_file_is_an_io_error() {
  let err = SnapshotStore::open(scratch_path("does-not-exist"))
    .await
    .err()
    .unwrap();
  assert!(matches!(err, Error::Io { .. }));
}
