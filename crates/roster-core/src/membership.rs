//! Department membership resolution.
//!
//! Given one [`Department`] and every [`User`] visible to the caller, decide
//! who is the head, who are managers, and who are plain members.
//!
//! Explicit `managerIds` / `memberIds` take precedence; only when a list is
//! empty is it inferred from `User::role` and the user's normalised
//! department reference. The head is never inferred.
//!
//! Every function here is total: a missing department or user list resolves
//! to the empty membership, dangling ids are dropped, and nobody appears in
//! more than one of head / managers / members.
//!
//! Order is first occurrence: explicit lists follow the id list, inferred
//! lists follow the user collection.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
  department::Department,
  user::{Role, User},
};

// ─── Result type ─────────────────────────────────────────────────────────────

/// The derived membership of a department. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMembership {
  pub head:     Option<User>,
  /// Deduplicated, never contains the head.
  pub managers: Vec<User>,
  /// Deduplicated, never contains the head or any manager.
  pub members:  Vec<User>,
}

impl ResolvedMembership {
  pub fn is_empty(&self) -> bool {
    is_empty_department(self.head.as_ref(), &self.managers, &self.members)
  }

  /// Head, then managers, then members.
  pub fn people(&self) -> impl Iterator<Item = &User> {
    self
      .head
      .iter()
      .chain(self.managers.iter())
      .chain(self.members.iter())
  }

  /// Number of distinct people in the department.
  pub fn headcount(&self) -> usize {
    usize::from(self.head.is_some()) + self.managers.len() + self.members.len()
  }

  pub fn contains(&self, user_id: &str) -> bool {
    self.people().any(|user| user.id == user_id)
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// The user named by `headId`, if it exists in `users`.
pub fn resolve_head<'a>(
  department: Option<&Department>,
  users: &'a [User],
) -> Option<&'a User> {
  let department = department?;
  let head_id = department.head_id()?;
  let head = users.iter().find(|user| user.id == head_id);
  if head.is_none() {
    tracing::debug!(
      department = %department.id,
      head_id,
      "head reference does not match any user"
    );
  }
  head
}

/// Managers from `managerIds`, or inferred from `role == manager` when the
/// list is empty. `head` is always excluded.
pub fn resolve_managers<'a>(
  department: Option<&Department>,
  users: &'a [User],
  head: Option<&User>,
) -> Vec<&'a User> {
  let Some(department) = department else {
    return Vec::new();
  };

  let found = if department.manager_ids.is_empty() {
    let head_id = department.head_id();
    users
      .iter()
      .filter(|user| {
        user.role == Role::Manager
          && user.belongs_to(&department.id)
          && Some(user.id.as_str()) != head_id
      })
      .collect()
  } else {
    lookup_ids(department, &department.manager_ids, users)
  };

  let excluded: HashSet<&str> =
    head.into_iter().map(|user| user.id.as_str()).collect();
  distinct_excluding(found, &excluded)
}

/// Members from `memberIds`, or inferred from department membership when the
/// list is empty (managers and department heads are not inferred as
/// members). `head` and `managers` are always subtracted.
pub fn resolve_members<'a>(
  department: Option<&Department>,
  users: &'a [User],
  head: Option<&User>,
  managers: &[&User],
) -> Vec<&'a User> {
  let Some(department) = department else {
    return Vec::new();
  };

  let found = if department.member_ids.is_empty() {
    users
      .iter()
      .filter(|user| {
        user.belongs_to(&department.id)
          && !matches!(user.role, Role::Manager | Role::DepartmentHead)
      })
      .collect()
  } else {
    lookup_ids(department, &department.member_ids, users)
  };

  let excluded: HashSet<&str> = head
    .into_iter()
    .chain(managers.iter().copied())
    .map(|user| user.id.as_str())
    .collect();
  distinct_excluding(found, &excluded)
}

/// True iff there is no head, no manager and no member.
pub fn is_empty_department<M, N>(
  head: Option<&User>,
  managers: &[M],
  members: &[N],
) -> bool {
  head.is_none() && managers.is_empty() && members.is_empty()
}

/// Run the full resolution and return an owned result.
///
/// `None` for either input yields the empty membership, so callers can render
/// before their data has loaded.
pub fn resolve_membership(
  department: Option<&Department>,
  users: Option<&[User]>,
) -> ResolvedMembership {
  let users = users.unwrap_or_default();
  let head = resolve_head(department, users);
  let managers = resolve_managers(department, users, head);
  let members = resolve_members(department, users, head, &managers);

  ResolvedMembership {
    head:     head.cloned(),
    managers: managers.into_iter().cloned().collect(),
    members:  members.into_iter().cloned().collect(),
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Look each id up in `users`; ids with no match are dropped. When `users`
/// repeats an id the first record wins.
fn lookup_ids<'a>(
  department: &Department,
  ids: &[String],
  users: &'a [User],
) -> Vec<&'a User> {
  let mut by_id: HashMap<&str, &'a User> = HashMap::with_capacity(users.len());
  for user in users {
    by_id.entry(user.id.as_str()).or_insert(user);
  }

  ids
    .iter()
    .filter_map(|id| {
      let found = by_id.get(id.as_str()).copied();
      if found.is_none() {
        tracing::debug!(
          department = %department.id,
          user_id = %id,
          "dropping reference to unknown user"
        );
      }
      found
    })
    .collect()
}

/// Keep the first occurrence of each id, skipping ids in `excluded`.
fn distinct_excluding<'a>(
  users: Vec<&'a User>,
  excluded: &HashSet<&str>,
) -> Vec<&'a User> {
  let mut seen: HashSet<&'a str> = HashSet::with_capacity(users.len());
  users
    .into_iter()
    .filter(|&user| {
      !excluded.contains(user.id.as_str()) && seen.insert(user.id.as_str())
    })
    .collect()
}
