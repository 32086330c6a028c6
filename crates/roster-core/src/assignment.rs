//! Writing department membership: who may fill which slot, and how an update
//! is normalised before it is handed to the backend.
//!
//! Unlike the resolver, this is the write path, so rule violations are
//! reported as [`Error`]s instead of being absorbed.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  department::Department,
  user::{Role, User},
};

// ─── Slots ───────────────────────────────────────────────────────────────────

/// A position within a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
  Head,
  Manager,
  Member,
}

impl Slot {
  /// Whether a user holding `role` may be assigned to this slot.
  pub fn accepts(self, role: &Role) -> bool {
    match self {
      Self::Head => {
        matches!(role, Role::DepartmentHead | Role::Manager | Role::Admin)
      }
      Self::Manager => {
        matches!(role, Role::Manager | Role::HrManager | Role::DepartmentHead)
      }
      Self::Member => !matches!(role, Role::SuperAdmin),
    }
  }
}

impl fmt::Display for Slot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Head => "head",
      Self::Manager => "manager",
      Self::Member => "member",
    })
  }
}

/// Active users that `slot` accepts, in input order.
pub fn candidates(slot: Slot, users: &[User]) -> Vec<&User> {
  users
    .iter()
    .filter(|user| user.is_active && slot.accepts(&user.role))
    .collect()
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// The membership lists of a department as submitted by the manage-members
/// dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipUpdate {
  #[serde(default)]
  pub head_id:     Option<String>,
  #[serde(default)]
  pub manager_ids: Vec<String>,
  #[serde(default)]
  pub member_ids:  Vec<String>,
}

impl MembershipUpdate {
  /// The update that would leave `department` unchanged.
  pub fn from_department(department: &Department) -> Self {
    Self {
      head_id:     department.head_id().map(str::to_owned),
      manager_ids: department.manager_ids.clone(),
      member_ids:  department.member_ids.clone(),
    }
  }

  /// Deduplicate every list and restore `head ∈ members` and
  /// `managers ⊆ members`.
  ///
  /// The head is removed from the managers. `memberIds` becomes the head,
  /// then the managers, then the remaining members, each in first-occurrence
  /// order. Empty ids are dropped.
  pub fn normalize(self) -> Self {
    let head_id = self.head_id.filter(|id| !id.is_empty());

    let mut seen: HashSet<String> = head_id.iter().cloned().collect();
    let manager_ids: Vec<String> = self
      .manager_ids
      .into_iter()
      .filter(|id| !id.is_empty() && seen.insert(id.clone()))
      .collect();

    let rest: Vec<String> = self
      .member_ids
      .into_iter()
      .filter(|id| !id.is_empty() && seen.insert(id.clone()))
      .collect();

    let member_ids = head_id
      .iter()
      .chain(manager_ids.iter())
      .chain(rest.iter())
      .cloned()
      .collect();

    Self { head_id, manager_ids, member_ids }
  }

  /// Check that every referenced user exists, is active and may fill the
  /// slot it is listed in. Members that are also head or manager are checked
  /// against that slot only.
  pub fn validate(&self, users: &[User]) -> Result<()> {
    let mut checked: HashSet<&str> = HashSet::new();

    let head = self.head_id.iter().map(|id| (id, Slot::Head));
    let managers = self.manager_ids.iter().map(|id| (id, Slot::Manager));
    let members = self.member_ids.iter().map(|id| (id, Slot::Member));

    for (id, slot) in head.chain(managers).chain(members) {
      if !checked.insert(id.as_str()) {
        continue;
      }
      let user = users
        .iter()
        .find(|user| &user.id == id)
        .ok_or_else(|| Error::UnknownUser(id.clone()))?;
      if !user.is_active {
        return Err(Error::InactiveUser(id.clone()));
      }
      if !slot.accepts(&user.role) {
        return Err(Error::IneligibleRole {
          user_id: id.clone(),
          role: user.role.clone(),
          slot,
        });
      }
    }
    Ok(())
  }

  /// Write the lists onto `department`.
  pub fn apply_to(&self, department: &mut Department) {
    department.head_id = self.head_id.clone();
    department.manager_ids = self.manager_ids.clone();
    department.member_ids = self.member_ids.clone();
  }
}
