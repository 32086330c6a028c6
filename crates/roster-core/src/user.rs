//! Users and their roles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reference::{EntityRef, normalize_department_ref};

// ─── Role ────────────────────────────────────────────────────────────────────

/// The role a user holds. The set is open: unknown strings are kept verbatim
/// in [`Role::Other`] and serialise back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
  SuperAdmin,
  Admin,
  DepartmentHead,
  Manager,
  HrManager,
  Hr,
  #[default]
  Member,
  Person,
  Other(String),
}

impl Role {
  pub fn as_str(&self) -> &str {
    match self {
      Self::SuperAdmin => "super_admin",
      Self::Admin => "admin",
      Self::DepartmentHead => "department_head",
      Self::Manager => "manager",
      Self::HrManager => "hr_manager",
      Self::Hr => "hr",
      Self::Member => "member",
      Self::Person => "person",
      Self::Other(other) => other,
    }
  }
}

impl From<String> for Role {
  fn from(value: String) -> Self {
    match value.as_str() {
      "super_admin" => Self::SuperAdmin,
      "admin" => Self::Admin,
      "department_head" => Self::DepartmentHead,
      "manager" => Self::Manager,
      "hr_manager" => Self::HrManager,
      "hr" => Self::Hr,
      "member" => Self::Member,
      "person" => Self::Person,
      _ => Self::Other(value),
    }
  }
}

impl From<Role> for String {
  fn from(role: Role) -> Self {
    match role {
      Role::Other(other) => other,
      known => known.as_str().to_owned(),
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

fn default_active() -> bool { true }

/// A user record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:            String,
  #[serde(default)]
  pub name:          String,
  #[serde(default)]
  pub email:         String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mobile_number: Option<String>,
  #[serde(default)]
  pub role:          Role,
  /// Either a plain id or a populated object.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub department_id: Option<EntityRef>,
  /// Populated department object, when the backend expands it.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub department:    Option<EntityRef>,
  #[serde(default = "default_active")]
  pub is_active:     bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub manager_id:    Option<EntityRef>,
}

impl User {
  /// Convenience constructor with every optional field empty.
  pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      email: String::new(),
      mobile_number: None,
      role,
      department_id: None,
      department: None,
      is_active: true,
      manager_id: None,
    }
  }

  /// Same as [`User::new`] with `departmentId` set to a plain id.
  pub fn in_department(
    id: impl Into<String>,
    name: impl Into<String>,
    role: Role,
    department_id: &str,
  ) -> Self {
    Self {
      department_id: Some(EntityRef::from(department_id)),
      ..Self::new(id, name, role)
    }
  }

  /// The normalised department id, `""` when the user has none.
  pub fn department_key(&self) -> &str {
    normalize_department_ref(
      self.department_id.as_ref(),
      self.department.as_ref(),
    )
  }

  /// Whether the user belongs to the department with id `department_id`.
  pub fn belongs_to(&self, department_id: &str) -> bool {
    !department_id.is_empty() && self.department_key() == department_id
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn known_roles_round_trip_through_strings() {
    for name in [
      "super_admin",
      "admin",
      "department_head",
      "manager",
      "hr_manager",
      "hr",
      "member",
      "person",
    ] {
      let role = Role::from(name.to_owned());
      assert!(!matches!(role, Role::Other(_)), "{name} parsed as Other");
      assert_eq!(String::from(role), name);
    }
  }

  #[test]
  fn unknown_role_is_preserved() {
    let role: Role = serde_json::from_value(json!("intern")).unwrap();
    assert_eq!(role, Role::Other("intern".into()));
    assert_eq!(serde_json::to_value(&role).unwrap(), json!("intern"));
  }

  #[test]
  fn deserialises_backend_shape_with_nested_department() {
    let user: User = serde_json::from_value(json!({
      "id": "u1",
      "name": "Ada",
      "email": "ada@example.com",
      "role": "manager",
      "departmentId": { "_id": "d1", "name": "Engineering" }
    }))
    .unwrap();
    assert_eq!(user.role, Role::Manager);
    assert_eq!(user.department_key(), "d1");
    assert!(user.is_active);
    assert!(user.belongs_to("d1"));
  }

  #[test]
  fn populated_department_slot_is_consulted() {
    let user: User = serde_json::from_value(json!({
      "id": "u2",
      "role": "member",
      "department": { "id": "d7" },
      "isActive": false
    }))
    .unwrap();
    assert_eq!(user.department_key(), "d7");
    assert!(!user.is_active);
  }

  #[test]
  fn user_without_department_belongs_nowhere() {
    let user = User::new("u3", "Bo", Role::Member);
    assert_eq!(user.department_key(), "");
    assert!(!user.belongs_to(""));
  }
}
