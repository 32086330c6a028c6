//! Department records.
//!
//! A department names its head, managers and members by user id. Producers
//! are expected to keep `headId ∈ memberIds` and `managerIds ⊆ memberIds`,
//! but nothing on the read path relies on it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{reference::EntityRef, timestamp::LooseDate};

/// `null` and a missing field both become an empty list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawDepartment")]
pub struct Department {
  pub id:          String,
  pub name:        String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Display hint only.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color:       Option<String>,
  pub head_id:     Option<String>,
  pub manager_ids: Vec<String>,
  pub member_ids:  Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at:  Option<LooseDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated_at:  Option<LooseDate>,
}

/// Shape accepted on read. `_id` stands in for a missing or empty `id`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDepartment {
  #[serde(default)]
  id:          String,
  #[serde(rename = "_id", default)]
  object_id:   Option<EntityRef>,
  #[serde(default)]
  name:        String,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  color:       Option<String>,
  #[serde(default)]
  head_id:     Option<String>,
  #[serde(default, deserialize_with = "null_as_empty")]
  manager_ids: Vec<String>,
  #[serde(default, deserialize_with = "null_as_empty")]
  member_ids:  Vec<String>,
  #[serde(default)]
  created_at:  Option<LooseDate>,
  #[serde(default)]
  updated_at:  Option<LooseDate>,
}

impl From<RawDepartment> for Department {
  fn from(raw: RawDepartment) -> Self {
    let id = if raw.id.is_empty() {
      raw.object_id.as_ref().map(EntityRef::key).unwrap_or("").to_owned()
    } else {
      raw.id
    };
    Self {
      id,
      name: raw.name,
      description: raw.description,
      color: raw.color,
      head_id: raw.head_id,
      manager_ids: raw.manager_ids,
      member_ids: raw.member_ids,
      created_at: raw.created_at,
      updated_at: raw.updated_at,
    }
  }
}

impl Department {
  /// Convenience constructor with no head, no explicit lists and no
  /// timestamps.
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      id:          id.into(),
      name:        name.into(),
      description: None,
      color:       None,
      head_id:     None,
      manager_ids: Vec::new(),
      member_ids:  Vec::new(),
      created_at:  None,
      updated_at:  None,
    }
  }

  /// The designated head id; an empty string counts as unset.
  pub fn head_id(&self) -> Option<&str> {
    self.head_id.as_deref().filter(|id| !id.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn null_and_missing_lists_are_empty() {
    let dept: Department = serde_json::from_value(json!({
      "id": "d1",
      "name": "Engineering",
      "headId": null,
      "managerIds": null
    }))
    .unwrap();
    assert!(dept.manager_ids.is_empty());
    assert!(dept.member_ids.is_empty());
    assert_eq!(dept.head_id(), None);
  }

  #[test]
  fn underscore_id_stands_in_for_id() {
    let dept: Department =
      serde_json::from_value(json!({ "_id": "d9", "name": "Ops" })).unwrap();
    assert_eq!(dept.id, "d9");

    let both: Department =
      serde_json::from_value(json!({ "_id": "x", "id": "d1" })).unwrap();
    assert_eq!(both.id, "d1");

    // Written back with `id` only.
    assert_eq!(serde_json::to_value(&dept).unwrap()["id"], "d9");
    assert!(serde_json::to_value(&dept).unwrap().get("_id").is_none());
  }

  #[test]
  fn empty_head_id_counts_as_unset() {
    let dept = Department {
      head_id: Some(String::new()),
      ..Department::new("d1", "Engineering")
    };
    assert_eq!(dept.head_id(), None);
  }

  #[test]
  fn tolerates_both_timestamp_representations() {
    let dept: Department = serde_json::from_value(json!({
      "id": "d1",
      "createdAt": "2024-01-01T00:00:00.000Z",
      "updatedAt": 1704067200000_i64
    }))
    .unwrap();
    assert_eq!(
      dept.created_at.as_ref().and_then(LooseDate::parse),
      dept.updated_at.as_ref().and_then(LooseDate::parse)
    );
  }

  #[test]
  fn odd_timestamp_shapes_keep_the_record() {
    let dept: Department = serde_json::from_value(json!({
      "id": "d1",
      "name": "Ops",
      "createdAt": { "$date": "2024-01-01" },
      "updatedAt": 1704067200000.0
    }))
    .unwrap();
    assert_eq!(dept.name, "Ops");
    assert_eq!(dept.created_at.as_ref().and_then(LooseDate::parse), None);
    assert_eq!(dept.updated_at.as_ref().and_then(LooseDate::parse), None);
  }
}
