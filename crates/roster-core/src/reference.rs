//! Cross-references whose serialised shape varies between endpoints.
//!
//! The backend sometimes sends a foreign key as a bare id string and
//! sometimes as a populated object carrying `_id` and/or `id`. Every
//! comparison between records goes through [`normalize_department_ref`] so the
//! fallback chain lives in exactly one place.

use serde::{Deserialize, Serialize};

/// A reference to another record, in any of the shapes the backend emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
  /// A plain id string.
  Id(String),
  /// A populated object; either field may be missing.
  Object {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id:        Option<String>,
  },
  /// Any other JSON value. Never matches anything.
  Unknown(serde_json::Value),
}

impl EntityRef {
  /// The referenced id, or `""` when this shape carries none.
  ///
  /// For populated objects `_id` wins over `id`; empty strings are skipped.
  pub fn key(&self) -> &str {
    match self {
      Self::Id(id) => id,
      Self::Object { object_id, id } => [object_id, id]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .find(|v| !v.is_empty())
        .unwrap_or(""),
      Self::Unknown(_) => "",
    }
  }
}

impl From<&str> for EntityRef {
  fn from(id: &str) -> Self { Self::Id(id.to_owned()) }
}

impl From<String> for EntityRef {
  fn from(id: String) -> Self { Self::Id(id) }
}

/// Normalise a department reference to a comparable id string.
///
/// `direct` is the record's `departmentId` slot, `populated` its `department`
/// slot. The first non-empty key wins, in that order; `""` when neither
/// yields one. `""` never equals a real department id.
pub fn normalize_department_ref<'a>(
  direct: Option<&'a EntityRef>,
  populated: Option<&'a EntityRef>,
) -> &'a str {
  direct
    .into_iter()
    .chain(populated)
    .map(EntityRef::key)
    .find(|key| !key.is_empty())
    .unwrap_or("")
}
