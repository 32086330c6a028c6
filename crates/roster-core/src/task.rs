//! Task records, consumed only by the analytics aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  reference::{EntityRef, normalize_department_ref},
  timestamp::{LooseDate, parse_opt},
};

/// Task status. Unknown strings are preserved in [`TaskStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
  #[default]
  Pending,
  InProgress,
  Completed,
  Other(String),
}

impl From<String> for TaskStatus {
  fn from(value: String) -> Self {
    match value.as_str() {
      "pending" => Self::Pending,
      "in_progress" => Self::InProgress,
      "completed" => Self::Completed,
      _ => Self::Other(value),
    }
  }
}

impl From<TaskStatus> for String {
  fn from(status: TaskStatus) -> Self {
    match status {
      TaskStatus::Pending => "pending".to_owned(),
      TaskStatus::InProgress => "in_progress".to_owned(),
      TaskStatus::Completed => "completed".to_owned(),
      TaskStatus::Other(other) => other,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  pub id:            String,
  #[serde(default)]
  pub title:         String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub department_id: Option<EntityRef>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub department:    Option<EntityRef>,
  #[serde(default)]
  pub status:        TaskStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub due_date:      Option<LooseDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at:    Option<LooseDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at:    Option<LooseDate>,
}

impl Task {
  pub fn new(
    id: impl Into<String>,
    department_id: &str,
    status: TaskStatus,
  ) -> Self {
    Self {
      id:            id.into(),
      title:         String::new(),
      department_id: Some(EntityRef::from(department_id)),
      department:    None,
      status,
      due_date:      None,
      created_at:    None,
      updated_at:    None,
    }
  }

  /// The normalised department id, `""` when the task has none.
  pub fn department_key(&self) -> &str {
    normalize_department_ref(
      self.department_id.as_ref(),
      self.department.as_ref(),
    )
  }

  pub fn is_completed(&self) -> bool { self.status == TaskStatus::Completed }

  /// Past its due date and not completed. A missing or unparseable due date
  /// is never overdue.
  pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
    !self.is_completed()
      && parse_opt(self.due_date.as_ref()).is_some_and(|due| due < now)
  }
}
