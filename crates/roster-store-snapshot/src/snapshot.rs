//! On-disk shape of a snapshot file.
//!
//! ```json
//! {
//!   "departments":   [ { "id": "d1", "name": "Engineering", "headId": "u1" } ],
//!   "users":         [ { "id": "u1", "name": "Ada", "role": "department_head" } ],
//!   "tasks":         [],
//!   "leaveRequests": []
//! }
//! ```
//!
//! Every collection is optional.

use roster_core::{
  department::Department,
  leave::LeaveRequest,
  task::Task,
  user::User,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
  pub departments:    Vec<Department>,
  pub users:          Vec<User>,
  pub tasks:          Vec<Task>,
  pub leave_requests: Vec<LeaveRequest>,
}

impl Snapshot {
  pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
    serde_json::from_slice(bytes)
  }

  pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(self)
  }
}
