//! Error types for `roster-core`.
//!
//! Only the write path (membership assignment, leave decisions) can fail;
//! resolution and analytics are total.

use thiserror::Error;

use crate::{
  assignment::Slot,
  leave::{LeaveDecision, LeaveStatus},
  user::Role,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UnknownUser(String),

  #[error("user {0} is not active")]
  InactiveUser(String),

  #[error("user {user_id} with role {role} cannot be assigned as {slot}")]
  IneligibleRole {
    user_id: String,
    role:    Role,
    slot:    Slot,
  },

  #[error("leave request not found: {0}")]
  UnknownLeaveRequest(String),

  #[error("cannot {decision} leave request {id} while it is {status}")]
  InvalidTransition {
    id:       String,
    status:   LeaveStatus,
    decision: LeaveDecision,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
