//! Leave requests and their review workflow.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, membership::ResolvedMembership, timestamp::LooseDate};

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
  Cancelled,
}

impl fmt::Display for LeaveStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Pending => "pending",
      Self::Approved => "approved",
      Self::Rejected => "rejected",
      Self::Cancelled => "cancelled",
    })
  }
}

/// An action a reviewer (or the requester, for `Cancel`) takes on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveDecision {
  Approve,
  Reject,
  Cancel,
}

impl LeaveDecision {
  /// The status a request moves to, if the transition from `from` is
  /// allowed.
  pub fn transition(self, from: LeaveStatus) -> Option<LeaveStatus> {
    match (self, from) {
      (Self::Approve, LeaveStatus::Pending) => Some(LeaveStatus::Approved),
      (Self::Reject, LeaveStatus::Pending) => Some(LeaveStatus::Rejected),
      (Self::Cancel, LeaveStatus::Pending | LeaveStatus::Approved) => {
        Some(LeaveStatus::Cancelled)
      }
      _ => None,
    }
  }
}

impl fmt::Display for LeaveDecision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Approve => "approve",
      Self::Reject => "reject",
      Self::Cancel => "cancel",
    })
  }
}

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
  pub id:          String,
  pub user_id:     String,
  /// Free text, e.g. "annual", "sick".
  #[serde(default)]
  pub leave_type:  String,
  #[serde(default)]
  pub start_date:  Option<LooseDate>,
  #[serde(default)]
  pub end_date:    Option<LooseDate>,
  #[serde(default)]
  pub status:      LeaveStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reviewed_by: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reviewed_at: Option<LooseDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at:  Option<LooseDate>,
}

impl LeaveRequest {
  /// A pending request over `start..=end`.
  pub fn new(
    id: impl Into<String>,
    user_id: impl Into<String>,
    start: &str,
    end: &str,
  ) -> Self {
    Self {
      id:          id.into(),
      user_id:     user_id.into(),
      leave_type:  String::new(),
      start_date:  Some(LooseDate::from(start)),
      end_date:    Some(LooseDate::from(end)),
      status:      LeaveStatus::Pending,
      reason:      None,
      reviewed_by: None,
      reviewed_at: None,
      created_at:  None,
    }
  }

  /// The inclusive date range, if both ends parse and are ordered.
  pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
    let start = self.start_date.as_ref()?.date()?;
    let end = self.end_date.as_ref()?.date()?;
    (start <= end).then_some((start, end))
  }

  /// Inclusive number of calendar days, 0 when the range is unusable.
  pub fn days(&self) -> u32 {
    self
      .span()
      .map(|(start, end)| (end - start).num_days() + 1)
      .and_then(|days| u32::try_from(days).ok())
      .unwrap_or(0)
  }

  pub fn covers(&self, date: NaiveDate) -> bool {
    self
      .span()
      .is_some_and(|(start, end)| start <= date && date <= end)
  }

  /// Apply `decision`, recording the reviewer for approvals and rejections.
  pub fn decide(
    &mut self,
    decision: LeaveDecision,
    reviewer_id: Option<&str>,
    now: DateTime<Utc>,
  ) -> Result<()> {
    let next = decision.transition(self.status).ok_or_else(|| {
      Error::InvalidTransition {
        id:       self.id.clone(),
        status:   self.status,
        decision,
      }
    })?;

    if decision != LeaveDecision::Cancel {
      self.reviewed_by = reviewer_id.map(str::to_owned);
      self.reviewed_at = Some(LooseDate::from(now));
    }
    self.status = next;
    Ok(())
  }
}

// ─── Summary ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSummary {
  pub pending:           usize,
  /// Approved and starting after `date`.
  pub approved_upcoming: usize,
  /// Approved and covering `date`.
  pub on_leave:          usize,
}

/// Count the leave requests of everyone in `membership` relative to `date`.
pub fn summarize(
  membership: &ResolvedMembership,
  requests: &[LeaveRequest],
  date: NaiveDate,
) -> LeaveSummary {
  requests
    .iter()
    .filter(|request| membership.contains(&request.user_id))
    .fold(LeaveSummary::default(), |mut summary, request| {
      match request.status {
        LeaveStatus::Pending => summary.pending += 1,
        LeaveStatus::Approved if request.covers(date) => summary.on_leave += 1,
        LeaveStatus::Approved
          if request.span().is_some_and(|(start, _)| start > date) =>
        {
          summary.approved_upcoming += 1
        }
        _ => {}
      }
      summary
    })
}
