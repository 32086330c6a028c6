//! Department list derivation: filter → sort → paginate.
//!
//! All list state lives in an immutable [`ViewParams`] value, so the same
//! rows and parameters always produce the same [`Page`].

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  analytics::{DepartmentAnalytics, analyze},
  department::Department,
  membership::resolve_membership,
  task::Task,
  timestamp::parse_opt,
  user::User,
};

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One line of the department list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRow {
  pub id:            String,
  pub name:          String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color:         Option<String>,
  pub head_name:     Option<String>,
  pub manager_count: usize,
  pub member_count:  usize,
  pub headcount:     usize,
  pub is_empty:      bool,
  pub created_at:    Option<DateTime<Utc>>,
  pub analytics:     DepartmentAnalytics,
}

impl DepartmentRow {
  pub fn build(
    department: &Department,
    users: &[User],
    tasks: &[Task],
    now: DateTime<Utc>,
  ) -> Self {
    let membership = resolve_membership(Some(department), Some(users));
    Self {
      id:            department.id.clone(),
      name:          department.name.clone(),
      description:   department.description.clone(),
      color:         department.color.clone(),
      head_name:     membership.head.as_ref().map(|head| head.name.clone()),
      manager_count: membership.managers.len(),
      member_count:  membership.members.len(),
      headcount:     membership.headcount(),
      is_empty:      membership.is_empty(),
      created_at:    parse_opt(department.created_at.as_ref()),
      analytics:     analyze(Some(department), tasks, now),
    }
  }
}

/// Build one row per department, in input order.
pub fn build_rows(
  departments: &[Department],
  users: &[User],
  tasks: &[Task],
  now: DateTime<Utc>,
) -> Vec<DepartmentRow> {
  departments
    .iter()
    .map(|department| DepartmentRow::build(department, users, tasks, now))
    .collect()
}

// ─── Parameters ──────────────────────────────────────────────────────────────

/// Headcount bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeFilter {
  #[default]
  All,
  /// Nobody at all.
  Empty,
  /// 1–5 people.
  Small,
  /// 6–15 people.
  Medium,
  /// 16 or more.
  Large,
}

impl SizeFilter {
  pub fn matches(self, headcount: usize) -> bool {
    match self {
      Self::All => true,
      Self::Empty => headcount == 0,
      Self::Small => (1..=5).contains(&headcount),
      Self::Medium => (6..=15).contains(&headcount),
      Self::Large => headcount >= 16,
    }
  }
}

/// Performance-score bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceFilter {
  #[default]
  All,
  /// 80 and above.
  Excellent,
  /// 60–79.
  Good,
  /// 40–59.
  Average,
  /// Below 40.
  Poor,
}

impl PerformanceFilter {
  pub fn matches(self, score: u32) -> bool {
    match self {
      Self::All => true,
      Self::Excellent => score >= 80,
      Self::Good => (60..80).contains(&score),
      Self::Average => (40..60).contains(&score),
      Self::Poor => score < 40,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
  #[default]
  Name,
  Headcount,
  Performance,
  Completion,
  LastActivity,
  CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

/// Everything that shapes one rendering of the department list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewParams {
  /// Case-insensitive substring over name and description.
  pub search:      Option<String>,
  pub size:        SizeFilter,
  pub performance: PerformanceFilter,
  pub sort:        SortKey,
  pub direction:   SortDirection,
  /// 1-based; 0 is treated as 1 and values past the end clamp to the last
  /// page.
  pub page:        usize,
  /// `None` or 0 falls back to the caller's default.
  #[serde(alias = "page_size")]
  pub page_size:   Option<usize>,
}

// ─── Output ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub items:       Vec<T>,
  pub page:        usize,
  pub page_size:   usize,
  pub total_items: usize,
  /// At least 1, even when there are no items.
  pub total_pages: usize,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Filter, sort and paginate `rows` according to `params`.
pub fn derive_page(
  rows: Vec<DepartmentRow>,
  params: &ViewParams,
  default_page_size: usize,
) -> Page<DepartmentRow> {
  let mut rows = filter_rows(rows, params);
  sort_rows(&mut rows, params.sort, params.direction);
  paginate(rows, params.page, params.page_size, default_page_size)
}

pub fn filter_rows(
  rows: Vec<DepartmentRow>,
  params: &ViewParams,
) -> Vec<DepartmentRow> {
  let needle = params
    .search
    .as_deref()
    .map(str::trim)
    .filter(|needle| !needle.is_empty())
    .map(str::to_lowercase);

  rows
    .into_iter()
    .filter(|row| {
      needle.as_deref().is_none_or(|needle| matches_search(row, needle))
        && params.size.matches(row.headcount)
        && params.performance.matches(row.analytics.performance_score)
    })
    .collect()
}

fn matches_search(row: &DepartmentRow, needle: &str) -> bool {
  row.name.to_lowercase().contains(needle)
    || row
      .description
      .as_deref()
      .is_some_and(|description| description.to_lowercase().contains(needle))
}

/// Stable sort; ties keep their input order in both directions.
pub fn sort_rows(
  rows: &mut [DepartmentRow],
  key: SortKey,
  direction: SortDirection,
) {
  rows.sort_by(|a, b| {
    let ordering = compare(a, b, key);
    match direction {
      SortDirection::Asc => ordering,
      SortDirection::Desc => ordering.reverse(),
    }
  });
}

fn compare(a: &DepartmentRow, b: &DepartmentRow, key: SortKey) -> Ordering {
  match key {
    SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    SortKey::Headcount => a.headcount.cmp(&b.headcount),
    SortKey::Performance => a
      .analytics
      .performance_score
      .cmp(&b.analytics.performance_score),
    SortKey::Completion => a
      .analytics
      .task_completion_rate
      .cmp(&b.analytics.task_completion_rate),
    SortKey::LastActivity => {
      a.analytics.last_activity.cmp(&b.analytics.last_activity)
    }
    // Rows without a creation date sort first.
    SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
  }
}

pub fn paginate<T>(
  items: Vec<T>,
  page: usize,
  page_size: Option<usize>,
  default_page_size: usize,
) -> Page<T> {
  let page_size = page_size
    .filter(|size| *size > 0)
    .unwrap_or(default_page_size)
    .max(1);
  let total_items = items.len();
  let total_pages = total_items.div_ceil(page_size).max(1);
  let page = page.clamp(1, total_pages);

  let items = items
    .into_iter()
    .skip((page - 1) * page_size)
    .take(page_size)
    .collect();

  Page { items, page, page_size, total_items, total_pages }
}
