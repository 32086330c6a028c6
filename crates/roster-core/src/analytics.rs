//! Per-department task analytics for dashboards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{department::Department, task::{Task, TaskStatus}, timestamp::parse_opt};

/// Weight of the completion rate in [`performance_score`].
const COMPLETION_WEIGHT: f64 = 0.6;
/// Weight of the on-time share in [`performance_score`].
const PUNCTUALITY_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentAnalytics {
  pub total_tasks:          usize,
  pub completed_tasks:      usize,
  pub in_progress_tasks:    usize,
  pub overdue_tasks:        usize,
  /// Percentage, 0–100.
  pub task_completion_rate: u32,
  /// Weighted score, 0–100.
  pub performance_score:    u32,
  pub last_activity:        DateTime<Utc>,
}

impl DepartmentAnalytics {
  /// The result for a department with no tasks and no usable timestamps.
  pub fn empty(now: DateTime<Utc>) -> Self {
    Self {
      total_tasks:          0,
      completed_tasks:      0,
      in_progress_tasks:    0,
      overdue_tasks:        0,
      task_completion_rate: 0,
      performance_score:    0,
      last_activity:        now,
    }
  }
}

/// Aggregate the tasks that belong to `department`.
///
/// `now` drives both the overdue check and the `lastActivity` fallback, so the
/// result is deterministic for a fixed `now`.
pub fn analyze(
  department: Option<&Department>,
  tasks: &[Task],
  now: DateTime<Utc>,
) -> DepartmentAnalytics {
  let Some(department) = department else {
    return DepartmentAnalytics::empty(now);
  };

  let own: Vec<&Task> = tasks
    .iter()
    .filter(|task| {
      let key = task.department_key();
      !key.is_empty() && key == department.id
    })
    .collect();

  let total = own.len();
  let completed = own.iter().filter(|task| task.is_completed()).count();
  let in_progress = own
    .iter()
    .filter(|task| task.status == TaskStatus::InProgress)
    .count();
  let overdue = own.iter().filter(|task| task.is_overdue(now)).count();
  let rate = completion_rate(completed, total);

  let last_activity = parse_opt(department.created_at.as_ref())
    .into_iter()
    .chain(own.iter().filter_map(|task| parse_opt(task.updated_at.as_ref())))
    .max()
    .unwrap_or(now);

  DepartmentAnalytics {
    total_tasks: total,
    completed_tasks: completed,
    in_progress_tasks: in_progress,
    overdue_tasks: overdue,
    task_completion_rate: rate,
    performance_score: performance_score(rate, overdue, total),
    last_activity,
  }
}

/// `round(completed / total * 100)`, or 0 when there are no tasks.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
  if total == 0 {
    return 0;
  }
  percent(completed, total).round() as u32
}

/// `round(rate * 0.6 + max(0, 100 - overdue / total * 100) * 0.4)`, or 0 when
/// there are no tasks.
pub fn performance_score(completion_rate: u32, overdue: usize, total: usize) -> u32 {
  if total == 0 {
    return 0;
  }
  let punctuality = (100.0 - percent(overdue, total)).max(0.0);
  let score = f64::from(completion_rate) * COMPLETION_WEIGHT
    + punctuality * PUNCTUALITY_WEIGHT;
  score.round() as u32
}

fn percent(part: usize, total: usize) -> f64 { part as f64 / total as f64 * 100.0 }

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::{reference::EntityRef, timestamp::LooseDate};

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() }

  fn task(id: usize, status: TaskStatus, due: Option<&str>) -> Task {
    Task {
      due_date: due.map(LooseDate::from),
      ..Task::new(format!("t{id}"), "d1", status)
    }
  }

  #[test]
  fn zero_tasks_scores_zero() {
    let department = Department::new("d1", "Engineering");
    let mut other_dept = vec![task(1, TaskStatus::Completed, None)];
    other_dept[0].department_id = Some(EntityRef::from("d2"));

    let stats = analyze(Some(&department), &other_dept, now());
    assert_eq!(stats.total_tasks, 0);
    assert_eq!(stats.task_completion_rate, 0);
    assert_eq!(stats.performance_score, 0);
    assert_eq!(stats.last_activity, now());
  }

  #[test]
  fn overdue_share_is_weighted() {
    let department = Department::new("d1", "Engineering");
    let mut tasks: Vec<Task> = (0..6)
      .map(|i| task(i, TaskStatus::Completed, Some("2024-01-01")))
      .collect();
    tasks.push(task(6, TaskStatus::InProgress, Some("2024-05-01")));
    tasks.push(task(7, TaskStatus::Pending, Some("2024-05-15T00:00:00Z")));
    tasks.push(task(8, TaskStatus::InProgress, Some("2024-12-01")));
    tasks.push(task(9, TaskStatus::Pending, None));

    let stats = analyze(Some(&department), &tasks, now());
    assert_eq!(stats.total_tasks, 10);
    assert_eq!(stats.completed_tasks, 6);
    assert_eq!(stats.in_progress_tasks, 2);
    assert_eq!(stats.overdue_tasks, 2);
    assert_eq!(stats.task_completion_rate, 60);
    assert_eq!(stats.performance_score, 68);
  }

  #[test]
  fn unparseable_due_dates_are_not_overdue() {
    let department = Department::new("d1", "Engineering");
    let tasks = vec![
      task(1, TaskStatus::Pending, Some("yesterday-ish")),
      task(2, TaskStatus::Pending, Some("")),
    ];
    let stats = analyze(Some(&department), &tasks, now());
    assert_eq!(stats.overdue_tasks, 0);
    assert_eq!(stats.performance_score, 40);
  }

  #[test]
  fn score_penalty_floors_at_zero() {
    assert_eq!(performance_score(0, 4, 4), 0);
    assert_eq!(performance_score(100, 0, 4), 100);
    assert_eq!(completion_rate(1, 3), 33);
    assert_eq!(completion_rate(2, 3), 67);
  }

  #[test]
  fn last_activity_is_latest_valid_timestamp() {
    let department = Department {
      created_at: Some(LooseDate::from("2024-02-01")),
      ..Department::new("d1", "Engineering")
    };
    let mut tasks = vec![
      task(1, TaskStatus::Pending, None),
      task(2, TaskStatus::Pending, None),
      task(3, TaskStatus::Pending, None),
    ];
    tasks[0].updated_at = Some(LooseDate::from("2024-03-10T09:00:00Z"));
    tasks[1].updated_at = Some(LooseDate::from("garbage"));
    tasks[2].updated_at = Some(LooseDate::Millis(0));

    let stats = analyze(Some(&department), &tasks, now());
    assert_eq!(
      stats.last_activity,
      Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    );
  }

  #[test]
  fn last_activity_falls_back_to_now() {
    let department = Department {
      created_at: Some(LooseDate::from("n/a")),
      ..Department::new("d1", "Engineering")
    };
    let stats = analyze(Some(&department), &[], now());
    assert_eq!(stats.last_activity, now());
  }

  #[test]
  fn missing_department_is_empty() {
    let tasks = vec![task(1, TaskStatus::Completed, None)];
    assert_eq!(analyze(None, &tasks, now()), DepartmentAnalytics::empty(now()));
  }
}
