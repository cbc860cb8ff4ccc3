//! Derived statistics over the task collection

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::model::{rounded_percent, Task};

/// Counts derived from the live collection. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub urgent: usize,
    /// Integer percentage of completed tasks
    pub completion_rate: u32,
}

impl TaskStats {
    /// Compute statistics as of `now`
    pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let urgent = tasks.iter().filter(|t| t.is_urgent(now)).count();

        Self {
            total,
            active: total - completed,
            completed,
            urgent,
            completion_rate: rounded_percent(completed, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::model::{TaskDraft, TaskPriority};
    use chrono::Duration;

    #[test]
    fn test_empty_collection() {
        assert_eq!(
            TaskStats::compute(&[], Utc::now()),
            TaskStats {
                total: 0,
                active: 0,
                completed: 0,
                urgent: 0,
                completion_rate: 0,
            }
        );
    }

    #[test]
    fn test_mixed_collection() {
        let now = Utc::now();
        let mut done = Task::from_draft(TaskDraft::new("Done").with_priority(TaskPriority::High), now);
        done.completed = true;
        let high = Task::from_draft(TaskDraft::new("High").with_priority(TaskPriority::High), now);
        let low = Task::from_draft(
            TaskDraft::new("Low")
                .with_priority(TaskPriority::Low)
                .with_due_date(now + Duration::days(3)),
            now,
        );

        let stats = TaskStats::compute(&[done, high, low], now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.completion_rate, 33);
    }

    #[test]
    fn test_overdue_counts_as_urgent() {
        let now = Utc::now();
        let overdue = Task::from_draft(
            TaskDraft::new("Late")
                .with_priority(TaskPriority::Low)
                .with_due_date(now - Duration::minutes(1)),
            now - Duration::days(1),
        );

        assert_eq!(TaskStats::compute(&[overdue.clone()], now).urgent, 1);
        // Not yet overdue an hour earlier
        assert_eq!(
            TaskStats::compute(&[overdue], now - Duration::hours(1)).urgent,
            0
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&TaskStats::default()).unwrap();
        assert!(json.contains("\"completionRate\":0"));
    }
}
