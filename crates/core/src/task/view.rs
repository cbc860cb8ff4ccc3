//! List views over the task collection
//!
//! Groups tasks the way the task list presents them. Dates are compared in
//! the time zone of the supplied `now`.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::model::Task;

/// Tasks grouped for display, each group in collection order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBuckets {
    /// Active tasks that are high priority or past due
    pub urgent: Vec<Task>,
    /// Active tasks due on the current calendar day (may overlap `urgent`)
    pub due_today: Vec<Task>,
    /// Active tasks that are not urgent
    pub other: Vec<Task>,
    pub completed: Vec<Task>,
}

impl TaskBuckets {
    pub fn partition<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Self {
        let instant = now.with_timezone(&Utc);
        let today = now.date_naive();
        let tz = now.timezone();

        let mut buckets = Self::default();
        for task in tasks {
            if task.completed {
                buckets.completed.push(task.clone());
                continue;
            }
            if task
                .due_date
                .is_some_and(|due| due.with_timezone(&tz).date_naive() == today)
            {
                buckets.due_today.push(task.clone());
            }
            if task.is_urgent(instant) {
                buckets.urgent.push(task.clone());
            } else {
                buckets.other.push(task.clone());
            }
        }
        buckets
    }

    pub fn active_len(&self) -> usize {
        self.urgent.len() + self.other.len()
    }
}

/// Short human label for a due date: "Today", "Tomorrow", or e.g. "May 2"
pub fn due_label<Tz: TimeZone>(due: &DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let due_day = due.with_timezone(&now.timezone()).date_naive();
    let today = now.date_naive();
    if due_day == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(due_day) {
        "Tomorrow".to_string()
    } else {
        format_day(due_day)
    }
}

fn format_day(day: NaiveDate) -> String {
    day.format("%b %-d").to_string()
}
