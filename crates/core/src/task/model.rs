//! Task model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(Error::InvalidInput(format!("Unknown priority: {}", other))),
        }
    }
}

/// A checklist item owned by exactly one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl SubTask {
    pub(crate) fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
            created_at: now,
        }
    }
}

/// A user-tracked unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Subtasks in creation order
    pub subtasks: Vec<SubTask>,
}

impl Task {
    /// Build a fresh task from a draft. Only the store calls this.
    pub(crate) fn from_draft(draft: TaskDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            completed: false,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
            subtasks: Vec::new(),
        }
    }

    /// Record a mutation at `now`, never moving `updated_at` backwards
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }

    pub fn subtask(&self, subtask_id: Uuid) -> Option<&SubTask> {
        self.subtasks.iter().find(|st| st.id == subtask_id)
    }

    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|st| st.completed).count()
    }

    /// Percentage of completed subtasks, 0 when there are none
    pub fn progress(&self) -> u32 {
        rounded_percent(self.completed_subtasks(), self.subtasks.len())
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }

    /// Incomplete and either high priority or past its due date
    pub fn is_urgent(&self, now: DateTime<Utc>) -> bool {
        !self.completed && (self.priority == TaskPriority::High || self.is_overdue(now))
    }
}

/// Caller-supplied fields for a new task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: TaskPriority::default(),
            due_date: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial overwrite of a task's editable fields
///
/// `None` leaves a field untouched. For the optional fields, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<TaskPriority>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    pub fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// `round(part / whole * 100)`, or 0 when `whole` is 0
pub(crate) fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (whole * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_task_from_draft() {
        let now = Utc::now();
        let task = Task::from_draft(TaskDraft::new("Test task"), now);

        assert_eq!(task.title, "Test task");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(!task.completed);
        assert!(task.description.is_none());
        assert!(task.due_date.is_none());
        assert!(task.subtasks.is_empty());
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn test_draft_builders() {
        let due = Utc::now() + Duration::days(2);
        let draft = TaskDraft::new("Report")
            .with_description("Quarterly numbers")
            .with_priority(TaskPriority::High)
            .with_due_date(due);

        assert_eq!(draft.description, Some("Quarterly numbers".to_string()));
        assert_eq!(draft.priority, TaskPriority::High);
        assert_eq!(draft.due_date, Some(due));
    }

    #[test]
    fn test_touch_never_goes_backwards() {
        let now = Utc::now();
        let mut task = Task::from_draft(TaskDraft::new("Clock skew"), now);

        task.touch(now - Duration::minutes(5));
        assert_eq!(task.updated_at, now);

        task.touch(now + Duration::minutes(5));
        assert_eq!(task.updated_at, now + Duration::minutes(5));
    }

    #[test]
    fn test_progress() {
        let now = Utc::now();
        let mut task = Task::from_draft(TaskDraft::new("Progress"), now);
        assert_eq!(task.progress(), 0);

        task.subtasks.push(SubTask::new("a", now));
        task.subtasks.push(SubTask::new("b", now));
        task.subtasks.push(SubTask::new("c", now));
        task.subtasks[0].completed = true;
        assert_eq!(task.progress(), 33);

        task.subtasks[1].completed = true;
        assert_eq!(task.progress(), 67);
    }

    #[test]
    fn test_urgency() {
        let now = Utc::now();
        let mut task = Task::from_draft(TaskDraft::new("Urgency"), now);
        assert!(!task.is_urgent(now));

        task.priority = TaskPriority::High;
        assert!(task.is_urgent(now));

        task.priority = TaskPriority::Low;
        task.due_date = Some(now - Duration::hours(1));
        assert!(task.is_urgent(now));

        // Due exactly now is not past due
        task.due_date = Some(now);
        assert!(!task.is_urgent(now));

        task.due_date = Some(now - Duration::hours(1));
        task.completed = true;
        assert!(!task.is_urgent(now));
    }

    #[test]
    fn test_patch_apply() {
        let now = Utc::now();
        let mut task = Task::from_draft(
            TaskDraft::new("Original")
                .with_description("desc")
                .with_due_date(now),
            now,
        );

        TaskPatch::new()
            .title("Renamed")
            .clear_description()
            .priority(TaskPriority::Low)
            .clear_due_date()
            .apply(&mut task);

        assert_eq!(task.title, "Renamed");
        assert!(task.description.is_none());
        assert_eq!(task.priority, TaskPriority::Low);
        assert!(task.due_date.is_none());
        assert!(!task.completed);
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!("HIGH".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert_eq!(" low ".parse::<TaskPriority>().unwrap(), TaskPriority::Low);
        assert!("critical".parse::<TaskPriority>().is_err());
        assert_eq!(TaskPriority::Medium.to_string(), "medium");
    }

    #[test]
    fn test_rounded_percent() {
        assert_eq!(rounded_percent(0, 0), 0);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 2), 50);
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(4, 4), 100);
    }
}
