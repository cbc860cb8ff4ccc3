//! Command execution against the task store

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::fmt::Write as _;
use uuid::Uuid;

use taskpad_core::hints;
use taskpad_core::task::{due_label, Task, TaskDraft, TaskPatch, TaskPriority, TaskStore};

use crate::command::{Command, HELP};

/// Result of running one command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

pub struct App {
    store: TaskStore,
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Last second of `date` in the local time zone
fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(23, 59, 59)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Patch for the `due` command. `None` clears the date; a day whose end
/// cannot be placed on the clock is reported rather than cleared.
fn due_patch(
    date: Option<NaiveDate>,
    end_of: impl Fn(NaiveDate) -> Option<DateTime<Utc>>,
) -> Result<TaskPatch, String> {
    match date {
        None => Ok(TaskPatch::new().clear_due_date()),
        Some(day) => end_of(day)
            .map(|due| TaskPatch::new().due_date(due))
            .ok_or_else(|| format!("Cannot place a due time on {} in the local time zone", day)),
    }
}

/// Resolve a full id or unique prefix against `ids`
fn resolve<'a>(prefix: &str, ids: impl Iterator<Item = &'a Uuid>) -> Result<Uuid, String> {
    let needle = prefix.to_ascii_lowercase().replace('-', "");
    let matches: Vec<Uuid> = ids
        .filter(|id| id.simple().to_string().starts_with(&needle))
        .copied()
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("No task or subtask matches {:?}", prefix)),
        _ => Err(format!("{:?} is ambiguous ({} matches)", prefix, matches.len())),
    }
}

fn render_line<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> String {
    let mut line = format!(
        "  [{}] {}  {}  ({}",
        if task.completed { "x" } else { " " },
        short_id(task.id),
        task.title,
        task.priority
    );
    if let Some(due) = &task.due_date {
        let _ = write!(line, ", due {}", due_label(due, now));
    }
    if !task.subtasks.is_empty() {
        let _ = write!(
            line,
            ", {}/{} subtasks",
            task.completed_subtasks(),
            task.subtasks.len()
        );
    }
    line.push(')');
    line
}

impl App {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    async fn resolve_task(&self, prefix: &str) -> Result<Uuid, String> {
        let tasks = self.store.list().await;
        resolve(prefix, tasks.iter().map(|t| &t.id))
    }

    pub async fn execute(&self, command: Command) -> Outcome {
        let result = match command {
            Command::Quit => return Outcome::Quit,
            Command::Help => Ok(HELP.to_string()),
            Command::Add(title) => Ok(self.add(&title).await),
            Command::List => Ok(self.list().await),
            Command::Stats => Ok(self.stats().await),
            Command::Show(task) => self.show(&task).await,
            Command::Done(task) => self.toggle(&task).await,
            Command::Remove(task) => self.remove(&task).await,
            Command::Sub { task, title } => self.add_subtask(&task, title).await,
            Command::SubDone { task, subtask } => self.toggle_subtask(&task, &subtask).await,
            Command::Rename { task, title } => {
                self.patch(&task, TaskPatch::new().title(title)).await
            }
            Command::Priority { task, priority } => {
                self.patch(&task, TaskPatch::new().priority(priority)).await
            }
            Command::Due { task, date } => match due_patch(date, end_of_day) {
                Ok(patch) => self.patch(&task, patch).await,
                Err(notice) => Err(notice),
            },
        };
        Outcome::Print(result.unwrap_or_else(|notice| notice))
    }

    async fn add(&self, input: &str) -> String {
        let today = Local::now().date_naive();
        let suggested = hints::suggest(input, TaskPriority::default(), today);

        let mut draft = TaskDraft::new(suggested.clean_title).with_priority(suggested.priority);
        if let Some(due) = suggested.due_date.and_then(end_of_day) {
            draft = draft.with_due_date(due);
        }

        let task = self.store.create(draft).await;
        tracing::debug!(id = %task.id, "task added");
        format!("Added {}", render_line(&task, &Local::now()).trim_start())
    }

    async fn list(&self) -> String {
        let now = Local::now();
        let buckets = self.store.buckets(&now).await;
        if buckets.active_len() == 0 && buckets.completed.is_empty() {
            return "No tasks yet. Try `add Call John tomorrow`.".to_string();
        }

        let mut out = String::new();
        if !buckets.due_today.is_empty() {
            let _ = writeln!(out, "Due today: {}", buckets.due_today.len());
        }
        let sections = [
            ("Urgent", &buckets.urgent),
            ("Active", &buckets.other),
            ("Completed", &buckets.completed),
        ];
        for (heading, tasks) in sections {
            if tasks.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{} ({})", heading, tasks.len());
            for task in tasks {
                let _ = writeln!(out, "{}", render_line(task, &now));
            }
        }
        out.trim_end().to_string()
    }

    async fn stats(&self) -> String {
        let stats = self.store.stats().await;
        format!(
            "{} total, {} active, {} completed, {} urgent, {}% complete",
            stats.total, stats.active, stats.completed, stats.urgent, stats.completion_rate
        )
    }

    async fn show(&self, prefix: &str) -> Result<String, String> {
        let id = self.resolve_task(prefix).await?;
        let task = self
            .store
            .get(id)
            .await
            .ok_or_else(|| format!("Task {} no longer exists", short_id(id)))?;

        let now = Local::now();
        let mut out = render_line(&task, &now).trim_start().to_string();
        if let Some(description) = &task.description {
            let _ = write!(out, "\n  {}", description);
        }
        let _ = write!(
            out,
            "\n  created {}, updated {}",
            task.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            task.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
        if !task.subtasks.is_empty() {
            let _ = write!(out, "\n  progress {}%", task.progress());
            for subtask in &task.subtasks {
                let _ = write!(
                    out,
                    "\n    [{}] {}  {}",
                    if subtask.completed { "x" } else { " " },
                    short_id(subtask.id),
                    subtask.title
                );
            }
        }
        Ok(out)
    }

    async fn toggle(&self, prefix: &str) -> Result<String, String> {
        let id = self.resolve_task(prefix).await?;
        let task = self
            .store
            .toggle_complete(id)
            .await
            .ok_or_else(|| format!("Task {} no longer exists", short_id(id)))?;
        let state = if task.completed { "completed" } else { "reopened" };
        Ok(format!("{} {}", state, task.title))
    }

    async fn remove(&self, prefix: &str) -> Result<String, String> {
        let id = self.resolve_task(prefix).await?;
        if self.store.delete(id).await {
            Ok(format!("Deleted {}", short_id(id)))
        } else {
            Err(format!("Task {} no longer exists", short_id(id)))
        }
    }

    async fn add_subtask(&self, prefix: &str, title: String) -> Result<String, String> {
        let id = self.resolve_task(prefix).await?;
        let subtask = self
            .store
            .add_subtask(id, title)
            .await
            .ok_or_else(|| format!("Task {} no longer exists", short_id(id)))?;
        Ok(format!("Added subtask {}  {}", short_id(subtask.id), subtask.title))
    }

    async fn toggle_subtask(&self, task_prefix: &str, subtask_prefix: &str) -> Result<String, String> {
        let id = self.resolve_task(task_prefix).await?;
        let task = self
            .store
            .get(id)
            .await
            .ok_or_else(|| format!("Task {} no longer exists", short_id(id)))?;
        let subtask_id = resolve(subtask_prefix, task.subtasks.iter().map(|st| &st.id))?;

        let task = self
            .store
            .toggle_subtask_complete(id, subtask_id)
            .await
            .ok_or_else(|| format!("Subtask {} no longer exists", short_id(subtask_id)))?;
        Ok(format!(
            "{}: {}/{} subtasks done",
            task.title,
            task.completed_subtasks(),
            task.subtasks.len()
        ))
    }

    async fn patch(&self, prefix: &str, patch: TaskPatch) -> Result<String, String> {
        let id = self.resolve_task(prefix).await?;
        let task = self
            .store
            .update(id, patch)
            .await
            .ok_or_else(|| format!("Task {} no longer exists", short_id(id)))?;
        Ok(format!("Updated {}", render_line(&task, &Local::now()).trim_start()))
    }
}
