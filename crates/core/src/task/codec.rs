//! Storage encoding for the task collection
//!
//! The collection is a JSON array of task records with RFC 3339 timestamps.
//! Decoding is strict: anything that would not round-trip into a valid
//! collection is reported as [`Error::MalformedState`].

use std::collections::HashSet;

use super::model::Task;
use crate::{Error, Result};

/// Serialize the collection for the storage medium
pub fn encode(tasks: &[Task], pretty: bool) -> Result<String> {
    let content = if pretty {
        serde_json::to_string_pretty(tasks)?
    } else {
        serde_json::to_string(tasks)?
    };
    Ok(content)
}

/// Parse and validate a persisted collection
pub fn decode(raw: &str) -> Result<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_str(raw)
        .map_err(|e| Error::MalformedState(format!("Failed to parse tasks: {}", e)))?;
    validate(&tasks)?;
    Ok(tasks)
}

fn validate(tasks: &[Task]) -> Result<()> {
    let mut task_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !task_ids.insert(task.id) {
            return Err(Error::MalformedState(format!(
                "Duplicate task id {}",
                task.id
            )));
        }
        if task.updated_at < task.created_at {
            return Err(Error::MalformedState(format!(
                "Task {} was updated before it was created",
                task.id
            )));
        }

        let mut subtask_ids = HashSet::with_capacity(task.subtasks.len());
        for subtask in &task.subtasks {
            if !subtask_ids.insert(subtask.id) {
                return Err(Error::MalformedState(format!(
                    "Duplicate subtask id {} in task {}",
                    subtask.id, task.id
                )));
            }
        }
    }
    Ok(())
}
