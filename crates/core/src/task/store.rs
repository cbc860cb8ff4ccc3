//! Task store
//!
//! Owns the authoritative in-memory task collection and mirrors it into a
//! single key of a [`KeyValueStorage`] after every mutation.
//!
//! Nothing is written until [`TaskStore::load`] has completed, so an
//! early mutation can never overwrite the persisted collection with a
//! partial one.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::codec;
use super::model::{SubTask, Task, TaskDraft, TaskPatch};
use super::stats::TaskStats;
use super::view::TaskBuckets;
use crate::storage::KeyValueStorage;
use crate::Result;

/// Storage key used by the task list
pub const DEFAULT_STORAGE_KEY: &str = "todo-tasks";

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Key holding the encoded collection
    pub key: String,
    /// Pretty-print the persisted JSON
    pub pretty: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            pretty: false,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    /// Newest task first
    tasks: Vec<Task>,
    /// Set once the initial load has finished; gates every write
    loaded: bool,
}

pub struct TaskStore {
    storage: Arc<dyn KeyValueStorage>,
    options: StoreOptions,
    state: RwLock<StoreState>,
}

impl TaskStore {
    /// Create an empty, not yet loaded store
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_options(storage, StoreOptions::default())
    }

    pub fn with_options(storage: Arc<dyn KeyValueStorage>, options: StoreOptions) -> Self {
        Self {
            storage,
            options,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Create a store and load the persisted collection
    ///
    /// Fails only when the storage medium cannot be read; see [`TaskStore::load`].
    pub async fn open(storage: Arc<dyn KeyValueStorage>, options: StoreOptions) -> Result<Self> {
        let store = Self::with_options(storage, options);
        store.load().await?;
        Ok(store)
    }

    /// Replace the in-memory collection with the persisted one
    ///
    /// A missing key yields an empty collection and malformed state is logged
    /// and discarded; both count as loaded. A failed read returns the storage
    /// error and leaves the store unloaded, so no write can replace the
    /// collection that could not be read. Returns the number of tasks loaded.
    pub async fn load(&self) -> Result<usize> {
        let tasks = match self.storage.get(&self.options.key).await {
            Ok(Some(raw)) => match codec::decode(&raw) {
                Ok(tasks) => tasks,
                Err(e) => {
                    warn!("Discarding persisted tasks under {:?}: {}", self.options.key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(
                    "Failed to read tasks from {:?}, writes stay disabled: {}",
                    self.options.key, e
                );
                return Err(e);
            }
        };

        let count = tasks.len();
        let mut state = self.state.write().await;
        state.tasks = tasks;
        state.loaded = true;
        info!("Loaded {} task(s) from {:?}", count, self.options.key);
        Ok(count)
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    /// Write the collection to storage, returning the storage error if any
    ///
    /// Returns `Ok(false)` without writing when the store is not loaded yet.
    pub async fn save(&self) -> Result<bool> {
        let state = self.state.read().await;
        if !state.loaded {
            return Ok(false);
        }
        self.write_through(&state.tasks).await?;
        Ok(true)
    }

    /// Create a task and make it the head of the collection
    pub async fn create(&self, draft: TaskDraft) -> Task {
        let mut state = self.state.write().await;
        let mut task = Task::from_draft(draft, Utc::now());
        while state.tasks.iter().any(|t| t.id == task.id) {
            task.id = Uuid::new_v4();
        }

        state.tasks.insert(0, task.clone());
        self.persist(&state).await;
        debug!("Created task {}", task.id);
        task
    }

    /// Overwrite the fields set in `patch`. `None` if the task is unknown.
    pub async fn update(&self, task_id: Uuid, patch: TaskPatch) -> Option<Task> {
        self.modify(task_id, |task| {
            patch.apply(task);
            Some(())
        })
        .await
        .map(|(task, ())| task)
    }

    /// Remove a task and its subtasks. Returns whether anything was removed.
    pub async fn delete(&self, task_id: Uuid) -> bool {
        let mut state = self.state.write().await;
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != task_id);
        if state.tasks.len() == before {
            return false;
        }

        self.persist(&state).await;
        debug!("Deleted task {}", task_id);
        true
    }

    /// Flip the task's completed flag. Subtasks are left as they are.
    pub async fn toggle_complete(&self, task_id: Uuid) -> Option<Task> {
        self.modify(task_id, |task| {
            task.completed = !task.completed;
            Some(())
        })
        .await
        .map(|(task, ())| task)
    }

    /// Append a new subtask. `None` if the task is unknown.
    pub async fn add_subtask(&self, task_id: Uuid, title: impl Into<String>) -> Option<SubTask> {
        let title = title.into();
        self.modify(task_id, move |task| {
            let mut subtask = SubTask::new(title, Utc::now());
            while task.subtask(subtask.id).is_some() {
                subtask.id = Uuid::new_v4();
            }
            task.subtasks.push(subtask.clone());
            Some(subtask)
        })
        .await
        .map(|(_, subtask)| subtask)
    }

    /// Flip a subtask's completed flag. `None` if either id is unknown.
    pub async fn toggle_subtask_complete(&self, task_id: Uuid, subtask_id: Uuid) -> Option<Task> {
        self.modify(task_id, |task| {
            let subtask = task.subtasks.iter_mut().find(|st| st.id == subtask_id)?;
            subtask.completed = !subtask.completed;
            Some(())
        })
        .await
        .map(|(task, ())| task)
    }

    pub async fn get(&self, task_id: Uuid) -> Option<Task> {
        let state = self.state.read().await;
        state.tasks.iter().find(|t| t.id == task_id).cloned()
    }

    /// Snapshot of the collection, newest first
    pub async fn list(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.tasks.is_empty()
    }

    pub async fn stats(&self) -> TaskStats {
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: DateTime<Utc>) -> TaskStats {
        let state = self.state.read().await;
        TaskStats::compute(&state.tasks, now)
    }

    pub async fn buckets<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> TaskBuckets {
        let state = self.state.read().await;
        TaskBuckets::partition(&state.tasks, now)
    }

    /// Apply `f` to the matching task. When `f` reports a change, the task is
    /// touched and the collection persisted.
    async fn modify<T>(
        &self,
        task_id: Uuid,
        f: impl FnOnce(&mut Task) -> Option<T>,
    ) -> Option<(Task, T)> {
        let mut state = self.state.write().await;
        let task = state.tasks.iter_mut().find(|t| t.id == task_id)?;
        let outcome = f(task)?;
        task.touch(Utc::now());
        let snapshot = task.clone();

        self.persist(&state).await;
        Some((snapshot, outcome))
    }

    /// Mirror the collection after a mutation. Failures are logged; the
    /// in-memory collection stays authoritative.
    async fn persist(&self, state: &StoreState) {
        if !state.loaded {
            debug!("Skipping persist before initial load");
            return;
        }
        if let Err(e) = self.write_through(&state.tasks).await {
            warn!("Failed to persist tasks: {}", e);
        }
    }

    async fn write_through(&self, tasks: &[Task]) -> Result<()> {
        let content = codec::encode(tasks, self.options.pretty)?;
        self.storage.set(&self.options.key, &content).await
    }
}
