//! Task module
//!
//! This module contains task-related types, the task store, and the views
//! derived from it.

pub mod codec;
mod model;
mod stats;
mod store;
mod view;

pub use model::*;
pub use stats::TaskStats;
pub use store::{StoreOptions, TaskStore, DEFAULT_STORAGE_KEY};
pub use view::{due_label, TaskBuckets};
