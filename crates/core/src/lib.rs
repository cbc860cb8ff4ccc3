//! Core library for Taskpad
//!
//! This crate contains the task management logic, including:
//! - The task store and its persisted mirror
//! - Key-value storage backends
//! - Derived statistics and list views
//! - Advisory title hints

pub mod error;
pub mod hints;
pub mod storage;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
