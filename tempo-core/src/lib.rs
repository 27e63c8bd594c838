//! Tempo Core - Domain logic and persistence for task management
//!
//! Tasks are immutable values: every "mutation" constructs a new value
//! sharing the same identifier. Persistence goes through the async
//! [`TaskRepository`] trait, with in-memory and JSON-file backends, and
//! the [`TaskManager`] mediates between callers and storage while holding
//! the last-loaded snapshot.

pub mod date;
pub mod error;
pub mod filter;
pub mod manager;
pub mod repository;
pub mod storage;
pub mod task;

pub use error::{Result, TaskError};
pub use filter::{TaskFilter, TaskSort};
pub use manager::{TaskEvent, TaskManager, TaskStatistics, TimeStatistics};
pub use repository::{InMemoryRepository, TaskRepository};
pub use storage::JsonFileRepository;
pub use task::{Priority, Status, Task, TaskId, format_elapsed};
