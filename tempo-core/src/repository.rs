//! Task persistence boundary
//!
//! The [`TaskRepository`] trait abstracts the storage medium from the
//! manager. Exactly one repository instance is the source of truth at a
//! time; callers never see partial collections.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, TaskError};
use crate::filter::TaskFilter;
use crate::task::{Task, TaskId};

/// Persistence contract shared by all backends
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Return the full task collection
    async fn load_tasks(&self) -> Result<Vec<Task>>;

    /// Insert a new task; fails with [`TaskError::Duplicate`] when the
    /// id already exists
    async fn save_task(&self, task: &Task) -> Result<()>;

    /// Replace the task with the same id; fails with
    /// [`TaskError::NotFound`] when absent, leaving storage unchanged
    async fn update_task(&self, task: &Task) -> Result<()>;

    /// Remove the task if present; deleting an unknown id is a silent
    /// no-op
    async fn delete_task(&self, id: TaskId) -> Result<()>;

    /// Return the subset of tasks matching the filter, sorted per the
    /// filter's sort order
    async fn search_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;
}

/// In-process repository with no persistence across restarts
///
/// Insertion order is preserved.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with tasks
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryRepository {
    async fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(TaskError::Duplicate(task.id));
        }
        tasks.push(task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        match tasks.iter().position(|t| t.id == task.id) {
            Some(index) => {
                tasks[index] = task.clone();
                Ok(())
            }
            None => Err(TaskError::NotFound(task.id)),
        }
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.tasks.write().await.retain(|t| t.id != id);
        Ok(())
    }

    async fn search_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(filter.apply(tasks.iter().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load() {
        let repo = InMemoryRepository::new();
        let task = Task::new("First");

        repo.save_task(&task).await.unwrap();
        let tasks = repo.load_tasks().await.unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0], task);
    }

    #[tokio::test]
    async fn test_save_duplicate_rejected() {
        let repo = InMemoryRepository::new();
        let task = Task::new("Once");

        repo.save_task(&task).await.unwrap();
        let err = repo.save_task(&task).await.unwrap_err();

        assert_eq!(err, TaskError::Duplicate(task.id));
        assert_eq!(repo.load_tasks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_by_id() {
        let repo = InMemoryRepository::new();
        let task = Task::new("Before");
        repo.save_task(&task).await.unwrap();

        let renamed = task.clone().with_title("After").touched();
        repo.update_task(&renamed).await.unwrap();

        let tasks = repo.load_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "After");
    }

    #[tokio::test]
    async fn test_update_missing_fails_and_leaves_storage_unchanged() {
        let repo = InMemoryRepository::new();
        let existing = Task::new("Kept");
        repo.save_task(&existing).await.unwrap();

        let ghost = Task::new("Ghost");
        let err = repo.update_task(&ghost).await.unwrap_err();

        assert_eq!(err, TaskError::NotFound(ghost.id));
        assert_eq!(repo.load_tasks().await.unwrap(), vec![existing]);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_noop() {
        let repo = InMemoryRepository::new();
        let task = Task::new("Kept");
        repo.save_task(&task).await.unwrap();

        repo.delete_task(TaskId::new()).await.unwrap();

        assert_eq!(repo.load_tasks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_applies_filter() {
        let repo = InMemoryRepository::new();
        repo.save_task(&Task::new("Buy milk")).await.unwrap();
        repo.save_task(&Task::new("Call mom")).await.unwrap();

        let filter = TaskFilter::new().search("buy");
        let results = repo.search_tasks(&filter).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Buy milk");
    }
}
