//! JSON file storage backend
//!
//! Persists the whole collection as one JSON array of task records.
//! Every mutation is load, apply, serialize, overwrite. Writes go
//! through a temp file and an atomic rename so a crash mid-write never
//! leaves a truncated document. Not safe for concurrent writers.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Result, TaskError};
use crate::filter::TaskFilter;
use crate::repository::TaskRepository;
use crate::task::{Task, TaskId};

/// File-backed repository storing tasks as a JSON array
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Create a repository backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the storage path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full document; a missing file is an empty collection,
    /// and a corrupt document is warned about and treated as empty
    async fn read_all(&self) -> Result<Vec<Task>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(TaskError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    err
                )));
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(tasks) => Ok(tasks),
            Err(err) => {
                eprintln!(
                    "Warning: Ignoring corrupt task file {}: {}",
                    self.path.display(),
                    err
                );
                Ok(Vec::new())
            }
        }
    }

    /// Serialize and overwrite the whole document via temp file + rename
    async fn write_all(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                TaskError::storage(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    err
                ))
            })?;
        }

        let json = serde_json::to_vec_pretty(tasks)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, &json).await.map_err(|err| {
            TaskError::storage(format!("Failed to write {}: {}", tmp.display(), err))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|err| {
            TaskError::storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                err
            ))
        })?;

        Ok(())
    }
}

#[async_trait]
impl TaskRepository for JsonFileRepository {
    async fn load_tasks(&self) -> Result<Vec<Task>> {
        self.read_all().await
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.read_all().await?;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(TaskError::Duplicate(task.id));
        }
        tasks.push(task.clone());
        self.write_all(&tasks).await
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.read_all().await?;
        match tasks.iter().position(|t| t.id == task.id) {
            Some(index) => {
                tasks[index] = task.clone();
                self.write_all(&tasks).await
            }
            None => Err(TaskError::NotFound(task.id)),
        }
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        let mut tasks = self.read_all().await?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(());
        }
        self.write_all(&tasks).await
    }

    async fn search_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let tasks = self.read_all().await?;
        Ok(filter.apply(tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use uuid::Uuid;

    fn temp_repo() -> JsonFileRepository {
        let path = std::env::temp_dir().join(format!("tempo-test-{}.json", Uuid::new_v4()));
        JsonFileRepository::new(path)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_collection() {
        let repo = temp_repo();
        assert!(repo.load_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_through_file() {
        let repo = temp_repo();
        let task = Task::new("Persisted")
            .with_description("survives a restart")
            .with_priority(Priority::High)
            .with_tags(["disk".to_string()]);

        repo.save_task(&task).await.unwrap();

        // A fresh instance at the same path sees the same record
        let reopened = JsonFileRepository::new(repo.path());
        let tasks = reopened.load_tasks().await.unwrap();
        assert_eq!(tasks, vec![task]);

        tokio::fs::remove_file(repo.path()).await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty_collection() {
        let repo = temp_repo();
        tokio::fs::write(repo.path(), b"{ not json ]").await.unwrap();

        assert!(repo.load_tasks().await.unwrap().is_empty());

        tokio::fs::remove_file(repo.path()).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_leaves_file_unchanged() {
        let repo = temp_repo();
        let existing = Task::new("Kept");
        repo.save_task(&existing).await.unwrap();

        let ghost = Task::new("Ghost");
        let err = repo.update_task(&ghost).await.unwrap_err();

        assert_eq!(err, TaskError::NotFound(ghost.id));
        assert_eq!(repo.load_tasks().await.unwrap(), vec![existing]);

        tokio::fs::remove_file(repo.path()).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_unknown_is_noop() {
        let repo = temp_repo();
        let task = Task::new("Kept");
        repo.save_task(&task).await.unwrap();

        repo.delete_task(TaskId::new()).await.unwrap();
        assert_eq!(repo.load_tasks().await.unwrap().len(), 1);

        tokio::fs::remove_file(repo.path()).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_save_rejected() {
        let repo = temp_repo();
        let task = Task::new("Once");

        repo.save_task(&task).await.unwrap();
        let err = repo.save_task(&task).await.unwrap_err();
        assert_eq!(err, TaskError::Duplicate(task.id));

        tokio::fs::remove_file(repo.path()).await.unwrap();
    }
}
