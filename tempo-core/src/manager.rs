//! Observable task manager
//!
//! The manager is the sole mutator-proxy between callers and the
//! repository. It holds the last-loaded snapshot, a loading flag, and a
//! last-error slot; every successful mutation ends with a full reload of
//! the authoritative list and a broadcast event. Write operations are
//! serialized behind a lock so overlapping mutations cannot interleave.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, broadcast};

use crate::error::{Result, TaskError};
use crate::filter::TaskFilter;
use crate::repository::TaskRepository;
use crate::task::{Priority, Status, Task, TaskId};

/// Broadcast after each successful mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    /// Snapshot refreshed from the repository
    Loaded,
    Created(TaskId),
    Updated(TaskId),
    Deleted(TaskId),
    /// Snapshot replaced by a search result
    Filtered,
}

/// Aggregate counts over the current snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaskStatistics {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub overdue: usize,
    /// completed / total, 0 when there are no tasks
    pub completion_rate: f64,
    /// overdue / total, 0 when there are no tasks
    pub overdue_rate: f64,
}

/// Time-tracking aggregates over the current snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeStatistics {
    /// Sum of every task's current time spent, in seconds
    pub total_seconds: f64,
    /// Average over tasks with nonzero time, 0 when there are none
    pub average_seconds: f64,
    /// Number of tasks with a running timer
    pub running: usize,
}

#[derive(Debug, Default)]
struct ManagerState {
    tasks: Vec<Task>,
    is_loading: bool,
    last_error: Option<TaskError>,
}

/// Mediates between callers and a [`TaskRepository`]
///
/// Failures are both returned and recorded in the last-error slot
/// (overwriting any previous unacknowledged error); the manager never
/// retries.
pub struct TaskManager {
    repository: Arc<dyn TaskRepository>,
    state: RwLock<ManagerState>,
    events: broadcast::Sender<TaskEvent>,
    // Serializes mutations so reload-after-write never interleaves
    write_lock: Mutex<()>,
}

impl TaskManager {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            repository,
            state: RwLock::new(ManagerState::default()),
            events,
            write_lock: Mutex::new(()),
        }
    }

    /// Subscribe to mutation events
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.events.subscribe()
    }

    /// Current snapshot of tasks
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    /// Look up a task in the current snapshot
    pub async fn task(&self, id: TaskId) -> Option<Task> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// Last unacknowledged error, if any
    pub async fn last_error(&self) -> Option<TaskError> {
        self.state.read().await.last_error.clone()
    }

    /// Acknowledge and clear the error slot
    pub async fn clear_error(&self) {
        self.state.write().await.last_error = None;
    }

    /// Refresh the snapshot from the repository
    pub async fn load_tasks(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.begin().await;
        self.refresh(TaskEvent::Loaded).await
    }

    /// Persist a new task and refresh the snapshot
    pub async fn add_task(&self, task: Task) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.begin().await;
        if let Err(err) = self.repository.save_task(&task).await {
            return Err(self.fail(err).await);
        }
        self.refresh(TaskEvent::Created(task.id)).await
    }

    /// Replace a persisted task and refresh the snapshot
    pub async fn update_task(&self, task: Task) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.begin().await;
        if let Err(err) = self.repository.update_task(&task).await {
            return Err(self.fail(err).await);
        }
        self.refresh(TaskEvent::Updated(task.id)).await
    }

    /// Delete a task and refresh the snapshot
    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.begin().await;
        if let Err(err) = self.repository.delete_task(id).await {
            return Err(self.fail(err).await);
        }
        self.refresh(TaskEvent::Deleted(id)).await
    }

    /// Mark a task completed, preserving every other field
    ///
    /// Silent no-op when the id is not in the current snapshot.
    pub async fn mark_completed(&self, id: TaskId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let Some(task) = self.task(id).await else {
            return Ok(());
        };
        self.begin().await;
        if let Err(err) = self.repository.update_task(&task.completed()).await {
            return Err(self.fail(err).await);
        }
        self.refresh(TaskEvent::Updated(id)).await
    }

    /// Replace the snapshot with the repository's filtered subset
    ///
    /// Unlike the mutating operations this does not reload the full
    /// list; the snapshot stays filtered until the next operation.
    pub async fn search_tasks(&self, filter: &TaskFilter) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.begin().await;
        match self.repository.search_tasks(filter).await {
            Ok(tasks) => {
                let mut state = self.state.write().await;
                state.tasks = tasks;
                state.is_loading = false;
                drop(state);
                let _ = self.events.send(TaskEvent::Filtered);
                Ok(())
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Start the timer on one task
    ///
    /// Every running timer is stopped first (folding its elapsed time),
    /// enforcing a single active timer across the collection, then the
    /// target is started.
    pub async fn start_timer(&self, id: TaskId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.begin().await;

        let tasks = match self.repository.load_tasks().await {
            Ok(tasks) => tasks,
            Err(err) => return Err(self.fail(err).await),
        };

        // Validate the target before touching anything, so an unknown id
        // leaves every other timer untouched
        if !tasks.iter().any(|t| t.id == id) {
            return Err(self.fail(TaskError::NotFound(id)).await);
        }

        let mut target = None;
        for task in tasks {
            let task = if task.is_timer_running() {
                let stopped = task.stop_timer();
                if let Err(err) = self.repository.update_task(&stopped).await {
                    return Err(self.fail(err).await);
                }
                stopped
            } else {
                task
            };
            if task.id == id {
                target = Some(task);
            }
        }

        let Some(target) = target else {
            return Err(self.fail(TaskError::NotFound(id)).await);
        };
        if let Err(err) = self.repository.update_task(&target.start_timer()).await {
            return Err(self.fail(err).await);
        }
        self.refresh(TaskEvent::Updated(id)).await
    }

    /// Stop a task's timer; no-op when the id is unknown or idle
    pub async fn stop_timer(&self, id: TaskId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let Some(task) = self.task(id).await else {
            return Ok(());
        };
        if !task.is_timer_running() {
            return Ok(());
        }
        self.begin().await;
        if let Err(err) = self.repository.update_task(&task.stop_timer()).await {
            return Err(self.fail(err).await);
        }
        self.refresh(TaskEvent::Updated(id)).await
    }

    /// Reset a task's timer to zero; no-op when the id is unknown
    pub async fn reset_timer(&self, id: TaskId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let Some(task) = self.task(id).await else {
            return Ok(());
        };
        self.begin().await;
        if let Err(err) = self.repository.update_task(&task.reset_timer()).await {
            return Err(self.fail(err).await);
        }
        self.refresh(TaskEvent::Updated(id)).await
    }

    /// Stop every running timer, folding elapsed time into each task
    pub async fn stop_all_timers(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.begin().await;

        let tasks = match self.repository.load_tasks().await {
            Ok(tasks) => tasks,
            Err(err) => return Err(self.fail(err).await),
        };

        for task in tasks.into_iter().filter(Task::is_timer_running) {
            if let Err(err) = self.repository.update_task(&task.stop_timer()).await {
                return Err(self.fail(err).await);
            }
        }
        self.refresh(TaskEvent::Loaded).await
    }

    /// Snapshot subset with the given status
    pub async fn tasks_by_status(&self, status: Status) -> Vec<Task> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect()
    }

    /// Snapshot subset with the given priority
    pub async fn tasks_by_priority(&self, priority: Priority) -> Vec<Task> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .filter(|t| t.priority == priority)
            .cloned()
            .collect()
    }

    /// Snapshot subset that is overdue
    pub async fn overdue_tasks(&self) -> Vec<Task> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .filter(|t| t.is_overdue())
            .cloned()
            .collect()
    }

    /// Incomplete snapshot subset due between now and `days` from now
    pub async fn tasks_due_within(&self, days: i64) -> Vec<Task> {
        let now = chrono::Utc::now();
        let horizon = now + chrono::Duration::days(days);
        self.state
            .read()
            .await
            .tasks
            .iter()
            .filter(|t| {
                !t.is_completed()
                    && t.due_date.is_some_and(|due| due >= now && due <= horizon)
            })
            .cloned()
            .collect()
    }

    /// Aggregate counts and rates over the current snapshot
    pub async fn statistics(&self) -> TaskStatistics {
        let state = self.state.read().await;
        let tasks = &state.tasks;

        let total = tasks.len();
        let count = |status: Status| tasks.iter().filter(|t| t.status == status).count();
        let completed = count(Status::Completed);
        let overdue = tasks.iter().filter(|t| t.is_overdue()).count();

        let rate = |part: usize| {
            if total == 0 {
                0.0
            } else {
                part as f64 / total as f64
            }
        };

        TaskStatistics {
            total,
            pending: count(Status::Pending),
            in_progress: count(Status::InProgress),
            completed,
            cancelled: count(Status::Cancelled),
            overdue,
            completion_rate: rate(completed),
            overdue_rate: rate(overdue),
        }
    }

    /// Time-tracking aggregates over the current snapshot
    pub async fn time_statistics(&self) -> TimeStatistics {
        let state = self.state.read().await;
        let tasks = &state.tasks;

        let total_seconds: f64 = tasks.iter().map(Task::current_time_spent).sum();
        let tracked = tasks
            .iter()
            .filter(|t| t.current_time_spent() > 0.0)
            .count();
        let average_seconds = if tracked == 0 {
            0.0
        } else {
            total_seconds / tracked as f64
        };

        TimeStatistics {
            total_seconds,
            average_seconds,
            running: tasks.iter().filter(|t| t.is_timer_running()).count(),
        }
    }

    async fn begin(&self) {
        self.state.write().await.is_loading = true;
    }

    /// Record the error in the slot and clear the loading flag
    async fn fail(&self, err: TaskError) -> TaskError {
        let mut state = self.state.write().await;
        state.last_error = Some(err.clone());
        state.is_loading = false;
        err
    }

    /// Reload the snapshot from the repository and broadcast `event`
    async fn refresh(&self, event: TaskEvent) -> Result<()> {
        match self.repository.load_tasks().await {
            Ok(tasks) => {
                let mut state = self.state.write().await;
                state.tasks = tasks;
                state.is_loading = false;
                drop(state);
                let _ = self.events.send(event);
                Ok(())
            }
            Err(err) => Err(self.fail(err).await),
        }
    }
}
