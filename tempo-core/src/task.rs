//! Task domain model
//!
//! A [`Task`] is an immutable value: updates clone the value, change
//! fields through the builder methods, and refresh `updated_at`. The
//! identifier never changes across updates.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Newtype wrapper for task IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh random ID
    pub fn new() -> Self {
        TaskId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TaskId {
    fn from(id: Uuid) -> Self {
        TaskId(id)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TaskId)
    }
}

/// Task priority, ordered from lowest to highest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Numeric rank used for sorting (low = 1 .. urgent = 4)
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        };
        write!(f, "{}", name)
    }
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Status::Pending => "pending",
            Status::InProgress => "in progress",
            Status::Completed => "completed",
            Status::Cancelled => "cancelled",
        };
        write!(f, "{}", name)
    }
}

/// A single task with optional time tracking
///
/// `time_spent` accumulates only closed timer intervals, in seconds.
/// `timer_started_at` is present iff a timer is currently running.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub time_spent: f64,
    pub timer_started_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new pending task with the given title
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: Status::default(),
            due_date: None,
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
            time_spent: 0.0,
            timer_started_at: None,
        }
    }

    /// Builder method to set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to set the status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Builder method to set the due date
    pub fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Builder method to set the tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Builder method to set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Refresh the modification timestamp after editing a cloned value
    pub fn touched(mut self) -> Self {
        self.updated_at = Utc::now();
        self
    }

    /// New value with status set to completed, all other fields preserved
    pub fn completed(self) -> Self {
        self.with_status(Status::Completed).touched()
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Due date present, in the past, and the task is not completed
    pub fn is_overdue(&self) -> bool {
        match self.due_date {
            Some(due) => due < Utc::now() && !self.is_completed(),
            None => false,
        }
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer_started_at.is_some()
    }

    /// Accumulated time plus the currently open interval, in seconds
    pub fn current_time_spent(&self) -> f64 {
        self.current_time_spent_at(Utc::now())
    }

    /// Accumulated time as observed at `now`
    pub fn current_time_spent_at(&self, now: DateTime<Utc>) -> f64 {
        match self.timer_started_at {
            Some(start) => self.time_spent + (now - start).num_milliseconds() as f64 / 1000.0,
            None => self.time_spent,
        }
    }

    /// Start the timer; no-op if one is already running
    pub fn start_timer(self) -> Self {
        self.start_timer_at(Utc::now())
    }

    /// Start the timer with an explicit clock
    pub fn start_timer_at(mut self, now: DateTime<Utc>) -> Self {
        if self.timer_started_at.is_some() {
            return self;
        }
        self.timer_started_at = Some(now);
        self.updated_at = now;
        self
    }

    /// Stop the timer, folding the open interval into `time_spent`;
    /// no-op if no timer is running
    pub fn stop_timer(self) -> Self {
        self.stop_timer_at(Utc::now())
    }

    /// Stop the timer with an explicit clock
    pub fn stop_timer_at(mut self, now: DateTime<Utc>) -> Self {
        let Some(start) = self.timer_started_at else {
            return self;
        };
        self.time_spent += (now - start).num_milliseconds() as f64 / 1000.0;
        self.timer_started_at = None;
        self.updated_at = now;
        self
    }

    /// Zero out accumulated time and clear any running timer
    ///
    /// An in-progress interval is discarded, not folded in.
    pub fn reset_timer(mut self) -> Self {
        self.time_spent = 0.0;
        self.timer_started_at = None;
        self.updated_at = Utc::now();
        self
    }

    /// Elapsed time as `H:MM:SS` (>= 1 hour) or `M:SS`
    pub fn formatted_time_spent(&self) -> String {
        format_elapsed(self.current_time_spent())
    }
}

/// Format elapsed seconds as `H:MM:SS` when at least an hour, else `M:SS`
pub fn format_elapsed(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_task_creation() {
        let task = Task::new("Test task");

        assert_eq!(task.title, "Test task");
        assert_eq!(task.status, Status::Pending);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.time_spent, 0.0);
        assert!(task.due_date.is_none());
        assert!(!task.is_timer_running());
    }

    #[test]
    fn test_update_preserves_id() {
        let task = Task::new("Original");
        let updated = task.clone().with_title("Renamed").touched();

        assert_eq!(task.id, updated.id);
        assert_eq!(updated.title, "Renamed");
    }

    #[test]
    fn test_start_stop_folds_elapsed() {
        let start = Utc::now();
        let task = Task::new("Timed").start_timer_at(start);
        assert!(task.is_timer_running());

        let task = task.stop_timer_at(start + Duration::seconds(90));
        assert!(!task.is_timer_running());
        assert_eq!(task.time_spent, 90.0);
    }

    #[test]
    fn test_start_is_idempotent_while_running() {
        let start = Utc::now();
        let task = Task::new("Timed").start_timer_at(start);
        let again = task.clone().start_timer_at(start + Duration::seconds(30));

        assert_eq!(again.timer_started_at, Some(start));
    }

    #[test]
    fn test_stop_without_running_is_noop() {
        let task = Task::new("Idle");
        let stopped = task.clone().stop_timer();

        assert_eq!(stopped.time_spent, 0.0);
        assert!(stopped.timer_started_at.is_none());
    }

    #[test]
    fn test_reset_discards_open_interval() {
        let start = Utc::now();
        let task = Task::new("Timed")
            .start_timer_at(start)
            .stop_timer_at(start + Duration::seconds(10))
            .start_timer_at(start + Duration::seconds(20));

        let reset = task.reset_timer();
        assert_eq!(reset.time_spent, 0.0);
        assert!(reset.timer_started_at.is_none());
    }

    #[test]
    fn test_current_time_spent_includes_open_interval() {
        let start = Utc::now();
        let task = Task::new("Timed").start_timer_at(start);

        let observed = task.current_time_spent_at(start + Duration::seconds(42));
        assert_eq!(observed, 42.0);
    }

    #[test]
    fn test_overdue() {
        let task = Task::new("Late").with_due_date(Some(Utc::now() - Duration::hours(1)));
        assert!(task.is_overdue());

        let done = task.clone().completed();
        assert!(!done.is_overdue());

        let future = Task::new("Soon").with_due_date(Some(Utc::now() + Duration::hours(1)));
        assert!(!future.is_overdue());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0.0), "0:00");
        assert_eq!(format_elapsed(59.9), "0:59");
        assert_eq!(format_elapsed(125.0), "2:05");
        assert_eq!(format_elapsed(3600.0), "1:00:00");
        assert_eq!(format_elapsed(3725.0), "1:02:05");
    }

    #[test]
    fn test_json_round_trip() {
        let start = Utc::now();
        let task = Task::new("Round trip")
            .with_description("All fields set")
            .with_priority(Priority::Urgent)
            .with_status(Status::InProgress)
            .with_due_date(Some(start + Duration::days(2)))
            .with_tags(["work".to_string(), "urgent".to_string()])
            .start_timer_at(start)
            .stop_timer_at(start + Duration::seconds(17));

        let json = serde_json::to_string(&task).unwrap();
        let decoded: Task = serde_json::from_str(&json).unwrap();

        assert_eq!(task, decoded);
    }
}
