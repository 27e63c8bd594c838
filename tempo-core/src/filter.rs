//! Task filtering and sorting logic
//!
//! Provides a builder-style API for narrowing and ordering tasks.
//! Matching is a pure conjunction: every configured predicate must
//! pass, and unconfigured predicates pass trivially.

use std::collections::BTreeSet;

use crate::task::{Priority, Status, Task};

/// Sort order for tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    #[default]
    Created,
    Due,
    Priority,
    Title,
    Status,
}

/// Builder for filtering tasks
#[derive(Debug, Clone)]
pub struct TaskFilter {
    /// Filter by exact status
    pub status: Option<Status>,
    /// Filter by exact priority
    pub priority: Option<Priority>,
    /// Case-insensitive substring match against title or description
    pub search: Option<String>,
    /// Required tags; the task's tag set must be a superset
    pub tags: BTreeSet<String>,
    /// Whether completed tasks pass the filter (default true)
    pub show_completed: bool,
    /// Sort order applied by [`TaskFilter::apply`]
    pub sort: TaskSort,
    /// Reverse sort order
    pub reverse: bool,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            search: None,
            tags: BTreeSet::new(),
            show_completed: true,
            sort: TaskSort::default(),
            reverse: false,
        }
    }
}

impl TaskFilter {
    /// Create a filter that accepts every task
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status
    pub fn with_status(mut self, status: Option<Status>) -> Self {
        self.status = status;
        self
    }

    /// Filter by priority
    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// Filter by search term
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Set search term
    pub fn with_search(mut self, term: Option<String>) -> Self {
        self.search = term;
        self
    }

    /// Require a tag (can be chained; all required tags must be present)
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Set the required tag set
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Exclude completed tasks
    pub fn hide_completed(mut self) -> Self {
        self.show_completed = false;
        self
    }

    /// Set completed-task visibility
    pub fn with_show_completed(mut self, show: bool) -> Self {
        self.show_completed = show;
        self
    }

    /// Sort by given field
    pub fn sort_by(mut self, sort: TaskSort) -> Self {
        self.sort = sort;
        self
    }

    /// Reverse sort order
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Check if a task matches this filter
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }

        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }

        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !term.is_empty()
                && !task.title.to_lowercase().contains(&term)
                && !task.description.to_lowercase().contains(&term)
            {
                return false;
            }
        }

        // All required tags must be present on the task
        if !self.tags.is_subset(&task.tags) {
            return false;
        }

        if !self.show_completed && task.is_completed() {
            return false;
        }

        true
    }

    /// Apply filter and sort to a collection of tasks
    pub fn apply(&self, tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
        let mut filtered: Vec<Task> = tasks.into_iter().filter(|t| self.matches(t)).collect();

        match self.sort {
            TaskSort::Created => filtered.sort_by_key(|t| t.created_at),
            TaskSort::Due => filtered.sort_by(|a, b| match (&a.due_date, &b.due_date) {
                (Some(a_due), Some(b_due)) => a_due.cmp(b_due),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.created_at.cmp(&b.created_at),
            }),
            // Urgent first
            TaskSort::Priority => filtered.sort_by(|a, b| {
                b.priority
                    .rank()
                    .cmp(&a.priority.rank())
                    .then(a.created_at.cmp(&b.created_at))
            }),
            TaskSort::Title => {
                filtered.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            }
            TaskSort::Status => filtered.sort_by_key(|t| (t.is_completed(), t.created_at)),
        }

        if self.reverse {
            filtered.reverse();
        }

        filtered
    }
}
