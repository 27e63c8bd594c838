use clap::{Parser, Subcommand, ValueEnum};

use tempo_core::{Priority, Status, TaskSort};

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "A task manager with built-in time tracking")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
    Urgent,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
            PriorityArg::Urgent => Priority::Urgent,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Status::Pending,
            StatusArg::InProgress => Status::InProgress,
            StatusArg::Completed => Status::Completed,
            StatusArg::Cancelled => Status::Cancelled,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortBy {
    Created,
    Due,
    Priority,
    Title,
    Status,
}

impl From<SortBy> for TaskSort {
    fn from(arg: SortBy) -> Self {
        match arg {
            SortBy::Created => TaskSort::Created,
            SortBy::Due => TaskSort::Due,
            SortBy::Priority => TaskSort::Priority,
            SortBy::Title => TaskSort::Title,
            SortBy::Status => TaskSort::Status,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        /// Due date ("tomorrow", "Sep 1", "2026-09-01", "in 3 days")
        #[arg(long, short = 'd', value_name = "DATE")]
        due: Option<String>,
        /// Task priority
        #[arg(long, short = 'p', value_enum)]
        priority: Option<PriorityArg>,
        /// Tags (can be specified multiple times)
        #[arg(long, short = 't', value_name = "TAG")]
        tag: Vec<String>,
        /// Longer description
        #[arg(long, value_name = "TEXT")]
        desc: Option<String>,
    },

    /// List tasks with filtering and sorting
    List {
        /// Show only tasks with this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        /// Show only tasks with this priority
        #[arg(long, short = 'p', value_enum)]
        priority: Option<PriorityArg>,
        /// Filter tasks containing text in title or description
        #[arg(long, short = 's', value_name = "TERM")]
        search: Option<String>,
        /// Filter by tag (can be specified multiple times, all must match)
        #[arg(long, short = 't', value_name = "TAG")]
        tag: Vec<String>,
        /// Hide completed tasks
        #[arg(long)]
        hide_completed: bool,
        /// Sort tasks by field
        #[arg(long, value_enum, default_value = "created")]
        sort: SortBy,
        /// Reverse sort order
        #[arg(long, short = 'r')]
        reverse: bool,
        /// Use compact one-line format
        #[arg(long, short = 'c')]
        compact: bool,
        /// Use detailed format with full info
        #[arg(long)]
        detailed: bool,
        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// Mark a task as completed
    Done {
        /// Task id (unambiguous prefix is enough)
        id: String,
    },

    /// Remove a task
    Remove {
        /// Task id (unambiguous prefix is enough)
        id: String,
    },

    /// Edit a task's fields
    Edit {
        /// Task id (unambiguous prefix is enough)
        id: String,
        /// New title
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,
        /// New due date (use 'none' to clear)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
        /// New priority
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        /// New status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        /// New description
        #[arg(long, value_name = "TEXT")]
        desc: Option<String>,
    },

    /// Start the timer on a task (stops any other running timer)
    Start {
        /// Task id (unambiguous prefix is enough)
        id: String,
    },

    /// Stop a running timer
    Stop {
        /// Task id (unambiguous prefix is enough)
        id: Option<String>,
        /// Stop every running timer
        #[arg(long)]
        all: bool,
    },

    /// Reset a task's tracked time to zero
    Reset {
        /// Task id (unambiguous prefix is enough)
        id: String,
    },

    /// Show task and time-tracking statistics
    Stats,
}
