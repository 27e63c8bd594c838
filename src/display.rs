//! Task display formatting module
//!
//! Handles colored output and different view modes for tasks.

use chrono::{DateTime, Local, Utc};
use colored::*;

use tempo_core::{Priority, Status, Task, TaskStatistics, TimeStatistics, format_elapsed};

/// Display mode for the task list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayMode {
    /// Minimal one-line format
    Compact,
    /// Full info with every field
    Detailed,
    /// Balanced view with clear status indicators (default)
    Default,
}

/// Check if terminal supports colors
pub fn supports_color() -> bool {
    atty::is(atty::Stream::Stdout)
}

/// Short id prefix shown in listings
pub fn short_id(task: &Task) -> String {
    task.id.to_string().chars().take(8).collect()
}

fn checkbox(status: Status) -> &'static str {
    match status {
        Status::Pending => "[ ]",
        Status::InProgress => "[>]",
        Status::Completed => "[✓]",
        Status::Cancelled => "[-]",
    }
}

fn priority_marker(priority: Priority, use_color: bool) -> String {
    let text = format!("!{}", priority);
    if !use_color {
        return text;
    }
    match priority {
        Priority::Urgent => text.red().bold().to_string(),
        Priority::High => text.yellow().to_string(),
        Priority::Medium => text.normal().to_string(),
        Priority::Low => text.dimmed().to_string(),
    }
}

fn due_marker(task: &Task, use_color: bool) -> String {
    let Some(due) = task.due_date else {
        return String::new();
    };
    let text = format!("(due {})", format_due(due));
    if !use_color {
        return text;
    }
    if task.is_completed() {
        text.green().to_string()
    } else if task.is_overdue() {
        text.red().bold().to_string()
    } else {
        text.normal().to_string()
    }
}

fn format_due(due: DateTime<Utc>) -> String {
    due.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

fn timer_marker(task: &Task, use_color: bool) -> String {
    if task.is_timer_running() {
        let text = format!("⏱ {}", task.formatted_time_spent());
        if use_color {
            text.cyan().to_string()
        } else {
            text
        }
    } else if task.time_spent > 0.0 {
        format!("⏱ {}", task.formatted_time_spent())
    } else {
        String::new()
    }
}

fn tags_marker(task: &Task, use_color: bool) -> String {
    if task.tags.is_empty() {
        return String::new();
    }
    task.tags
        .iter()
        .map(|t| {
            let tag = format!("#{}", t);
            if use_color {
                tag.magenta().to_string()
            } else {
                tag
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a task for display
pub fn format_task(task: &Task, mode: DisplayMode, use_color: bool) -> String {
    let title = if use_color && task.is_completed() {
        task.title.green().to_string()
    } else {
        task.title.clone()
    };

    match mode {
        DisplayMode::Compact => {
            let parts = [
                format!("{} [{}] {}", checkbox(task.status), short_id(task), title),
                tags_marker(task, use_color),
            ];
            join_parts(&parts)
        }
        DisplayMode::Default => {
            let parts = [
                format!("{} [{}] {}", checkbox(task.status), short_id(task), title),
                priority_marker(task.priority, use_color),
                tags_marker(task, use_color),
                due_marker(task, use_color),
                timer_marker(task, use_color),
            ];
            join_parts(&parts)
        }
        DisplayMode::Detailed => {
            let mut lines = vec![
                format!("{} [{}]", checkbox(task.status), task.id),
                format!("  Title:    {}", title),
            ];
            if !task.description.is_empty() {
                lines.push(format!("  Notes:    {}", task.description));
            }
            lines.push(format!("  Status:   {}", task.status));
            lines.push(format!(
                "  Priority: {}",
                priority_marker(task.priority, use_color)
            ));
            if !task.tags.is_empty() {
                lines.push(format!("  Tags:     {}", tags_marker(task, use_color)));
            }
            match task.due_date {
                Some(due) => lines.push(format!(
                    "  Due:      {} {}",
                    format_due(due),
                    if task.is_overdue() && use_color {
                        "(overdue)".red().to_string()
                    } else if task.is_overdue() {
                        "(overdue)".to_string()
                    } else {
                        String::new()
                    }
                )),
                None => lines.push("  Due:      (none)".to_string()),
            }
            lines.push(format!(
                "  Tracked:  {}{}",
                task.formatted_time_spent(),
                if task.is_timer_running() {
                    " (running)"
                } else {
                    ""
                }
            ));
            lines.push(format!(
                "  Created:  {}",
                task.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            ));
            lines.join("\n")
        }
    }
}

fn join_parts(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format the one-line summary under a task listing
pub fn format_summary(stats: &TaskStatistics, time: &TimeStatistics, use_color: bool) -> String {
    let mut parts = vec![format!("{} task(s)", stats.total)];

    if stats.completed > 0 {
        let text = format!("{} completed", stats.completed);
        parts.push(if use_color {
            text.green().to_string()
        } else {
            text
        });
    }

    if stats.overdue > 0 {
        let text = format!("{} overdue", stats.overdue);
        parts.push(if use_color {
            text.red().bold().to_string()
        } else {
            text
        });
    }

    if time.running > 0 {
        let text = format!("{} timer(s) running", time.running);
        parts.push(if use_color { text.cyan().to_string() } else { text });
    }

    parts.join(", ")
}

/// Format the stats screen
pub fn format_stats(stats: &TaskStatistics, time: &TimeStatistics) -> String {
    let mut lines = vec![
        format!("Tasks:           {}", stats.total),
        format!("  Pending:       {}", stats.pending),
        format!("  In progress:   {}", stats.in_progress),
        format!("  Completed:     {}", stats.completed),
        format!("  Cancelled:     {}", stats.cancelled),
        format!("  Overdue:       {}", stats.overdue),
        format!("Completion rate: {:.0}%", stats.completion_rate * 100.0),
        format!("Overdue rate:    {:.0}%", stats.overdue_rate * 100.0),
        String::new(),
        format!("Time tracked:    {}", format_elapsed(time.total_seconds)),
    ];
    if time.average_seconds > 0.0 {
        lines.push(format!(
            "Average/task:    {}",
            format_elapsed(time.average_seconds)
        ));
    }
    if time.running > 0 {
        lines.push(format!("Timers running:  {}", time.running));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_format_plain() {
        let task = Task::new("Write tests").with_tags(["dev".to_string()]);
        let line = format_task(&task, DisplayMode::Compact, false);

        assert!(line.starts_with("[ ] ["));
        assert!(line.contains("Write tests"));
        assert!(line.ends_with("#dev"));
    }

    #[test]
    fn test_completed_checkbox() {
        let task = Task::new("Done").completed();
        let line = format_task(&task, DisplayMode::Compact, false);
        assert!(line.starts_with("[✓]"));
    }

    #[test]
    fn test_summary_counts() {
        let stats = TaskStatistics {
            total: 3,
            completed: 1,
            overdue: 1,
            ..Default::default()
        };
        let time = TimeStatistics::default();
        let summary = format_summary(&stats, &time, false);
        assert_eq!(summary, "3 task(s), 1 completed, 1 overdue");
    }
}
