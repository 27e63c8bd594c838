use std::sync::Arc;

use clap::Parser;

use tempo_core::date::parse_due_date;
use tempo_core::{JsonFileRepository, Task, TaskFilter, TaskId, TaskManager};

use crate::cli::{Cli, Commands};
use crate::display::{DisplayMode, format_stats, format_summary, format_task, supports_color};
use crate::error::{CliError, Result};

mod cli;
mod config;
mod display;
mod error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg: config::Config = confy::load("tempo", None)?;
    let repository = Arc::new(JsonFileRepository::new(cfg.tasks_file()));
    let manager = TaskManager::new(repository);
    manager.load_tasks().await?;

    match cli.command {
        Commands::Add {
            title,
            due,
            priority,
            tag,
            desc,
        } => {
            let title = title.join(" ");
            validate_title(&title)?;

            let due = due.map(|input| parse_due_date(&input)).transpose()?;
            if let Some(due) = due
                && due < chrono::Utc::now()
            {
                return Err(CliError::validation("due", "Due date cannot be in the past"));
            }

            let mut task = Task::new(title.as_str()).with_due_date(due).with_tags(tag);
            if let Some(priority) = priority {
                task = task.with_priority(priority.into());
            }
            if let Some(desc) = desc {
                task = task.with_description(desc);
            }

            let id = task.id;
            manager.add_task(task).await?;
            match due {
                Some(due) => println!(
                    "Task added: {} (due: {}) [{}]",
                    title,
                    due.format("%Y-%m-%d"),
                    id
                ),
                None => println!("Task added: {} [{}]", title, id),
            }
        }

        Commands::List {
            status,
            priority,
            search,
            tag,
            hide_completed,
            sort,
            reverse,
            compact,
            detailed,
            no_color,
        } => {
            let mut filter = TaskFilter::new()
                .with_status(status.map(Into::into))
                .with_priority(priority.map(Into::into))
                .with_search(search)
                .with_tags(tag)
                .sort_by(sort.into());
            if hide_completed {
                filter = filter.hide_completed();
            }
            if reverse {
                filter = filter.reversed();
            }

            manager.search_tasks(&filter).await?;
            let tasks = manager.tasks().await;

            if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                let mode = if compact {
                    DisplayMode::Compact
                } else if detailed {
                    DisplayMode::Detailed
                } else {
                    DisplayMode::Default
                };

                let use_color = !no_color && supports_color();

                for task in &tasks {
                    println!("{}", format_task(task, mode, use_color));
                }

                println!();
                let stats = manager.statistics().await;
                let time = manager.time_statistics().await;
                println!("{}", format_summary(&stats, &time, use_color));
            }
        }

        Commands::Done { id } => {
            let id = resolve_id(&manager, &id).await?;
            manager.mark_completed(id).await?;
            if let Some(task) = manager.task(id).await {
                println!("Completed: {}", task.title);
            }
        }

        Commands::Remove { id } => {
            let id = resolve_id(&manager, &id).await?;
            let title = manager.task(id).await.map(|t| t.title);
            manager.delete_task(id).await?;
            match title {
                Some(title) => println!("Removed: {}", title),
                None => println!("Removed task {}", id),
            }
        }

        Commands::Edit {
            id,
            title,
            due,
            priority,
            status,
            desc,
        } => {
            if title.is_none()
                && due.is_none()
                && priority.is_none()
                && status.is_none()
                && desc.is_none()
            {
                return Err(CliError::validation(
                    "edit",
                    "Provide at least one of --title, --due, --priority, --status, --desc",
                ));
            }

            let id = resolve_id(&manager, &id).await?;
            let mut task = manager
                .task(id)
                .await
                .ok_or(tempo_core::TaskError::NotFound(id))?;

            if let Some(title) = title {
                validate_title(&title)?;
                task = task.with_title(title);
            }
            if let Some(due) = due {
                let due = if due.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(parse_due_date(&due)?)
                };
                task = task.with_due_date(due);
            }
            if let Some(priority) = priority {
                task = task.with_priority(priority.into());
            }
            if let Some(status) = status {
                task = task.with_status(status.into());
            }
            if let Some(desc) = desc {
                task = task.with_description(desc);
            }

            let task = task.touched();
            let summary = task.title.clone();
            manager.update_task(task).await?;
            println!("Updated: {}", summary);
        }

        Commands::Start { id } => {
            let id = resolve_id(&manager, &id).await?;
            manager.start_timer(id).await?;
            if let Some(task) = manager.task(id).await {
                println!("Timer started: {}", task.title);
            }
        }

        Commands::Stop { id, all } => {
            if all {
                manager.stop_all_timers().await?;
                println!("Stopped all timers.");
            } else {
                let id = id.ok_or_else(|| {
                    CliError::validation("stop", "Provide a task id or --all")
                })?;
                let id = resolve_id(&manager, &id).await?;
                manager.stop_timer(id).await?;
                if let Some(task) = manager.task(id).await {
                    println!(
                        "Timer stopped: {} ({} tracked)",
                        task.title,
                        task.formatted_time_spent()
                    );
                }
            }
        }

        Commands::Reset { id } => {
            let id = resolve_id(&manager, &id).await?;
            manager.reset_timer(id).await?;
            if let Some(task) = manager.task(id).await {
                println!("Timer reset: {}", task.title);
            }
        }

        Commands::Stats => {
            let stats = manager.statistics().await;
            let time = manager.time_statistics().await;
            println!("{}", format_stats(&stats, &time));
        }
    }

    Ok(())
}

const MAX_TITLE_LEN: usize = 200;

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CliError::validation("title", "Title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CliError::validation(
            "title",
            format!("Title must be at most {} characters", MAX_TITLE_LEN),
        ));
    }
    Ok(())
}

/// Resolve a full id or an unambiguous id prefix against the snapshot
async fn resolve_id(manager: &TaskManager, input: &str) -> Result<TaskId> {
    if let Ok(id) = input.parse::<TaskId>() {
        return Ok(id);
    }

    let needle = input.to_lowercase();
    let matches: Vec<TaskId> = manager
        .tasks()
        .await
        .iter()
        .filter(|t| t.id.to_string().starts_with(&needle))
        .map(|t| t.id)
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CliError::parse(format!("No task matches id '{}'", input))),
        _ => Err(CliError::parse(format!(
            "Id '{}' is ambiguous ({} matches)",
            input,
            matches.len()
        ))),
    }
}
