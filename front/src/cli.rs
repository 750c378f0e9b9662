//! Subcommands of the `taskify` binary, runnable against any cache or service.

use std::io::Write;

use chrono::NaiveDate;
use clap::Subcommand;
use taskify_api::v1::{NewTask, Priority, Task, TaskId, TaskPatch, TaskStatus};

use crate::{Board, Counts, Filter, Section, ServiceClient, TaskCache};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the tasks of one section.
    List {
        #[arg(long, default_value_t = Section::Today)]
        section: Section,

        /// Only tasks with this status (default: all).
        #[arg(long)]
        status: Option<TaskStatus>,

        /// Only tasks with this priority (default: all).
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Add a task.
    Add {
        title: String,

        /// Section to file the task under. Locally one of the sidebar
        /// sections (default: Today); the service takes any label
        /// (default: Inbox).
        #[arg(long)]
        section: Option<String>,

        /// Due date as YYYY-MM-DD (default: today).
        #[arg(long)]
        due: Option<NaiveDate>,

        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Flip a task between pending and completed.
    Toggle { id: TaskId },
    /// Delete a task.
    Delete { id: TaskId },
    /// Change a task's title.
    Rename { id: TaskId, title: String },
}

/// Runs `command` against the local board.
pub fn run_local<C: TaskCache>(
    board: &mut Board<C>,
    command: Command,
    out: &mut impl Write,
) -> eyre::Result<()> {
    match command {
        Command::List {
            section,
            status,
            priority,
        } => {
            board.filter = Filter {
                section,
                status,
                priority,
            };
            print_list(out, section, &board.visible())?;
        }
        Command::Add {
            title,
            section,
            due,
            priority,
        } => {
            board.filter.section = section
                .as_deref()
                .map(str::parse::<Section>)
                .transpose()?
                .unwrap_or_default();
            board.draft.title = title;
            board.draft.due = due;
            board.draft.priority = priority.unwrap_or_default();

            match board.add_task()? {
                Some(id) => writeln!(out, "{id}")?,
                None => eyre::bail!("task title must not be blank"),
            }
        }
        Command::Toggle { id } => {
            if !board.toggle_status(&id)? {
                eyre::bail!("no task with id {id}");
            }
        }
        Command::Delete { id } => {
            board.delete_task(&id)?;
        }
        Command::Rename { id, title } => {
            if !board.begin_edit(&id) {
                eyre::bail!("no task with id {id}");
            }

            board.set_edit_text(title);
            board.commit_edit()?;
        }
    }

    Ok(())
}

/// Runs `command` against the task store service.
pub async fn run_remote(
    service: &ServiceClient,
    command: Command,
    out: &mut impl Write,
) -> eyre::Result<()> {
    match command {
        Command::List {
            section,
            status,
            priority,
        } => {
            let tasks = service.list_tasks().await?;
            let filter = Filter {
                section,
                status,
                priority,
            };
            print_list(out, section, &filter.apply(&tasks))?;
        }
        Command::Add {
            title,
            section,
            due,
            priority,
        } => {
            let task = service
                .create_task(&NewTask {
                    title: Some(title),
                    status: None,
                    section,
                    due,
                    priority,
                })
                .await?;
            writeln!(out, "{}", task.id)?;
        }
        Command::Toggle { id } => {
            let tasks = service.list_tasks().await?;
            let Some(task) = tasks.into_iter().find(|task| task.id == id) else {
                eyre::bail!("no task with id {id}");
            };

            service
                .update_task(
                    &id,
                    &TaskPatch {
                        title: Some(task.title),
                        status: Some(task.status.toggled()),
                    },
                )
                .await?;
        }
        Command::Delete { id } => {
            service.delete_task(&id).await?;
        }
        Command::Rename { id, title } => {
            service
                .update_task(
                    &id,
                    &TaskPatch {
                        title: Some(title),
                        status: None,
                    },
                )
                .await?;
        }
    }

    Ok(())
}

fn print_list(out: &mut impl Write, section: Section, tasks: &[&Task]) -> eyre::Result<()> {
    writeln!(out, "{section}")?;
    writeln!(out, "{}", Counts::of(tasks.iter().copied()))?;

    for task in tasks {
        let mark = match task.status {
            TaskStatus::Pending => "🕓",
            TaskStatus::Completed => "✅",
        };

        writeln!(out)?;
        writeln!(out, "{mark} {}  [{}]", task.title, task.id)?;
        writeln!(out, "   Due: {}  {}", task.due, task.priority)?;
    }

    Ok(())
}
