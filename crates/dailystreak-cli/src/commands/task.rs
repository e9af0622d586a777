//! Task management commands for CLI.

use clap::Subcommand;
use dailystreak_core::{NewTask, Recurrence, TaskPatch};

use super::{open_service, print_json, CommandResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated recurrence tags (daily, weekly, monthly)
        #[arg(long)]
        recurrence: Option<String>,
    },
    /// List tasks
    List,
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task's title, notes or recurrence
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New notes (an empty string clears them)
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated recurrence tags
        #[arg(long)]
        recurrence: Option<String>,
    },
    /// Delete a task and its history
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> CommandResult {
    let (_, service) = open_service()?;

    match action {
        TaskAction::Create {
            title,
            notes,
            recurrence,
        } => {
            let mut new_task = NewTask::new(title);
            if let Some(notes) = notes {
                new_task = new_task.with_notes(notes);
            }
            if let Some(raw) = recurrence {
                new_task = new_task.with_recurrence(Recurrence::parse_list(&raw)?);
            }
            let task = service.create_task(new_task)?;
            print_json(&task)?;
        }
        TaskAction::List => {
            print_json(&service.list_tasks()?)?;
        }
        TaskAction::Get { id } => {
            print_json(&service.get_task(&id)?)?;
        }
        TaskAction::Update {
            id,
            title,
            notes,
            recurrence,
        } => {
            let patch = TaskPatch {
                title,
                notes: notes.map(Some),
                recurrence: recurrence
                    .map(|raw| Recurrence::parse_list(&raw))
                    .transpose()?,
            };
            if patch.is_empty() {
                return Err("nothing to update: pass --title, --notes or --recurrence".into());
            }
            print_json(&service.update_task(&id, patch)?)?;
        }
        TaskAction::Delete { id } => {
            service.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
