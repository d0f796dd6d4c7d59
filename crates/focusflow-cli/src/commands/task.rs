//! Task management commands for CLI.

use clap::Subcommand;
use focusflow_core::task::validate_description;
use focusflow_core::{Action, Config, TaskBreakdown};

use super::{open_store, print_json, CommandResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Break an assignment into micro-tasks and add them
    Add {
        /// Free-text assignment, e.g. "Study for AP Calc test"
        description: String,
    },
    /// List tasks (pending only unless --all)
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Mark a task completed and collect its XP
    Complete {
        /// Task ID
        id: String,
    },
    /// Show which task type a description is detected as
    Classify {
        /// Free-text assignment
        description: String,
    },
}

pub fn run(action: TaskAction) -> CommandResult {
    match action {
        TaskAction::Add { description } => {
            // The parent task keeps the input exactly as typed.
            validate_description(&description)?;
            let tasks = TaskBreakdown::new().breakdown(&description);
            let mut store = open_store(&Config::load_or_default())?;
            store.dispatch(Action::AddTasks(tasks.clone()));
            print_json(&tasks)
        }
        TaskAction::List { all } => {
            let store = open_store(&Config::load_or_default())?;
            let state = store.state();
            if all {
                print_json(&state.tasks)
            } else {
                let pending: Vec<_> = state.pending_tasks().collect();
                print_json(&pending)
            }
        }
        TaskAction::Delete { id } => {
            let mut store = open_store(&Config::load_or_default())?;
            if store.state().find_task(&id).is_none() {
                return Err(format!("task not found: {id}").into());
            }
            let events = store.dispatch(Action::DeleteTask(id));
            print_json(&events)
        }
        TaskAction::Complete { id } => {
            let mut store = open_store(&Config::load_or_default())?;
            let events = store.complete_task(&id)?;
            print_json(&events)
        }
        TaskAction::Classify { description } => {
            let description = validate_description(&description)?;
            print_json(&TaskBreakdown::new().task_type_info(description))
        }
    }
}
