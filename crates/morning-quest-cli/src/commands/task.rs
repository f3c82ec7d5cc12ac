//! Task management commands for CLI.

use clap::Subcommand;
use morning_quest_core::{Intent, TaskId};

use super::{apply_and_report, logged_in_session, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks
    List,
    /// Add a task with the default duration and reward
    Add {
        /// Task label
        label: String,
        /// Presentation icon tag
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a task (cancels its timer if running)
    Remove {
        /// Task ID
        id: TaskId,
    },
    /// Check or uncheck a task
    Toggle {
        /// Task ID
        id: TaskId,
    },
    /// Set planned minutes (minimum 1)
    Duration {
        /// Task ID
        id: TaskId,
        /// Minutes; non-numeric input becomes 1
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
    /// Set reward points (minimum 0)
    Reward {
        /// Task ID
        id: TaskId,
        /// Points; non-numeric input becomes 0
        #[arg(allow_hyphen_values = true)]
        points: String,
    },
}

pub fn run(action: TaskAction, json: bool) -> CliResult {
    let mut session = logged_in_session()?;

    let intent = match action {
        TaskAction::List => {
            let tasks = session.engine().map(|e| e.tasks().to_vec()).unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                for task in &tasks {
                    let check = if task.completed { "[x]" } else { "[ ]" };
                    println!(
                        "{check} {:>3}  {:<28} {:>3} min  {:>3} pts",
                        task.id.to_string(),
                        task.label,
                        task.duration,
                        task.points
                    );
                }
            }
            return Ok(());
        }
        TaskAction::Add { label, icon } => Intent::AddTask { label, icon },
        TaskAction::Remove { id } => Intent::RemoveTask { id },
        TaskAction::Toggle { id } => Intent::ToggleTask { id },
        TaskAction::Duration { id, minutes } => Intent::UpdateDuration { id, value: minutes },
        TaskAction::Reward { id, points } => Intent::UpdateReward { id, value: points },
    };

    apply_and_report(&mut session, intent, json)
}
