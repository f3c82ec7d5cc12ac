mod engine;

pub use engine::{ActiveTimer, StartOutcome, TaskTimer, TimerState};

/// Format a countdown as `m:ss`.
pub fn format_countdown(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
