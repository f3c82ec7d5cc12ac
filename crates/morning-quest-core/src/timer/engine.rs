//! Task timer implementation.
//!
//! The timer is a tick-driven state machine. It does not use internal
//! threads or read the system clock - the caller is responsible for calling
//! `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start(id)--> Running(id)
//! Running(id) --start(id) | stop() | tick() reaching 0--> Idle
//! Running(a) --start(b)--> Running(b)   (cancel-and-replace)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = TaskTimer::new();
//! timer.start(task.id, task.duration_secs());
//! // Once per second:
//! timer.tick();
//! ```

use serde::{Deserialize, Serialize};

use crate::routine::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// The single task currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTimer {
    pub task_id: TaskId,
    pub seconds_remaining: u64,
    /// Seconds the countdown started from (the task's duration).
    pub total_seconds: u64,
}

impl ActiveTimer {
    /// 0.0 .. 1.0 fraction of the countdown still remaining.
    pub fn remaining_fraction(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        self.seconds_remaining as f64 / self.total_seconds as f64
    }
}

/// What a call to [`TaskTimer::start`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { replaced: Option<TaskId> },
    /// The task was already running, so the call stopped it.
    Stopped,
}

/// At-most-one countdown across all tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTimer {
    active: Option<ActiveTimer>,
}

impl TaskTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.active.is_some() {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    pub fn active(&self) -> Option<&ActiveTimer> {
        self.active.as_ref()
    }

    pub fn active_task(&self) -> Option<TaskId> {
        self.active.map(|a| a.task_id)
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.active.map(|a| a.seconds_remaining).unwrap_or(0)
    }

    pub fn is_active(&self, task_id: TaskId) -> bool {
        self.active_task() == Some(task_id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting down `total_seconds` for `task_id`.
    ///
    /// Starting the task that is already running stops it instead. Starting
    /// any other task silently replaces the running countdown.
    pub fn start(&mut self, task_id: TaskId, total_seconds: u64) -> StartOutcome {
        if self.is_active(task_id) {
            self.stop();
            return StartOutcome::Stopped;
        }
        let replaced = self.active_task();
        self.active = Some(ActiveTimer {
            task_id,
            seconds_remaining: total_seconds,
            total_seconds,
        });
        StartOutcome::Started { replaced }
    }

    /// Clear the countdown. Returns the task that was running, if any.
    pub fn stop(&mut self) -> Option<TaskId> {
        self.active.take().map(|a| a.task_id)
    }

    /// Advance one second. A countdown that reaches zero goes idle.
    pub fn tick(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.seconds_remaining = active.seconds_remaining.saturating_sub(1);
        if active.seconds_remaining == 0 {
            self.active = None;
        }
    }

    /// Shrink the countdown after the running task's duration was edited.
    pub(crate) fn cap_remaining(&mut self, task_id: TaskId, total_seconds: u64) {
        if let Some(active) = self.active.as_mut().filter(|a| a.task_id == task_id) {
            active.total_seconds = total_seconds;
            active.seconds_remaining = active.seconds_remaining.min(total_seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_then_start_again_stops() {
        let mut timer = TaskTimer::new();
        assert_eq!(timer.state(), TimerState::Idle);

        assert_eq!(
            timer.start(TaskId(1), 300),
            StartOutcome::Started { replaced: None }
        );
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.seconds_remaining(), 300);

        assert_eq!(timer.start(TaskId(1), 300), StartOutcome::Stopped);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.seconds_remaining(), 0);
    }

    #[test]
    fn starting_another_task_replaces() {
        let mut timer = TaskTimer::new();
        timer.start(TaskId(1), 300);
        timer.tick();
        assert_eq!(
            timer.start(TaskId(2), 180),
            StartOutcome::Started {
                replaced: Some(TaskId(1))
            }
        );
        assert_eq!(timer.active_task(), Some(TaskId(2)));
        assert_eq!(timer.seconds_remaining(), 180);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut timer = TaskTimer::new();
        assert_eq!(timer.stop(), None);
        timer.start(TaskId(4), 60);
        assert_eq!(timer.stop(), Some(TaskId(4)));
        assert_eq!(timer.stop(), None);
    }

    #[test]
    fn tick_expires_to_idle() {
        let mut timer = TaskTimer::new();
        timer.start(TaskId(1), 3);
        timer.tick();
        timer.tick();
        assert_eq!(timer.seconds_remaining(), 1);
        timer.tick();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.seconds_remaining(), 0);
        timer.tick();
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn zero_length_countdown_expires_on_first_tick() {
        let mut timer = TaskTimer::new();
        timer.start(TaskId(1), 0);
        timer.tick();
        assert!(timer.active().is_none());
    }

    #[test]
    fn cap_remaining_only_touches_matching_task() {
        let mut timer = TaskTimer::new();
        timer.start(TaskId(1), 600);
        timer.cap_remaining(TaskId(2), 60);
        assert_eq!(timer.seconds_remaining(), 600);
        timer.cap_remaining(TaskId(1), 60);
        assert_eq!(timer.seconds_remaining(), 60);
        assert_eq!(timer.active().unwrap().total_seconds, 60);
    }

    #[test]
    fn remaining_fraction() {
        let mut timer = TaskTimer::new();
        timer.start(TaskId(1), 4);
        timer.tick();
        assert!((timer.active().unwrap().remaining_fraction() - 0.75).abs() < f64::EPSILON);
    }
}
