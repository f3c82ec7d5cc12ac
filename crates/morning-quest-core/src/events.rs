use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::routine::{DepartureTime, Rank, TaskId};

/// Every state change the session accepts produces an Event.
/// Renderers print or animate them; nothing in the core consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    LoggedIn {
        name: String,
        first_time: bool,
        points: u64,
        at: NaiveDateTime,
    },
    LoggedOut {
        name: String,
        at: NaiveDateTime,
    },
    TaskToggled {
        task_id: TaskId,
        completed: bool,
        at: NaiveDateTime,
    },
    TimerStarted {
        task_id: TaskId,
        duration_secs: u64,
        /// Task whose countdown was cancelled to make room, if any.
        replaced: Option<TaskId>,
        at: NaiveDateTime,
    },
    TimerStopped {
        task_id: TaskId,
        at: NaiveDateTime,
    },
    TaskAdded {
        task_id: TaskId,
        label: String,
        at: NaiveDateTime,
    },
    TaskRemoved {
        task_id: TaskId,
        /// The removed task's countdown was cancelled along with it.
        timer_cancelled: bool,
        at: NaiveDateTime,
    },
    DurationUpdated {
        task_id: TaskId,
        minutes: u32,
        at: NaiveDateTime,
    },
    RewardUpdated {
        task_id: TaskId,
        points: u32,
        at: NaiveDateTime,
    },
    DepartureChanged {
        departure: DepartureTime,
        at: NaiveDateTime,
    },
    QuestCompleted {
        awarded: u64,
        total_points: u64,
        rank: Rank,
        at: NaiveDateTime,
    },
    QuestNotReady {
        remaining: usize,
        at: NaiveDateTime,
    },
}
