//! Routine tasks and the lenient numeric input rules for editing them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest allowed planned duration, in minutes.
pub const MIN_DURATION_MIN: u32 = 1;
/// Smallest allowed reward, in points.
pub const MIN_REWARD: u32 = 0;

/// Stable task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// A single checklist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub label: String,
    /// Planned duration in minutes. Always >= 1.
    pub duration: u32,
    /// Reward in points.
    pub points: u32,
    #[serde(default)]
    pub completed: bool,
    /// Presentation tag, opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Task {
    /// Duration in seconds, saturating.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration).saturating_mul(60)
    }
}

/// Values applied to tasks created through "add task".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefaults {
    pub duration: u32,
    pub points: u32,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            duration: 5,
            points: 10,
        }
    }
}

/// The routine every new hero starts with.
pub fn starter_routine() -> Vec<Task> {
    let seed = [
        ("Eat breakfast", 20, 10, None),
        ("Get dressed (quickly!)", 5, 20, None),
        ("Brush teeth (carefully)", 5, 15, None),
        ("Wash your face", 3, 5, None),
        ("Check your bag", 5, 30, Some("shield")),
        ("Handkerchief and tissues", 2, 10, None),
    ];
    seed.into_iter()
        .zip(1u64..)
        .map(|((label, duration, points, icon), id)| Task {
            id: TaskId(id),
            label: label.to_string(),
            duration,
            points,
            completed: false,
            icon: icon.map(str::to_string),
        })
        .collect()
}

/// Parse a form value into a non-negative whole number, clamped to `min`.
///
/// Non-numeric, non-finite and negative input all become `min`; fractions
/// truncate toward zero and huge values saturate at `u32::MAX`.
pub fn coerce_at_least(raw: &str, min: u32) -> u32 {
    let parsed = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    match parsed {
        Some(v) if v >= u32::MAX as f64 => u32::MAX,
        Some(v) if v > 0.0 => (v.trunc() as u32).max(min),
        _ => min,
    }
}

/// Lenient duration input (minimum 1 minute).
pub fn coerce_duration(raw: &str) -> u32 {
    coerce_at_least(raw, MIN_DURATION_MIN)
}

/// Lenient reward input (minimum 0 points).
pub fn coerce_reward(raw: &str) -> u32 {
    coerce_at_least(raw, MIN_REWARD)
}
