//! Persisted routine snapshot and the storage seam.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::routine::{DepartureTime, Identity, IdentityKey, Task, MIN_DURATION_MIN};

/// Profile and tasks, always written together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineSnapshot {
    pub points: u64,
    #[serde(default)]
    pub departure: DepartureTime,
    pub tasks: Vec<Task>,
}

impl RoutineSnapshot {
    /// Decode stored JSON and reject snapshots that break task invariants.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or [`validate`](Self::validate)
    /// fails.
    pub fn decode(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Task ids are unique and leave room for new ids; durations are at
    /// least one minute.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(self.tasks.len());
        for task in &self.tasks {
            if task.id.0 == u64::MAX {
                return Err(ValidationError::InvalidValue {
                    field: "tasks.id".into(),
                    message: format!("id {} leaves no room for new tasks", task.id),
                });
            }
            if !seen.insert(task.id) {
                return Err(ValidationError::InvalidValue {
                    field: "tasks.id".into(),
                    message: format!("duplicate id {}", task.id),
                });
            }
            if task.duration < MIN_DURATION_MIN {
                return Err(ValidationError::InvalidValue {
                    field: "tasks.duration".into(),
                    message: format!("task {} lasts {} minutes", task.id, task.duration),
                });
            }
        }
        Ok(())
    }
}

/// Persistence collaborator.
///
/// Implementations only move bytes; callers decide what a failure means.
/// A snapshot that exists but cannot be decoded, or fails
/// [`RoutineSnapshot::validate`], is reported as an error.
pub trait RoutineStore: Send {
    /// Load the snapshot saved under `key`, if any.
    fn load(&self, key: &IdentityKey) -> Result<Option<RoutineSnapshot>>;

    /// Replace the snapshot saved under `key`.
    fn save(&self, key: &IdentityKey, snapshot: &RoutineSnapshot) -> Result<()>;

    /// The hero who was logged in last, if any.
    fn current_identity(&self) -> Result<Option<Identity>>;

    /// Remember (or forget, with `None`) the logged-in hero.
    fn set_current_identity(&self, identity: Option<&Identity>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::{starter_routine, TaskId};

    fn snapshot() -> RoutineSnapshot {
        RoutineSnapshot {
            points: 40,
            departure: DepartureTime::default(),
            tasks: starter_routine(),
        }
    }

    #[test]
    fn starter_routine_is_valid() {
        assert!(snapshot().validate().is_ok());
        let json = serde_json::to_string(&snapshot()).unwrap();
        assert_eq!(RoutineSnapshot::decode(&json).unwrap(), snapshot());
    }

    #[test]
    fn rejects_zero_minute_task() {
        let mut snap = snapshot();
        snap.tasks[2].duration = 0;
        assert!(matches!(
            snap.validate(),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut snap = snapshot();
        snap.tasks[1].id = TaskId(1);
        assert!(snap.validate().is_err());
    }

    #[test]
    fn rejects_exhausted_id_space() {
        let mut snap = snapshot();
        snap.tasks[5].id = TaskId(u64::MAX);
        assert!(snap.validate().is_err());
        let json = serde_json::to_string(&snap).unwrap();
        assert!(RoutineSnapshot::decode(&json).is_err());
    }
}
