//! Morning routine domain: tasks, hero profile, departure countdown and the
//! engine that ties them together.

mod departure;
mod engine;
mod profile;
mod task;

pub use departure::{minutes_until_departure, DepartureTime, URGENT_MINUTES};
pub use engine::{QuestOutcome, RoutineEngine};
pub use profile::{Identity, IdentityKey, Profile, Rank};
pub use task::{
    coerce_duration, coerce_reward, starter_routine, Task, TaskDefaults, TaskId, MIN_DURATION_MIN,
    MIN_REWARD,
};
