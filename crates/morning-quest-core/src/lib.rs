//! # Morning Quest Core Library
//!
//! Business logic for Morning Quest, a morning-routine checklist that turns
//! getting ready for school into a quest: timed tasks, a countdown to
//! departure, and reward points that earn the hero a rank.
//!
//! The CLI binary is a thin renderer over this library: it shows state and
//! forwards user intents; every rule lives here.
//!
//! ## Architecture
//!
//! - **Routine Engine**: task list, single active countdown and quest payout,
//!   driven by the caller invoking `tick()` once per second
//! - **Session**: owns the logged-in engine and its collaborators, applies
//!   intents and persists after every change
//! - **Storage**: SQLite key-value snapshots and TOML configuration
//!
//! ## Key Components
//!
//! - [`RoutineEngine`]: Task/timer/reward state machine
//! - [`Session`]: Intent dispatch, persistence and presentation signals
//! - [`Clock`]: Wall-clock seam (system or manual)
//! - [`RoutineStore`]: Persistence seam ([`SqliteStore`], [`MemoryStore`])
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod intent;
pub mod routine;
pub mod session;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use intent::{Intent, IntentParseError};
pub use routine::{
    DepartureTime, Identity, IdentityKey, Profile, QuestOutcome, Rank, RoutineEngine, Task,
    TaskDefaults, TaskId,
};
pub use session::{Mood, RoutineView, Session};
pub use storage::{Config, MemoryStore, RoutineSnapshot, RoutineStore, SqliteStore};
pub use timer::{format_countdown, ActiveTimer, StartOutcome, TaskTimer, TimerState};
