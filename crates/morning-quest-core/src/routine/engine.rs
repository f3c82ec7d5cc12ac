//! Routine engine: task list, timer and reward rules.
//!
//! Every operation is synchronous and infallible. Unknown task ids, empty
//! labels and malformed numbers are silent no-ops (or clamp), reported to the
//! caller only through `Option`/[`QuestOutcome`] return values.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::departure::{minutes_until_departure, DepartureTime, URGENT_MINUTES};
use super::profile::{Identity, Profile, Rank};
use super::task::{
    coerce_duration, coerce_reward, starter_routine, Task, TaskDefaults, TaskId, MIN_DURATION_MIN,
};
use crate::storage::RoutineSnapshot;
use crate::timer::{StartOutcome, TaskTimer};

/// Result of asking to finish the quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestOutcome {
    /// Every task was done; `awarded` points were added.
    Completed { awarded: u64, total_points: u64 },
    /// At least one task is still open, or the routine is empty.
    NotReady { remaining: usize },
}

impl QuestOutcome {
    pub fn awarded(&self) -> Option<u64> {
        match self {
            QuestOutcome::Completed { awarded, .. } => Some(*awarded),
            QuestOutcome::NotReady { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoutineEngine {
    profile: Profile,
    tasks: Vec<Task>,
    timer: TaskTimer,
    /// `None` once every id has been handed out.
    next_id: Option<u64>,
    defaults: TaskDefaults,
}

impl RoutineEngine {
    /// Durations below one minute are raised to one.
    pub fn new(profile: Profile, mut tasks: Vec<Task>, defaults: TaskDefaults) -> Self {
        for task in &mut tasks {
            task.duration = task.duration.max(MIN_DURATION_MIN);
        }
        let next_id = tasks.iter().map(|t| t.id.0).max().unwrap_or(0).checked_add(1);
        Self {
            profile,
            tasks,
            timer: TaskTimer::new(),
            next_id,
            defaults,
        }
    }

    /// Fresh profile seeded with the starter routine.
    pub fn first_time(identity: Identity, departure: DepartureTime, defaults: TaskDefaults) -> Self {
        Self::new(Profile::new(identity, departure), starter_routine(), defaults)
    }

    pub fn from_snapshot(identity: Identity, snapshot: RoutineSnapshot, defaults: TaskDefaults) -> Self {
        let profile = Profile {
            identity,
            points: snapshot.points,
            departure: snapshot.departure,
        };
        Self::new(profile, snapshot.tasks, defaults)
    }

    /// Everything that gets persisted, taken together.
    pub fn snapshot(&self) -> RoutineSnapshot {
        RoutineSnapshot {
            points: self.profile.points,
            departure: self.profile.departure,
            tasks: self.tasks.clone(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn timer(&self) -> &TaskTimer {
        &self.timer
    }

    pub fn rank(&self) -> Rank {
        self.profile.rank()
    }

    /// True when there is at least one task and all of them are done.
    pub fn all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }

    pub fn remaining_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn minutes_until_departure(&self, now: NaiveDateTime) -> u64 {
        minutes_until_departure(now, self.profile.departure)
    }

    pub fn departure_is_urgent(&self, now: NaiveDateTime) -> bool {
        self.minutes_until_departure(now) <= URGENT_MINUTES
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Flip a task's completion flag. Returns the new value.
    ///
    /// Completion and timing are independent: the timer is left alone even
    /// when the toggled task is the one counting down.
    pub fn toggle_task_completion(&mut self, id: TaskId) -> Option<bool> {
        let task = self.task_mut(id)?;
        task.completed = !task.completed;
        debug!(task = %id, completed = task.completed, "task toggled");
        Some(task.completed)
    }

    /// Start the task's countdown, or stop it if it is already running.
    ///
    /// A countdown on any other task is replaced without complaint.
    pub fn start_timer(&mut self, id: TaskId) -> Option<StartOutcome> {
        let total = self.task(id)?.duration_secs();
        let outcome = self.timer.start(id, total);
        debug!(task = %id, ?outcome, "start/stop timer");
        Some(outcome)
    }

    pub fn stop_timer(&mut self) -> Option<TaskId> {
        self.timer.stop()
    }

    /// One second elapsed.
    pub fn tick(&mut self) {
        self.timer.tick();
    }

    /// Append a task built from the configured defaults.
    ///
    /// Blank labels are ignored, as is any add once the id space is used up.
    pub fn add_task(&mut self, label: &str, icon: Option<String>) -> Option<TaskId> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let id = TaskId(self.next_id?);
        self.next_id = id.0.checked_add(1);
        self.tasks.push(Task {
            id,
            label: label.to_string(),
            duration: self.defaults.duration.max(1),
            points: self.defaults.points,
            completed: false,
            icon,
        });
        debug!(task = %id, label, "task added");
        Some(id)
    }

    /// Remove a task, cancelling its countdown if it was running.
    ///
    /// Partial progress on a cancelled countdown is discarded.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        if self.timer.is_active(id) {
            self.timer.stop();
        }
        let removed = self.tasks.remove(index);
        debug!(task = %id, "task removed");
        Some(removed)
    }

    /// Set a task's planned minutes from raw form input (minimum 1).
    pub fn update_task_duration(&mut self, id: TaskId, raw: &str) -> Option<u32> {
        let minutes = coerce_duration(raw);
        let task = self.task_mut(id)?;
        task.duration = minutes;
        let total = task.duration_secs();
        self.timer.cap_remaining(id, total);
        Some(minutes)
    }

    /// Set a task's reward from raw form input (minimum 0).
    pub fn update_task_reward(&mut self, id: TaskId, raw: &str) -> Option<u32> {
        let points = coerce_reward(raw);
        self.task_mut(id)?.points = points;
        Some(points)
    }

    pub fn set_departure_time(&mut self, departure: DepartureTime) {
        self.profile.departure = departure;
    }

    /// Pay out the quest if every task is done.
    ///
    /// On success the rewards are summed into the profile and every
    /// completion flag is reset; labels, durations, rewards and the timer are
    /// untouched.
    pub fn complete_quest(&mut self) -> QuestOutcome {
        if !self.all_completed() {
            return QuestOutcome::NotReady {
                remaining: self.remaining_tasks(),
            };
        }
        let awarded: u64 = self.tasks.iter().map(|t| u64::from(t.points)).sum();
        self.profile.points = self.profile.points.saturating_add(awarded);
        for task in &mut self.tasks {
            task.completed = false;
        }
        info!(
            hero = %self.profile.identity.name,
            awarded,
            total = self.profile.points,
            "quest completed"
        );
        QuestOutcome::Completed {
            awarded,
            total_points: self.profile.points,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerState;

    fn engine_with(tasks: Vec<Task>) -> RoutineEngine {
        let identity = Identity::new("Hana", "2019-09-09").unwrap();
        RoutineEngine::new(
            Profile::new(identity, DepartureTime::default()),
            tasks,
            TaskDefaults::default(),
        )
    }

    fn task(id: u64, duration: u32, points: u32) -> Task {
        Task {
            id: TaskId(id),
            label: format!("task {id}"),
            duration,
            points,
            completed: false,
            icon: None,
        }
    }

    #[test]
    fn toggle_returns_new_value_and_ignores_unknown_ids() {
        let mut engine = engine_with(vec![task(1, 5, 10)]);
        assert_eq!(engine.toggle_task_completion(TaskId(1)), Some(true));
        assert_eq!(engine.toggle_task_completion(TaskId(1)), Some(false));
        assert_eq!(engine.toggle_task_completion(TaskId(9)), None);
    }

    #[test]
    fn toggle_leaves_running_timer_alone() {
        let mut engine = engine_with(vec![task(1, 5, 10)]);
        engine.start_timer(TaskId(1));
        engine.toggle_task_completion(TaskId(1));
        assert_eq!(engine.timer().active_task(), Some(TaskId(1)));
        assert_eq!(engine.timer().seconds_remaining(), 300);
    }

    #[test]
    fn start_timer_uses_task_duration_and_toggles() {
        let mut engine = engine_with(vec![task(1, 5, 10), task(2, 3, 5)]);
        engine.start_timer(TaskId(2));
        assert_eq!(engine.timer().seconds_remaining(), 180);
        engine.start_timer(TaskId(1));
        assert_eq!(engine.timer().active_task(), Some(TaskId(1)));
        assert_eq!(engine.start_timer(TaskId(1)), Some(StartOutcome::Stopped));
        assert_eq!(engine.timer().state(), TimerState::Idle);
        assert_eq!(engine.start_timer(TaskId(42)), None);
    }

    #[test]
    fn add_task_rejects_blank_labels() {
        let mut engine = engine_with(vec![task(1, 5, 10)]);
        assert_eq!(engine.add_task("", None), None);
        assert_eq!(engine.add_task("   \t", None), None);
        assert_eq!(engine.tasks().len(), 1);

        let id = engine.add_task("  Stretch ", None).unwrap();
        let added = engine.task(id).unwrap();
        assert_eq!(added.label, "Stretch");
        assert_eq!(added.duration, 5);
        assert_eq!(added.points, 10);
        assert!(!added.completed);
        assert_eq!(engine.tasks().last().unwrap().id, id);
    }

    #[test]
    fn new_ids_are_never_reused() {
        let mut engine = engine_with(vec![task(1, 5, 10), task(2, 5, 10)]);
        let a = engine.add_task("A", None).unwrap();
        assert_eq!(a, TaskId(3));
        engine.remove_task(a);
        let b = engine.add_task("B", None).unwrap();
        assert_eq!(b, TaskId(4));
    }

    #[test]
    fn zero_minute_tasks_are_raised_to_one() {
        let mut engine = engine_with(vec![task(1, 0, 10)]);
        assert_eq!(engine.task(TaskId(1)).unwrap().duration, 1);
        engine.start_timer(TaskId(1));
        assert_eq!(engine.timer().seconds_remaining(), 60);
    }

    #[test]
    fn add_task_stops_when_ids_run_out() {
        let mut engine = engine_with(vec![task(u64::MAX - 1, 5, 10)]);
        assert_eq!(engine.add_task("Last", None), Some(TaskId(u64::MAX)));
        assert_eq!(engine.add_task("Overflow", None), None);

        engine.remove_task(TaskId(u64::MAX));
        assert_eq!(engine.add_task("Again", None), None);
        assert_eq!(engine.tasks().len(), 1);

        let mut full = engine_with(vec![task(u64::MAX, 5, 10)]);
        assert_eq!(full.add_task("Nope", None), None);
    }

    #[test]
    fn removing_active_task_stops_timer() {
        let mut engine = engine_with(vec![task(1, 5, 10), task(2, 3, 5)]);
        engine.start_timer(TaskId(2));
        engine.tick();
        let removed = engine.remove_task(TaskId(2)).unwrap();
        assert_eq!(removed.id, TaskId(2));
        assert_eq!(engine.timer().active_task(), None);
        assert_eq!(engine.timer().seconds_remaining(), 0);
        assert!(engine.remove_task(TaskId(2)).is_none());
    }

    #[test]
    fn removing_other_task_keeps_timer() {
        let mut engine = engine_with(vec![task(1, 5, 10), task(2, 3, 5)]);
        engine.start_timer(TaskId(1));
        engine.remove_task(TaskId(2));
        assert_eq!(engine.timer().active_task(), Some(TaskId(1)));
    }

    #[test]
    fn duration_and_reward_edits_clamp() {
        let mut engine = engine_with(vec![task(1, 5, 10)]);
        assert_eq!(engine.update_task_duration(TaskId(1), "0"), Some(1));
        assert_eq!(engine.update_task_duration(TaskId(1), "oops"), Some(1));
        assert_eq!(engine.update_task_duration(TaskId(1), "15"), Some(15));
        assert_eq!(engine.update_task_reward(TaskId(1), "-3"), Some(0));
        assert_eq!(engine.update_task_reward(TaskId(1), "40"), Some(40));
        assert_eq!(engine.update_task_reward(TaskId(7), "40"), None);
        let t = engine.task(TaskId(1)).unwrap();
        assert_eq!((t.duration, t.points), (15, 40));
    }

    #[test]
    fn shortening_running_task_caps_countdown() {
        let mut engine = engine_with(vec![task(1, 10, 10)]);
        engine.start_timer(TaskId(1));
        engine.update_task_duration(TaskId(1), "2");
        assert_eq!(engine.timer().seconds_remaining(), 120);
        engine.update_task_duration(TaskId(1), "30");
        assert_eq!(engine.timer().seconds_remaining(), 120);
    }

    #[test]
    fn quest_requires_every_task() {
        let mut engine = engine_with(vec![task(1, 5, 10), task(2, 3, 5)]);
        engine.toggle_task_completion(TaskId(1));
        assert_eq!(engine.complete_quest(), QuestOutcome::NotReady { remaining: 1 });
        assert_eq!(engine.profile().points, 0);
        assert!(engine.task(TaskId(1)).unwrap().completed);
    }

    #[test]
    fn empty_routine_is_never_ready() {
        let mut engine = engine_with(Vec::new());
        assert_eq!(engine.complete_quest(), QuestOutcome::NotReady { remaining: 0 });
    }

    #[test]
    fn quest_pays_out_and_resets_flags() {
        let mut engine = engine_with(vec![task(1, 5, 10), task(2, 3, 5)]);
        engine.toggle_task_completion(TaskId(1));
        engine.toggle_task_completion(TaskId(2));
        assert_eq!(
            engine.complete_quest(),
            QuestOutcome::Completed {
                awarded: 15,
                total_points: 15
            }
        );
        assert_eq!(engine.profile().points, 15);
        assert!(engine.tasks().iter().all(|t| !t.completed));
        assert_eq!(engine.tasks()[1].duration, 3);
        assert_eq!(engine.complete_quest().awarded(), None);
        assert_eq!(engine.profile().points, 15);
    }

    #[test]
    fn quest_leaves_timer_untouched() {
        let mut engine = engine_with(vec![task(1, 5, 10)]);
        engine.start_timer(TaskId(1));
        engine.toggle_task_completion(TaskId(1));
        engine.complete_quest();
        assert_eq!(engine.timer().active_task(), Some(TaskId(1)));
    }

    #[test]
    fn snapshot_carries_points_departure_and_tasks() {
        let mut engine = engine_with(vec![task(1, 5, 10)]);
        engine.set_departure_time(DepartureTime::new(7, 40).unwrap());
        engine.toggle_task_completion(TaskId(1));
        engine.complete_quest();
        let snap = engine.snapshot();
        assert_eq!(snap.points, 10);
        assert_eq!(snap.departure.to_string(), "07:40");
        assert_eq!(snap.tasks.len(), 1);

        let identity = engine.profile().identity.clone();
        let mut restored = RoutineEngine::from_snapshot(identity, snap, TaskDefaults::default());
        assert_eq!(restored.profile().points, 10);
        assert_eq!(restored.add_task("Next", None), Some(TaskId(2)));
    }
}
