//! Session: the single owner of the logged-in routine.
//!
//! A session wires the [`RoutineEngine`] to its collaborators. It reads time
//! only through the injected [`Clock`], writes the full snapshot through the
//! injected [`RoutineStore`] after every change that affects it, and keeps
//! the short-lived "celebrating" presentation signal.
//!
//! Persistence is best-effort: load and save failures are logged and the
//! routine stays usable. A snapshot that cannot be decoded counts as absent
//! and the hero starts over with the starter routine.
//!
//! Mutations are `&mut self`, so callers on multi-threaded runtimes must keep
//! a session behind one owner (a single task or a mutex).

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::events::Event;
use crate::intent::Intent;
use crate::routine::{
    DepartureTime, Identity, Profile, QuestOutcome, Rank, RoutineEngine, Task, TaskDefaults,
};
use crate::storage::{Config, RoutineStore};
use crate::timer::{ActiveTimer, StartOutcome};

/// How long the success signal stays up after a task is checked off.
pub const CELEBRATION_MS: i64 = 1_000;

/// Presentation state of the hero character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Idle,
    Celebrating,
}

/// Read-only projection handed to renderers.
#[derive(Debug, Clone, Serialize)]
pub struct RoutineView {
    pub profile: Profile,
    pub rank: Rank,
    pub tasks: Vec<Task>,
    pub timer: Option<ActiveTimer>,
    pub minutes_until_departure: u64,
    pub urgent: bool,
    pub all_completed: bool,
    pub mood: Mood,
    pub now: NaiveDateTime,
}

pub struct Session {
    store: Box<dyn RoutineStore>,
    clock: Arc<dyn Clock>,
    defaults: TaskDefaults,
    default_departure: DepartureTime,
    engine: Option<RoutineEngine>,
    celebrate_until: Option<NaiveDateTime>,
}

impl Session {
    pub fn new(store: impl RoutineStore + 'static, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Box::new(store),
            clock,
            defaults: TaskDefaults::default(),
            default_departure: DepartureTime::default(),
            engine: None,
            celebrate_until: None,
        }
    }

    /// Use the configured defaults for new heroes and new tasks.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.defaults = config.task_defaults();
        self.default_departure = config.routine.default_departure;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> Option<&RoutineEngine> {
        self.engine.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.engine.is_some()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// `Celebrating` for one second after a task was checked off. Checking
    /// off more tasks inside that second does not extend it.
    pub fn mood(&self) -> Mood {
        match self.celebrate_until {
            Some(until) if self.clock.now() < until => Mood::Celebrating,
            _ => Mood::Idle,
        }
    }

    pub fn view(&self) -> Option<RoutineView> {
        let engine = self.engine.as_ref()?;
        let now = self.clock.now();
        Some(RoutineView {
            profile: engine.profile().clone(),
            rank: engine.rank(),
            tasks: engine.tasks().to_vec(),
            timer: engine.timer().active().copied(),
            minutes_until_departure: engine.minutes_until_departure(now),
            urgent: engine.departure_is_urgent(now),
            all_completed: engine.all_completed(),
            mood: self.mood(),
            now,
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Log in, loading the hero's routine or seeding a new one.
    ///
    /// Any hero already logged in is logged out first.
    pub fn login(&mut self, identity: Identity) -> Event {
        if self.engine.is_some() {
            self.logout();
        }

        let key = identity.key();
        let loaded = match self.store.load(&key) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(key = %key, error = %e, "stored routine unreadable, starting fresh");
                None
            }
        };
        let first_time = loaded.is_none();
        let engine = match loaded {
            Some(snapshot) => RoutineEngine::from_snapshot(identity.clone(), snapshot, self.defaults),
            None => RoutineEngine::first_time(identity.clone(), self.default_departure, self.defaults),
        };
        let points = engine.profile().points;
        self.engine = Some(engine);
        self.celebrate_until = None;

        if first_time {
            self.persist();
        }
        if let Err(e) = self.store.set_current_identity(Some(&identity)) {
            warn!(error = %e, "failed to remember current hero");
        }
        info!(hero = %identity.name, first_time, points, "logged in");

        Event::LoggedIn {
            name: identity.name,
            first_time,
            points,
            at: self.clock.now(),
        }
    }

    /// Log back in as whoever was logged in last.
    pub fn resume(&mut self) -> Option<Event> {
        match self.store.current_identity() {
            Ok(Some(identity)) => Some(self.login(identity)),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read current hero");
                None
            }
        }
    }

    /// Save and forget the current hero. Any running countdown is dropped.
    pub fn logout(&mut self) -> Option<Event> {
        self.persist();
        let engine = self.engine.take()?;
        self.celebrate_until = None;
        if let Err(e) = self.store.set_current_identity(None) {
            warn!(error = %e, "failed to forget current hero");
        }
        let name = engine.profile().identity.name.clone();
        info!(hero = %name, "logged out");
        Some(Event::LoggedOut {
            name,
            at: self.clock.now(),
        })
    }

    /// One second elapsed.
    pub fn tick(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.tick();
        }
    }

    /// Apply one user intent.
    ///
    /// Returns `None` when the intent was ignored (nobody logged in, unknown
    /// task id, blank label, nothing to stop). A quest that is not ready
    /// yields [`Event::QuestNotReady`] and changes nothing.
    pub fn apply(&mut self, intent: Intent) -> Option<Event> {
        let now = self.clock.now();
        let Some(engine) = self.engine.as_mut() else {
            debug!(?intent, "ignored intent: nobody logged in");
            return None;
        };

        let mut changed = intent.touches_snapshot();
        let event = match intent {
            Intent::ToggleTask { id } => {
                let completed = engine.toggle_task_completion(id)?;
                let celebrating = matches!(self.celebrate_until, Some(until) if now < until);
                if completed && !celebrating {
                    self.celebrate_until = Some(now + Duration::milliseconds(CELEBRATION_MS));
                }
                Event::TaskToggled {
                    task_id: id,
                    completed,
                    at: now,
                }
            }
            Intent::StartStopTimer { id } => match engine.start_timer(id)? {
                StartOutcome::Started { replaced } => Event::TimerStarted {
                    task_id: id,
                    duration_secs: engine.timer().seconds_remaining(),
                    replaced,
                    at: now,
                },
                StartOutcome::Stopped => Event::TimerStopped { task_id: id, at: now },
            },
            Intent::StopTimer => Event::TimerStopped {
                task_id: engine.stop_timer()?,
                at: now,
            },
            Intent::AddTask { label, icon } => {
                let task_id = engine.add_task(&label, icon)?;
                Event::TaskAdded {
                    task_id,
                    label: label.trim().to_string(),
                    at: now,
                }
            }
            Intent::RemoveTask { id } => {
                let was_active = engine.timer().is_active(id);
                engine.remove_task(id)?;
                Event::TaskRemoved {
                    task_id: id,
                    timer_cancelled: was_active,
                    at: now,
                }
            }
            Intent::UpdateDuration { id, value } => Event::DurationUpdated {
                task_id: id,
                minutes: engine.update_task_duration(id, &value)?,
                at: now,
            },
            Intent::UpdateReward { id, value } => Event::RewardUpdated {
                task_id: id,
                points: engine.update_task_reward(id, &value)?,
                at: now,
            },
            Intent::SetDepartureTime { departure } => {
                engine.set_departure_time(departure);
                Event::DepartureChanged { departure, at: now }
            }
            Intent::CompleteQuest => match engine.complete_quest() {
                QuestOutcome::Completed {
                    awarded,
                    total_points,
                } => Event::QuestCompleted {
                    awarded,
                    total_points,
                    rank: engine.rank(),
                    at: now,
                },
                QuestOutcome::NotReady { remaining } => {
                    changed = false;
                    Event::QuestNotReady { remaining, at: now }
                }
            },
        };

        if changed {
            self.persist();
        }
        Some(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist(&self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let key = engine.profile().identity.key();
        if let Err(e) = self.store.save(&key, &engine.snapshot()) {
            warn!(key = %key, error = %e, "failed to save routine");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::routine::TaskId;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(7, 20, 0)
            .unwrap()
    }

    fn session() -> (Session, MemoryStore, Arc<ManualClock>) {
        let store = MemoryStore::new();
        let clock = Arc::new(ManualClock::new(morning()));
        let session = Session::new(store.clone(), clock.clone());
        (session, store, clock)
    }

    fn hero() -> Identity {
        Identity::new("Taro", "2018-04-02").unwrap()
    }

    #[test]
    fn intents_before_login_are_ignored() {
        let (mut session, store, _) = session();
        assert!(session.apply(Intent::CompleteQuest).is_none());
        assert!(session.view().is_none());
        assert!(session.logout().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn first_login_seeds_and_saves() {
        let (mut session, store, _) = session();
        let event = session.login(hero());
        assert!(matches!(event, Event::LoggedIn { first_time: true, points: 0, .. }));
        assert_eq!(session.engine().unwrap().tasks().len(), 6);
        assert!(store.raw("hero_Taro_2018-04-02").is_some());
        assert!(store.raw("current_hero_user").is_some());
    }

    #[test]
    fn toggle_celebrates_for_one_second() {
        let (mut session, _, clock) = session();
        session.login(hero());
        assert_eq!(session.mood(), Mood::Idle);

        session.apply(Intent::ToggleTask { id: TaskId(1) });
        assert_eq!(session.mood(), Mood::Celebrating);
        clock.advance(Duration::milliseconds(999));
        assert_eq!(session.mood(), Mood::Celebrating);
        clock.advance(Duration::milliseconds(1));
        assert_eq!(session.mood(), Mood::Idle);
    }

    #[test]
    fn unchecking_does_not_cut_celebration_short() {
        let (mut session, _, clock) = session();
        session.login(hero());
        session.apply(Intent::ToggleTask { id: TaskId(1) });
        clock.advance(Duration::milliseconds(300));
        session.apply(Intent::ToggleTask { id: TaskId(1) });
        assert_eq!(session.mood(), Mood::Celebrating);
        clock.advance(Duration::milliseconds(700));
        assert_eq!(session.mood(), Mood::Idle);
    }

    #[test]
    fn second_completion_does_not_extend_celebration() {
        let (mut session, _, clock) = session();
        session.login(hero());
        session.apply(Intent::ToggleTask { id: TaskId(1) });
        clock.advance(Duration::milliseconds(500));
        session.apply(Intent::ToggleTask { id: TaskId(2) });
        assert_eq!(session.mood(), Mood::Celebrating);
        clock.advance(Duration::milliseconds(600));
        assert_eq!(session.mood(), Mood::Idle);

        session.apply(Intent::ToggleTask { id: TaskId(3) });
        assert_eq!(session.mood(), Mood::Celebrating);
    }

    #[test]
    fn timer_intents_do_not_write() {
        let (mut session, store, _) = session();
        session.login(hero());
        store.insert_raw("hero_Taro_2018-04-02", "sentinel");
        session.apply(Intent::StartStopTimer { id: TaskId(2) });
        session.tick();
        session.apply(Intent::StopTimer);
        assert_eq!(store.raw("hero_Taro_2018-04-02").as_deref(), Some("sentinel"));
    }

    #[test]
    fn quest_not_ready_does_not_write() {
        let (mut session, store, _) = session();
        session.login(hero());
        store.insert_raw("hero_Taro_2018-04-02", "sentinel");
        let event = session.apply(Intent::CompleteQuest).unwrap();
        assert!(matches!(event, Event::QuestNotReady { remaining: 6, .. }));
        assert_eq!(store.raw("hero_Taro_2018-04-02").as_deref(), Some("sentinel"));
    }

    #[test]
    fn stop_without_timer_is_ignored() {
        let (mut session, _, _) = session();
        session.login(hero());
        assert!(session.apply(Intent::StopTimer).is_none());
    }

    #[test]
    fn view_reports_departure_countdown() {
        let (mut session, _, clock) = session();
        session.login(hero());
        let view = session.view().unwrap();
        assert_eq!(view.minutes_until_departure, 40);
        assert!(!view.urgent);

        clock.set(morning() + Duration::minutes(36));
        let view = session.view().unwrap();
        assert_eq!(view.minutes_until_departure, 4);
        assert!(view.urgent);
    }

    #[test]
    fn logout_forgets_current_hero() {
        let (mut session, store, _) = session();
        session.login(hero());
        session.apply(Intent::StartStopTimer { id: TaskId(1) });
        let event = session.logout().unwrap();
        assert!(matches!(event, Event::LoggedOut { .. }));
        assert!(!session.is_logged_in());
        assert!(store.raw("current_hero_user").is_none());
        assert!(store.raw("hero_Taro_2018-04-02").is_some());
    }
}
