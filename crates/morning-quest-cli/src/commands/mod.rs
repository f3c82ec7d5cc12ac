pub mod config;
pub mod hero;
pub mod quest;
pub mod run;
pub mod task;
pub mod timer;

use std::sync::Arc;

use morning_quest_core::{
    format_countdown, Config, Event, Intent, RoutineView, Session, SqliteStore, SystemClock,
};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the on-disk store and log back in as the last hero, if any.
pub fn open_session() -> Result<Session, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = SqliteStore::open()?;
    let mut session = Session::new(store, Arc::new(SystemClock)).with_config(&config);
    session.resume();
    Ok(session)
}

/// Like [`open_session`] but fails when nobody is logged in.
pub fn logged_in_session() -> Result<Session, Box<dyn std::error::Error>> {
    let session = open_session()?;
    if !session.is_logged_in() {
        return Err("nobody is logged in (run `morning-quest login <name> <birthday>`)".into());
    }
    Ok(session)
}

/// Apply one intent and print what happened.
pub fn apply_and_report(session: &mut Session, intent: Intent, json: bool) -> CliResult {
    match session.apply(intent) {
        Some(event) if json => println!("{}", serde_json::to_string_pretty(&event)?),
        Some(event) => println!("{}", describe(&event)),
        None if json => println!("null"),
        None => println!("nothing changed"),
    }
    Ok(())
}

/// One-line human description of an event.
pub fn describe(event: &Event) -> String {
    match event {
        Event::LoggedIn {
            name,
            first_time: true,
            ..
        } => format!("Welcome, {name}! Your quest begins."),
        Event::LoggedIn { name, points, .. } => format!("Welcome back, {name} ({points} pts)."),
        Event::LoggedOut { name, .. } => format!("See you tomorrow, {name}."),
        Event::TaskToggled {
            task_id,
            completed: true,
            ..
        } => format!("Task {task_id} done!"),
        Event::TaskToggled { task_id, .. } => format!("Task {task_id} reopened."),
        Event::TimerStarted {
            task_id,
            duration_secs,
            ..
        } => format!(
            "Timer started for task {task_id} ({}).",
            format_countdown(*duration_secs)
        ),
        Event::TimerStopped { task_id, .. } => format!("Timer stopped for task {task_id}."),
        Event::TaskAdded { task_id, label, .. } => format!("Added task {task_id}: {label}"),
        Event::TaskRemoved { task_id, .. } => format!("Removed task {task_id}."),
        Event::DurationUpdated {
            task_id, minutes, ..
        } => format!("Task {task_id} now takes {minutes} min."),
        Event::RewardUpdated {
            task_id, points, ..
        } => format!("Task {task_id} now rewards {points} pts."),
        Event::DepartureChanged { departure, .. } => format!("Departure set to {departure}."),
        Event::QuestCompleted {
            awarded,
            total_points,
            rank,
            ..
        } => format!("Quest complete! +{awarded} pts (total {total_points}, {rank})."),
        Event::QuestNotReady { remaining, .. } => {
            format!("Quest still in progress: {remaining} task(s) left.")
        }
    }
}

/// Multi-line status board.
pub fn render(view: &RoutineView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Hero: {}  |  {} pts ({})  |  {}\n",
        view.profile.identity.name,
        view.profile.points,
        view.rank,
        view.now.format("%H:%M:%S")
    ));
    let alarm = if view.urgent { "  HURRY!" } else { "" };
    out.push_str(&format!(
        "Departure {}: {} min left{alarm}\n",
        view.profile.departure, view.minutes_until_departure
    ));
    if view.mood == morning_quest_core::Mood::Celebrating {
        out.push_str("  \\o/  Great job!\n");
    }
    for task in &view.tasks {
        let check = if task.completed { "[x]" } else { "[ ]" };
        let timing = match view.timer.filter(|t| t.task_id == task.id) {
            Some(active) => format!(">> {}", format_countdown(active.seconds_remaining)),
            None => format!("{} min", task.duration),
        };
        out.push_str(&format!(
            "{check} {:>3}  {:<28} {:>10}  {:>3} pts\n",
            task.id.to_string(),
            task.label,
            timing,
            task.points
        ));
    }
    if view.all_completed {
        out.push_str("All tasks done. Run `quest` to claim your reward!\n");
    }
    out
}
