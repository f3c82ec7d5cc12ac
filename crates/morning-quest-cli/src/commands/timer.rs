//! Foreground task timer.
//!
//! The countdown is not persisted, so `timer start` stays in the foreground
//! and ticks once per second until the countdown expires or Ctrl-C stops it.

use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use morning_quest_core::{format_countdown, Event, Intent, Session, TaskId};
use tokio::time::MissedTickBehavior;

use super::{describe, logged_in_session, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Count down a task's duration in the foreground
    Start {
        /// Task ID
        id: TaskId,
    },
}

pub fn run(action: TimerAction) -> CliResult {
    match action {
        TimerAction::Start { id } => {
            let mut session = logged_in_session()?;
            match session.apply(Intent::StartStopTimer { id }) {
                Some(event @ Event::TimerStarted { .. }) => println!("{}", describe(&event)),
                _ => return Err(format!("no task with id {id}").into()),
            }
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(count_down(&mut session, id))
        }
    }
}

async fn count_down(session: &mut Session, id: TaskId) -> CliResult {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                session.tick();
                let remaining = session
                    .engine()
                    .and_then(|e| e.timer().active().copied())
                    .filter(|a| a.task_id == id);
                match remaining {
                    Some(active) => {
                        print!("\r  {}   ", format_countdown(active.seconds_remaining));
                        std::io::stdout().flush()?;
                    }
                    None => {
                        println!("\rTime's up for task {id}!");
                        return Ok(());
                    }
                }
            }
            _ = &mut ctrl_c => {
                if let Some(event) = session.apply(Intent::StopTimer) {
                    println!("\n{}", describe(&event));
                }
                return Ok(());
            }
        }
    }
}
