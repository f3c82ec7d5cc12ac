//! Interactive mode.
//!
//! One loop owns the session and serializes the 1 Hz clock tick, stdin
//! intents and Ctrl-C, so no two mutations ever overlap.

use std::io::Write;
use std::time::Duration;

use morning_quest_core::{format_countdown, Intent, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::{describe, logged_in_session, render, CliResult};

const HELP: &str = "\
commands:
  status                  show the board
  toggle <id>             check / uncheck a task
  start <id>              start (or stop) a task timer
  stop                    stop the running timer
  add <label>             add a task
  remove <id>             delete a task
  duration <id> <min>     set planned minutes
  reward <id> <pts>       set reward points
  depart <HH:MM>          set departure time
  quest                   claim the reward when every task is done
  quit                    leave";

pub fn run(json: bool) -> CliResult {
    let mut session = logged_in_session()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(&mut session, json))
}

async fn drive(session: &mut Session, json: bool) -> CliResult {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    print_board(session);
    println!("type `help` for commands");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let before = active_task(session);
                session.tick();
                let after = session.engine().and_then(|e| e.timer().active().copied());
                match (before, after) {
                    (Some(task), None) => println!("\rTime's up for task {task}!"),
                    (_, Some(active)) => {
                        print!("\r  task {} {}   ", active.task_id, format_countdown(active.seconds_remaining));
                        std::io::stdout().flush()?;
                    }
                    _ => {}
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_line(session, line.trim(), json)? {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                println!();
                break;
            }
        }
    }
    Ok(())
}

/// Returns `false` when the user asked to leave.
fn handle_line(session: &mut Session, line: &str, json: bool) -> Result<bool, Box<dyn std::error::Error>> {
    match line {
        "" => {}
        "quit" | "exit" => return Ok(false),
        "help" => println!("{HELP}"),
        "status" => print_board(session),
        _ => match line.parse::<Intent>() {
            Ok(intent) => {
                debug!(?intent, "interactive intent");
                match session.apply(intent) {
                    Some(event) if json => println!("{}", serde_json::to_string(&event)?),
                    Some(event) => println!("{}", describe(&event)),
                    None if json => println!("null"),
                    None => println!("nothing changed"),
                }
            }
            Err(e) => eprintln!("error: {e}"),
        },
    }
    Ok(true)
}

fn active_task(session: &Session) -> Option<morning_quest_core::TaskId> {
    session.engine().and_then(|e| e.timer().active_task())
}

fn print_board(session: &Session) {
    if let Some(view) = session.view() {
        print!("{}", render(&view));
    }
}
