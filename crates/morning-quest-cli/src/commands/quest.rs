//! Quest payout and departure settings.

use morning_quest_core::{DepartureTime, Intent};

use super::{apply_and_report, logged_in_session, CliResult};

pub fn complete(json: bool) -> CliResult {
    let mut session = logged_in_session()?;
    apply_and_report(&mut session, Intent::CompleteQuest, json)
}

pub fn depart(time: &str, json: bool) -> CliResult {
    let departure = DepartureTime::parse(time)?;
    let mut session = logged_in_session()?;
    apply_and_report(&mut session, Intent::SetDepartureTime { departure }, json)
}
