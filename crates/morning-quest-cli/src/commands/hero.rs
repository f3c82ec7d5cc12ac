//! Login, logout and status commands.

use morning_quest_core::Identity;

use super::{describe, logged_in_session, open_session, render, CliResult};

pub fn login(name: &str, birthday: &str) -> CliResult {
    let identity = Identity::new(name, birthday)?;
    let mut session = open_session()?;
    let event = session.login(identity);
    println!("{}", describe(&event));
    Ok(())
}

pub fn logout() -> CliResult {
    let mut session = open_session()?;
    match session.logout() {
        Some(event) => println!("{}", describe(&event)),
        None => println!("nobody is logged in"),
    }
    Ok(())
}

pub fn status(json: bool) -> CliResult {
    let session = logged_in_session()?;
    let Some(view) = session.view() else {
        return Err("nobody is logged in".into());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render(&view));
    }
    Ok(())
}
