use clap::{Parser, Subcommand};
use morning_quest_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "morning-quest", version, about = "Morning Quest CLI")]
struct Cli {
    /// Print events and state as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as a hero (creates the hero on first login)
    Login {
        /// Hero name
        name: String,
        /// Birthday, YYYY-MM-DD
        birthday: String,
    },
    /// Log out the current hero
    Logout,
    /// Show the quest board
    Status,
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Task timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Set the departure time (HH:MM)
    Depart {
        time: String,
    },
    /// Claim the reward once every task is done
    Quest,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Interactive mode: live countdown, commands on stdin
    Run,
}

fn init_tracing() {
    let level = Config::load_or_default().logging.level;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let json = cli.json;
    let result = match cli.command {
        Commands::Login { name, birthday } => commands::hero::login(&name, &birthday),
        Commands::Logout => commands::hero::logout(),
        Commands::Status => commands::hero::status(json),
        Commands::Task { action } => commands::task::run(action, json),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Depart { time } => commands::quest::depart(&time, json),
        Commands::Quest => commands::quest::complete(json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Run => commands::run::run(json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
