use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "napwise", version, about = "Plan and track a child's day")]
struct Cli {
    /// Household passphrase (falls back to NAPWISE_PASSPHRASE)
    #[arg(long, global = true)]
    passphrase: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan tomorrow: wake target, appointments, nap coverage, tasks
    Plan(commands::plan::PlanArgs),
    /// Show the generated schedule
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Record what actually happened today
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Task list
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Household settings shared by all caregivers
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Per-device configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Calendar export
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NAPWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let passphrase = cli
        .passphrase
        .or_else(|| std::env::var("NAPWISE_PASSPHRASE").ok());
    let ctx = commands::Context::new(passphrase);

    let result = match cli.command {
        Commands::Plan(args) => commands::plan::run(args, &ctx),
        Commands::Schedule { action } => commands::schedule::run(action, &ctx),
        Commands::Log { action } => commands::log::run(action, &ctx),
        Commands::Task { action } => commands::task::run(action, &ctx),
        Commands::Settings { action } => commands::settings::run(action, &ctx),
        Commands::Config { action } => commands::config::run(action, &ctx),
        Commands::Calendar { action } => commands::calendar::run(action, &ctx),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
