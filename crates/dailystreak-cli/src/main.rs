use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "dailystreak", version, about = "Daily habit streak tracker")]
struct Cli {
    /// Log informational messages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Check a task in for today
    Checkin {
        /// Task ID
        id: String,
    },
    /// Completion statistics
    Stats(commands::stats::StatsArgs),
    /// Top streak, level and challenge progress
    Streaks,
    /// Show the tier table
    Tiers,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Checkin { id } => commands::checkin::run(&id),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Streaks => commands::streaks::run(),
        Commands::Tiers => commands::tiers::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "dailystreak", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
