use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focusflow", version, about = "FocusFlow study companion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Finish onboarding with a display name
    Onboard {
        /// Display name
        name: String,
    },
    /// Sign in (mocked: any identity is accepted)
    Login {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Identity provider label
        #[arg(long, default_value = "email")]
        provider: String,
    },
    /// Sign out and reset all progress
    Logout,
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Focus session control
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Show profile, level and progress
    Profile,
    /// Show the badge catalog with earned flags
    Badges,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays machine-readable JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOCUSFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Onboard { name } => commands::account::onboard(name),
        Commands::Login {
            name,
            email,
            provider,
        } => commands::account::login(name, email, provider),
        Commands::Logout => commands::account::logout(),
        Commands::Task { action } => commands::task::run(action),
        Commands::Focus { action } => commands::focus::run(action),
        Commands::Profile => commands::profile::run(),
        Commands::Badges => commands::badges::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
