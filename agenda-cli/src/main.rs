mod commands;
mod prompt;

use agenda_core::Agenda;
use agenda_core::config::AgendaConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Sign in to your agenda backend and inspect the stored session")]
struct Cli {
    /// Backend base URL (overrides config and AGENDA_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Login {
        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Validate the stored token against the backend
    Check,
    Logout,
    /// Show the local configuration and whether a token is stored
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AgendaConfig::load()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    debug!(api_url = %config.api_url, "Loaded configuration");

    let agenda = Agenda::from_config(&config).context("Failed to set up the agenda client")?;

    match cli.command {
        Commands::Login { email, password } => {
            let password = prompt::password_or_prompt(password)?;
            commands::login::run(&agenda, email, password).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            let password = prompt::password_or_prompt(password)?;
            commands::register::run(&agenda, name, email, password).await
        }
        Commands::Check => commands::check::run(&agenda).await,
        Commands::Logout => commands::logout::run(&agenda),
        Commands::Status => commands::status::run(&config),
    }
}

/// Log to stderr, filtered by RUST_LOG (defaults to info, or debug with --verbose).
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "agenda_core={default_level},agenda_cli={default_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}
