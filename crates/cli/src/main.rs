//! Giftly CLI - Database migrations, access tokens and offline reports.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! giftly migrate
//!
//! # Issue an access token for a profile (printed once)
//! giftly token issue -e admin@giftly.test --days 30
//!
//! # Print the analytics report for the last 90 days
//! giftly report analytics --range 90d --top 5
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `token issue` - Issue a bearer token for an existing profile
//! - `report analytics` - Aggregate dashboard metrics and print them as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "giftly")]
#[command(author, version, about = "Giftly CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage access tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Run reports against the database
    Report {
        #[command(subcommand)]
        report: ReportKind,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a new bearer token for a profile
    Issue {
        /// Profile email address
        #[arg(short, long)]
        email: String,

        /// Days until the token expires
        #[arg(short, long, default_value_t = commands::token::DEFAULT_DAYS)]
        days: u32,
    },
}

#[derive(Subcommand)]
enum ReportKind {
    /// Admin analytics for a date window
    Analytics {
        /// Preset window (`7d`, `30d`, `90d`, `ytd`)
        #[arg(short, long)]
        range: Option<String>,

        /// Custom window start, inclusive (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// Custom window end, inclusive (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<String>,

        /// Ranking length for top vendors and products
        #[arg(short, long)]
        top: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giftly=info,giftly_server=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Token { action } => match action {
            TokenAction::Issue { email, days } => commands::token::issue(&email, days).await?,
        },
        Commands::Report { report } => match report {
            ReportKind::Analytics {
                range,
                start,
                end,
                top,
            } => {
                commands::report::analytics(
                    range.as_deref(),
                    start.as_deref(),
                    end.as_deref(),
                    top,
                )
                .await?;
            }
        },
    }
    Ok(())
}
