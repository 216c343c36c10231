//! Job application tracker CLI
//!
//! Plays the UI session: capture job pages, quick-add from the captured
//! signal, list and delete records, export to CSV.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use job_tracker::ApplicationStatus;

mod cmd;
mod config;
mod context;
mod page_file;

use context::AppContext;

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Track job applications from the pages you visit")]
#[command(version)]
struct Cli {
    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a saved page and relay it for quick-add
    Capture(cmd::page::PageArgs),

    /// Re-extract a page file whenever it changes
    Watch(cmd::page::PageArgs),

    /// Show what the extractor finds on a page
    PageInfo {
        #[command(flatten)]
        page: cmd::page::PageArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Record a completed tab load (updates the current domain)
    Tab {
        url: String,

        #[arg(long, default_value_t = 1)]
        id: u32,
    },

    /// Show the fresh signal and current domain, if any
    Signal {
        #[arg(long)]
        json: bool,
    },

    /// Add an application
    Add(cmd::applications::AddArgs),

    /// Add an application from the last captured job page
    QuickAdd {
        #[arg(short, long, default_value = ApplicationStatus::PENDING)]
        status: String,

        /// Application date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// List applications, newest first
    List,

    /// Delete an application by id
    Delete { id: u64 },

    /// Export all applications to CSV
    Export {
        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,job_tracker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::new(cli.quiet)?;

    match cli.command {
        Commands::Capture(args) => cmd::page::capture(&ctx, args).await,
        Commands::Watch(args) => cmd::page::watch(&ctx, args).await,
        Commands::PageInfo { page, json } => cmd::page::page_info(&ctx, page, json).await,
        Commands::Tab { url, id } => cmd::page::tab(&ctx, url, id).await,
        Commands::Signal { json } => cmd::page::signal(&ctx, json).await,
        Commands::Add(args) => cmd::applications::add(&ctx, args).await,
        Commands::QuickAdd { status, date } => {
            cmd::applications::quick_add(&ctx, status, date).await
        }
        Commands::List => cmd::applications::list(&ctx).await,
        Commands::Delete { id } => cmd::applications::delete(&ctx, id).await,
        Commands::Export { output } => cmd::export::export(&ctx, output).await,
    }
}
