mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scholarcal")]
#[command(about = "Add scholarship deadlines to your calendar")]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save an .ics file for a deadline
    Ics {
        /// Scholarship title
        title: String,

        /// Deadline as shown on the results page (e.g. "March 15, 2024")
        #[arg(short, long, default_value = "")]
        deadline: String,

        /// Event details, often the application URL
        #[arg(long, default_value = "")]
        description: String,

        /// Write here instead of the configured download_dir
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Print a Google Calendar link for a deadline
    Link {
        /// Scholarship title
        title: String,

        /// Deadline as shown on the results page (e.g. "March 15, 2024")
        #[arg(short, long, default_value = "")]
        deadline: String,

        /// Event details, often the application URL
        #[arg(long, default_value = "")]
        description: String,

        /// Also open the link in the browser
        #[arg(long)]
        open: bool,
    },
    /// Show the events in an .ics file
    Inspect {
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Ask the help assistant
    Assistant {
        /// Topic id (e.g. "essay-tips"); greets when omitted
        option: Option<String>,

        /// List the available topics
        #[arg(short, long)]
        list: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Ics {
            title,
            deadline,
            description,
            out_dir,
        } => {
            let cfg = config::load_config()?;
            commands::ics::run(&cfg, title, description, deadline, out_dir)
        }
        Commands::Link {
            title,
            deadline,
            description,
            open,
        } => {
            let cfg = config::load_config()?;
            commands::link::run(&cfg, title, description, deadline, open)
        }
        Commands::Inspect { file, json } => commands::inspect::run(&file, json),
        Commands::Assistant { option, list } => commands::assistant::run(option.as_deref(), list),
    }
}

/// Initialize logging with environment-based configuration
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
