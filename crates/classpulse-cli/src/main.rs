//! classpulse CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "classpulse", version, about = "Course feedback collection and aggregation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full collection session from CSV inputs and report on it
    Run {
        /// Roster CSV (roll,name[,department])
        #[arg(long)]
        roster: PathBuf,

        /// Submissions CSV (roll,course_code,staff,q1..q15)
        #[arg(long)]
        submissions: PathBuf,

        /// Course catalog TOML (codes, titles, staff)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output directory for written artifacts
        #[arg(long, default_value = "./classpulse-results")]
        output: PathBuf,

        /// Output format: table, json, html, text, all
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Validate a roster CSV and optionally a catalog TOML
    Validate {
        /// Roster CSV to check
        #[arg(long)]
        roster: PathBuf,

        /// Course catalog TOML to check
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Report one student's registration and submission status
    Status {
        /// Roster CSV (roll,name[,department])
        #[arg(long)]
        roster: PathBuf,

        /// Submissions CSV to replay before reporting
        #[arg(long)]
        submissions: Option<PathBuf>,

        /// Roll number to look up
        #[arg(long)]
        roll: String,
    },

    /// Create starter roster, submissions, and catalog files
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("classpulse=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            roster,
            submissions,
            catalog,
            output,
            format,
        } => commands::run::execute(roster, submissions, catalog, output, format),
        Commands::Validate { roster, catalog } => commands::validate::execute(roster, catalog),
        Commands::Status {
            roster,
            submissions,
            roll,
        } => commands::status::execute(roster, submissions, roll),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
