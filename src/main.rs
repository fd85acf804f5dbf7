//! Banker CLI - Command-line interface for replaying and auditing
//! recorded Monopoly sessions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Banker - A deterministic Monopoly session engine
#[derive(Parser, Debug)]
#[command(name = "banker")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded session, printing each step
    Replay {
        /// Recording file (JSON)
        #[arg(required = true)]
        recording: std::path::PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Stop after N actions (default: whole log)
        #[arg(short, long)]
        position: Option<usize>,
    },

    /// Audit recorded sessions in parallel
    Check {
        /// Recording files (JSON)
        #[arg(required = true)]
        recordings: Vec<std::path::PathBuf>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Replay {
            recording,
            format,
            position,
        } => cli::replay::execute(&recording, format, position),

        Commands::Check {
            recordings,
            threads,
        } => cli::check::execute(recordings, threads),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
