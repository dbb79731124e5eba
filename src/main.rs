//! Encore CLI - Simulate and audit the ledger-backed music-career economy.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Encore - an idle music career recorded on a proof-of-work ledger
#[derive(Parser, Debug)]
#[command(name = "encore")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a career and record every action on the ledger
    Simulate {
        /// Player id the career and address are derived from
        #[arg(short, long, default_value = "player-1")]
        player: String,

        /// Comma-separated action script (song, tour, studio,
        /// upgrade-tour, upgrade-song); greedy autoplay when omitted
        #[arg(long)]
        script: Option<String>,

        /// Maximum autoplay steps (ignored with --script)
        #[arg(short, long, default_value = "20")]
        steps: u32,

        /// Proof-of-work difficulty in leading zero hex digits
        #[arg(short, long, default_value = "2")]
        difficulty: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Export the final ledger as JSON
        #[arg(long)]
        export: Option<std::path::PathBuf>,
    },

    /// Validate an exported ledger file
    Audit {
        /// Ledger JSON file to validate
        #[arg(required = true)]
        ledger: std::path::PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Simulate {
            player,
            script,
            steps,
            difficulty,
            format,
            export,
        } => cli::simulate::execute(player, script, steps, difficulty, format, export),

        Commands::Audit { ledger } => cli::audit::execute(ledger),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
