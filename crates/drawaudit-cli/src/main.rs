//! Drawaudit CLI - independent verification of published weighted draw results.

use clap::{Parser, Subcommand};

mod commands;
mod output;
mod source;
mod telemetry;

use commands::audit::{self, AuditArgs, LevelArg, MissingSeed};
use commands::{canonical_hash, hash};

#[derive(Parser)]
#[command(name = "drawaudit")]
#[command(version)]
#[command(about = "Verify a published draw result against its snapshot and revealed seed")]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a published draw (winners.json + snapshot.csv)
    Audit {
        /// Draw period, e.g. 2025-01
        #[arg(long)]
        period: Option<String>,
        /// Base location holding {period}/winners.json and {period}/snapshot.csv
        #[arg(long, env = "DRAWAUDIT_BASE")]
        base: Option<String>,
        /// Path or URL of winners.json
        #[arg(long)]
        winners: Option<String>,
        /// Path or URL of snapshot.csv
        #[arg(long)]
        snapshot: Option<String>,
        /// Which level(s) to run
        #[arg(long, value_enum, default_value = "all")]
        level: LevelArg,
        /// What to do when the seed is not revealed yet
        #[arg(long, value_enum, default_value = "skip")]
        on_missing_seed: MissingSeed,
        /// Use this seed instead of the one in winners.json
        #[arg(long)]
        seed_hex: Option<String>,
        /// Run later levels even after a failure
        #[arg(long)]
        keep_going: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Omit the banner
        #[arg(long, short)]
        quiet: bool,
    },
    /// Print the BLAKE2b-256 of a file's raw bytes
    Hash {
        /// Path or URL
        input: String,
    },
    /// Print the canonical snapshot hash for a period
    CanonicalHash {
        /// Path or URL of snapshot.csv
        snapshot: String,
        /// Draw period
        #[arg(long)]
        period: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    telemetry::init_tracing(cli.log_json, level);

    let result = match cli.command {
        Commands::Audit {
            period,
            base,
            winners,
            snapshot,
            level,
            on_missing_seed,
            seed_hex,
            keep_going,
            json,
            quiet,
        } => audit::run(AuditArgs {
            period,
            base,
            winners,
            snapshot,
            level,
            on_missing_seed,
            seed_hex,
            keep_going,
            json,
            quiet,
        }),
        Commands::Hash { input } => hash::run(input).map(|()| audit::exit::OK),
        Commands::CanonicalHash { snapshot, period } => {
            canonical_hash::run(snapshot, period).map(|()| audit::exit::OK)
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(audit::exit::ERROR);
        }
    }
}
