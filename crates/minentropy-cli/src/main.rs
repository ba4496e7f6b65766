//! CLI for minentropy: how much unpredictability is in a sample file.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use minentropy_core::{Alphabet, EstimatorKind};

#[derive(Parser)]
#[command(name = "minentropy")]
#[command(about = "minentropy: non-IID min-entropy assessment of noise-source samples")]
#[command(version = minentropy_core::VERSION)]
struct Cli {
    /// Log estimator statistics (debug level). RUST_LOG overrides.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the min-entropy estimator battery on a sample file.
    /// Reports bits of min-entropy per symbol for each estimator and the minimum.
    Estimate {
        /// Sample file
        file: PathBuf,

        /// Symbol alphabet: 2 (bits, bytes unpacked MSB first) or 256 (bytes)
        #[arg(long, default_value = "2", value_parser = parse_alphabet)]
        alphabet: Alphabet,

        /// Assess at most this many symbols
        #[arg(long)]
        max_symbols: Option<usize>,

        /// Comma-separated estimators to run (default: all)
        #[arg(long, value_delimiter = ',')]
        estimators: Option<Vec<EstimatorKind>>,

        /// Run estimators one after another instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// JSON assessment config; flags given on the command line take precedence
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the full report as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run the SP 800-22 style pass/fail battery on a sample file
    Sts {
        /// Sample file
        file: PathBuf,

        /// Test at most this many bits
        #[arg(long)]
        max_bits: Option<usize>,
    },
}

fn parse_alphabet(s: &str) -> Result<Alphabet, String> {
    let size: usize = s.parse().map_err(|_| format!("not a number: {s}"))?;
    Alphabet::try_from(size).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Estimate {
            file,
            alphabet,
            max_symbols,
            estimators,
            sequential,
            config,
            output,
        } => commands::estimate::run(commands::estimate::EstimateCommandConfig {
            path: &file,
            alphabet,
            max_symbols,
            estimators,
            sequential,
            config_path: config.as_deref(),
            output_path: output.as_deref(),
        }),
        Commands::Sts { file, max_bits } => commands::sts::run(&file, max_bits),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
