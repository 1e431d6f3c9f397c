mod constructor;
mod errors;
mod parser;
mod runner;
mod writer;

use clap::{Parser, ValueEnum};
use tracing::Level;

/// Output format for the anonymization report
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Print the report to standard output (human-readable)
    Stdout,
    /// Write the report as JSON
    Json,
    /// Write the de-identification summary as Markdown
    Markdown,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Verbosity {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<Verbosity> for Level {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Error => Level::ERROR,
            Verbosity::Warn => Level::WARN,
            Verbosity::Info => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
            Verbosity::Trace => Level::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "anonguard",
    version,
    author = "AnonGuard Contributors",
    about = "AnonGuard CLI - k-anonymity de-identification for CSV tables",
    long_about = "AnonGuard removes direct identifiers, generalizes quasi-identifiers and \
                  suppresses every record whose equivalence class is smaller than k.\n\n\
                  Example usage:\n  \
                  anonguard --config service_requests.toml --output markdown"
)]
struct Args {
    /// Path to the TOML configuration file describing the anonymization
    #[arg(short, long, value_name = "FILE")]
    config: String,

    /// Report format
    #[arg(short, long, value_enum, default_value = "stdout")]
    output: OutputFormat,

    /// Log level written to stderr
    #[arg(short, long, value_enum, default_value = "warn")]
    verbosity: Verbosity,

    /// Print the full error chain with debug formatting
    #[arg(short, long)]
    debug: bool,

    /// Run the pipeline without writing the anonymized dataset
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let args = Args::parse();
    let debug = args.debug;

    tracing_subscriber::fmt()
        .with_max_level(Level::from(args.verbosity))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = runner::run(args) {
        if debug {
            eprintln!("Error: {:?}", err);
        } else {
            eprintln!("Error: {:#}", err);
            eprintln!("\nHint: Run with --debug flag for detailed error output");
        }
        std::process::exit(1);
    }
}
