//! CLI argument definitions for conductor.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `run` | Stream NDJSON market metrics through the pipeline |
//! | `classify` | Classify one set of metrics and show the chosen composition |
//! | `catalog` | Print the validated composition catalog |
//! | `ring` | Dispatch one of the seven bells |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--log-format` | `compact` | Log formatter (pretty, compact, json) |
//! | `--log-level` | `info` | Default filter when `RUST_LOG` is unset |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Replay a recorded session
//! conductor run --input session.ndjson > records.ndjson
//!
//! # Pipe live metrics in, with a flaky speech engine
//! tail -f metrics.ndjson | conductor run --failure-rate 0.2 --seed 7
//!
//! # Check which composition a crash would produce
//! conductor classify --volatility 60 --price-change -5 --rsi 20
//!
//! # Ring the clarity bell a little brighter
//! conductor ring clarity --intensity 1.2
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Market conductor: turns market metrics into tone, speech, and visual output.
#[derive(Debug, Parser)]
#[command(
    name = "conductor",
    author,
    version,
    about = "Turn market metrics into tone, speech, and visual output",
    long_about = "Conductor classifies each market event, picks a composition for it, and \
plays that composition on three independent output channels at once.\n\
\n\
Dispatch records are written to stdout as JSON; logs go to stderr.\n\
\n\
Use 'conductor <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Log formatter for stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Default log filter, used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Pretty-print JSON output with indentation.
    ///
    /// Ignored by `run`, which always emits one record per line.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// Single line per event.
    Compact,
    /// One JSON object per event.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stream market metrics through the pipeline.
    ///
    /// Reads one JSON metrics object per line and writes one dispatch record
    /// per line. Malformed lines are skipped and counted. Ctrl-C stops the
    /// loop after the event in flight has been dispatched.
    ///
    /// # Examples
    ///
    ///   conductor run --input session.ndjson
    ///   cat session.ndjson | conductor run --intensity 1.5
    Run(RunArgs),

    /// Classify one set of metrics.
    ///
    /// # Examples
    ///
    ///   conductor classify --volatility 10 --price-change 1 --rsi 75 --volume-spike
    Classify(ClassifyArgs),

    /// Print the validated composition catalog.
    Catalog(CatalogArgs),

    /// Dispatch one of the seven bells.
    ///
    /// Bells: clarity, strength, transformation, integrity, intuition,
    /// manifestation, sovereignty.
    Ring(RingArgs),
}

/// Catalog file selection shared by commands that need one.
#[derive(Debug, Clone, Args)]
pub struct CatalogSource {
    /// Catalog JSON file. Falls back to CONDUCTOR_CATALOG, then the built-in table.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Arguments for the `run` command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// NDJSON metrics file, or `-` for stdin.
    #[arg(long, default_value = "-")]
    pub input: String,

    #[command(flatten)]
    pub catalog: CatalogSource,

    /// Multiplier applied to every composition's base frequency.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub intensity: f64,

    /// Upper bound for a single channel call, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Probability that a simulated device call fails.
    #[arg(long, default_value_t = 0.0)]
    pub failure_rate: f64,

    /// Seed for simulated device failures.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// Arguments for the `classify` command.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Volatility index.
    #[arg(long, allow_negative_numbers = true)]
    pub volatility: f64,

    /// Price change, percent.
    #[arg(long, allow_negative_numbers = true)]
    pub price_change: f64,

    /// Relative strength index.
    #[arg(long, allow_negative_numbers = true)]
    pub rsi: f64,

    /// Volume is spiking.
    #[arg(long, default_value_t = false)]
    pub volume_spike: bool,

    /// 24-hour change, percent. Informational only.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub change_24h: f64,

    #[command(flatten)]
    pub catalog: CatalogSource,
}

/// Arguments for the `catalog` command.
#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub catalog: CatalogSource,
}

/// Arguments for the `ring` command.
#[derive(Debug, Args)]
pub struct RingArgs {
    /// Bell name.
    pub bell: String,

    /// Multiplier applied to the bell's frequency.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub intensity: f64,

    #[command(flatten)]
    pub catalog: CatalogSource,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults_to_stdin_and_unit_intensity() {
        let cli = Cli::try_parse_from(["conductor", "run"]).expect("parses");
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.input, "-");
                assert_eq!(args.intensity, 1.0);
                assert_eq!(args.timeout_ms, 5000);
                assert!(args.catalog.catalog.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn classify_accepts_negative_price_change() {
        let cli = Cli::try_parse_from([
            "conductor",
            "classify",
            "--volatility",
            "60",
            "--price-change",
            "-5",
            "--rsi",
            "20",
        ])
        .expect("parses");

        match cli.command {
            Command::Classify(args) => {
                assert_eq!(args.price_change, -5.0);
                assert!(!args.volume_spike);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_log_format_can_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["conductor", "ring", "clarity", "--log-format", "json"])
            .expect("parses");
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
