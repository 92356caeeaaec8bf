//! stderr log subscriber.
//!
//! `RUST_LOG` wins over `--log-level` when both are present. Logs never go to
//! stdout, which carries command output.

use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;
use crate::error::CliError;

pub fn init(format: LogFormat, default_level: &str) -> Result<(), CliError> {
    let filter = build_filter(default_level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|error| CliError::Logging(error.to_string()))
}

fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
