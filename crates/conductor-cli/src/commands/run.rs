use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use conductor_core::{
    LoopStats, MarketEventLoop, NdjsonObserver, NdjsonSource, SimulatedSpeech, SimulatedTone,
    SimulatedVisual,
};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::cli::RunArgs;
use crate::error::CliError;

use super::base_config;

type InputReader = Box<dyn AsyncBufRead + Unpin + Send>;

pub async fn run(args: &RunArgs) -> Result<(), CliError> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("run", %run_id);

    async {
        let event_loop = build_loop(args)?;
        let input = open_input(&args.input).await?;
        drive(&event_loop, input, std::io::stdout(), shutdown_signal()).await?;
        Ok(())
    }
    .instrument(span)
    .await
}

fn build_loop(args: &RunArgs) -> Result<MarketEventLoop, CliError> {
    let config = base_config(&args.catalog)
        .with_intensity_scale(args.intensity)
        .with_channel_timeout(Duration::from_millis(args.timeout_ms));

    // Distinct seeds so the three devices do not fail in lockstep.
    let event_loop = config.build_loop(
        Arc::new(SimulatedTone::with_failure_rate(args.failure_rate, args.seed)),
        Arc::new(SimulatedSpeech::with_failure_rate(
            args.failure_rate,
            args.seed.wrapping_add(1),
        )),
        Arc::new(SimulatedVisual::with_failure_rate(
            args.failure_rate,
            args.seed.wrapping_add(2),
        )),
    )?;
    Ok(event_loop)
}

async fn open_input(input: &str) -> Result<InputReader, CliError> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }

    let file = tokio::fs::File::open(input).await?;
    Ok(Box::new(BufReader::new(file)))
}

async fn drive<W, C>(
    event_loop: &MarketEventLoop,
    input: InputReader,
    output: W,
    cancel: C,
) -> Result<LoopStats, CliError>
where
    W: Write,
    C: std::future::Future<Output = ()>,
{
    let mut source = NdjsonSource::new(input);
    let mut observer = NdjsonObserver::new(output);

    let stats = event_loop
        .run_until(&mut source, &mut observer, cancel)
        .await?;

    info!(
        processed = stats.processed,
        rejected = stats.rejected,
        channel_failures = stats.channel_failures,
        skipped_lines = source.skipped(),
        "run finished"
    );
    Ok(stats)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        // Without a signal handler the loop runs until input ends.
        warn!(error = %error, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CatalogSource;

    fn args(intensity: f64) -> RunArgs {
        RunArgs {
            input: String::from("-"),
            catalog: CatalogSource { catalog: None },
            intensity,
            timeout_ms: 1000,
            failure_rate: 0.0,
            seed: 0,
        }
    }

    fn reader(lines: &str) -> InputReader {
        Box::new(BufReader::new(std::io::Cursor::new(lines.as_bytes().to_vec())))
    }

    #[tokio::test]
    async fn writes_one_record_per_valid_line() {
        let event_loop = build_loop(&args(1.0)).expect("valid config");
        let input = reader(concat!(
            r#"{"volatility":60,"price_change":-5,"rsi":20}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"volatility":10,"price_change":1,"rsi":75,"volume_spike":true}"#,
            "\n",
        ));

        let mut output = Vec::new();
        let stats = drive(&event_loop, input, &mut output, std::future::pending())
            .await
            .expect("runs");

        let lines = String::from_utf8(output).expect("utf8");
        let records = lines
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).expect("json line"))
            .collect::<Vec<_>>();

        assert_eq!(stats.processed, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["state"], "panic_selling");
        assert_eq!(records[0]["sequence"], 1);
        assert_eq!(records[1]["state"], "bull_breakout");
        assert_eq!(records[1]["sequence"], 2);
    }

    #[tokio::test]
    async fn cancellation_before_input_processes_nothing() {
        let event_loop = build_loop(&args(1.0)).expect("valid config");
        let input = reader(r#"{"volatility":5,"price_change":0.5,"rsi":50}"#);

        let mut output = Vec::new();
        let stats = drive(&event_loop, input, &mut output, std::future::ready(()))
            .await
            .expect("runs");

        assert_eq!(stats.processed, 0);
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn invalid_intensity_yields_rejected_records() {
        let event_loop = build_loop(&args(-1.0)).expect("valid config");
        let input = reader(r#"{"volatility":5,"price_change":0.5,"rsi":50}"#);

        let mut output = Vec::new();
        let stats = drive(&event_loop, input, &mut output, std::future::pending())
            .await
            .expect("runs");

        assert_eq!(stats.rejected, 1);
        let record: serde_json::Value =
            serde_json::from_slice(output.trim_ascii_end()).expect("json");
        assert!(record["rejection"].is_string());
    }

    #[test]
    fn incomplete_catalog_fails_before_reading_input() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(br#"{"entries":{}}"#).expect("write catalog");

        let mut run_args = args(1.0);
        run_args.catalog.catalog = Some(file.path().to_path_buf());

        let Err(error) = build_loop(&run_args) else {
            panic!("incomplete catalog must be rejected");
        };
        assert_eq!(error.exit_code(), 3);
    }
}
