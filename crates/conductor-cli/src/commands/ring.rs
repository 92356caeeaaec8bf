use conductor_core::{Bell, DispatchContext, DispatchRecord, OutputOrchestrator};

use crate::cli::RingArgs;
use crate::error::CliError;

use super::{load_catalog, write_json};

pub async fn run(args: &RingArgs, pretty: bool) -> Result<(), CliError> {
    let record = ring(args).await?;
    write_json(&record, pretty)
}

async fn ring(args: &RingArgs) -> Result<DispatchRecord, CliError> {
    let bell: Bell = args.bell.parse()?;
    let composition = load_catalog(&args.catalog)?.bell_composition(bell)?;
    let context = DispatchContext::for_bell(bell, args.intensity);

    let record = OutputOrchestrator::default()
        .dispatch(&composition, &context)
        .await?;
    tracing::info!(
        bell = bell.as_str(),
        frequency_hz = record.effective_frequency.unwrap_or_default(),
        failures = record.failure_count(),
        "bell rung"
    );
    Ok(record)
}
