use std::sync::Arc;

use conductor_core::{CompositionSelector, MarketMetrics, Selection};
use serde::Serialize;

use crate::cli::ClassifyArgs;
use crate::error::CliError;

use super::{load_catalog, write_json};

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    metrics: MarketMetrics,
    #[serde(flatten)]
    selection: Selection,
}

pub fn run(args: &ClassifyArgs, pretty: bool) -> Result<(), CliError> {
    let response = classify(args)?;
    write_json(&response, pretty)
}

fn classify(args: &ClassifyArgs) -> Result<ClassifyResponse, CliError> {
    let metrics = MarketMetrics::new(
        args.volatility,
        args.price_change,
        args.volume_spike,
        args.rsi,
        args.change_24h,
    )?;
    let selector = CompositionSelector::new(Arc::new(load_catalog(&args.catalog)?))?;
    let selection = selector.resolve(&metrics)?;

    Ok(ClassifyResponse { metrics, selection })
}
