use conductor_core::{Composition, MarketState};
use serde::Serialize;

use crate::cli::CatalogArgs;
use crate::error::CliError;

use super::{load_catalog, write_json};

#[derive(Debug, Serialize)]
struct CatalogRow {
    state: MarketState,
    #[serde(flatten)]
    composition: Composition,
}

pub fn run(args: &CatalogArgs, pretty: bool) -> Result<(), CliError> {
    let catalog = load_catalog(&args.catalog)?;
    let rows = catalog
        .iter()
        .map(|(state, composition)| CatalogRow {
            state,
            composition: *composition,
        })
        .collect::<Vec<_>>();

    write_json(&rows, pretty)
}
