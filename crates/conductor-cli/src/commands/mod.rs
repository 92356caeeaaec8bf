mod catalog;
mod classify;
mod ring;
mod run;

use std::io::Write;

use conductor_core::{CompositionCatalog, ConductorConfig};
use serde::Serialize;

use crate::cli::{CatalogSource, Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Run(args) => run::run(args).await,
        Command::Classify(args) => classify::run(args, cli.pretty),
        Command::Catalog(args) => catalog::run(args, cli.pretty),
        Command::Ring(args) => ring::run(args, cli.pretty).await,
    }
}

/// `--catalog` first, then `CONDUCTOR_CATALOG`, then the built-in table.
fn base_config(source: &CatalogSource) -> ConductorConfig {
    let config = ConductorConfig::from_env();
    match &source.catalog {
        Some(path) => config.with_catalog_path(path),
        None => config,
    }
}

fn load_catalog(source: &CatalogSource) -> Result<CompositionCatalog, CliError> {
    Ok(base_config(source).load_catalog()?)
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
