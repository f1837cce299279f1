use std::{fs, path::Path, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use schemaprops_core::{CatalogTable, Options, StoredTable, count_non_physical};

#[derive(Debug, Parser, PartialEq)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(long, global = true, help = "Pretty-print JSON output")]
    pretty: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
enum Command {
    /// Flatten a catalog table into the form the storage layer persists.
    Encode {
        #[clap(help = "JSON file holding a catalog table")]
        file: PathBuf,
    },
    /// Rebuild a catalog table from its stored form.
    Decode {
        #[clap(help = "JSON file holding a stored table")]
        file: PathBuf,
    },
    /// Count the non-physical columns encoded in a set of options.
    Count {
        #[clap(help = "JSON file holding a stored table or a flat option map")]
        file: PathBuf,

        #[clap(
            long,
            value_delimiter = ',',
            help = "Physical column names, in addition to a stored table's fields"
        )]
        physical: Vec<String>,
    },
}

/// Calls [`main_inner`], then handles printing errors and returning the correct exit code
pub fn main() -> ExitCode {
    if let Err(e) = main_inner() {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn main_inner() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    debug!(?args, "parsed arguments");

    let output = match &args.command {
        Command::Encode { file } => {
            let table: CatalogTable = read_json(file)?;
            render(&table.to_stored()?, args.pretty)?
        }
        Command::Decode { file } => {
            let stored: StoredTable = read_json(file)?;
            render(&CatalogTable::from_stored(&stored)?, args.pretty)?
        }
        Command::Count { file, physical } => count(file, physical)?.to_string(),
    };
    println!("{output}");
    Ok(())
}

fn count(file: &Path, physical: &[String]) -> Result<usize> {
    let value: serde_json::Value = read_json(file)?;
    if let Ok(stored) = serde_json::from_value::<StoredTable>(value.clone()) {
        let mut physical = physical.to_vec();
        physical.extend(stored.fields.into_iter().map(|field| field.name));
        return Ok(count_non_physical(&stored.options, &physical));
    }
    let options: Options = serde_json::from_value(value)
        .with_context(|| format!("{} is neither a stored table nor an option map", file.display()))?;
    Ok(count_non_physical(&options, physical))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}
