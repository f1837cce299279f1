use std::path::PathBuf;

use snafu::prelude::*;

use crate::Identifier;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Table {} already exists", identifier))]
    TableAlreadyExists { identifier: Identifier },
    #[snafu(display("Table {} does not exist", identifier))]
    TableNotFound { identifier: Identifier },
    #[snafu(display("Invalid table identifier '{}': expected <database>.<table>", input))]
    InvalidIdentifier { input: String },
    #[snafu(display("I/O error at {}: {}", path.display(), source))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Could not read or write table metadata at {}: {}", path.display(), source))]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[snafu(display("Invalid schema for table {}: {}", identifier, source))]
    Schema {
        identifier: Identifier,
        source: schemaprops_core::Error,
    },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
