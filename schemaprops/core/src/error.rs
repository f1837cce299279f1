use snafu::prelude::*;

use crate::Options;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display(
        "Failed to build non-physical column. Current index is {}, options are {:?}",
        index,
        options
    ))]
    MalformedColumn { index: usize, options: Options },
    #[snafu(display("Missing required option: {}", key))]
    MissingKey { key: String },
    #[snafu(display("Could not parse type descriptor: '{}'", input))]
    InvalidDataType { input: String },
    #[snafu(display("No column index assigned to non-physical column: {}", name))]
    MissingColumnIndex { name: String },
    #[snafu(display("Duplicate column name: {}", name))]
    DuplicateColumn { name: String },
    #[snafu(display("{} references unknown column: {}", referenced_by, name))]
    UnknownColumn { referenced_by: &'static str, name: String },
    #[snafu(display(
        "Physical fields do not line up with the stored column layout at index {}",
        index
    ))]
    ColumnLayout { index: usize },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
