//! Encoders and decoders between structured schema metadata and the flat
//! option map persisted by the catalog.

mod column;
mod watermark;

pub use column::{count_non_physical, decode_column, encode_columns};
pub use watermark::{decode_watermark, encode_watermark, has_watermark};

use snafu::prelude::*;

use crate::{
    Options,
    error::{MissingKeySnafu, Result},
};

/// Looks up a key that must be present.
fn required<'a>(options: &'a Options, key: &str) -> Result<&'a str> {
    options
        .get(key)
        .map(String::as_str)
        .context(MissingKeySnafu { key })
}
