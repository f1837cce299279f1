//! Encodes the parts of a table schema a storage layer cannot represent
//! (computed columns, metadata columns and the watermark) into a flat
//! string-to-string option map, and decodes them back.
//!
//! The map is the only thing persisted. Keys follow a fixed grammar, see [`key`].

pub mod cdc;
pub mod codec;
mod column;
mod data_type;
pub mod error;
pub mod key;
mod schema;
mod table;
mod watermark;

use std::collections::BTreeMap;

pub use codec::{
    count_non_physical, decode_column, decode_watermark, encode_columns, encode_watermark,
    has_watermark,
};
pub use column::{ComputedColumn, MetadataColumn, NonPhysicalColumn, PhysicalColumn};
pub use data_type::{DataType, TypeDescriptor};
pub use error::{Error, Result};
pub use schema::{SchemaBuilder, TableColumn, TableSchema};
pub use table::{CatalogTable, StoredTable};
pub use watermark::WatermarkSpec;

/// The flat property map persisted by the catalog.
pub type Options = BTreeMap<String, String>;
