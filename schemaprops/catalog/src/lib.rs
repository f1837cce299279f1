//! Catalogs that persist tables through the flat option map.
//!
//! Implementations store only [`StoredTable`]s: physical fields, primary keys
//! and options. Computed columns, metadata columns and the watermark are
//! encoded into the options on the way in and recovered on the way out.

mod catalog;
mod error;
mod filesystem;
mod identifier;
mod memory;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use filesystem::FileSystemCatalog;
pub use identifier::Identifier;
pub use memory::InMemoryCatalog;

pub use schemaprops_core::{CatalogTable, StoredTable};
