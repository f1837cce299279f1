//! Schemas for tables created on the fly from change-data-capture records.

use serde::{Deserialize, Serialize};

use crate::{Options, column::PhysicalColumn, table::StoredTable};

/// Builds the schema of a table that does not exist yet from the first record
/// seen for it.
pub trait NewTableSchemaBuilder<R> {
    fn build(&self, record: &R) -> Option<StoredTable>;
}

/// A change record that carries the field types and primary keys of its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichCdcRecord {
    /// Field names and types, in source order.
    pub field_types: Vec<PhysicalColumn>,
    #[serde(default)]
    pub primary_keys: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RichCdcSchemaBuilder {
    table_config: Options,
}

impl RichCdcSchemaBuilder {
    /// `table_config` becomes the options of every table this builder creates.
    pub fn new(table_config: Options) -> Self {
        Self { table_config }
    }
}

impl NewTableSchemaBuilder<RichCdcRecord> for RichCdcSchemaBuilder {
    fn build(&self, record: &RichCdcRecord) -> Option<StoredTable> {
        Some(StoredTable {
            fields: record.field_types.clone(),
            primary_keys: record.primary_keys.clone(),
            options: self.table_config.clone(),
            comment: None,
        })
    }
}
