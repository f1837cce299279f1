//! Conversion between a catalog table and the form the storage layer persists.
//!
//! The storage layer understands physical fields, primary keys and a flat
//! option map. Everything else about the schema travels inside the options.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use tracing::debug;

use crate::{
    Options,
    codec::{count_non_physical, decode_column, decode_watermark, has_watermark},
    column::PhysicalColumn,
    error::{ColumnLayoutSnafu, Result},
    key::{ColumnKeys, schema_prefix},
    schema::TableSchema,
};

/// A table as the storage layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTable {
    pub fields: Vec<PhysicalColumn>,
    #[serde(default)]
    pub primary_keys: Vec<String>,
    #[serde(default)]
    pub options: Options,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A table as the catalog exposes it: full schema plus user options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTable {
    pub schema: TableSchema,
    #[serde(default)]
    pub options: Options,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CatalogTable {
    pub fn new(schema: TableSchema, options: Options) -> Self {
        Self {
            schema,
            options,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Flattens the table for storage. User options under the `schema.` prefix
    /// are replaced by the encoded schema.
    pub fn to_stored(&self) -> Result<StoredTable> {
        let prefix = schema_prefix();
        let mut options: Options = self
            .options
            .iter()
            .filter(|(key, _)| !key.starts_with(&prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let shadowed = self.options.len() - options.len();
        if shadowed > 0 {
            debug!(shadowed, "dropped user options under the schema prefix");
        }
        options.extend(self.schema.non_physical_options()?);

        Ok(StoredTable {
            fields: self.schema.physical_columns().cloned().collect(),
            primary_keys: self.schema.primary_key().to_vec(),
            options,
            comment: self.comment.clone(),
        })
    }

    /// Rebuilds the full schema from a stored table.
    ///
    /// Index `i` holds a non-physical column when `schema.<i>.name` names
    /// something other than a physical field; every other index takes the next
    /// physical field in order.
    pub fn from_stored(stored: &StoredTable) -> Result<Self> {
        let physical_names: Vec<&str> = stored.fields.iter().map(|f| f.name.as_str()).collect();
        let physical: HashSet<&str> = physical_names.iter().copied().collect();
        let non_physical = count_non_physical(&stored.options, &physical_names);

        let mut fields = stored.fields.iter();
        let mut builder = TableSchema::builder();
        for index in 0..stored.fields.len() + non_physical {
            match stored.options.get(&ColumnKeys::at(index).name) {
                Some(name) if !physical.contains(name.as_str()) => {
                    builder = builder.column(decode_column(&stored.options, index)?);
                }
                _ => {
                    let field = fields.next().context(ColumnLayoutSnafu { index })?;
                    builder = builder.column(field.clone());
                }
            }
        }

        if has_watermark(&stored.options) {
            builder = builder.watermark(decode_watermark(&stored.options)?);
        }
        let schema = builder
            .primary_key(stored.primary_keys.iter().cloned())
            .build()?;

        let prefix = schema_prefix();
        let options = stored
            .options
            .iter()
            .filter(|(key, _)| !key.starts_with(&prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            schema,
            options,
            comment: stored.comment.clone(),
        })
    }
}

impl TryFrom<&StoredTable> for CatalogTable {
    type Error = crate::error::Error;

    fn try_from(stored: &StoredTable) -> Result<Self> {
        CatalogTable::from_stored(stored)
    }
}
