use std::collections::{HashMap, HashSet};

use snafu::prelude::*;
use tracing::{debug, trace};

use super::required;
use crate::{
    Options,
    column::{MetadataColumn, NonPhysicalColumn},
    data_type::TypeDescriptor,
    error::{MalformedColumnSnafu, MissingColumnIndexSnafu, Result},
    key::{ColumnKeys, is_column_name_key},
};

/// Encodes `columns` into a fresh option map, placing each one at the index
/// `index_of` assigns to its name.
///
/// Computed columns carry an `expr` key; metadata columns carry `metadata` and
/// `virtual` keys. Every column carries `name` and `data-type`.
pub fn encode_columns(
    index_of: &HashMap<String, usize>,
    columns: &[NonPhysicalColumn],
) -> Result<Options> {
    let mut options = Options::new();
    for column in columns {
        let index = *index_of
            .get(column.name())
            .context(MissingColumnIndexSnafu {
                name: column.name(),
            })?;
        encode_column_into(&mut options, index, column);
    }
    Ok(options)
}

fn encode_column_into(options: &mut Options, index: usize, column: &NonPhysicalColumn) {
    let keys = ColumnKeys::at(index);
    options.insert(keys.name, column.name().to_string());
    options.insert(keys.data_type, column.data_type().to_string());
    match column {
        NonPhysicalColumn::Computed(computed) => {
            options.insert(keys.expr, computed.expression().to_string());
        }
        NonPhysicalColumn::Metadata(metadata) => {
            options.insert(keys.metadata, metadata.metadata_alias().to_string());
            options.insert(keys.is_virtual, metadata.is_virtual().to_string());
        }
    }
    trace!(index, name = column.name(), "encoded non-physical column");
}

/// Counts the non-physical columns stored in `options`.
///
/// There is no count key. Every `schema.<i>.name` entry is a column, except
/// those naming one of `physical_columns`.
pub fn count_non_physical<S>(options: &Options, physical_columns: &[S]) -> usize
where
    S: AsRef<str>,
{
    let physical: HashSet<&str> = physical_columns.iter().map(AsRef::as_ref).collect();
    let count = options
        .iter()
        .filter(|(key, name)| is_column_name_key(key) && !physical.contains(name.as_str()))
        .count();
    debug!(count, "counted non-physical columns");
    count
}

/// Decodes the non-physical column stored at `index`.
///
/// An `expr` key makes it computed, otherwise a `metadata` key makes it a
/// metadata column. A record with both decodes as computed. A missing or
/// unreadable `virtual` flag means not virtual.
pub fn decode_column(options: &Options, index: usize) -> Result<NonPhysicalColumn> {
    let keys = ColumnKeys::at(index);

    let name = required(options, &keys.name)?;
    let data_type: TypeDescriptor = required(options, &keys.data_type)?.parse()?;

    let column = if let Some(expression) = options.get(&keys.expr) {
        NonPhysicalColumn::computed(name, data_type, expression.as_str())
    } else if let Some(alias) = options.get(&keys.metadata) {
        let is_virtual = options
            .get(&keys.is_virtual)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));
        MetadataColumn::with_alias(name, data_type, alias.as_str(), is_virtual).into()
    } else {
        return MalformedColumnSnafu {
            index,
            options: options.clone(),
        }
        .fail();
    };

    trace!(index, name, "decoded non-physical column");
    Ok(column)
}
