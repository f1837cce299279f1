//! The flat key grammar shared by every encoder and decoder.
//!
//! Keys are built by joining components with [`SEPARATOR`], e.g.
//! `schema.3.name` or `schema.watermark.0.rowtime`. Components are never
//! validated: one that contains the separator silently produces a key that
//! reads back differently.

use std::{fmt::Display, sync::LazyLock};

use itertools::Itertools;
use regex::Regex;

pub const SEPARATOR: &str = ".";

pub const SCHEMA: &str = "schema";
pub const NAME: &str = "name";
pub const DATA_TYPE: &str = "data-type";
pub const EXPR: &str = "expr";
pub const METADATA: &str = "metadata";
pub const VIRTUAL: &str = "virtual";

pub const WATERMARK: &str = "watermark";
pub const WATERMARK_ROWTIME: &str = "rowtime";
pub const WATERMARK_STRATEGY_EXPR: &str = "strategy.expr";
pub const WATERMARK_STRATEGY_DATA_TYPE: &str = "strategy.data-type";

/// Joins `components` with [`SEPARATOR`], in order.
pub fn compound_key(components: &[&dyn Display]) -> String {
    components.iter().join(SEPARATOR)
}

/// Builds a compound key from a mix of strings and integers.
///
/// ```
/// use schemaprops_core::compound_key;
///
/// assert_eq!(compound_key!("schema", 3, "name"), "schema.3.name");
/// ```
#[macro_export]
macro_rules! compound_key {
    ($($component:expr),+ $(,)?) => {
        $crate::key::compound_key(&[$(&$component as &dyn ::std::fmt::Display),+])
    };
}

/// Every key a non-physical column at one index may occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnKeys {
    pub name: String,
    pub data_type: String,
    pub expr: String,
    pub metadata: String,
    pub is_virtual: String,
}

impl ColumnKeys {
    pub fn at(index: usize) -> Self {
        Self {
            name: compound_key!(SCHEMA, index, NAME),
            data_type: compound_key!(SCHEMA, index, DATA_TYPE),
            expr: compound_key!(SCHEMA, index, EXPR),
            metadata: compound_key!(SCHEMA, index, METADATA),
            is_virtual: compound_key!(SCHEMA, index, VIRTUAL),
        }
    }
}

/// The three keys of the watermark declaration. There is only ever one, at index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkKeys {
    pub rowtime: String,
    pub strategy_expr: String,
    pub strategy_data_type: String,
}

impl WatermarkKeys {
    pub fn new() -> Self {
        let prefix = compound_key!(SCHEMA, WATERMARK, 0);
        Self {
            rowtime: compound_key!(prefix, WATERMARK_ROWTIME),
            strategy_expr: compound_key!(prefix, WATERMARK_STRATEGY_EXPR),
            strategy_data_type: compound_key!(prefix, WATERMARK_STRATEGY_DATA_TYPE),
        }
    }
}

impl Default for WatermarkKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefix shared by every watermark key, `schema.watermark`.
pub fn watermark_prefix() -> String {
    compound_key!(SCHEMA, WATERMARK)
}

/// Prefix shared by every key this crate writes, `schema.`.
pub fn schema_prefix() -> String {
    format!("{SCHEMA}{SEPARATOR}")
}

static COLUMN_NAME_KEY: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^{schema}{sep}[0-9]+{sep}{name}$",
        schema = regex::escape(SCHEMA),
        sep = regex::escape(SEPARATOR),
        name = regex::escape(NAME),
    );
    Regex::new(&pattern).expect("column name key pattern is valid")
});

/// Whether `key` has the shape `schema.<digits>.name`.
pub fn is_column_name_key(key: &str) -> bool {
    COLUMN_NAME_KEY.is_match(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_mixed_components() {
        assert_eq!(compound_key!("schema", 3, "name"), "schema.3.name");
        assert_eq!(
            compound_key!("schema", "watermark", 0, "rowtime"),
            "schema.watermark.0.rowtime"
        );
        assert_eq!(compound_key!("single"), "single");
    }

    #[test]
    fn column_keys_share_the_index() {
        let keys = ColumnKeys::at(7);
        assert_eq!(keys.name, "schema.7.name");
        assert_eq!(keys.data_type, "schema.7.data-type");
        assert_eq!(keys.expr, "schema.7.expr");
        assert_eq!(keys.metadata, "schema.7.metadata");
        assert_eq!(keys.is_virtual, "schema.7.virtual");
    }

    #[test]
    fn watermark_keys() {
        let keys = WatermarkKeys::new();
        assert_eq!(keys.rowtime, "schema.watermark.0.rowtime");
        assert_eq!(keys.strategy_expr, "schema.watermark.0.strategy.expr");
        assert_eq!(
            keys.strategy_data_type,
            "schema.watermark.0.strategy.data-type"
        );
        assert!(keys.rowtime.starts_with(&watermark_prefix()));
    }

    #[test]
    fn recognizes_column_name_keys() {
        assert!(is_column_name_key("schema.0.name"));
        assert!(is_column_name_key("schema.42.name"));

        assert!(!is_column_name_key("schema.name"));
        assert!(!is_column_name_key("schema.x.name"));
        assert!(!is_column_name_key("schema.1.data-type"));
        assert!(!is_column_name_key("schema.watermark.0.rowtime"));
        assert!(!is_column_name_key("schemaX1.name"));
        assert!(!is_column_name_key("other.schema.1.name"));
        assert!(!is_column_name_key("schema.1.name.suffix"));
        assert!(!is_column_name_key("schema.١.name"));
    }
}
