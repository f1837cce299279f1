//! The full column list of a table, physical and non-physical, in declaration order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::{
    Options,
    codec::{encode_columns, encode_watermark},
    column::{NonPhysicalColumn, PhysicalColumn},
    data_type::TypeDescriptor,
    error::{DuplicateColumnSnafu, Error, Result, UnknownColumnSnafu},
    watermark::WatermarkSpec,
};

/// One column of a [`TableSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
// Untagged: non-physical columns carry a `kind` tag and must be tried first.
// Physical columns reject unknown fields, so a tagged object never falls through.
#[serde(untagged)]
pub enum TableColumn {
    NonPhysical(NonPhysicalColumn),
    Physical(PhysicalColumn),
}

impl TableColumn {
    pub fn name(&self) -> &str {
        match self {
            TableColumn::NonPhysical(column) => column.name(),
            TableColumn::Physical(column) => &column.name,
        }
    }

    pub fn data_type(&self) -> &TypeDescriptor {
        match self {
            TableColumn::NonPhysical(column) => column.data_type(),
            TableColumn::Physical(column) => &column.data_type,
        }
    }

    pub fn is_physical(&self) -> bool {
        matches!(self, TableColumn::Physical(_))
    }
}

impl From<PhysicalColumn> for TableColumn {
    fn from(column: PhysicalColumn) -> Self {
        TableColumn::Physical(column)
    }
}

impl From<NonPhysicalColumn> for TableColumn {
    fn from(column: NonPhysicalColumn) -> Self {
        TableColumn::NonPhysical(column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableSchemaDef")]
pub struct TableSchema {
    columns: Vec<TableColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    watermark: Option<WatermarkSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    primary_key: Vec<String>,
}

impl TableSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|column| column.name() == name)
    }

    pub fn physical_columns(&self) -> impl Iterator<Item = &PhysicalColumn> {
        self.columns.iter().filter_map(|column| match column {
            TableColumn::Physical(column) => Some(column),
            TableColumn::NonPhysical(_) => None,
        })
    }

    pub fn non_physical_columns(&self) -> impl Iterator<Item = &NonPhysicalColumn> {
        self.columns.iter().filter_map(|column| match column {
            TableColumn::NonPhysical(column) => Some(column),
            TableColumn::Physical(_) => None,
        })
    }

    pub fn watermark(&self) -> Option<&WatermarkSpec> {
        self.watermark.as_ref()
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// Encodes every non-physical column at its position in the full column
    /// list, plus the watermark if there is one.
    pub fn non_physical_options(&self) -> Result<Options> {
        let index_of: HashMap<String, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column.name().to_string(), index))
            .collect();
        let non_physical: Vec<NonPhysicalColumn> = self.non_physical_columns().cloned().collect();

        let mut options = encode_columns(&index_of, &non_physical)?;
        if let Some(watermark) = &self.watermark {
            options.extend(encode_watermark(watermark));
        }
        Ok(options)
    }
}

/// Accumulates columns in declaration order; [`SchemaBuilder::build`] validates them.
#[derive(Debug, Default, Clone)]
pub struct SchemaBuilder {
    columns: Vec<TableColumn>,
    watermark: Option<WatermarkSpec>,
    primary_key: Vec<String>,
}

impl SchemaBuilder {
    pub fn column(mut self, column: impl Into<TableColumn>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn physical(self, name: impl Into<String>, data_type: impl Into<TypeDescriptor>) -> Self {
        self.column(PhysicalColumn::new(name, data_type))
    }

    pub fn computed(
        self,
        name: impl Into<String>,
        data_type: impl Into<TypeDescriptor>,
        expression: impl Into<String>,
    ) -> Self {
        self.column(NonPhysicalColumn::computed(name, data_type, expression))
    }

    pub fn metadata(
        self,
        name: impl Into<String>,
        data_type: impl Into<TypeDescriptor>,
        is_virtual: bool,
    ) -> Self {
        self.column(NonPhysicalColumn::metadata(name, data_type, is_virtual))
    }

    pub fn metadata_with_alias(
        self,
        name: impl Into<String>,
        data_type: impl Into<TypeDescriptor>,
        metadata_key: impl Into<String>,
        is_virtual: bool,
    ) -> Self {
        self.column(NonPhysicalColumn::metadata_with_alias(
            name,
            data_type,
            metadata_key,
            is_virtual,
        ))
    }

    pub fn watermark(mut self, watermark: WatermarkSpec) -> Self {
        self.watermark = Some(watermark);
        self
    }

    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Column names must be unique, primary key columns must be physical, and
    /// the watermark must watch an existing column.
    pub fn build(self) -> Result<TableSchema> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            ensure!(
                seen.insert(column.name()),
                DuplicateColumnSnafu {
                    name: column.name()
                }
            );
        }

        for key in &self.primary_key {
            let physical = self
                .columns
                .iter()
                .any(|column| column.is_physical() && column.name() == key);
            ensure!(
                physical,
                UnknownColumnSnafu {
                    referenced_by: "primary key",
                    name: key.as_str(),
                }
            );
        }

        if let Some(watermark) = &self.watermark {
            ensure!(
                seen.contains(watermark.rowtime_attribute.as_str()),
                UnknownColumnSnafu {
                    referenced_by: "watermark",
                    name: watermark.rowtime_attribute.as_str(),
                }
            );
        }

        Ok(TableSchema {
            columns: self.columns,
            watermark: self.watermark,
            primary_key: self.primary_key,
        })
    }
}

#[derive(Deserialize)]
struct TableSchemaDef {
    columns: Vec<TableColumn>,
    #[serde(default)]
    watermark: Option<WatermarkSpec>,
    #[serde(default)]
    primary_key: Vec<String>,
}

impl TryFrom<TableSchemaDef> for TableSchema {
    type Error = Error;

    fn try_from(def: TableSchemaDef) -> Result<Self> {
        SchemaBuilder {
            columns: def.columns,
            watermark: def.watermark,
            primary_key: def.primary_key,
        }
        .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;

    fn orders() -> TableSchema {
        TableSchema::builder()
            .physical("id", TypeDescriptor::not_null(DataType::Int64))
            .physical("price", DataType::Decimal(10, 2))
            .computed("total", DataType::Decimal(20, 2), "price * 2")
            .physical("ts", DataType::Timestamp(3))
            .metadata_with_alias("event_time", DataType::TimestampLtz(3), "timestamp", true)
            .watermark(WatermarkSpec::new(
                "ts",
                "ts - INTERVAL '1' SECOND",
                DataType::Timestamp(3),
            ))
            .primary_key(["id"])
            .build()
            .unwrap()
    }

    #[test]
    fn splits_physical_and_non_physical() {
        let schema = orders();
        let physical: Vec<_> = schema.physical_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(physical, ["id", "price", "ts"]);
        let non_physical: Vec<_> = schema.non_physical_columns().map(|c| c.name()).collect();
        assert_eq!(non_physical, ["total", "event_time"]);
        assert!(schema.column("total").is_some_and(|c| !c.is_physical()));
        assert!(schema.column("missing").is_none());
    }

    #[test]
    fn encodes_at_declaration_positions() {
        let options = orders().non_physical_options().unwrap();
        assert_eq!(options["schema.2.name"], "total");
        assert_eq!(options["schema.2.expr"], "price * 2");
        assert_eq!(options["schema.4.name"], "event_time");
        assert_eq!(options["schema.4.metadata"], "timestamp");
        assert_eq!(options["schema.4.virtual"], "true");
        assert_eq!(options["schema.watermark.0.rowtime"], "ts");
        assert!(!options.contains_key("schema.0.name"));
        assert_eq!(options.len(), 10);
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = TableSchema::builder()
            .physical("a", DataType::Int32)
            .computed("a", DataType::Int32, "1")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn { ref name } if name == "a"));
    }

    #[test]
    fn primary_key_must_be_physical() {
        let err = TableSchema::builder()
            .physical("a", DataType::Int32)
            .computed("b", DataType::Int32, "a + 1")
            .primary_key(["b"])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { referenced_by: "primary key", .. }));
    }

    #[test]
    fn watermark_must_watch_a_column() {
        let err = TableSchema::builder()
            .physical("a", DataType::Int32)
            .watermark(WatermarkSpec::new("ts", "ts", DataType::Timestamp(3)))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { referenced_by: "watermark", .. }));
    }

    #[test]
    fn json_round_trip_validates() {
        let schema = orders();
        let json = serde_json::to_string(&schema).unwrap();
        let back: TableSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);

        let invalid = r#"{"columns": [
            {"name": "a", "data_type": "INT"},
            {"name": "a", "data_type": "STRING"}
        ]}"#;
        assert!(serde_json::from_str::<TableSchema>(invalid).is_err());

        let misspelled = r#"{"columns": [
            {"kind": "computed", "name": "total", "data_type": "INT", "expresion": "a + 1"}
        ]}"#;
        assert!(serde_json::from_str::<TableSchema>(misspelled).is_err());

        let unknown_kind = r#"{"columns": [
            {"kind": "generated", "name": "total", "data_type": "INT"}
        ]}"#;
        assert!(serde_json::from_str::<TableSchema>(unknown_kind).is_err());
    }
}
