//! Column value types.
//!
//! Physical columns live in the storage layer's row type. Non-physical columns
//! are either computed from an expression or sourced from connector metadata,
//! and only survive persistence through the flat option map.

use serde::{Deserialize, Serialize};

use crate::data_type::TypeDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhysicalColumn {
    pub name: String,
    pub data_type: TypeDescriptor,
}

impl PhysicalColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

impl<S> From<(S, TypeDescriptor)> for PhysicalColumn
where
    S: Into<String>,
{
    fn from(value: (S, TypeDescriptor)) -> Self {
        let (name, data_type) = value;
        PhysicalColumn::new(name, data_type)
    }
}

/// A column whose value is derived from an expression over other columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedColumn {
    name: String,
    data_type: TypeDescriptor,
    expression: String,
}

impl ComputedColumn {
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<TypeDescriptor>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            expression: expression.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &TypeDescriptor {
        &self.data_type
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

/// A column read from connector metadata.
///
/// The metadata key defaults to the column name. An alias equal to the name is
/// dropped on construction, so two columns reading the same key always compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MetadataColumnDef")]
pub struct MetadataColumn {
    name: String,
    data_type: TypeDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata_key: Option<String>,
    is_virtual: bool,
}

impl MetadataColumn {
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<TypeDescriptor>,
        is_virtual: bool,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            metadata_key: None,
            is_virtual,
        }
    }

    pub fn with_alias(
        name: impl Into<String>,
        data_type: impl Into<TypeDescriptor>,
        metadata_key: impl Into<String>,
        is_virtual: bool,
    ) -> Self {
        let name = name.into();
        let metadata_key = metadata_key.into();
        let metadata_key = (metadata_key != name).then_some(metadata_key);
        Self {
            name,
            data_type: data_type.into(),
            metadata_key,
            is_virtual,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &TypeDescriptor {
        &self.data_type
    }

    /// The metadata field this column reads, which is the column name unless an
    /// alias was given.
    pub fn metadata_alias(&self) -> &str {
        self.metadata_key.as_deref().unwrap_or(&self.name)
    }

    /// The alias, if it differs from the column name.
    pub fn explicit_alias(&self) -> Option<&str> {
        self.metadata_key.as_deref()
    }

    /// Virtual columns are readable but excluded from the physical row layout.
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }
}

#[derive(Deserialize)]
struct MetadataColumnDef {
    name: String,
    data_type: TypeDescriptor,
    #[serde(default)]
    metadata_key: Option<String>,
    #[serde(default)]
    is_virtual: bool,
}

impl From<MetadataColumnDef> for MetadataColumn {
    fn from(def: MetadataColumnDef) -> Self {
        match def.metadata_key {
            Some(key) => MetadataColumn::with_alias(def.name, def.data_type, key, def.is_virtual),
            None => MetadataColumn::new(def.name, def.data_type, def.is_virtual),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NonPhysicalColumn {
    Computed(ComputedColumn),
    Metadata(MetadataColumn),
}

impl NonPhysicalColumn {
    pub fn computed(
        name: impl Into<String>,
        data_type: impl Into<TypeDescriptor>,
        expression: impl Into<String>,
    ) -> Self {
        ComputedColumn::new(name, data_type, expression).into()
    }

    pub fn metadata(
        name: impl Into<String>,
        data_type: impl Into<TypeDescriptor>,
        is_virtual: bool,
    ) -> Self {
        MetadataColumn::new(name, data_type, is_virtual).into()
    }

    pub fn metadata_with_alias(
        name: impl Into<String>,
        data_type: impl Into<TypeDescriptor>,
        metadata_key: impl Into<String>,
        is_virtual: bool,
    ) -> Self {
        MetadataColumn::with_alias(name, data_type, metadata_key, is_virtual).into()
    }

    pub fn name(&self) -> &str {
        match self {
            NonPhysicalColumn::Computed(column) => column.name(),
            NonPhysicalColumn::Metadata(column) => column.name(),
        }
    }

    pub fn data_type(&self) -> &TypeDescriptor {
        match self {
            NonPhysicalColumn::Computed(column) => column.data_type(),
            NonPhysicalColumn::Metadata(column) => column.data_type(),
        }
    }
}

impl From<ComputedColumn> for NonPhysicalColumn {
    fn from(column: ComputedColumn) -> Self {
        NonPhysicalColumn::Computed(column)
    }
}

impl From<MetadataColumn> for NonPhysicalColumn {
    fn from(column: MetadataColumn) -> Self {
        NonPhysicalColumn::Metadata(column)
    }
}
