use super::{Field, ForeignKey, Index, UniqueConstraint};

use serde::{Serialize, Serializer};
use std::fmt;

/// A table or view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "ResourceKind::is_table")]
    pub kind: ResourceKind,

    /// Columns in ordinal order
    pub fields: Vec<Field>,

    /// Primary key field names in key order; empty when the resource has none
    #[serde(rename = "primaryKey", skip_serializing_if = "Vec::is_empty")]
    pub primary_key: Vec<String>,

    pub unique: Vec<UniqueConstraint>,

    #[serde(rename = "foreignKeys")]
    pub foreign_keys: Vec<ForeignKey>,

    pub indexes: Vec<Index>,
}

/// The relation kind backing a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Table,
    View,
    MaterializedView,
    ForeignTable,
    PartitionedTable,

    /// A relation kind the engine does not model, tagged with the catalog code
    Unclassified(char),
}

impl Resource {
    pub fn new(name: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            fields: vec![],
            primary_key: vec![],
            unique: vec![],
            foreign_keys: vec![],
            indexes: vec![],
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// The index backing the primary key, if any.
    pub fn primary_index(&self) -> Option<&Index> {
        self.indexes.iter().find(|i| i.primary)
    }
}

impl ResourceKind {
    /// Maps a PostgreSQL `pg_class.relkind` code.
    pub fn from_relkind(code: char) -> Self {
        match code {
            'r' => Self::Table,
            'v' => Self::View,
            'm' => Self::MaterializedView,
            'f' => Self::ForeignTable,
            'p' => Self::PartitionedTable,
            other => Self::Unclassified(other),
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table)
    }

    pub fn is_unclassified(&self) -> bool {
        matches!(self, Self::Unclassified(_))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => fmt.write_str("table"),
            Self::View => fmt.write_str("view"),
            Self::MaterializedView => fmt.write_str("materialized_view"),
            Self::ForeignTable => fmt.write_str("foreign_table"),
            Self::PartitionedTable => fmt.write_str("partitioned_table"),
            Self::Unclassified(code) => write!(fmt, "unclassified({code})"),
        }
    }
}

impl Serialize for ResourceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
