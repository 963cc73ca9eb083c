use serde::Serialize;
use std::fmt;

/// Identifies the catalog object a notification concerns.
///
/// An empty path refers to the database itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectPath {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl ObjectPath {
    pub fn database() -> Self {
        Self::default()
    }

    pub fn schema(schema: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            ..Self::default()
        }
    }

    pub fn table(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            table: Some(table.into()),
            column: None,
        }
    }

    pub fn column(
        schema: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            schema: Some(schema.into()),
            table: Some(table.into()),
            column: Some(column.into()),
        }
    }

    /// Extends a table path with a column.
    pub fn with_column(&self, column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            ..self.clone()
        }
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.schema, &self.table, &self.column]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();

        if parts.is_empty() {
            fmt.write_str("<database>")
        } else {
            fmt.write_str(&parts.join("."))
        }
    }
}
