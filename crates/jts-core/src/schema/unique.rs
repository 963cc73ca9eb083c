use serde::Serialize;

/// A unique constraint that does not back the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueConstraint {
    pub name: String,
    pub fields: Vec<String>,
}
