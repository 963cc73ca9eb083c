use super::FieldType;

use serde::Serialize;

/// A column of a resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: FieldType,

    pub constraints: FieldConstraints,

    /// The default expression exactly as the engine renders it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Only set when it differs from the type's default collation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldConstraints {
    /// `true` when the column cannot hold NULL
    pub required: bool,

    /// `true` when a single-column unique constraint covers the field
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unique: bool,

    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    /// Ordered labels of an enum type
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            constraints: FieldConstraints::default(),
            default_value: None,
            description: None,
            collation: None,
        }
    }
}
