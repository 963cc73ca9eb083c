use serde::{Serialize, Serializer};
use std::fmt;

/// Target type of a field.
///
/// Serialized as a string tag. Enum fields carry the enum type's own name,
/// list fields render as `list of <element>`, and types without a mapping
/// keep the native type name verbatim.
///
/// ```text
/// integer, bigint, smallint            →  integer
/// character varying(40)                →  string  (+ maxLength 40)
/// timestamp with time zone             →  datetimetz
/// integer[]                            →  list of integer
/// mood (enum)                          →  mood
/// geometry (unmapped)                  →  geometry
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Number,
    Decimal,
    /// Character data with an optional length limit (see `maxLength`)
    String,
    /// Unbounded text
    Text,
    Boolean,
    Date,
    Time,
    DateTime,
    DateTimeTz,
    Duration,
    Uuid,
    Binary,
    /// JSON documents
    Object,
    Xml,
    Enum(String),
    List(Box<FieldType>),
    /// Native type name passed through without a mapping
    Native(String),
}

impl FieldType {
    pub fn list_of(element: FieldType) -> Self {
        FieldType::List(Box::new(element))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, FieldType::Native(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Decimal => "decimal",
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::DateTimeTz => "datetimetz",
            FieldType::Duration => "duration",
            FieldType::Uuid => "uuid",
            FieldType::Binary => "binary",
            FieldType::Object => "object",
            FieldType::Xml => "xml",
            FieldType::Enum(name) | FieldType::Native(name) => name,
            FieldType::List(element) => return write!(fmt, "list of {element}"),
        };
        fmt.write_str(tag)
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
