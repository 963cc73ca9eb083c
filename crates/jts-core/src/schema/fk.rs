use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    /// Local field names, pairwise aligned with `reference.fields`
    pub fields: Vec<String>,

    /// `false` when the engine does not currently validate the constraint
    /// (`NOT VALID`), or when the key is only declared in a comment
    pub enforced: bool,

    pub reference: Reference,
}

/// The target of a foreign key, resolved by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub datapackage: String,

    pub resource: String,

    pub fields: Vec<String>,

    /// Constraint name; absent for comment-declared references
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "cardinalitySelf", skip_serializing_if = "Option::is_none")]
    pub cardinality_self: Option<Cardinality>,

    #[serde(rename = "cardinalityRef", skip_serializing_if = "Option::is_none")]
    pub cardinality_ref: Option<Cardinality>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Relation cardinality as written in comments, e.g. `0..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    ZeroOrOne,
    One,
    ZeroOrMany,
    OneOrMany,
}

impl ForeignKey {
    pub fn points_to(&self, datapackage: &str, resource: &str) -> bool {
        self.reference.datapackage == datapackage && self.reference.resource == resource
    }
}

impl Reference {
    pub fn new(
        datapackage: impl Into<String>,
        resource: impl Into<String>,
        fields: Vec<String>,
    ) -> Self {
        Self {
            datapackage: datapackage.into(),
            resource: resource.into(),
            fields,
            name: None,
            cardinality_self: None,
            cardinality_ref: None,
            label: None,
        }
    }

    /// Same target resource and fields, ignoring annotations.
    pub fn same_target(&self, other: &Reference) -> bool {
        self.datapackage == other.datapackage
            && self.resource == other.resource
            && self.fields == other.fields
    }
}

impl Cardinality {
    pub const ALL: [Cardinality; 4] = [
        Cardinality::ZeroOrOne,
        Cardinality::One,
        Cardinality::ZeroOrMany,
        Cardinality::OneOrMany,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::ZeroOrOne => "0..1",
            Cardinality::One => "1",
            Cardinality::ZeroOrMany => "0..N",
            Cardinality::OneOrMany => "1..N",
        }
    }
}

impl FromStr for Cardinality {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Cardinality::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::err!("invalid cardinality `{s}`"))
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl Serialize for Cardinality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
