//! Native type to field type mapping.

use crate::catalog::{CatalogReader, NativeType, TypeKind};

use jts_core::{
    driver::Connection,
    schema::FieldType,
    NotificationKind, Notifications, ObjectPath, Result,
};
use std::collections::HashMap;

/// The outcome of mapping one column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub ty: FieldType,

    /// Length limit of character data
    pub max_length: Option<u32>,

    /// Labels of an enum type, also kept for lists of enums
    pub enum_values: Option<Vec<String>>,
}

/// Maps native types onto field types, following domains and arrays through
/// on-demand catalog lookups.
///
/// Lookups are cached per mapper, so a type shared by many columns is read
/// from the catalog once per run.
#[derive(Debug)]
pub struct TypeMapper {
    recursion_limit: usize,
    types: HashMap<i64, Option<NativeType>>,
    enums: HashMap<i64, Vec<String>>,
}

enum Resolved {
    Mapped(MappedType),
    Unmapped,
    TooDeep,
}

enum Matcher {
    /// Any of the names, compared after modifiers are removed
    Name(&'static [&'static str]),

    /// A name followed by optional field qualifiers, e.g. `interval year`
    Prefix(&'static str),
}

enum Target {
    Type(FieldType),

    /// `string`, with the length modifier as `maxLength`
    CharacterData,
}

/// Built-in types, evaluated top to bottom. Anything not listed is unmapped.
static BUILTIN_TYPES: &[(Matcher, Target)] = &[
    (
        Matcher::Name(&["smallint", "integer", "bigint", "int2", "int4", "int8"]),
        Target::Type(FieldType::Integer),
    ),
    (
        Matcher::Name(&["real", "double precision", "float4", "float8"]),
        Target::Type(FieldType::Number),
    ),
    (
        Matcher::Name(&["numeric", "decimal"]),
        Target::Type(FieldType::Decimal),
    ),
    (
        Matcher::Name(&["character varying", "varchar", "character", "bpchar"]),
        Target::CharacterData,
    ),
    (
        Matcher::Name(&["text", "citext", "name"]),
        Target::Type(FieldType::Text),
    ),
    (
        Matcher::Name(&["boolean", "bool"]),
        Target::Type(FieldType::Boolean),
    ),
    (Matcher::Name(&["date"]), Target::Type(FieldType::Date)),
    (
        Matcher::Name(&[
            "time without time zone",
            "time with time zone",
            "time",
            "timetz",
        ]),
        Target::Type(FieldType::Time),
    ),
    (
        Matcher::Name(&["timestamp without time zone", "timestamp"]),
        Target::Type(FieldType::DateTime),
    ),
    (
        Matcher::Name(&["timestamp with time zone", "timestamptz"]),
        Target::Type(FieldType::DateTimeTz),
    ),
    (Matcher::Prefix("interval"), Target::Type(FieldType::Duration)),
    (Matcher::Name(&["uuid"]), Target::Type(FieldType::Uuid)),
    (Matcher::Name(&["bytea"]), Target::Type(FieldType::Binary)),
    (
        Matcher::Name(&["json", "jsonb"]),
        Target::Type(FieldType::Object),
    ),
    (Matcher::Name(&["xml"]), Target::Type(FieldType::Xml)),
];

impl TypeMapper {
    pub fn new(recursion_limit: usize) -> Self {
        Self {
            recursion_limit,
            types: HashMap::new(),
            enums: HashMap::new(),
        }
    }

    /// Maps the type of the column at `path`.
    ///
    /// Never fails on an unknown type: the native name is kept verbatim and
    /// one notification is recorded. Errors are catalog failures only.
    pub fn map_type<C: Connection + ?Sized>(
        &mut self,
        catalog: &mut CatalogReader<'_, C>,
        native: &NativeType,
        path: &ObjectPath,
        notifications: &mut Notifications,
    ) -> Result<MappedType> {
        match self.resolve(catalog, native, 0)? {
            Resolved::Mapped(mapped) => Ok(mapped),
            Resolved::Unmapped => {
                notifications.info(
                    NotificationKind::UnmappableType,
                    path.clone(),
                    format!("no mapping for type `{}`, kept verbatim", native.name),
                );
                Ok(MappedType::native(&native.name))
            }
            Resolved::TooDeep => {
                notifications.warn(
                    NotificationKind::RecursionLimit,
                    path.clone(),
                    format!(
                        "resolving type `{}` exceeds {} levels, kept verbatim",
                        native.name, self.recursion_limit
                    ),
                );
                Ok(MappedType::native(&native.name))
            }
        }
    }

    fn resolve<C: Connection + ?Sized>(
        &mut self,
        catalog: &mut CatalogReader<'_, C>,
        native: &NativeType,
        depth: usize,
    ) -> Result<Resolved> {
        match native.kind {
            TypeKind::Enum => {
                let labels = self.enum_labels(catalog, native.oid)?;
                Ok(Resolved::Mapped(MappedType {
                    ty: FieldType::Enum(native.name.clone()),
                    max_length: None,
                    enum_values: Some(labels),
                }))
            }
            TypeKind::Array => {
                let Some(element) = native.element else {
                    return Ok(Resolved::Unmapped);
                };
                if depth >= self.recursion_limit {
                    return Ok(Resolved::TooDeep);
                }
                let Some(element) = self.lookup_type(catalog, element)? else {
                    return Ok(Resolved::Unmapped);
                };

                Ok(match self.resolve(catalog, &element, depth + 1)? {
                    Resolved::Mapped(mapped) => Resolved::Mapped(MappedType {
                        ty: FieldType::list_of(mapped.ty),
                        max_length: None,
                        enum_values: mapped.enum_values,
                    }),
                    other => other,
                })
            }
            TypeKind::Domain => {
                let Some(base) = &native.base else {
                    return Ok(Resolved::Unmapped);
                };
                if depth >= self.recursion_limit {
                    return Ok(Resolved::TooDeep);
                }
                let Some(mut base_type) = self.lookup_type(catalog, base.oid)? else {
                    return Ok(Resolved::Unmapped);
                };

                // The domain's rendering of its base carries the modifiers
                if base_type.kind == TypeKind::Base {
                    base_type.name = base.name.clone();
                }

                self.resolve(catalog, &base_type, depth + 1)
            }
            TypeKind::Base
            | TypeKind::Range
            | TypeKind::Composite
            | TypeKind::Pseudo
            | TypeKind::Other(_) => Ok(match map_builtin(&native.name) {
                Some(mapped) => Resolved::Mapped(mapped),
                None => Resolved::Unmapped,
            }),
        }
    }

    fn lookup_type<C: Connection + ?Sized>(
        &mut self,
        catalog: &mut CatalogReader<'_, C>,
        oid: i64,
    ) -> Result<Option<NativeType>> {
        if let Some(ty) = self.types.get(&oid) {
            return Ok(ty.clone());
        }

        let ty = catalog.lookup_type(oid)?;
        self.types.insert(oid, ty.clone());
        Ok(ty)
    }

    fn enum_labels<C: Connection + ?Sized>(
        &mut self,
        catalog: &mut CatalogReader<'_, C>,
        oid: i64,
    ) -> Result<Vec<String>> {
        if let Some(labels) = self.enums.get(&oid) {
            return Ok(labels.clone());
        }

        let labels = catalog.enum_labels(oid)?;
        self.enums.insert(oid, labels.clone());
        Ok(labels)
    }
}

impl MappedType {
    fn plain(ty: FieldType) -> Self {
        Self {
            ty,
            max_length: None,
            enum_values: None,
        }
    }

    fn native(name: &str) -> Self {
        Self::plain(FieldType::Native(name.to_string()))
    }
}

/// Maps a built-in type by its rendered name, e.g. `character varying(40)`.
pub fn map_builtin(name: &str) -> Option<MappedType> {
    let (base, modifier) = split_modifier(name);

    let (_, target) = BUILTIN_TYPES
        .iter()
        .find(|(matcher, _)| matcher.matches(&base))?;

    Some(match target {
        Target::Type(ty) => MappedType::plain(ty.clone()),
        Target::CharacterData => MappedType {
            ty: FieldType::String,
            max_length: modifier.and_then(|m| m.trim().parse().ok()),
            enum_values: None,
        },
    })
}

impl Matcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::Name(names) => names.contains(&name),
            Matcher::Prefix(prefix) => name
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(' ')),
        }
    }
}

/// Removes the `pg_catalog.` qualification and the parenthesized modifier from
/// a rendered type name: `timestamp(3) with time zone` becomes
/// `timestamp with time zone` with modifier `3`.
fn split_modifier(name: &str) -> (String, Option<&str>) {
    let name = name.strip_prefix("pg_catalog.").unwrap_or(name);

    let Some(open) = name.find('(') else {
        return (name.to_string(), None);
    };
    let Some(close) = name[open..].find(')').map(|i| open + i) else {
        return (name.to_string(), None);
    };

    let base = format!("{} {}", name[..open].trim_end(), name[close + 1..].trim_start());
    (base.trim_end().to_string(), Some(&name[open + 1..close]))
}
