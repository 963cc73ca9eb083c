//! Typed views of catalog rows.

use jts_core::{driver::Row, err, schema::ResourceKind, Result};

/// A native type as described by `pg_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    pub oid: i64,

    /// Rendered by `format_type`, including modifiers such as `(40)`
    pub name: String,

    pub kind: TypeKind,

    /// Base type of a domain, rendered with the domain's modifiers
    pub base: Option<BaseType>,

    /// Element type of an array
    pub element: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseType {
    pub oid: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Base,
    Array,
    Domain,
    Enum,
    Composite,
    Range,
    Pseudo,
    Other(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub kind: ResourceKind,

    /// The table is a partition of a partitioned table
    pub is_partition: bool,

    /// The table inherits from another table
    pub has_parent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub name: String,
    pub position: i64,
    pub ty: NativeType,
    pub not_null: bool,
    pub default: Option<String>,
    pub identity: Option<Identity>,
    pub generated: bool,
    pub collation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Always,
    ByDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub name: String,
    pub keys: Vec<IndexKey>,
    pub unique: bool,
    pub primary: bool,
    pub access_method: String,
    pub creation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKey {
    Column(String),
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRow {
    pub name: String,
    pub kind: ConstraintKind,

    /// `false` for constraints created `NOT VALID` and not validated since
    pub validated: bool,

    pub columns: Vec<String>,

    /// Target of a foreign key constraint
    pub referenced: Option<ReferencedKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencedKey {
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
}

/// A comment on a table (`column` is `None`) or one of its columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub column: Option<String>,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

impl TypeKind {
    /// Classifies a `pg_type` entry from its `typtype` and `typcategory` codes.
    pub fn from_codes(typtype: char, category: char) -> Self {
        match (typtype, category) {
            ('b', 'A') => Self::Array,
            ('b', _) => Self::Base,
            ('d', _) => Self::Domain,
            ('e', _) => Self::Enum,
            ('c', _) => Self::Composite,
            ('r' | 'm', _) => Self::Range,
            ('p', _) => Self::Pseudo,
            (other, _) => Self::Other(other),
        }
    }
}

impl NativeType {
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        let kind = TypeKind::from_codes(
            single_char(row, "type_kind")?,
            single_char(row, "type_category")?,
        );

        let base = match (row.get_opt_i64("base_type_oid")?, row.get_opt_str("base_type_name")?) {
            (Some(oid), Some(name)) => Some(BaseType {
                oid,
                name: name.to_string(),
            }),
            _ => None,
        };

        Ok(Self {
            oid: row.get_i64("type_oid")?,
            name: row.get_str("type_name")?.to_string(),
            kind,
            base,
            element: row.get_opt_i64("element_type_oid")?,
        })
    }
}

impl TableRow {
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.get_str("table_name")?.to_string(),
            kind: ResourceKind::from_relkind(single_char(row, "relkind")?),
            is_partition: row.get_bool("is_partition")?,
            has_parent: row.get_bool("has_parent")?,
        })
    }
}

impl ColumnRow {
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        let identity = match row.get_opt_str("identity")?.unwrap_or("") {
            "" => None,
            "a" => Some(Identity::Always),
            "d" => Some(Identity::ByDefault),
            other => return Err(err!("column `identity`: unknown code `{other}`")),
        };

        Ok(Self {
            name: row.get_str("column_name")?.to_string(),
            position: row.get_i64("ordinal_position")?,
            ty: NativeType::from_row(row)?,
            not_null: row.get_bool("not_null")?,
            default: row.get_opt_str("column_default")?.map(str::to_string),
            identity,
            generated: !row.get_opt_str("generated")?.unwrap_or("").is_empty(),
            collation: row.get_opt_str("collation_name")?.map(str::to_string),
        })
    }
}

impl IndexRow {
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        let columns = row.get_opt_str_list("key_columns")?;
        let definitions = row.get_str_list("key_definitions")?;

        if columns.len() != definitions.len() {
            return Err(err!(
                "index keys: {} columns but {} definitions",
                columns.len(),
                definitions.len()
            ));
        }

        let keys = columns
            .into_iter()
            .zip(definitions)
            .map(|(column, definition)| match column {
                Some(column) => IndexKey::Column(column),
                None => IndexKey::Expression(definition),
            })
            .collect();

        Ok(Self {
            name: row.get_str("index_name")?.to_string(),
            keys,
            unique: row.get_bool("is_unique")?,
            primary: row.get_bool("is_primary")?,
            access_method: row.get_str("access_method")?.to_string(),
            creation: row.get_str("creation")?.to_string(),
        })
    }
}

impl ConstraintRow {
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        let kind = match single_char(row, "constraint_type")? {
            'p' => ConstraintKind::PrimaryKey,
            'u' => ConstraintKind::Unique,
            'f' => ConstraintKind::ForeignKey,
            other => return Err(err!("column `constraint_type`: unknown code `{other}`")),
        };

        let referenced = match (
            row.get_opt_str("referenced_schema")?,
            row.get_opt_str("referenced_table")?,
        ) {
            (Some(schema), Some(table)) if kind == ConstraintKind::ForeignKey => {
                Some(ReferencedKey {
                    schema: schema.to_string(),
                    table: table.to_string(),
                    columns: row.get_str_list("referenced_columns")?,
                })
            }
            _ => None,
        };

        Ok(Self {
            name: row.get_str("constraint_name")?.to_string(),
            kind,
            validated: row.get_bool("validated")?,
            columns: row.get_str_list("columns")?,
            referenced,
        })
    }
}

impl CommentRow {
    /// Returns `None` for objects without a comment.
    pub(crate) fn from_row(row: &Row) -> Result<Option<Self>> {
        let Some(comment) = row.get_opt_str("comment")? else {
            return Ok(None);
        };

        Ok(Some(Self {
            column: row.get_opt_str("column_name")?.map(str::to_string),
            comment: comment.to_string(),
        }))
    }
}

/// Reads a `"char"` catalog code rendered as text.
fn single_char(row: &Row, column: &str) -> Result<char> {
    let text = row.get_str(column)?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => Ok(code),
        _ => Err(err!("column `{column}`: expected a single character, found `{text}`")),
    }
}
