//! Read-only access to the PostgreSQL catalog.

pub mod queries;

mod rows;
pub use rows::{
    BaseType, ColumnRow, CommentRow, ConstraintKind, ConstraintRow, DatabaseInfo, Identity,
    IndexKey, IndexRow, NativeType, ReferencedKey, TableRow, TypeKind,
};

use jts_core::{
    driver::{Connection, Query, Row, Value},
    Error, ObjectPath, Result,
};

/// Runs the catalog queries over a connection and decodes their rows.
///
/// Every listing is ordered by the query itself, so repeated runs over an
/// unchanged catalog return identical sequences.
pub struct CatalogReader<'a, C: ?Sized> {
    connection: &'a mut C,
}

impl<'a, C: Connection + ?Sized> CatalogReader<'a, C> {
    pub fn new(connection: &'a mut C) -> Self {
        Self { connection }
    }

    pub fn source(&self) -> &str {
        self.connection.source()
    }

    pub fn is_closed(&self) -> bool {
        self.connection.is_closed()
    }

    pub fn database_info(&mut self) -> Result<DatabaseInfo> {
        let row = self.fetch_one(&queries::DATABASE_INFO, &[])?;
        let name = decode(&queries::DATABASE_INFO, row.get_str("database_name"))?;
        let version = decode(&queries::DATABASE_INFO, row.get_str("server_version"))?;

        let description = self
            .list_comments(&ObjectPath::database())?
            .into_iter()
            .next()
            .map(|c| c.comment);

        Ok(DatabaseInfo {
            name: name.to_string(),
            description,
            version: version.to_string(),
        })
    }

    /// Current server time as engine-native text.
    pub fn now(&mut self) -> Result<String> {
        let row = self.fetch_one(&queries::NOW, &[])?;
        decode(&queries::NOW, row.get_str("now")).map(str::to_string)
    }

    /// User schemas, ordered by name.
    pub fn list_schemas(&mut self) -> Result<Vec<String>> {
        self.fetch(&queries::LIST_SCHEMAS, &[], |row| {
            row.get_str("schema_name").map(str::to_string)
        })
    }

    pub fn list_tables(&mut self, schema: &str) -> Result<Vec<TableRow>> {
        self.fetch(&queries::LIST_TABLES, &[schema.into()], TableRow::from_row)
    }

    /// Columns in ordinal order.
    pub fn list_columns(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnRow>> {
        self.fetch(
            &queries::LIST_COLUMNS,
            &[schema.into(), table.into()],
            ColumnRow::from_row,
        )
    }

    pub fn list_indexes(&mut self, schema: &str, table: &str) -> Result<Vec<IndexRow>> {
        self.fetch(
            &queries::LIST_INDEXES,
            &[schema.into(), table.into()],
            IndexRow::from_row,
        )
    }

    /// Primary key, unique and foreign key constraints.
    pub fn list_constraints(&mut self, schema: &str, table: &str) -> Result<Vec<ConstraintRow>> {
        self.fetch(
            &queries::LIST_CONSTRAINTS,
            &[schema.into(), table.into()],
            ConstraintRow::from_row,
        )
    }

    /// Comments attached to the object at `path`.
    ///
    /// A table path returns the table comment first (with no column), then
    /// column comments in ordinal order. Objects without a comment are skipped.
    pub fn list_comments(&mut self, path: &ObjectPath) -> Result<Vec<CommentRow>> {
        let rows = match (path.schema.as_deref(), path.table.as_deref()) {
            (None, _) => self.fetch(&queries::DATABASE_COMMENT, &[], CommentRow::from_row)?,
            (Some(schema), None) => {
                self.fetch(&queries::SCHEMA_COMMENT, &[schema.into()], CommentRow::from_row)?
            }
            (Some(schema), Some(table)) => self.fetch(
                &queries::TABLE_COMMENTS,
                &[schema.into(), table.into()],
                CommentRow::from_row,
            )?,
        };

        let mut comments: Vec<_> = rows.into_iter().flatten().collect();

        if let Some(column) = &path.column {
            comments.retain(|c| c.column.as_ref() == Some(column));
        }

        Ok(comments)
    }

    /// Returns `None` when no type has the given oid.
    pub fn lookup_type(&mut self, oid: i64) -> Result<Option<NativeType>> {
        let mut types = self.fetch(&queries::LOOKUP_TYPE, &[oid.into()], NativeType::from_row)?;
        Ok(types.pop())
    }

    /// Labels of an enum type in sort order.
    pub fn enum_labels(&mut self, oid: i64) -> Result<Vec<String>> {
        self.fetch(&queries::ENUM_LABELS, &[oid.into()], |row| {
            row.get_str("label").map(str::to_string)
        })
    }

    fn fetch<T>(
        &mut self,
        query: &Query,
        params: &[Value],
        decode_row: impl Fn(&Row) -> Result<T>,
    ) -> Result<Vec<T>> {
        tracing::trace!(query = query.name, ?params, "catalog query");

        let rows = self.connection.query(query, params)?;
        rows.iter()
            .map(|row| decode(query, decode_row(row)))
            .collect()
    }

    fn fetch_one(&mut self, query: &Query, params: &[Value]) -> Result<Row> {
        tracing::trace!(query = query.name, ?params, "catalog query");

        self.connection
            .query(query, params)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::catalog_query(query.name, "no rows returned"))
    }
}

fn decode<T>(query: &Query, result: Result<T>) -> Result<T> {
    result.map_err(|err| err.context(Error::catalog_query(query.name, "unexpected row shape")))
}
