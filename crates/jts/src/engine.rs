//! Orchestration of a complete introspection run.

use crate::{
    catalog::{CatalogReader, ConstraintKind, ConstraintRow, TableRow},
    column::{apply_key_constraints, resolve_column},
    fk::{resolve_foreign_keys, Arena},
    index::describe_indexes,
    ty::TypeMapper,
    weak_ref::WeakReferenceParser,
    Config,
};

use jts_core::{
    driver::Connection,
    schema::{Database, Datapackage, Resource},
    Error, NotificationKind, Notifications, ObjectPath, Result,
};
use tracing::{debug, info};

/// The result of a successful run.
#[derive(Debug)]
pub struct Introspection {
    pub database: Database,
    pub notifications: Notifications,
}

/// Introspects the database behind `connection`.
///
/// Either the whole document is produced, possibly with notifications, or the
/// run fails and nothing is returned. The connection must already be open; a
/// closed connection fails before any query is issued.
pub fn introspect<C: Connection + ?Sized>(
    connection: &mut C,
    config: &Config,
) -> Result<Introspection> {
    SchemaAssembler::new(connection, config).run()
}

/// Drives the catalog reader and the resolvers over one connection.
pub struct SchemaAssembler<'a, C: ?Sized> {
    catalog: CatalogReader<'a, C>,
    config: &'a Config,
    types: TypeMapper,
    notifications: Notifications,
}

/// Foreign key constraints of one table, resolved once every table is known.
struct PendingForeignKeys {
    path: ObjectPath,
    constraints: Vec<ConstraintRow>,
}

impl<'a, C: Connection + ?Sized> SchemaAssembler<'a, C> {
    pub fn new(connection: &'a mut C, config: &'a Config) -> Self {
        Self {
            catalog: CatalogReader::new(connection),
            config,
            types: TypeMapper::new(config.recursion_limit),
            notifications: Notifications::new(),
        }
    }

    pub fn run(mut self) -> Result<Introspection> {
        if self.catalog.is_closed() {
            return Err(Error::connection("connection is closed"));
        }

        let generation_begin_time = self.catalog.now()?;
        let info = self.catalog.database_info()?;
        let source = self.catalog.source().to_string();

        info!(database = %info.name, version = %info.version, "introspecting");

        let mut datapackages = vec![];
        let mut pending = vec![];

        for schema in self.catalog.list_schemas()? {
            debug!(schema = %schema, "reading schema");

            let mut datapackage = Datapackage::new(&schema);

            for table in self.catalog.list_tables(&schema)? {
                if self.config.is_excluded(&table.name) {
                    debug!(schema = %schema, table = %table.name, "table excluded");
                    continue;
                }

                let (resource, foreign_keys) = self.resource(&schema, table)?;
                datapackage.resources.push(resource);
                pending.push(foreign_keys);
            }

            datapackages.push(datapackage);
        }

        let arena = Arena::build(&datapackages);

        for PendingForeignKeys { path, constraints } in pending {
            let foreign_keys =
                resolve_foreign_keys(&arena, &path, &constraints, &mut self.notifications);

            if let Some(resource) = resource_mut(&mut datapackages, &path) {
                resource.foreign_keys = foreign_keys;
            }
        }

        if self.config.parses_weak_references() {
            WeakReferenceParser::new(&self.config.relation_patterns, &arena)
                .apply(&mut datapackages, &mut self.notifications);
        }

        datapackages.sort_by(|a, b| a.name.cmp(&b.name));
        for datapackage in &mut datapackages {
            datapackage.resources.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let generation_end_time = self.catalog.now()?;

        info!(
            datapackages = datapackages.len(),
            resources = arena.iter().count(),
            notifications = self.notifications.len(),
            "introspection complete"
        );

        Ok(Introspection {
            database: Database {
                name: info.name,
                description: info.description,
                source,
                source_version: info.version,
                generation_begin_time,
                generation_end_time,
                datapackages,
            },
            notifications: self.notifications,
        })
    }

    fn resource(
        &mut self,
        schema: &str,
        table: TableRow,
    ) -> Result<(Resource, PendingForeignKeys)> {
        let path = ObjectPath::table(schema, &table.name);
        debug!(%path, kind = %table.kind, "reading table");

        self.check_supported(&path, &table);

        let comments = self.catalog.list_comments(&path)?;
        let mut resource = Resource::new(&table.name, table.kind);
        resource.description = comments
            .iter()
            .find(|c| c.column.is_none())
            .map(|c| c.comment.clone());

        for column in self.catalog.list_columns(schema, &table.name)? {
            let column_path = path.with_column(&column.name);
            let mapped = self.types.map_type(
                &mut self.catalog,
                &column.ty,
                &column_path,
                &mut self.notifications,
            )?;

            let comment = comments
                .iter()
                .find(|c| c.column.as_ref() == Some(&column.name))
                .map(|c| c.comment.as_str());

            resource.fields.push(resolve_column(
                &column,
                mapped,
                comment,
                &column_path,
                &mut self.notifications,
            ));
        }

        let mut constraints = self.catalog.list_constraints(schema, &table.name)?;
        apply_key_constraints(&mut resource, &constraints);
        constraints.retain(|c| c.kind == ConstraintKind::ForeignKey);

        let indexes = self.catalog.list_indexes(schema, &table.name)?;
        resource.indexes = describe_indexes(indexes, &path, &mut self.notifications);

        Ok((resource, PendingForeignKeys { path, constraints }))
    }

    fn check_supported(&mut self, path: &ObjectPath, table: &TableRow) {
        let message = if table.kind.is_unclassified() {
            format!("relation kind `{}` is not modeled", table.kind)
        } else if table.is_partition {
            "table is a partition; partitioning is not modeled".to_string()
        } else if table.has_parent {
            "table inherits from another table; inheritance is not modeled".to_string()
        } else {
            return;
        };

        self.notifications
            .info(NotificationKind::UnsupportedFeature, path.clone(), message);
    }
}

fn resource_mut<'d>(
    datapackages: &'d mut [Datapackage],
    path: &ObjectPath,
) -> Option<&'d mut Resource> {
    let schema = path.schema.as_deref()?;
    let table = path.table.as_deref()?;

    datapackages
        .iter_mut()
        .find(|dp| dp.name == schema)?
        .resources
        .iter_mut()
        .find(|r| r.name == table)
}
