//! Foreign key resolution across datapackages.

use crate::catalog::{ConstraintKind, ConstraintRow};

use indexmap::IndexMap;
use jts_core::{
    schema::{Datapackage, ForeignKey, Reference},
    NotificationKind, Notifications, ObjectPath,
};

/// Every enumerated resource with its field names, keyed by
/// `(datapackage, resource)`.
///
/// Built once all datapackages are enumerated, so a reference can be checked
/// against resources that were listed after the referencing one.
#[derive(Debug, Default)]
pub struct Arena {
    resources: IndexMap<(String, String), Vec<String>>,
}

impl Arena {
    pub fn build(datapackages: &[Datapackage]) -> Self {
        let resources = datapackages
            .iter()
            .flat_map(|dp| {
                dp.resources.iter().map(|resource| {
                    (
                        (dp.name.clone(), resource.name.clone()),
                        resource.fields.iter().map(|f| f.name.clone()).collect(),
                    )
                })
            })
            .collect();

        Self { resources }
    }

    pub fn fields(&self, datapackage: &str, resource: &str) -> Option<&[String]> {
        self.resources
            .get(&(datapackage.to_string(), resource.to_string()))
            .map(Vec::as_slice)
    }

    pub fn contains(&self, datapackage: &str, resource: &str) -> bool {
        self.fields(datapackage, resource).is_some()
    }

    pub fn has_field(&self, datapackage: &str, resource: &str, field: &str) -> bool {
        self.fields(datapackage, resource)
            .is_some_and(|fields| fields.iter().any(|f| f == field))
    }

    /// Resources with their fields, in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[String])> + '_ {
        self.resources
            .iter()
            .map(|((dp, res), fields)| (dp.as_str(), res.as_str(), fields.as_slice()))
    }
}

/// Resolves the foreign key constraints of the table at `path`.
///
/// A key whose target resource or target fields are missing from the arena
/// is omitted and reported with a warning on its first constrained column.
pub fn resolve_foreign_keys(
    arena: &Arena,
    path: &ObjectPath,
    constraints: &[ConstraintRow],
    notifications: &mut Notifications,
) -> Vec<ForeignKey> {
    let mut foreign_keys = vec![];

    for constraint in constraints {
        if constraint.kind != ConstraintKind::ForeignKey {
            continue;
        }

        let column_path = match constraint.columns.first() {
            Some(column) => path.with_column(column),
            None => path.clone(),
        };

        let Some(target) = &constraint.referenced else {
            notifications.warn(
                NotificationKind::UnresolvedForeignKey,
                column_path,
                format!("foreign key `{}` has no referenced table", constraint.name),
            );
            continue;
        };

        if !arena.contains(&target.schema, &target.table) {
            notifications.warn(
                NotificationKind::UnresolvedForeignKey,
                column_path,
                format!(
                    "foreign key `{}` references `{}.{}`, which is not part of the document",
                    constraint.name, target.schema, target.table
                ),
            );
            continue;
        }

        if let Some(missing) = target
            .columns
            .iter()
            .find(|column| !arena.has_field(&target.schema, &target.table, column))
        {
            notifications.warn(
                NotificationKind::UnresolvedForeignKey,
                column_path,
                format!(
                    "foreign key `{}` references missing field `{}.{}.{missing}`",
                    constraint.name, target.schema, target.table
                ),
            );
            continue;
        }

        if target.columns.len() != constraint.columns.len() {
            notifications.warn(
                NotificationKind::UnresolvedForeignKey,
                column_path,
                format!(
                    "foreign key `{}` has {} local and {} referenced fields",
                    constraint.name,
                    constraint.columns.len(),
                    target.columns.len()
                ),
            );
            continue;
        }

        let mut reference = Reference::new(&target.schema, &target.table, target.columns.clone());
        reference.name = Some(constraint.name.clone());

        foreign_keys.push(ForeignKey {
            fields: constraint.columns.clone(),
            enforced: constraint.validated,
            reference,
        });
    }

    foreign_keys
}
