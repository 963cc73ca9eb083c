//! Per-field attributes and key constraints.

use crate::{
    catalog::{ColumnRow, ConstraintKind, ConstraintRow, Identity},
    ty::MappedType,
};

use jts_core::{
    schema::{Field, FieldConstraints, Resource, UniqueConstraint},
    NotificationKind, Notifications, ObjectPath,
};

/// Builds a field from its catalog row, mapped type and comment.
///
/// `required` follows the NOT NULL declaration, whether or not a default
/// exists. Identity and generated columns get their value from the engine
/// without a DEFAULT clause, so they carry no `default_value`.
pub fn resolve_column(
    column: &ColumnRow,
    mapped: MappedType,
    comment: Option<&str>,
    path: &ObjectPath,
    notifications: &mut Notifications,
) -> Field {
    let implicit = match (column.identity, column.generated) {
        (Some(Identity::Always), _) => Some("GENERATED ALWAYS AS IDENTITY"),
        (Some(Identity::ByDefault), _) => Some("GENERATED BY DEFAULT AS IDENTITY"),
        (None, true) => Some("a generation expression"),
        (None, false) => None,
    };

    if let Some(source) = implicit {
        notifications.info(
            NotificationKind::ImplicitDefault,
            path.clone(),
            format!("value supplied by {source}, no default reported"),
        );
    }

    Field {
        name: column.name.clone(),
        ty: mapped.ty,
        constraints: FieldConstraints {
            required: column.not_null,
            unique: false,
            max_length: mapped.max_length,
            enum_values: mapped.enum_values,
        },
        default_value: match implicit {
            Some(_) => None,
            None => column.default.clone(),
        },
        description: comment.map(str::to_string),
        collation: column.collation.clone(),
    }
}

/// Applies primary key and unique constraints to a resource whose fields are
/// already resolved. Foreign keys are resolved separately once every resource
/// is known.
pub fn apply_key_constraints(resource: &mut Resource, constraints: &[ConstraintRow]) {
    for constraint in constraints {
        match constraint.kind {
            ConstraintKind::PrimaryKey => {
                resource.primary_key = constraint.columns.clone();
            }
            ConstraintKind::Unique => {
                if let [column] = &constraint.columns[..] {
                    if let Some(field) = resource.fields.iter_mut().find(|f| &f.name == column) {
                        field.constraints.unique = true;
                    }
                }

                resource.unique.push(UniqueConstraint {
                    name: constraint.name.clone(),
                    fields: constraint.columns.clone(),
                });
            }
            ConstraintKind::ForeignKey => {}
        }
    }
}
