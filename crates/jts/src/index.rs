use crate::catalog::{IndexKey, IndexRow};

use jts_core::{schema::Index, NotificationKind, Notifications, ObjectPath};

/// Builds index descriptors for the table at `path`, in catalog order.
pub fn describe_indexes(
    rows: Vec<IndexRow>,
    path: &ObjectPath,
    notifications: &mut Notifications,
) -> Vec<Index> {
    rows.into_iter()
        .map(|row| {
            let fields: Vec<String> = row
                .keys
                .into_iter()
                .map(|key| match key {
                    IndexKey::Column(name) => name,
                    IndexKey::Expression(expr) => {
                        notifications.info(
                            NotificationKind::ExpressionIndex,
                            path.clone(),
                            format!("index `{}` has expression key `{expr}`", row.name),
                        );
                        expr
                    }
                })
                .collect();

            Index {
                definition: format!("{} ({})", row.access_method, fields.join(", ")),
                name: row.name,
                fields,
                unique: row.unique,
                primary: row.primary,
                creation: row.creation,
            }
        })
        .collect()
}
