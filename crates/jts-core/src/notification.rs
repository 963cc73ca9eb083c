//! Non-fatal diagnostics collected during a run.
//!
//! A notification records that part of the catalog could not be represented
//! faithfully. The affected object is still present in the document with a
//! best-effort fallback, except for unresolved foreign keys which are omitted.

mod path;
pub use path::ObjectPath;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// What kind of degradation a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// A native type has no target mapping and was passed through verbatim.
    UnmappableType,

    /// A foreign key target is not part of the enumerated resources.
    UnresolvedForeignKey,

    /// Domain or array resolution exceeded the recursion bound.
    RecursionLimit,

    /// A catalog feature (inheritance, partitioning, unknown relation kind) is not modeled.
    UnsupportedFeature,

    /// An index key is an expression rather than a column.
    ExpressionIndex,

    /// The engine supplies the column's value without a plain DEFAULT clause.
    ImplicitDefault,

    /// A comment-declared reference could not be parsed or resolved.
    WeakReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,

    #[serde(skip)]
    pub kind: NotificationKind,

    pub message: String,

    pub path: ObjectPath,
}

impl Notification {
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
        };
        write!(fmt, "{level} ({}) {}", self.path, self.message)
    }
}

/// Append-only notification sink owned by one introspection run.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Info => tracing::info!(path = %notification.path, "{}", notification.message),
            Severity::Warning => tracing::warn!(path = %notification.path, "{}", notification.message),
        }
        self.items.push(notification);
    }

    pub fn info(&mut self, kind: NotificationKind, path: ObjectPath, message: impl Into<String>) {
        self.push(Notification {
            severity: Severity::Info,
            kind,
            message: message.into(),
            path,
        });
    }

    pub fn warn(&mut self, kind: NotificationKind, path: ObjectPath, message: impl Into<String>) {
        self.push(Notification {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            path,
        });
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Notification> + '_ {
        self.items.iter()
    }

    /// Notifications of the given kind, in the order they were recorded.
    pub fn of_kind(&self, kind: NotificationKind) -> impl Iterator<Item = &Notification> + '_ {
        self.items.iter().filter(move |n| n.kind == kind)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Notification> + '_ {
        self.items.iter().filter(|n| n.is_warning())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Notifications {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
