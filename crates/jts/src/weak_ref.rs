//! References declared in table and column comments.
//!
//! A comment is split into components at `"; "` and newlines. A component
//! that matches one of the configured relation patterns is searched for a
//! target in one of these forms:
//!
//! ```text
//! schema.table.column
//! schema.table(column1, column2)
//! table.column                      (schema `public`)
//! table(column1, column2)           (schema `public`)
//! ```
//!
//! optionally with a cardinality pair such as `0..N -- 1` and a
//! `label="..."`. A table comment also names the local columns as a
//! parenthesized list. Components that yield a reference are removed from the
//! description.

use crate::fk::Arena;

use jts_core::{
    schema::{Datapackage, ForeignKey, Reference, Resource},
    NotificationKind, Notifications, ObjectPath,
};
use regex::Regex;
use std::sync::LazyLock;

const DEFAULT_SCHEMA: &str = "public";

static COMPONENT_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"; |\n").unwrap());

static DOTTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?P<target>([\w$]+)\.([\w$]+)(?:\.([\w$]+))?)(?:[\s,.;)]|$)").unwrap()
});

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)(?P<target>([\w$]+)(?:\.([\w$]+))?\s?\()").unwrap());

static CARDINALITIES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|\s)(?P<pair>(0\.\.1|0\.\.N|1\.\.N|1) ?--? ?(0\.\.1|0\.\.N|1\.\.N|1))(?:[\s,]|$)",
    )
    .unwrap()
});

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|\s)(?P<label>label\s*=\s*"([^"]*)")"#).unwrap());

static LOCAL_FIELDS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*([^)]*)\)").unwrap());

/// Parses comments of one run against the enumerated resources.
pub struct WeakReferenceParser<'a> {
    patterns: &'a [Regex],
    arena: &'a Arena,
}

/// References found in one comment and the components left for the description.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedComment {
    pub references: Vec<ForeignKey>,
    pub remaining: Option<String>,
}

struct Target {
    schema: String,
    table: String,
    fields: Vec<String>,
    matched: String,
}

enum Lookup {
    Found(Target),
    /// Candidate text was recognized but could not be used; already reported
    Rejected,
    NotFound,
}

impl<'a> WeakReferenceParser<'a> {
    pub fn new(patterns: &'a [Regex], arena: &'a Arena) -> Self {
        Self { patterns, arena }
    }

    /// Parses every field and resource description in place and merges the
    /// references into each resource's foreign keys.
    pub fn apply(&self, datapackages: &mut [Datapackage], notifications: &mut Notifications) {
        for datapackage in datapackages {
            for resource in &mut datapackage.resources {
                let path = ObjectPath::table(&datapackage.name, &resource.name);
                self.apply_to_resource(resource, &path, notifications);
            }
        }
    }

    fn apply_to_resource(
        &self,
        resource: &mut Resource,
        path: &ObjectPath,
        notifications: &mut Notifications,
    ) {
        let mut references = vec![];

        for field in &mut resource.fields {
            let Some(description) = &field.description else {
                continue;
            };
            let parsed = self.parse_comment(
                &path.with_column(&field.name),
                description,
                notifications,
            );
            field.description = parsed.remaining;
            references.extend(parsed.references);
        }

        if let Some(description) = &resource.description {
            let parsed = self.parse_comment(path, description, notifications);
            resource.description = parsed.remaining;
            references.extend(parsed.references);
        }

        merge_foreign_keys(&mut resource.foreign_keys, references);
    }

    /// Parses the comment of the table or column at `path`.
    pub fn parse_comment(
        &self,
        path: &ObjectPath,
        comment: &str,
        notifications: &mut Notifications,
    ) -> ParsedComment {
        let mut parsed = ParsedComment::default();
        let mut remaining = vec![];

        for component in COMPONENT_SEPARATOR.split(comment) {
            let reference = if self.patterns.iter().any(|re| re.is_match(component)) {
                self.parse_component(path, component, notifications)
            } else {
                None
            };

            match reference {
                Some(reference) => parsed.references.push(reference),
                None => remaining.push(component),
            }
        }

        if !remaining.is_empty() {
            parsed.remaining = Some(remaining.join("; "));
        }

        parsed
    }

    fn parse_component(
        &self,
        path: &ObjectPath,
        component: &str,
        notifications: &mut Notifications,
    ) -> Option<ForeignKey> {
        let target = match self.find_target(path, component, notifications) {
            Lookup::Found(target) => target,
            Lookup::Rejected => return None,
            Lookup::NotFound => {
                notifications.warn(
                    NotificationKind::WeakReference,
                    path.clone(),
                    format!("no valid reference target found in `{component}`"),
                );
                return None;
            }
        };

        let cardinalities = CARDINALITIES.captures(component);
        let label = LABEL.captures(component);

        let fields = match &path.column {
            Some(column) => vec![column.clone()],
            None => {
                let mut rest = component.replacen(&target.matched, " ", 1);
                if let Some(pair) = cardinalities.as_ref().and_then(|c| c.name("pair")) {
                    rest = rest.replacen(pair.as_str(), " ", 1);
                }
                if let Some(label) = label.as_ref().and_then(|c| c.name("label")) {
                    rest = rest.replacen(label.as_str(), " ", 1);
                }
                self.local_fields(path, component, &rest, notifications)?
            }
        };

        if fields.len() != target.fields.len() {
            notifications.warn(
                NotificationKind::WeakReference,
                path.clone(),
                format!(
                    "{} local and {} referenced fields in `{component}`",
                    fields.len(),
                    target.fields.len()
                ),
            );
            return None;
        }

        let mut reference = Reference::new(target.schema, target.table, target.fields);
        if let Some(c) = &cardinalities {
            reference.cardinality_self = c.get(2).and_then(|m| m.as_str().parse().ok());
            reference.cardinality_ref = c.get(3).and_then(|m| m.as_str().parse().ok());
        }
        reference.label = label
            .as_ref()
            .and_then(|c| c.get(2))
            .map(|m| m.as_str().to_string());

        Some(ForeignKey {
            fields,
            enforced: false,
            reference,
        })
    }

    fn find_target(
        &self,
        path: &ObjectPath,
        component: &str,
        notifications: &mut Notifications,
    ) -> Lookup {
        let current_schema = path.schema.as_deref().unwrap_or_default();
        let current_table = path.table.as_deref().unwrap_or_default();

        let mut candidates: Vec<(usize, bool, regex::Captures<'_>)> = DOTTED
            .captures_iter(component)
            .map(|c| (c.get(0).map_or(0, |m| m.start()), false, c))
            .chain(
                BRACKETED
                    .captures_iter(component)
                    .map(|c| (c.get(0).map_or(0, |m| m.start()), true, c)),
            )
            .collect();
        candidates.sort_by_key(|(start, _, _)| *start);

        for (_, bracketed, captures) in candidates {
            let Some(matched) = captures.name("target") else {
                continue;
            };

            let (schema, table, schema_less) = match (captures.get(2), captures.get(3)) {
                (Some(a), Some(b)) if bracketed => (a.as_str(), b.as_str(), false),
                (Some(a), None) if bracketed => (DEFAULT_SCHEMA, a.as_str(), true),
                (Some(a), Some(b)) => match captures.get(4) {
                    Some(c) => {
                        if !self.arena.has_field(a.as_str(), b.as_str(), c.as_str()) {
                            continue;
                        }
                        return Lookup::Found(Target {
                            schema: a.as_str().to_string(),
                            table: b.as_str().to_string(),
                            fields: vec![c.as_str().to_string()],
                            matched: matched.as_str().to_string(),
                        });
                    }
                    None => {
                        if !self.arena.has_field(DEFAULT_SCHEMA, a.as_str(), b.as_str()) {
                            continue;
                        }
                        (DEFAULT_SCHEMA, a.as_str(), true)
                    }
                },
                _ => continue,
            };

            if !self.arena.contains(schema, table) {
                continue;
            }

            if schema_less && schema == current_schema && table == current_table {
                notifications.info(
                    NotificationKind::WeakReference,
                    path.clone(),
                    format!("dropping reference to the same table in `{component}`"),
                );
                return Lookup::Rejected;
            }

            if !bracketed {
                // `table.column`
                let column = captures.get(3).map_or("", |m| m.as_str());
                return Lookup::Found(Target {
                    schema: schema.to_string(),
                    table: table.to_string(),
                    fields: vec![column.to_string()],
                    matched: matched.as_str().to_string(),
                });
            }

            let open = matched.end();
            let Some(close) = component[open..].find(')').map(|i| open + i) else {
                notifications.warn(
                    NotificationKind::WeakReference,
                    path.clone(),
                    format!("no closing bracket in `{component}`"),
                );
                return Lookup::Rejected;
            };

            let fields = split_fields(&component[open..close]);
            if fields.is_empty() {
                notifications.warn(
                    NotificationKind::WeakReference,
                    path.clone(),
                    format!("empty referenced field list in `{component}`"),
                );
                return Lookup::Rejected;
            }

            if let Some(missing) = fields
                .iter()
                .find(|field| !self.arena.has_field(schema, table, field))
            {
                notifications.warn(
                    NotificationKind::WeakReference,
                    path.clone(),
                    format!(
                        "referenced field `{schema}.{table}.{missing}` does not exist in `{component}`"
                    ),
                );
                return Lookup::Rejected;
            }

            return Lookup::Found(Target {
                schema: schema.to_string(),
                table: table.to_string(),
                fields,
                matched: component[matched.start()..=close].to_string(),
            });
        }

        Lookup::NotFound
    }

    /// Reads the local field list of a table comment reference.
    fn local_fields(
        &self,
        path: &ObjectPath,
        component: &str,
        rest: &str,
        notifications: &mut Notifications,
    ) -> Option<Vec<String>> {
        let schema = path.schema.as_deref().unwrap_or_default();
        let table = path.table.as_deref().unwrap_or_default();

        let Some(list) = LOCAL_FIELDS.captures(rest).and_then(|c| c.get(1)) else {
            notifications.warn(
                NotificationKind::WeakReference,
                path.clone(),
                format!("table comment reference names no local fields in `{component}`"),
            );
            return None;
        };

        let fields = split_fields(list.as_str());
        if fields.is_empty() || fields.iter().any(|f| !self.arena.has_field(schema, table, f)) {
            notifications.warn(
                NotificationKind::WeakReference,
                path.clone(),
                format!("invalid local field list `{}` in `{component}`", list.as_str()),
            );
            return None;
        }

        Some(fields)
    }
}

/// Adds comment-declared keys to a resource's keys. A key with the same local
/// fields and target as an existing one annotates it instead.
pub fn merge_foreign_keys(foreign_keys: &mut Vec<ForeignKey>, weak: Vec<ForeignKey>) {
    for fk in weak {
        let existing = foreign_keys
            .iter_mut()
            .find(|existing| {
                existing.fields == fk.fields && existing.reference.same_target(&fk.reference)
            });

        match existing {
            Some(existing) => {
                let reference = &mut existing.reference;
                reference.cardinality_self =
                    fk.reference.cardinality_self.or(reference.cardinality_self);
                reference.cardinality_ref =
                    fk.reference.cardinality_ref.or(reference.cardinality_ref);
                if fk.reference.label.is_some() {
                    reference.label = fk.reference.label;
                }
            }
            None => foreign_keys.push(fk),
        }
    }
}

fn split_fields(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
