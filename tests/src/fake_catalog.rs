//! An in-memory catalog answering the engine's metadata queries.
//!
//! Answers are keyed by query name and ordered the way the SQL orders them,
//! so the engine sees exactly what a server with the same objects returns.

use indexmap::IndexMap;
use jts_core::{
    driver::{Connection, Query, Row, Value},
    Error, Result,
};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct FakeCatalog {
    database: String,
    version: String,
    description: Option<String>,
    closed: bool,
    reject: Option<&'static str>,
    clock: u32,
    next_oid: i64,
    types: IndexMap<i64, FakeType>,
    enums: HashMap<i64, Vec<String>>,
    schemas: IndexMap<String, FakeSchema>,
}

#[derive(Debug, Clone)]
struct FakeType {
    oid: i64,
    name: String,
    typtype: char,
    category: char,
    base: Option<(i64, String)>,
    element: Option<i64>,
}

#[derive(Debug, Clone, Default)]
struct FakeSchema {
    comment: Option<String>,
    tables: IndexMap<String, FakeTable>,
}

#[derive(Debug, Clone)]
pub struct FakeTable {
    schema: String,
    name: String,
    relkind: char,
    is_partition: bool,
    has_parent: bool,
    comment: Option<String>,
    columns: Vec<FakeColumn>,
    indexes: Vec<FakeIndex>,
    constraints: Vec<FakeConstraint>,
}

#[derive(Debug, Clone)]
struct FakeColumn {
    name: String,
    ty: String,
    not_null: bool,
    default: Option<String>,
    identity: &'static str,
    generated: bool,
    collation: Option<String>,
    comment: Option<String>,
}

#[derive(Debug, Clone)]
struct FakeIndex {
    name: String,
    keys: Vec<(Option<String>, String)>,
    unique: bool,
    primary: bool,
    method: String,
}

#[derive(Debug, Clone)]
struct FakeConstraint {
    name: String,
    contype: char,
    validated: bool,
    columns: Vec<String>,
    referenced: Option<(String, String, Vec<String>)>,
}

/// Built-in types: `(oid, name, typtype, category, element)`.
const BUILTIN_TYPES: &[(i64, &str, char, char, Option<i64>)] = &[
    (16, "boolean", 'b', 'B', None),
    (17, "bytea", 'b', 'U', None),
    (19, "name", 'b', 'S', Some(18)),
    (20, "bigint", 'b', 'N', None),
    (21, "smallint", 'b', 'N', None),
    (23, "integer", 'b', 'N', None),
    (25, "text", 'b', 'S', None),
    (114, "json", 'b', 'U', None),
    (142, "xml", 'b', 'U', None),
    (700, "real", 'b', 'N', None),
    (701, "double precision", 'b', 'N', None),
    (1007, "integer[]", 'b', 'A', Some(23)),
    (1009, "text[]", 'b', 'A', Some(25)),
    (1015, "character varying[]", 'b', 'A', Some(1043)),
    (1042, "character", 'b', 'S', None),
    (1043, "character varying", 'b', 'S', None),
    (1082, "date", 'b', 'D', None),
    (1083, "time without time zone", 'b', 'D', None),
    (1114, "timestamp without time zone", 'b', 'D', None),
    (1184, "timestamp with time zone", 'b', 'D', None),
    (1186, "interval", 'b', 'T', None),
    (1700, "numeric", 'b', 'N', None),
    (2950, "uuid", 'b', 'U', None),
    (3802, "jsonb", 'b', 'U', None),
];

impl FakeCatalog {
    pub fn new(database: &str) -> Self {
        let types = BUILTIN_TYPES
            .iter()
            .map(|&(oid, name, typtype, category, element)| {
                (
                    oid,
                    FakeType {
                        oid,
                        name: name.to_string(),
                        typtype,
                        category,
                        base: None,
                        element,
                    },
                )
            })
            .collect();

        Self {
            database: database.to_string(),
            version: "16.4".to_string(),
            description: None,
            closed: false,
            reject: None,
            clock: 0,
            next_oid: 100_000,
            types,
            enums: HashMap::new(),
            schemas: IndexMap::new(),
        }
    }

    pub fn describe(&mut self, description: &str) -> &mut Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn schema(&mut self, name: &str) -> &mut Self {
        self.schemas.entry(name.to_string()).or_default();
        self
    }

    pub fn schema_comment(&mut self, name: &str, comment: &str) -> &mut Self {
        self.schemas.entry(name.to_string()).or_default().comment = Some(comment.to_string());
        self
    }

    /// Adds an ordinary table, replacing any existing one with the same name.
    pub fn table(&mut self, schema: &str, name: &str) -> &mut FakeTable {
        self.relation(schema, name, 'r')
    }

    /// Returns a previously added table.
    pub fn table_mut(&mut self, schema: &str, name: &str) -> &mut FakeTable {
        self.schemas
            .get_mut(schema)
            .and_then(|s| s.tables.get_mut(name))
            .unwrap_or_else(|| panic!("no table `{schema}.{name}`"))
    }

    /// Adds a relation of the given `pg_class.relkind`.
    pub fn relation(&mut self, schema: &str, name: &str, relkind: char) -> &mut FakeTable {
        let tables = &mut self.schemas.entry(schema.to_string()).or_default().tables;
        tables.insert(
            name.to_string(),
            FakeTable {
                schema: schema.to_string(),
                name: name.to_string(),
                relkind,
                is_partition: false,
                has_parent: false,
                comment: None,
                columns: vec![],
                indexes: vec![],
                constraints: vec![],
            },
        );
        &mut tables[name]
    }

    pub fn create_enum(&mut self, name: &str, labels: &[&str]) -> i64 {
        let oid = self.add_type(name, 'e', 'E', None, None);
        self.enums
            .insert(oid, labels.iter().map(|l| l.to_string()).collect());
        oid
    }

    /// Adds a domain over `base`, rendered with modifiers, e.g. `character varying(20)`.
    pub fn create_domain(&mut self, name: &str, base: &str) -> i64 {
        let base_type = self.type_named(base);
        let base = (base_type.oid, base.to_string());
        let category = base_type.category;
        self.add_type(name, 'd', category, Some(base), None)
    }

    /// Adds a base type the engine has no mapping for, e.g. `geometry`.
    pub fn create_base_type(&mut self, name: &str) -> i64 {
        self.add_type(name, 'b', 'U', None, None)
    }

    /// Adds the array type `<element>[]`.
    pub fn create_array_type(&mut self, element: &str) -> i64 {
        let element = self.type_named(element).oid;
        let name = format!("{}[]", self.types[&element].name);
        self.add_type(&name, 'b', 'A', None, Some(element))
    }

    /// Makes every later query fail as if the transport were gone.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Makes the named query fail as if the server rejected it.
    pub fn reject(&mut self, query: &'static str) {
        self.reject = Some(query);
    }

    fn add_type(
        &mut self,
        name: &str,
        typtype: char,
        category: char,
        base: Option<(i64, String)>,
        element: Option<i64>,
    ) -> i64 {
        let oid = self.next_oid;
        self.next_oid += 1;
        self.types.insert(
            oid,
            FakeType {
                oid,
                name: name.to_string(),
                typtype,
                category,
                base,
                element,
            },
        );
        oid
    }

    /// Finds a type by its rendered name, ignoring a modifier such as `(40)`.
    fn type_named(&self, rendered: &str) -> &FakeType {
        let name = match (rendered.find('('), rendered.find(')')) {
            (Some(open), Some(close)) => {
                format!("{}{}", &rendered[..open], &rendered[close + 1..])
            }
            _ => rendered.to_string(),
        };

        self.types
            .values()
            .find(|ty| ty.name == name)
            .unwrap_or_else(|| panic!("unknown type `{rendered}`"))
    }

    fn tables(&self, schema: &str) -> Vec<&FakeTable> {
        let mut tables: Vec<_> = self
            .schemas
            .get(schema)
            .map(|s| s.tables.values().collect())
            .unwrap_or_default();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        tables
    }

    fn find_table(&self, params: &[Value]) -> Option<&FakeTable> {
        self.schemas
            .get(text(params, 0))
            .and_then(|s| s.tables.get(text(params, 1)))
    }

    fn answer(&mut self, query: &Query, params: &[Value]) -> Result<Vec<Row>> {
        let rows = match query.name {
            "now" => {
                self.clock += 1;
                vec![Row::from_pairs([(
                    "now",
                    Value::from(format!("2024-05-01 12:00:{:02}.000000+00", self.clock)),
                )])]
            }
            "database_info" => vec![Row::from_pairs([
                ("database_name", Value::from(self.database.as_str())),
                ("server_version", Value::from(self.version.as_str())),
            ])],
            "database_comment" => vec![comment_row(None, self.description.as_deref())],
            "schema_comment" => self
                .schemas
                .get(text(params, 0))
                .map(|s| vec![comment_row(None, s.comment.as_deref())])
                .unwrap_or_default(),
            "list_schemas" => {
                let mut names: Vec<_> = self.schemas.keys().collect();
                names.sort();
                names
                    .into_iter()
                    .map(|name| Row::from_pairs([("schema_name", Value::from(name.as_str()))]))
                    .collect()
            }
            "list_tables" => self
                .tables(text(params, 0))
                .into_iter()
                .map(|table| {
                    Row::from_pairs([
                        ("table_name", Value::from(table.name.as_str())),
                        ("relkind", Value::from(table.relkind.to_string())),
                        ("is_partition", Value::from(table.is_partition)),
                        ("has_parent", Value::from(table.has_parent)),
                    ])
                })
                .collect(),
            "table_comments" => match self.find_table(params) {
                Some(table) => {
                    let mut rows = vec![];
                    if table.comment.is_some() {
                        rows.push(comment_row(None, table.comment.as_deref()));
                    }
                    for column in &table.columns {
                        if column.comment.is_some() {
                            rows.push(comment_row(Some(&column.name), column.comment.as_deref()));
                        }
                    }
                    rows
                }
                None => vec![],
            },
            "list_columns" => match self.find_table(params) {
                Some(table) => table
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(i, column)| self.column_row(i, column))
                    .collect(),
                None => vec![],
            },
            "list_constraints" => match self.find_table(params) {
                Some(table) => {
                    let mut constraints: Vec<_> = table.constraints.iter().collect();
                    constraints.sort_by(|a, b| (a.contype, &a.name).cmp(&(b.contype, &b.name)));
                    constraints.into_iter().map(constraint_row).collect()
                }
                None => vec![],
            },
            "list_indexes" => match self.find_table(params) {
                Some(table) => {
                    let mut indexes: Vec<_> = table.indexes.iter().collect();
                    indexes.sort_by(|a, b| a.name.cmp(&b.name));
                    indexes
                        .into_iter()
                        .map(|index| index_row(table, index))
                        .collect()
                }
                None => vec![],
            },
            "lookup_type" => {
                let oid = int(params, 0);
                self.types
                    .get(&oid)
                    .map(|ty| vec![Row::from_pairs(type_columns(ty, &ty.name))])
                    .unwrap_or_default()
            }
            "enum_labels" => self
                .enums
                .get(&int(params, 0))
                .map(|labels| {
                    labels
                        .iter()
                        .map(|label| Row::from_pairs([("label", Value::from(label.as_str()))]))
                        .collect()
                })
                .unwrap_or_default(),
            other => return Err(Error::catalog_query(other, "unknown query")),
        };

        Ok(rows)
    }

    fn column_row(&self, position: usize, column: &FakeColumn) -> Row {
        let ty = self.type_named(&column.ty);
        let mut pairs = vec![
            ("column_name", Value::from(column.name.as_str())),
            ("ordinal_position", Value::I64(position as i64 + 1)),
        ];
        pairs.extend(type_columns(ty, &column.ty));
        pairs.extend([
            ("not_null", Value::from(column.not_null)),
            ("column_default", Value::from(column.default.clone())),
            ("identity", Value::from(column.identity)),
            ("generated", Value::from(if column.generated { "s" } else { "" })),
            ("collation_name", Value::from(column.collation.clone())),
        ]);
        Row::from_pairs(pairs)
    }
}

impl Connection for FakeCatalog {
    fn source(&self) -> &str {
        "PostgreSQL"
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn query(&mut self, query: &Query, params: &[Value]) -> Result<Vec<Row>> {
        if self.closed {
            return Err(Error::connection("connection is closed"));
        }

        if self.reject == Some(query.name) {
            return Err(Error::catalog_query(
                query.name,
                "permission denied for table pg_class",
            ));
        }

        self.answer(query, params)
    }
}

impl FakeTable {
    pub fn column(&mut self, name: &str, ty: &str) -> &mut Self {
        self.columns.push(FakeColumn {
            name: name.to_string(),
            ty: ty.to_string(),
            not_null: false,
            default: None,
            identity: "",
            generated: false,
            collation: None,
            comment: None,
        });
        self
    }

    /// Marks the last added column NOT NULL.
    pub fn not_null(&mut self) -> &mut Self {
        self.last_column().not_null = true;
        self
    }

    pub fn default(&mut self, expr: &str) -> &mut Self {
        self.last_column().default = Some(expr.to_string());
        self
    }

    /// Makes the last added column `GENERATED ALWAYS AS IDENTITY`.
    pub fn identity(&mut self) -> &mut Self {
        let column = self.last_column();
        column.identity = "a";
        column.not_null = true;
        self
    }

    /// Makes the last added column a stored generated column.
    pub fn generated(&mut self) -> &mut Self {
        self.last_column().generated = true;
        self
    }

    pub fn collation(&mut self, collation: &str) -> &mut Self {
        self.last_column().collation = Some(collation.to_string());
        self
    }

    /// Comments the last added column.
    pub fn comment(&mut self, comment: &str) -> &mut Self {
        self.last_column().comment = Some(comment.to_string());
        self
    }

    /// Comments a previously added column.
    pub fn column_comment(&mut self, column: &str, comment: &str) -> &mut Self {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == column)
            .unwrap_or_else(|| panic!("no column `{column}`"));
        column.comment = Some(comment.to_string());
        self
    }

    pub fn table_comment(&mut self, comment: &str) -> &mut Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn partition(&mut self) -> &mut Self {
        self.is_partition = true;
        self.has_parent = true;
        self
    }

    pub fn inherits(&mut self) -> &mut Self {
        self.has_parent = true;
        self
    }

    /// Adds a primary key constraint and its backing index.
    pub fn primary_key(&mut self, name: &str, columns: &[&str]) -> &mut Self {
        self.add_constraint(name, 'p', columns, None);
        self.add_index(name, columns, true, true)
    }

    /// Adds a unique constraint and its backing index.
    pub fn unique(&mut self, name: &str, columns: &[&str]) -> &mut Self {
        self.add_constraint(name, 'u', columns, None);
        self.add_index(name, columns, true, false)
    }

    pub fn foreign_key(
        &mut self,
        name: &str,
        columns: &[&str],
        referenced: (&str, &str),
        referenced_columns: &[&str],
    ) -> &mut Self {
        let referenced = (
            referenced.0.to_string(),
            referenced.1.to_string(),
            referenced_columns.iter().map(|c| c.to_string()).collect(),
        );
        self.add_constraint(name, 'f', columns, Some(referenced))
    }

    /// Marks the last added constraint `NOT VALID`.
    pub fn not_valid(&mut self) -> &mut Self {
        if let Some(constraint) = self.constraints.last_mut() {
            constraint.validated = false;
        }
        self
    }

    pub fn index(&mut self, name: &str, columns: &[&str], unique: bool) -> &mut Self {
        self.add_index(name, columns, unique, false)
    }

    /// Adds an index with the given access method whose keys are expressions.
    pub fn expression_index(&mut self, name: &str, method: &str, expressions: &[&str]) -> &mut Self {
        self.indexes.push(FakeIndex {
            name: name.to_string(),
            keys: expressions.iter().map(|e| (None, e.to_string())).collect(),
            unique: false,
            primary: false,
            method: method.to_string(),
        });
        self
    }

    fn add_index(&mut self, name: &str, columns: &[&str], unique: bool, primary: bool) -> &mut Self {
        self.indexes.push(FakeIndex {
            name: name.to_string(),
            keys: columns
                .iter()
                .map(|c| (Some(c.to_string()), c.to_string()))
                .collect(),
            unique,
            primary,
            method: "btree".to_string(),
        });
        self
    }

    fn add_constraint(
        &mut self,
        name: &str,
        contype: char,
        columns: &[&str],
        referenced: Option<(String, String, Vec<String>)>,
    ) -> &mut Self {
        self.constraints.push(FakeConstraint {
            name: name.to_string(),
            contype,
            validated: true,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            referenced,
        });
        self
    }

    fn last_column(&mut self) -> &mut FakeColumn {
        self.columns.last_mut().expect("no column added yet")
    }
}

fn type_columns(ty: &FakeType, rendered: &str) -> Vec<(&'static str, Value)> {
    vec![
        ("type_name", Value::from(rendered)),
        ("type_oid", Value::I64(ty.oid)),
        ("type_kind", Value::from(ty.typtype.to_string())),
        ("type_category", Value::from(ty.category.to_string())),
        ("base_type_oid", Value::from(ty.base.as_ref().map(|(oid, _)| *oid))),
        (
            "base_type_name",
            Value::from(ty.base.as_ref().map(|(_, name)| name.clone())),
        ),
        ("element_type_oid", Value::from(ty.element)),
    ]
}

fn comment_row(column: Option<&str>, comment: Option<&str>) -> Row {
    Row::from_pairs([
        ("column_name", Value::from(column)),
        ("comment", Value::from(comment)),
    ])
}

fn constraint_row(constraint: &FakeConstraint) -> Row {
    let (schema, table, columns) = match &constraint.referenced {
        Some((schema, table, columns)) => (
            Value::from(schema.as_str()),
            Value::from(table.as_str()),
            Value::from(columns.clone()),
        ),
        None => (Value::Null, Value::Null, Value::List(vec![])),
    };

    Row::from_pairs([
        ("constraint_name", Value::from(constraint.name.as_str())),
        ("constraint_type", Value::from(constraint.contype.to_string())),
        ("validated", Value::from(constraint.validated)),
        ("columns", Value::from(constraint.columns.clone())),
        ("referenced_schema", schema),
        ("referenced_table", table),
        ("referenced_columns", columns),
    ])
}

fn index_row(table: &FakeTable, index: &FakeIndex) -> Row {
    let definitions: Vec<&str> = index.keys.iter().map(|(_, d)| d.as_str()).collect();
    let creation = format!(
        "CREATE {}INDEX {} ON {}.{} USING {} ({})",
        if index.unique { "UNIQUE " } else { "" },
        index.name,
        table.schema,
        table.name,
        index.method,
        definitions.join(", ")
    );

    Row::from_pairs([
        ("index_name", Value::from(index.name.as_str())),
        (
            "key_columns",
            Value::List(
                index
                    .keys
                    .iter()
                    .map(|(column, _)| Value::from(column.clone()))
                    .collect(),
            ),
        ),
        ("key_definitions", Value::from(definitions)),
        ("is_unique", Value::from(index.unique)),
        ("is_primary", Value::from(index.primary)),
        ("access_method", Value::from(index.method.as_str())),
        ("creation", Value::from(creation)),
    ])
}

fn text(params: &[Value], i: usize) -> &str {
    match params.get(i) {
        Some(Value::String(s)) => s,
        other => panic!("parameter ${} is not text: {other:?}", i + 1),
    }
}

fn int(params: &[Value], i: usize) -> i64 {
    match params.get(i) {
        Some(Value::I64(v)) => *v,
        other => panic!("parameter ${} is not an integer: {other:?}", i + 1),
    }
}
