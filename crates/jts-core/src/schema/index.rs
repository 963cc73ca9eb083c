use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Index {
    pub name: String,

    /// Index keys in the index's own order. Expression keys hold the rendered
    /// expression.
    pub fields: Vec<String>,

    /// When `true`, indexed entries are unique
    pub unique: bool,

    /// When `true`, the index backs the table's primary key constraint
    pub primary: bool,

    /// Access method and key list, e.g. `btree (a, b)`
    pub definition: String,

    /// Full creation statement as reported by the engine
    pub creation: String,
}
