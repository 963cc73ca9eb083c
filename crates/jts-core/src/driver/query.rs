use std::fmt;

/// A named metadata query.
///
/// The name identifies the query in errors and logs, and lets test doubles
/// answer queries without parsing SQL. Parameters are positional (`$1`, `$2`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Query {
    pub name: &'static str,
    pub sql: &'static str,
}

impl Query {
    pub const fn new(name: &'static str, sql: &'static str) -> Self {
        Self { name, sql }
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Query({})", self.name)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.name)
    }
}
