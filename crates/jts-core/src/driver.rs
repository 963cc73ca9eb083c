//! The boundary between the engine and a database transport.
//!
//! A driver exposes a single synchronous capability: run a named, parameterized
//! metadata query and hand back its rows as [`Value`]s. Everything else the
//! engine needs (which queries to run, how to read their rows) lives on the
//! engine side of this boundary.

mod query;
pub use query::Query;

mod row;
pub use row::Row;

mod value;
pub use value::Value;

use crate::Result;

pub trait Connection {
    /// Human readable name of the database engine, e.g. `PostgreSQL`.
    fn source(&self) -> &str;

    /// Returns `true` when the transport can no longer execute queries.
    fn is_closed(&self) -> bool;

    /// Executes a read-only metadata query, blocking until all rows are available.
    ///
    /// Transport failures must be reported with [`Error::connection_failed`]
    /// and rejected queries with [`Error::catalog_query_failed`].
    ///
    /// [`Error::connection_failed`]: crate::Error::connection_failed
    /// [`Error::catalog_query_failed`]: crate::Error::catalog_query_failed
    fn query(&mut self, query: &Query, params: &[Value]) -> Result<Vec<Row>>;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn source(&self) -> &str {
        (**self).source()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn query(&mut self, query: &Query, params: &[Value]) -> Result<Vec<Row>> {
        (**self).query(query, params)
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn source(&self) -> &str {
        (**self).source()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn query(&mut self, query: &Query, params: &[Value]) -> Result<Vec<Row>> {
        (**self).query(query, params)
    }
}
