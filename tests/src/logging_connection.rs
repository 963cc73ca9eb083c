use jts_core::{
    driver::{Connection, Query, Row, Value},
    Result,
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct QueryOp {
    pub query: Query,
    pub params: Vec<Value>,

    /// Number of rows returned, or `None` when the query failed
    pub rows: Option<usize>,
}

/// A connection wrapper that logs all queries for testing purposes
#[derive(Debug)]
pub struct LoggingConnection<C> {
    /// The underlying connection that actually executes queries
    inner: C,

    /// Log of all queries executed through this connection
    ops_log: Arc<Mutex<Vec<QueryOp>>>,
}

impl<C: Connection> LoggingConnection<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to inspect the query log
    pub fn exec_log(&self) -> crate::ExecLog {
        crate::ExecLog::new(self.ops_log.clone())
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

impl<C: Connection> Connection for LoggingConnection<C> {
    fn source(&self) -> &str {
        self.inner.source()
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    fn query(&mut self, query: &Query, params: &[Value]) -> Result<Vec<Row>> {
        let result = self.inner.query(query, params);

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(QueryOp {
                query: *query,
                params: params.to_vec(),
                rows: result.as_ref().ok().map(Vec::len),
            });

        result
    }
}
