use crate::logging_connection::QueryOp;
use std::sync::{Arc, Mutex};

/// A wrapper around the query log that provides a clean API for tests
pub struct ExecLog {
    ops: Arc<Mutex<Vec<QueryOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<QueryOp>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged queries
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Names of the logged queries, in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .map(|op| op.query.name)
            .collect()
    }

    /// Count queries with the given name
    pub fn count(&self, name: &str) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.query.name == name)
            .count()
    }

    /// Check if any query matches the given predicate
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&QueryOp) -> bool,
    {
        self.ops.lock().unwrap().iter().any(predicate)
    }

    /// Check if every logged query is a plain read
    pub fn all_read_only(&self) -> bool {
        self.ops.lock().unwrap().iter().all(|op| {
            let sql = op.query.sql.trim_start().to_ascii_uppercase();
            sql.starts_with("SELECT")
        })
    }
}
