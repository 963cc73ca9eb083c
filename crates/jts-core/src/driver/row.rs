use super::Value;
use crate::{err, Result};

use std::sync::Arc;

/// One row returned by a metadata query.
///
/// Values are addressed by column name; drivers share the column list across
/// all rows of a result.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        assert_eq!(
            columns.len(),
            values.len(),
            "row width does not match column count"
        );
        Self { columns, values }
    }

    /// Builds a row from `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self {
            columns: columns.into(),
            values,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, column: &str) -> Result<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
            .ok_or_else(|| err!("missing column `{column}`"))
    }

    pub fn get_str(&self, column: &str) -> Result<&str> {
        match self.get(column)? {
            Value::String(s) => Ok(s),
            other => Err(unexpected(column, "text", other)),
        }
    }

    pub fn get_opt_str(&self, column: &str) -> Result<Option<&str>> {
        match self.get(column)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(unexpected(column, "text", other)),
        }
    }

    pub fn get_bool(&self, column: &str) -> Result<bool> {
        match self.get(column)? {
            Value::Bool(b) => Ok(*b),
            other => Err(unexpected(column, "bool", other)),
        }
    }

    pub fn get_i64(&self, column: &str) -> Result<i64> {
        match self.get(column)? {
            Value::I64(v) => Ok(*v),
            other => Err(unexpected(column, "integer", other)),
        }
    }

    pub fn get_opt_i64(&self, column: &str) -> Result<Option<i64>> {
        match self.get(column)? {
            Value::Null => Ok(None),
            Value::I64(v) => Ok(Some(*v)),
            other => Err(unexpected(column, "integer", other)),
        }
    }

    /// Reads a text array. A SQL `NULL` array reads as empty.
    pub fn get_str_list(&self, column: &str) -> Result<Vec<String>> {
        match self.get(column)? {
            Value::Null => Ok(vec![]),
            Value::List(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(unexpected(column, "text element", other)),
                })
                .collect(),
            other => Err(unexpected(column, "list", other)),
        }
    }

    /// Reads a text array whose elements may be NULL.
    pub fn get_opt_str_list(&self, column: &str) -> Result<Vec<Option<String>>> {
        match self.get(column)? {
            Value::Null => Ok(vec![]),
            Value::List(items) => items
                .iter()
                .map(|item| match item {
                    Value::Null => Ok(None),
                    Value::String(s) => Ok(Some(s.clone())),
                    other => Err(unexpected(column, "text element", other)),
                })
                .collect(),
            other => Err(unexpected(column, "list", other)),
        }
    }
}

fn unexpected(column: &str, expected: &str, actual: &Value) -> crate::Error {
    err!(
        "column `{column}`: expected {expected}, found {}",
        actual.type_name()
    )
}
