//! The data-access gateway: the only component that talks to the database.
//!
//! Callers describe what to run with a [`Statement`] (SQL text with `$n`
//! placeholders plus bound [`Value`]s) and pick one of the gateway primitives
//! depending on what they need back:
//!
//! | Primitive | Returns | Used for |
//! |---|---|---|
//! | [`Gateway::execute`] | rows affected | INSERT / UPDATE / DELETE |
//! | [`Gateway::count`] | row count | existence and authorization checks |
//! | [`Gateway::fetch_rows`] | [`ResultSet`] | values the caller needs (a price) |
//! | [`Gateway::execute_and_print`] | row count | tables shown to the user |
//! | [`Gateway::current_sequence_value`] | `currval` or `-1` | identifiers generated by an insert |
//!
//! All primitives run on one connection in call order, so a statement sees
//! the effects of every statement issued before it.

use std::fmt;
use std::io::Write;

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::errors::{DbError, Result};
use crate::db::table;

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    BigInt(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

/// SQL text plus its positional parameters.
///
/// ```ignore
/// let stmt = Statement::new("SELECT * FROM Users WHERE userID = $1 AND password = $2")
///     .bind(user_id)
///     .bind(password);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind the next positional parameter (`$1`, `$2`, ... in order of calls).
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

impl fmt::Display for Statement {
    /// Collapses whitespace so multi-line SQL logs on one line. Bound
    /// parameters are never shown since they include passwords.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for word in self.sql.split_whitespace() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(word)?;
            first = false;
        }
        Ok(())
    }
}

/// Materialized query result: column names plus rows of text fields, both in
/// the order the query produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First field of the first row, if any.
    pub fn first_value(&self) -> Option<&str> {
        self.rows.first().and_then(|row| row.first()).map(String::as_str)
    }
}

/// Data-access primitives over a single database session.
#[async_trait::async_trait]
pub trait Gateway: Send {
    /// Run a statement that returns no rows and report how many rows it touched.
    ///
    /// Backend rejections (constraint violations, malformed SQL) are returned
    /// as-is; nothing is retried.
    async fn execute(&mut self, statement: &Statement) -> Result<u64>;

    /// Run a query and return only how many rows it produced.
    async fn count(&mut self, query: &Statement) -> Result<usize>;

    /// Run a query and return every row.
    async fn fetch_rows(&mut self, query: &Statement) -> Result<ResultSet>;

    /// Most recent value generated by `sequence` in this session, or `-1` when
    /// the lookup returns no row.
    async fn current_sequence_value(&mut self, sequence: &str) -> Result<i64>;

    /// Open an explicit transaction on the session.
    async fn begin(&mut self) -> Result<()>;

    /// Commit the transaction opened by [`Gateway::begin`].
    async fn commit(&mut self) -> Result<()>;

    /// Roll back the transaction opened by [`Gateway::begin`].
    async fn rollback(&mut self) -> Result<()>;

    /// Release the underlying connection. Later calls fail.
    async fn close(&mut self) -> Result<()>;

    /// Run a query and print it as a fixed-width table, returning the row count.
    async fn execute_and_print(&mut self, query: &Statement, out: &mut (dyn Write + Send)) -> Result<usize> {
        let result = self.fetch_rows(query).await?;
        table::render(&result, out)
            .context("write result table")
            .map_err(DbError::Other)?;
        Ok(result.len())
    }
}
