//! PostgreSQL implementation of the [`Gateway`] over a single connection.
//!
//! The gateway owns exactly one `PgConnection`, never a pool: the
//! insert-then-`currval` pattern used for registrations and repair requests
//! requires both statements to run in the same backend session.
//!
//! Column values are decoded by their PostgreSQL type name and rendered as
//! text, so callers can print or inspect any result without declaring row
//! types up front.

use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgRow, PgTransactionManager};
use sqlx::query::Query;
use sqlx::{
    Column, ConnectOptions, Connection, PgConnection, Postgres, Row, TransactionManager, TypeInfo, ValueRef,
};
use tracing::{debug, info, instrument};

use crate::config::DatabaseConfig;
use crate::db::errors::{DbError, Result};
use crate::db::gateway::{Gateway, ResultSet, Statement, Value};

/// Gateway backed by one PostgreSQL session.
pub struct PgGateway {
    conn: Option<PgConnection>,
}

impl PgGateway {
    /// Open the session described by `config`.
    ///
    /// Failure is returned to the caller; deciding whether to exit is up to
    /// the bootstrap.
    #[instrument(skip(config), fields(url = %config.display_url()), err)]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = connect_options(config);
        let conn = options.connect().await?;
        info!("Connected to database");
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already established connection (used by integration tests).
    pub fn from_connection(conn: PgConnection) -> Self {
        Self { conn: Some(conn) }
    }

    fn conn(&mut self) -> Result<&mut PgConnection> {
        self.conn
            .as_mut()
            .ok_or_else(|| DbError::Other(anyhow!("database connection already closed")))
    }
}

/// Build connect options from the configuration, logging slow statements at WARN.
pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user)
        .password(&config.password)
        .application_name("hotelctl")
        .log_statements(log::LevelFilter::Debug)
        .log_slow_statements(
            log::LevelFilter::Warn,
            Duration::from_millis(config.slow_statement_threshold_ms),
        )
}

/// Attach every parameter of `statement` to a sqlx query, in order.
fn bind_all<'q>(statement: &'q Statement) -> Query<'q, Postgres, PgArguments> {
    let mut query = sqlx::query(statement.sql());
    for value in statement.params() {
        query = match value {
            Value::Int(v) => query.bind(*v),
            Value::BigInt(v) => query.bind(*v),
            Value::Float(v) => query.bind(*v),
            Value::Decimal(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
            Value::Date(v) => query.bind(*v),
        };
    }
    query
}

/// Render column `index` of `row` as text. NULL becomes an empty string.
fn field_as_text(row: &PgRow, index: usize) -> Result<String> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(String::new());
    }

    let column = &row.columns()[index];
    let type_name = column.type_info().name().to_string();

    let text = match type_name.as_str() {
        "INT2" => row.try_get::<i16, _>(index)?.to_string(),
        "INT4" => row.try_get::<i32, _>(index)?.to_string(),
        "INT8" => row.try_get::<i64, _>(index)?.to_string(),
        "FLOAT4" => row.try_get::<f32, _>(index)?.to_string(),
        "FLOAT8" => row.try_get::<f64, _>(index)?.to_string(),
        "NUMERIC" => row.try_get::<Decimal, _>(index)?.to_string(),
        "BOOL" => row.try_get::<bool, _>(index)?.to_string(),
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => row.try_get::<String, _>(index)?,
        "DATE" => row.try_get::<NaiveDate, _>(index)?.to_string(),
        "TIME" => row.try_get::<NaiveTime, _>(index)?.to_string(),
        "TIMESTAMP" => row.try_get::<NaiveDateTime, _>(index)?.to_string(),
        "TIMESTAMPTZ" => row.try_get::<DateTime<Utc>, _>(index)?.to_string(),
        _ => {
            return Err(DbError::UnsupportedType {
                column: column.name().to_string(),
                type_name,
            });
        }
    };
    Ok(text)
}

fn to_result_set(rows: &[PgRow]) -> Result<ResultSet> {
    let columns: Vec<String> = rows
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();

    let rows = rows
        .iter()
        .map(|row| (0..row.len()).map(|i| field_as_text(row, i)).collect::<Result<Vec<_>>>())
        .collect::<Result<Vec<_>>>()?;

    Ok(ResultSet { columns, rows })
}

#[async_trait::async_trait]
impl Gateway for PgGateway {
    #[instrument(skip(self, statement), fields(sql = %statement), err)]
    async fn execute(&mut self, statement: &Statement) -> Result<u64> {
        let result = bind_all(statement).execute(&mut *self.conn()?).await?;
        debug!(rows_affected = result.rows_affected(), "Statement executed");
        Ok(result.rows_affected())
    }

    #[instrument(skip(self, query), fields(sql = %query), err)]
    async fn count(&mut self, query: &Statement) -> Result<usize> {
        let rows = bind_all(query).fetch_all(&mut *self.conn()?).await?;
        Ok(rows.len())
    }

    #[instrument(skip(self, query), fields(sql = %query), err)]
    async fn fetch_rows(&mut self, query: &Statement) -> Result<ResultSet> {
        let rows = bind_all(query).fetch_all(&mut *self.conn()?).await?;
        to_result_set(&rows)
    }

    #[instrument(skip(self), err)]
    async fn current_sequence_value(&mut self, sequence: &str) -> Result<i64> {
        let value: Option<i64> = sqlx::query_scalar("SELECT currval($1::text::regclass)")
            .bind(sequence)
            .fetch_optional(&mut *self.conn()?)
            .await?;
        Ok(value.unwrap_or(-1))
    }

    // owned connection: no borrowing `Transaction` guard, the manager tracks depth
    async fn begin(&mut self) -> Result<()> {
        PgTransactionManager::begin(self.conn()?, None).await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        let conn = self.conn()?;
        if PgTransactionManager::get_transaction_depth(conn) == 0 {
            return Err(DbError::Other(anyhow!("commit without an open transaction")));
        }
        PgTransactionManager::commit(conn).await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        PgTransactionManager::rollback(self.conn()?).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().await?;
        }
        Ok(())
    }
}
