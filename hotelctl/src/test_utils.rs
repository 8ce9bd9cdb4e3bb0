//! Test doubles for driving handlers without a database or a terminal.

use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use crate::console::Console;
use crate::db::errors::{DbError, Result};
use crate::db::gateway::{Gateway, ResultSet, Statement};

/// In-memory writer whose contents stay readable after the console takes ownership.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Console that reads `lines` (one answer per line) and captures both outputs.
pub fn scripted_console(lines: &[&str]) -> (Console, SharedBuffer, SharedBuffer) {
    let mut script = lines.join("\n");
    if !lines.is_empty() {
        script.push('\n');
    }
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let console = Console::new(io::Cursor::new(script.into_bytes()), out.clone(), err.clone());
    (console, out, err)
}

/// Build a [`ResultSet`] from string literals.
pub fn rows(columns: &[&str], rows: &[&[&str]]) -> ResultSet {
    ResultSet {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: rows.iter().map(|r| r.iter().map(|v| v.to_string()).collect()).collect(),
    }
}

/// A scripted reply for the next statement matching a SQL fragment.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Count(usize),
    Rows(ResultSet),
    Affected(u64),
    Fail(String),
}

/// Record of a call made to the mock gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Execute(Statement),
    Count(Statement),
    FetchRows(Statement),
    Sequence(String),
    Begin,
    Commit,
    Rollback,
    Close,
}

/// Gateway double that records every call and answers from scripted responses.
///
/// Responses are registered against a SQL fragment; the first fragment
/// contained in a statement's SQL that still has queued responses answers it
/// (FIFO per fragment). Unscripted statements get neutral defaults: one row
/// affected, a count of zero, an empty result set.
///
/// ```ignore
/// let mut gw = MockGateway::new();
/// gw.on_count("FROM RoomBookings", 1);
/// gw.set_sequence("RoomRepairs_repairID_seq", 42);
/// ```
#[derive(Default)]
pub struct MockGateway {
    responses: Vec<(String, VecDeque<MockResponse>)>,
    sequences: HashMap<String, i64>,
    calls: Vec<MockCall>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response(&mut self, fragment: &str, response: MockResponse) -> &mut Self {
        match self.responses.iter_mut().find(|(f, _)| f == fragment) {
            Some((_, queue)) => queue.push_back(response),
            None => self.responses.push((fragment.to_string(), VecDeque::from([response]))),
        }
        self
    }

    pub fn on_count(&mut self, fragment: &str, count: usize) -> &mut Self {
        self.add_response(fragment, MockResponse::Count(count))
    }

    pub fn on_rows(&mut self, fragment: &str, result: ResultSet) -> &mut Self {
        self.add_response(fragment, MockResponse::Rows(result))
    }

    pub fn on_fail(&mut self, fragment: &str, message: &str) -> &mut Self {
        self.add_response(fragment, MockResponse::Fail(message.to_string()))
    }

    pub fn set_sequence(&mut self, sequence: &str, value: i64) -> &mut Self {
        self.sequences.insert(sequence.to_string(), value);
        self
    }

    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    /// Statements sent through [`Gateway::execute`], in order.
    pub fn executed(&self) -> Vec<&Statement> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MockCall::Execute(stmt) => Some(stmt),
                _ => None,
            })
            .collect()
    }

    /// Every statement or query whose SQL contains `fragment`.
    pub fn statements_matching(&self, fragment: &str) -> Vec<&Statement> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MockCall::Execute(stmt) | MockCall::Count(stmt) | MockCall::FetchRows(stmt) => Some(stmt),
                _ => None,
            })
            .filter(|stmt| stmt.sql().contains(fragment))
            .collect()
    }

    fn next_response(&mut self, sql: &str) -> Option<MockResponse> {
        self.responses
            .iter_mut()
            .find(|(fragment, queue)| !queue.is_empty() && sql.contains(fragment.as_str()))
            .and_then(|(_, queue)| queue.pop_front())
    }
}

fn scripted_failure(message: String) -> DbError {
    DbError::Other(anyhow!(message))
}

#[async_trait::async_trait]
impl Gateway for MockGateway {
    async fn execute(&mut self, statement: &Statement) -> Result<u64> {
        self.calls.push(MockCall::Execute(statement.clone()));
        match self.next_response(statement.sql()) {
            None => Ok(1),
            Some(MockResponse::Affected(n)) => Ok(n),
            Some(MockResponse::Fail(message)) => Err(scripted_failure(message)),
            Some(other) => Err(scripted_failure(format!("{other:?} scripted for execute"))),
        }
    }

    async fn count(&mut self, query: &Statement) -> Result<usize> {
        self.calls.push(MockCall::Count(query.clone()));
        match self.next_response(query.sql()) {
            None => Ok(0),
            Some(MockResponse::Count(n)) => Ok(n),
            Some(MockResponse::Rows(result)) => Ok(result.len()),
            Some(MockResponse::Fail(message)) => Err(scripted_failure(message)),
            Some(other) => Err(scripted_failure(format!("{other:?} scripted for count"))),
        }
    }

    async fn fetch_rows(&mut self, query: &Statement) -> Result<ResultSet> {
        self.calls.push(MockCall::FetchRows(query.clone()));
        match self.next_response(query.sql()) {
            None => Ok(ResultSet::default()),
            Some(MockResponse::Rows(result)) => Ok(result),
            Some(MockResponse::Fail(message)) => Err(scripted_failure(message)),
            Some(other) => Err(scripted_failure(format!("{other:?} scripted for fetch_rows"))),
        }
    }

    async fn current_sequence_value(&mut self, sequence: &str) -> Result<i64> {
        self.calls.push(MockCall::Sequence(sequence.to_string()));
        Ok(self.sequences.get(sequence).copied().unwrap_or(-1))
    }

    async fn begin(&mut self) -> Result<()> {
        self.calls.push(MockCall::Begin);
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.calls.push(MockCall::Commit);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.calls.push(MockCall::Rollback);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.calls.push(MockCall::Close);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_are_fifo_per_fragment() {
        let mut gw = MockGateway::new();
        gw.on_count("FROM Users", 1).on_count("FROM Users", 0);

        let query = Statement::new("SELECT * FROM Users WHERE userID = $1").bind(7);
        assert_eq!(gw.count(&query).await.unwrap(), 1);
        assert_eq!(gw.count(&query).await.unwrap(), 0);
        // queue drained, default applies
        assert_eq!(gw.count(&query).await.unwrap(), 0);
        assert_eq!(gw.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_unscripted_defaults_and_failures() {
        let mut gw = MockGateway::new();
        gw.on_fail("INSERT INTO RoomRepairRequests", "boom");

        let ok = Statement::new("INSERT INTO RoomBookings VALUES ($1)").bind(1);
        assert_eq!(gw.execute(&ok).await.unwrap(), 1);

        let bad = Statement::new("INSERT INTO RoomRepairRequests VALUES ($1)").bind(1);
        assert!(gw.execute(&bad).await.is_err());

        assert_eq!(gw.current_sequence_value("missing_seq").await.unwrap(), -1);
        assert_eq!(gw.executed().len(), 2);
    }
}
