//! In-memory metadata source for introspection tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use schemagen_db::{ColumnMeta, DatabaseKind, Error, MetadataSource, Result, TextRow};

/// Scripted answers keyed by table name or statement text.
///
/// Unscripted statements return no rows; every call is recorded.
pub struct FakeSource {
    kind: DatabaseKind,
    remarks: HashMap<String, String>,
    columns: HashMap<String, Vec<ColumnMeta>>,
    rows: HashMap<String, Vec<TextRow>>,
    failing: HashSet<String>,
    dropping: HashSet<String>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeSource {
    pub fn new(kind: DatabaseKind) -> Self {
        Self {
            kind,
            remarks: HashMap::new(),
            columns: HashMap::new(),
            rows: HashMap::new(),
            failing: HashSet::new(),
            dropping: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_table(mut self, table: &str, remarks: &str, columns: Vec<ColumnMeta>) -> Self {
        self.remarks.insert(table.to_string(), remarks.to_string());
        self.columns.insert(table.to_string(), columns);
        self
    }

    pub fn with_rows(mut self, sql: &str, labels: &[&str], rows: Vec<Vec<Option<&str>>>) -> Self {
        let labels: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|cells| {
                TextRow::new(
                    labels.clone(),
                    cells.into_iter().map(|c| c.map(str::to_string)).collect(),
                )
            })
            .collect();
        self.rows.insert(sql.to_string(), rows);
        self
    }

    /// Make a call fail: a table name fails `table_remarks` or `columns`
    /// (as `remarks:<table>` / `columns:<table>`), any other key fails the
    /// statement with that text.
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Like [`FakeSource::failing`], but the call loses the connection.
    /// `connect` makes the up-front connection attempt fail.
    pub fn dropping(mut self, key: &str) -> Self {
        self.dropping.insert(key.to_string());
        self
    }

    fn record(&self, call: &str, params: &[&str]) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((call.to_string(), params.iter().map(|p| p.to_string()).collect()));
        }
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.dropping.contains(key) {
            return Err(Error::Connection(format!("connection lost: {}", key)));
        }
        if self.failing.contains(key) {
            return Err(Error::Query(format!("scripted failure: {}", key)));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of raw statements run through `query`
    pub fn query_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|(call, _)| {
                call != "connect" && !call.starts_with("remarks:") && !call.starts_with("columns:")
            })
            .count()
    }

    /// Number of calls whose statement starts with `prefix`
    pub fn calls_starting_with(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|(call, _)| call.starts_with(prefix)).count()
    }

    /// Parameters of every run of `sql`
    pub fn params_for(&self, sql: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|(call, _)| call == sql)
            .map(|(_, params)| params)
            .collect()
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    fn kind(&self) -> DatabaseKind {
        self.kind
    }

    async fn connect(&self) -> Result<()> {
        self.record("connect", &[]);
        self.check("connect")
    }

    async fn table_remarks(&self, table: &str) -> Result<Option<String>> {
        let key = format!("remarks:{}", table);
        self.record(&key, &[]);
        self.check(&key)?;
        Ok(self.remarks.get(table).cloned())
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnMeta>> {
        let key = format!("columns:{}", table);
        self.record(&key, &[]);
        self.check(&key)?;
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<TextRow>> {
        self.record(sql, params);
        self.check(sql)?;
        Ok(self.rows.get(sql).cloned().unwrap_or_default())
    }
}
