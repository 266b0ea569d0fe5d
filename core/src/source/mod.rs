//! Data source adapters.
//!
//! RULE: Only this module talks to the database.
//! Everything downstream works on the `RawTable` a source returns.

mod pool;
mod seed;

pub use pool::{ConnectionPool, PooledConnection};
pub use seed::write_demo_database;

use crate::{
    config::SourceConfig,
    error::{DashResult, DashboardError},
    model::{Cell, RawTable},
};
use rusqlite::types::ValueRef;
use std::cell::Cell as Counter;

/// Anything that can produce the dashboard's raw claim rows.
pub trait ClaimSource {
    /// Human-readable origin, used in log lines and error messages.
    fn describe(&self) -> String;

    /// Run the single read-only query and return every row.
    fn fetch(&self) -> DashResult<RawTable>;
}

// ── SQLite ───────────────────────────────────────────────────────────────────

pub struct SqliteSource {
    pool: ConnectionPool,
    view_name: String,
}

/// Plain identifiers only; the name is spliced into SQL.
pub fn is_valid_view_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl SqliteSource {
    pub fn new(config: &SourceConfig) -> DashResult<Self> {
        if !is_valid_view_name(&config.view_name) {
            return Err(DashboardError::InvalidViewName { name: config.view_name.clone() });
        }
        Ok(Self {
            pool: ConnectionPool::new(&config.db_path, config.timeout(), config.pool_size),
            view_name: config.view_name.clone(),
        })
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }
}

fn cell_from(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(i) => Cell::Integer(i),
        ValueRef::Real(f) => Cell::Real(f),
        ValueRef::Text(t) => Cell::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Cell::Text(String::from_utf8_lossy(b).into_owned()),
    }
}

impl ClaimSource for SqliteSource {
    fn describe(&self) -> String {
        format!("{}#{}", self.pool.path(), self.view_name)
    }

    fn fetch(&self) -> DashResult<RawTable> {
        let conn = self.pool.acquire()?;
        let sql = format!("SELECT * FROM \"{}\"", self.view_name);
        let mut stmt = conn.prepare(&sql).map_err(|e| DashboardError::SourceUnavailable {
            source_path: self.describe(),
            reason: e.to_string(),
        })?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width).map(|i| row.get_ref(i).map(cell_from)).collect::<rusqlite::Result<Vec<Cell>>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "source: fetched {} rows x {} columns from {}",
            rows.len(),
            width,
            self.describe()
        );
        Ok(RawTable::new(columns, rows))
    }
}

// ── In-memory ────────────────────────────────────────────────────────────────

/// Serves a fixed table. Counts fetches so callers can observe caching.
pub struct MemorySource {
    table: RawTable,
    fetches: Counter<usize>,
}

impl MemorySource {
    pub fn new(table: RawTable) -> Self {
        Self { table, fetches: Counter::new(0) }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl ClaimSource for MemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn fetch(&self) -> DashResult<RawTable> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.table.clone())
    }
}
