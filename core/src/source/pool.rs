//! Scoped SQLite connection handles.
//!
//! `ConnectionPool::acquire` hands out a `PooledConnection`; dropping the
//! handle returns the connection to the idle list (up to `max_idle`).
//! Connections are opened read-only with a busy timeout.

use crate::error::{DashResult, DashboardError};
use rusqlite::{Connection, OpenFlags};
use std::ops::Deref;
use std::sync::Mutex;
use std::time::Duration;

pub struct ConnectionPool {
    path: String,
    timeout: Duration,
    max_idle: usize,
    idle: Mutex<Vec<Connection>>,
}

impl ConnectionPool {
    /// Nothing is opened until the first `acquire`. `max_idle` is at least 1.
    pub fn new(path: &str, timeout: Duration, max_idle: usize) -> Self {
        Self {
            path: path.to_string(),
            timeout,
            max_idle: max_idle.max(1),
            idle: Mutex::new(Vec::new()),
        }
    }

    /// Database file (or URI) the pool opens.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn open(&self) -> DashResult<Connection> {
        let unavailable = |e: rusqlite::Error| DashboardError::SourceUnavailable {
            source_path: self.path.clone(),
            reason: e.to_string(),
        };
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(unavailable)?;
        conn.busy_timeout(self.timeout).map_err(unavailable)?;
        // Opening is lazy in SQLite; touch the schema so a missing or
        // corrupt file fails here rather than mid-query.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
            .map_err(unavailable)?;
        Ok(conn)
    }

    /// Take an idle connection or open a new one.
    pub fn acquire(&self) -> DashResult<PooledConnection<'_>> {
        let reused = self.idle.lock().unwrap_or_else(|e| e.into_inner()).pop();
        let conn = match reused {
            Some(conn) => {
                log::debug!("pool: reusing connection to {}", self.path);
                conn
            }
            None => {
                log::debug!("pool: opening connection to {}", self.path);
                self.open()?
            }
        };
        Ok(PooledConnection { pool: self, conn: Some(conn) })
    }

    fn release(&self, conn: Connection) {
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        if idle.len() < self.max_idle {
            idle.push(conn);
            log::debug!("pool: released connection ({} idle)", idle.len());
        }
    }

    /// Connections currently waiting for reuse.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// A connection on loan from a `ConnectionPool`.
pub struct PooledConnection<'a> {
    pool: &'a ConnectionPool,
    conn: Option<Connection>,
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        // Only `drop` takes the connection out.
        self.conn.as_ref().unwrap_or_else(|| unreachable!("pooled connection used after release"))
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn);
        }
    }
}
