//! SQLite store backend.
//!
//! # Responsibility
//! - Open and configure per-session SQLite connections.
//! - Map the session capability onto an explicit transaction: saves insert
//!   inside the transaction, `flush` commits, `close` rolls back leftovers.
//!
//! # Invariants
//! - The `item_types` table is bootstrapped once by the factory; sessions
//!   never alter schema.
//! - Every session owns its own connection; connections are not pooled or
//!   shared across calls.

use super::{Session, SessionFactory, StoreError, StoreResult};
use crate::model::item_type::{ItemType, ItemTypeId};
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BOOTSTRAP_SQL: &str = "CREATE TABLE IF NOT EXISTS item_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Session factory backed by a SQLite database file.
///
/// Each `open_session` call opens a fresh connection with its own
/// transaction, so concurrent repository calls never share a handle.
#[derive(Debug, Clone)]
pub struct SqliteSessionFactory {
    path: PathBuf,
}

impl SqliteSessionFactory {
    /// Opens (creating if needed) the database file and bootstraps the
    /// `item_types` table.
    ///
    /// # Side effects
    /// - Emits `store_bootstrap` logging events with duration and status.
    pub fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        let path = path.as_ref().to_path_buf();
        info!("event=store_bootstrap module=store backend=sqlite status=start");

        match open_connection(&path).and_then(|conn| {
            conn.execute_batch(BOOTSTRAP_SQL)?;
            Ok(())
        }) {
            Ok(()) => {
                info!(
                    "event=store_bootstrap module=store backend=sqlite status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self { path })
            }
            Err(err) => {
                error!(
                    "event=store_bootstrap module=store backend=sqlite status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(StoreError::OpenFailed(err.to_string()))
            }
        }
    }

    /// Returns the backing database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionFactory for SqliteSessionFactory {
    fn open_session(&self) -> StoreResult<Box<dyn Session>> {
        let conn =
            open_connection(&self.path).map_err(|err| StoreError::OpenFailed(err.to_string()))?;
        conn.execute_batch("BEGIN IMMEDIATE;")
            .map_err(|err| StoreError::OpenFailed(err.to_string()))?;
        debug!("event=session_open module=store backend=sqlite status=ok");
        Ok(Box::new(SqliteSession {
            conn,
            in_txn: true,
            closed: false,
        }))
    }
}

fn open_connection(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(conn)
}

struct SqliteSession {
    conn: Connection,
    in_txn: bool,
    closed: bool,
}

impl SqliteSession {
    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::Rejected("session already closed".to_string()));
        }
        Ok(())
    }
}

impl Session for SqliteSession {
    fn save(&mut self, record: &ItemType) -> StoreResult<ItemTypeId> {
        self.ensure_open()?;
        if record.id().is_some() {
            return Err(StoreError::Rejected(
                "record already carries a store-assigned id".to_string(),
            ));
        }

        self.conn
            .execute("INSERT INTO item_types DEFAULT VALUES;", [])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get(&mut self, id: ItemTypeId) -> StoreResult<Option<ItemType>> {
        self.ensure_open()?;

        let mut stmt = self
            .conn
            .prepare("SELECT id FROM item_types WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let id: ItemTypeId = row.get(0)?;
            return Ok(Some(ItemType::with_id(id)));
        }

        Ok(None)
    }

    fn flush(&mut self) -> StoreResult<()> {
        self.ensure_open()?;
        if self.in_txn {
            self.conn.execute_batch("COMMIT;")?;
            self.in_txn = false;
        }
        Ok(())
    }

    fn close(&mut self) -> StoreResult<()> {
        self.ensure_open()?;
        self.closed = true;
        if self.in_txn {
            self.in_txn = false;
            self.conn.execute_batch("ROLLBACK;")?;
            debug!("event=session_close module=store backend=sqlite status=ok rolled_back=true");
        }
        Ok(())
    }
}
