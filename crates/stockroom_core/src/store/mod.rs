//! Store capability consumed by the repository layer.
//!
//! # Responsibility
//! - Define the session and session-factory contracts every backend
//!   implements.
//! - Define the store-level error shared by all backends.
//!
//! # Invariants
//! - A session is owned by exactly one repository call and never outlives it.
//! - `close` must be safe to call after a prior fault on the same session.
//! - Factories carry no per-call state and are safe for concurrent
//!   `open_session` calls.

use crate::model::item_type::{ItemType, ItemTypeId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemorySessionFactory;
pub use sqlite::SqliteSessionFactory;

pub type StoreResult<T> = Result<T, StoreError>;

/// Fault raised by a store backend during session open, persist, flush,
/// fetch, or close.
///
/// The repository treats every variant as opaque and propagates it unchanged.
#[derive(Debug)]
pub enum StoreError {
    /// The factory could not produce a usable session.
    OpenFailed(String),
    /// The store refused the operation input.
    Rejected(String),
    /// SQLite backend transport or constraint failure.
    Sqlite(rusqlite::Error),
    /// Any other backend failure (shared-state poisoning, connectivity).
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenFailed(message) => write!(f, "session open failed: {message}"),
            Self::Rejected(message) => write!(f, "store rejected operation: {message}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "store backend failure: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::OpenFailed(_) | Self::Rejected(_) | Self::Backend(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Short-lived handle to the backing store, scoped to one repository call.
///
/// # Contract
/// - `save` persists a new record and returns the store-assigned id; the
///   write becomes durable only after `flush`.
/// - `get` fetches by id; absence is `Ok(None)`, never an error.
/// - `close` releases the session; pending unflushed writes are discarded.
pub trait Session {
    /// Persists a new record, returning the assigned identity.
    fn save(&mut self, record: &ItemType) -> StoreResult<ItemTypeId>;

    /// Fetches the record with the given id, or `None` when absent.
    fn get(&mut self, id: ItemTypeId) -> StoreResult<Option<ItemType>>;

    /// Forces pending writes to become durable and visible.
    fn flush(&mut self) -> StoreResult<()>;

    /// Releases the session. Safe to call after a prior fault; pending
    /// unflushed writes are rolled back.
    fn close(&mut self) -> StoreResult<()>;
}

/// Long-lived constructor of [`Session`] handles.
///
/// Shared across repository calls and threads; owns no per-call state.
pub trait SessionFactory: Send + Sync {
    /// Opens a fresh session for exactly one repository operation.
    fn open_session(&self) -> StoreResult<Box<dyn Session>>;
}
