//! In-memory store backend.
//!
//! # Responsibility
//! - Provide a process-local backend implementing the session capability.
//! - Model flush semantics: saves buffer in the session and only become
//!   visible to other sessions after `flush`.
//!
//! # Invariants
//! - Ids are drawn from a shared monotonic sequence and never reused, even
//!   when the session that drew them is closed without flushing.
//! - Closing a session discards its unflushed writes.

use super::{Session, SessionFactory, StoreError, StoreResult};
use crate::model::item_type::{ItemType, ItemTypeId};
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: ItemTypeId,
    records: BTreeMap<ItemTypeId, ItemType>,
}

/// Session factory backed by shared in-process state.
///
/// Cloning the factory shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionFactory {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySessionFactory {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of flushed records currently visible.
    pub fn record_count(&self) -> StoreResult<usize> {
        Ok(lock_state(&self.state)?.records.len())
    }
}

impl SessionFactory for MemorySessionFactory {
    fn open_session(&self) -> StoreResult<Box<dyn Session>> {
        debug!("event=session_open module=store backend=memory status=ok");
        Ok(Box::new(MemorySession {
            state: Arc::clone(&self.state),
            pending: Vec::new(),
            closed: false,
        }))
    }
}

struct MemorySession {
    state: Arc<Mutex<MemoryState>>,
    pending: Vec<ItemType>,
    closed: bool,
}

impl MemorySession {
    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::Rejected("session already closed".to_string()));
        }
        Ok(())
    }
}

impl Session for MemorySession {
    fn save(&mut self, record: &ItemType) -> StoreResult<ItemTypeId> {
        self.ensure_open()?;
        if record.id().is_some() {
            return Err(StoreError::Rejected(
                "record already carries a store-assigned id".to_string(),
            ));
        }

        let id = {
            let mut state = lock_state(&self.state)?;
            state.next_id += 1;
            state.next_id
        };

        let mut stored = record.clone();
        stored.set_id(id);
        self.pending.push(stored);
        Ok(id)
    }

    fn get(&mut self, id: ItemTypeId) -> StoreResult<Option<ItemType>> {
        self.ensure_open()?;
        Ok(lock_state(&self.state)?.records.get(&id).cloned())
    }

    fn flush(&mut self) -> StoreResult<()> {
        self.ensure_open()?;
        let mut state = lock_state(&self.state)?;
        for record in self.pending.drain(..) {
            let id = record.id().ok_or_else(|| {
                StoreError::Backend("pending record lost its assigned id".to_string())
            })?;
            state.records.insert(id, record);
        }
        Ok(())
    }

    fn close(&mut self) -> StoreResult<()> {
        self.ensure_open()?;
        let discarded = self.pending.len();
        self.pending.clear();
        self.closed = true;
        if discarded > 0 {
            debug!(
                "event=session_close module=store backend=memory status=ok discarded_writes={discarded}"
            );
        }
        Ok(())
    }
}

fn lock_state(state: &Arc<Mutex<MemoryState>>) -> StoreResult<MutexGuard<'_, MemoryState>> {
    state
        .lock()
        .map_err(|_| StoreError::Backend("memory store state poisoned".to_string()))
}
