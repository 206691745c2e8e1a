//! Item type repository contract and session-scoped implementation.
//!
//! # Responsibility
//! - Expose save and fetch-by-id over any [`SessionFactory`] backend.
//! - Scope one private session to each call, releasing it on every exit
//!   path, including store faults.
//!
//! # Invariants
//! - `save` flushes before returning; a normal return means the write is
//!   durable and the returned id is final.
//! - A store fault surfaces to the caller unchanged in kind; a secondary
//!   close fault is chained onto it, never substituted for it.
//! - Absence on fetch is `Ok(None)`, never an error.

use crate::model::item_type::{ItemType, ItemTypeId};
use crate::store::{Session, SessionFactory, StoreError, StoreResult};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error surfaced by repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// The caller passed a record the repository refuses to save.
    InvalidArgument(String),
    /// The store faulted during the operation. When session close also
    /// failed afterwards, the secondary fault is carried alongside.
    Store {
        fault: StoreError,
        close_fault: Option<StoreError>,
    },
    /// The operation succeeded but releasing the session failed.
    Close(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Store {
                fault,
                close_fault: None,
            } => write!(f, "{fault}"),
            Self::Store {
                fault,
                close_fault: Some(close_fault),
            } => write!(f, "{fault}; session close also failed: {close_fault}"),
            Self::Close(fault) => write!(f, "session close failed: {fault}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::Store { fault, .. } => Some(fault),
            Self::Close(fault) => Some(fault),
        }
    }
}

/// Persistence contract for item type records.
pub trait ItemTypeRepository {
    /// Persists a new record, returning the store-assigned id.
    ///
    /// On success the id is also reflected onto `record`.
    fn save(&self, record: &mut ItemType) -> RepoResult<ItemTypeId>;

    /// Fetches a record by id; `Ok(None)` when no such record exists.
    fn get_by_id(&self, id: ItemTypeId) -> RepoResult<Option<ItemType>>;
}

/// Repository that scopes one store session to each call.
///
/// The factory is injected and shared; sessions are private to a call and
/// never retained, so concurrent callers only ever contend on the factory.
pub struct SessionItemTypeRepository {
    factory: Arc<dyn SessionFactory>,
}

impl SessionItemTypeRepository {
    /// Creates a repository over the provided session factory.
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self { factory }
    }

    fn open_session(&self) -> RepoResult<Box<dyn Session>> {
        self.factory.open_session().map_err(|fault| RepoError::Store {
            fault,
            close_fault: None,
        })
    }
}

impl ItemTypeRepository for SessionItemTypeRepository {
    fn save(&self, record: &mut ItemType) -> RepoResult<ItemTypeId> {
        let started_at = Instant::now();

        // Policy: validate before touching the store. A record that already
        // carries an id has been persisted; saving it again would risk
        // reassigning its identity.
        if let Some(id) = record.id() {
            let err = RepoError::InvalidArgument(format!(
                "record already persisted with id {id}; save accepts new records only"
            ));
            error!(
                "event=item_type_save module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }

        let mut session = self.open_session()?;
        let outcome = persist_and_flush(session.as_mut(), record);
        let result = settle(outcome, session.close());

        match &result {
            Ok(id) => {
                record.set_id(*id);
                debug!(
                    "event=item_type_save module=repo status=ok id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
            }
            Err(err) => {
                error!(
                    "event=item_type_save module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
            }
        }

        result
    }

    fn get_by_id(&self, id: ItemTypeId) -> RepoResult<Option<ItemType>> {
        let started_at = Instant::now();

        let mut session = self.open_session()?;
        let outcome = session.get(id);
        let result = settle(outcome, session.close());

        match &result {
            Ok(found) => {
                debug!(
                    "event=item_type_get module=repo status=ok id={id} found={} duration_ms={}",
                    found.is_some(),
                    started_at.elapsed().as_millis()
                );
            }
            Err(err) => {
                error!(
                    "event=item_type_get module=repo status=error id={id} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
            }
        }

        result
    }
}

fn persist_and_flush(session: &mut dyn Session, record: &ItemType) -> StoreResult<ItemTypeId> {
    let id = session.save(record)?;
    session.flush()?;
    Ok(id)
}

/// Combines an operation outcome with its session close result.
///
/// The operation fault stays primary; a close fault is chained when both
/// fail and stands alone only when the operation itself succeeded.
fn settle<T>(outcome: StoreResult<T>, close: StoreResult<()>) -> RepoResult<T> {
    match (outcome, close) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_fault)) => Err(RepoError::Close(close_fault)),
        (Err(fault), Ok(())) => Err(RepoError::Store {
            fault,
            close_fault: None,
        }),
        (Err(fault), Err(close_fault)) => Err(RepoError::Store {
            fault,
            close_fault: Some(close_fault),
        }),
    }
}
