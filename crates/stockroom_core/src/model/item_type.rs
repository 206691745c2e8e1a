//! Item type domain record.
//!
//! # Responsibility
//! - Define the minimal persistable entity tracked by the repository.
//!
//! # Invariants
//! - `id` is `None` until the store assigns an identity on first save.
//! - Once assigned by the store, an id is never reassigned by repository code.
//! - Equality is by id; two records with the same assigned id are the same
//!   record.

use serde::{Deserialize, Serialize};

/// Store-assigned integer identity for persisted item types.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ItemTypeId = i64;

/// Minimal persistable record carrying only its store-assigned identity.
///
/// The identity field is deliberately the whole data model: category metadata
/// lives in projections owned by callers, not in the persistence core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemType {
    /// `None` marks a record that has never been persisted.
    id: Option<ItemTypeId>,
}

impl ItemType {
    /// Creates a new, not-yet-persisted record with no identity.
    pub fn new() -> Self {
        Self { id: None }
    }

    /// Creates a record carrying an already-assigned identity.
    ///
    /// Used by store backends when rehydrating persisted rows; callers
    /// creating fresh records should use [`ItemType::new`].
    pub fn with_id(id: ItemTypeId) -> Self {
        Self { id: Some(id) }
    }

    /// Returns the assigned identity, or `None` for a new record.
    pub fn id(&self) -> Option<ItemTypeId> {
        self.id
    }

    /// Returns whether this record has never been persisted.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Records the identity assigned by the store.
    ///
    /// # Invariants
    /// - Callers must not reassign an already-assigned identity; this is a
    ///   convention of the save path, not a structural guarantee.
    pub fn set_id(&mut self, id: ItemTypeId) {
        self.id = Some(id);
    }
}
