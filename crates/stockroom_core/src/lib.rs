//! Session-scoped persistence core for stockroom records.
//!
//! Each repository call acquires one private session from an injected
//! factory, performs one store operation, and releases the session on every
//! exit path. Store faults propagate unchanged; absence on fetch is a normal
//! outcome, not an error.

pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item_type::{ItemType, ItemTypeId};
pub use repo::item_type_repo::{
    ItemTypeRepository, RepoError, RepoResult, SessionItemTypeRepository,
};
pub use store::{
    MemorySessionFactory, Session, SessionFactory, SqliteSessionFactory, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
