//! Domain model for stockroom persistence.
//!
//! # Responsibility
//! - Define the canonical persisted record shared by all store backends.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `ItemTypeId`.
//! - A record without an assigned id is "new" and has never been persisted.

pub mod item_type;
