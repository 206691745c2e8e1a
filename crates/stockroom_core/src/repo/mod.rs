//! Repository layer over the session capability.
//!
//! # Responsibility
//! - Define the save/get contract exposed to callers.
//! - Guarantee one session per call with deterministic release.
//!
//! # Invariants
//! - Repository calls never retry and never swallow store faults.
//! - A session opened by a call is closed exactly once on every exit path.

pub mod item_type_repo;
