//! Persistence layer for the book collection.
//!
//! # Responsibility
//! - Define the whole-collection load/save contract.
//! - Keep file format and write strategy out of service code.
//!
//! # Invariants
//! - Every mutation is persisted by rewriting the full collection.
//! - Repository failures are returned, never logged-and-dropped.

pub mod json_repo;
