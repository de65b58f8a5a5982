//! Domain model for the book collection.
//!
//! # Responsibility
//! - Define the record shape shared by store, persistence, search and stats.
//!
//! # Invariants
//! - The serialized shape of [`book::Book`] is the backing-file format; it has
//!   no schema version, so any field change is breaking.

pub mod book;
