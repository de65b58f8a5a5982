//! Search entry points.
//!
//! # Responsibility
//! - Expose field-scoped filtering over a collection snapshot.
//! - Keep matching rules inside core so every front end agrees on them.

pub mod substring;
