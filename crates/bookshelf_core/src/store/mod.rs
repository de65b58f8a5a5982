//! Session-owned record store.

pub mod book_store;
