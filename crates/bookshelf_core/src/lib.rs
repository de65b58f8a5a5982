//! Core domain logic for Bookshelf, a personal book-tracking library.
//! This crate is the single source of truth for collection invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod stats;
pub mod store;

pub use config::LibraryConfig;
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, LoggingError,
};
pub use model::book::{
    Book, BookInput, BookValidationError, ADDED_DATE_FORMAT, GENRE_SUGGESTIONS,
    MAX_TEXT_CHARS, MIN_PUBLICATION_YEAR,
};
pub use repo::json_repo::{
    BookRepository, JsonFileRepository, MemoryBookRepository, PersistenceError, RepoResult,
};
pub use search::substring::{
    search_books, search_positions, ParseSearchFieldError, SearchField, SearchQuery,
};
pub use service::library_service::{LibraryError, LibraryResult, LibraryService};
pub use stats::summary::{
    compute_stats, decade_label, CountEntry, LibraryStats, FAVORITE_AUTHORS_LIMIT,
};
pub use store::book_store::{BookStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
