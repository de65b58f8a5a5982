//! Library session service.
//!
//! # Responsibility
//! - Own the record store for one session and keep it in step with the
//!   backing file.
//! - Expose the use-case API the presentation layer calls.
//!
//! # Invariants
//! - Every mutation is followed by a full save before the call returns.
//! - A failed save rolls the in-memory mutation back, so the session never
//!   diverges from what was persisted.
//! - Positional arguments refer to the current display order.

use crate::model::book::{Book, BookInput};
use crate::repo::json_repo::{BookRepository, PersistenceError};
use crate::search::substring::{search_books, search_positions, SearchField};
use crate::stats::summary::{compute_stats, LibraryStats};
use crate::store::book_store::{BookStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Service error for library use-cases.
#[derive(Debug)]
pub enum LibraryError {
    /// Backing file could not be read, decoded or written.
    Persistence(PersistenceError),
    /// Positional argument is outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "{err}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "no book at position {index}; library holds {len}")
            }
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<PersistenceError> for LibraryError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

impl From<StoreError> for LibraryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::IndexOutOfRange { index, len } => Self::IndexOutOfRange { index, len },
        }
    }
}

/// One library session: an in-memory store plus the repository behind it.
pub struct LibraryService<R: BookRepository> {
    repo: R,
    store: BookStore,
}

impl<R: BookRepository> LibraryService<R> {
    /// Opens a session and loads the persisted collection.
    ///
    /// # Errors
    /// - Returns [`LibraryError::Persistence`] for unreadable or malformed data.
    ///   A missing file is not an error and yields an empty library.
    pub fn open(repo: R) -> LibraryResult<Self> {
        let mut service = Self {
            repo,
            store: BookStore::new(),
        };
        service.load_all()?;
        Ok(service)
    }

    /// Opens a session, starting empty when the persisted data is unusable.
    ///
    /// The failure is returned next to the service so the caller can still
    /// report it. The backing file is left untouched until the next mutation.
    pub fn open_or_empty(repo: R) -> (Self, Option<LibraryError>) {
        let mut service = Self {
            repo,
            store: BookStore::new(),
        };
        match service.load_all() {
            Ok(_) => (service, None),
            Err(err) => {
                warn!(
                    "event=library_open module=service status=degraded fallback=empty error={}",
                    err
                );
                (service, Some(err))
            }
        }
    }

    /// Replaces the session collection with the persisted one.
    ///
    /// Returns the number of loaded books.
    pub fn load_all(&mut self) -> LibraryResult<usize> {
        let books = self.repo.load_all()?;
        self.store.load(books);
        Ok(self.store.len())
    }

    pub fn books(&self) -> &[Book] {
        self.store.all()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Adds a book stamped with the current time and persists the library.
    ///
    /// Returns the new book's position.
    pub fn add(&mut self, input: BookInput) -> LibraryResult<usize> {
        self.add_book(Book::new(input))
    }

    /// Appends an already-built book and persists the library.
    pub fn add_book(&mut self, book: Book) -> LibraryResult<usize> {
        let index = self.store.add(book);
        if let Err(err) = self.persist("book_add") {
            self.store.pop();
            return Err(err);
        }
        info!(
            "event=book_add module=service status=ok index={} total={}",
            index,
            self.store.len()
        );
        Ok(index)
    }

    /// Removes the book at `index` and persists the library.
    pub fn remove_at(&mut self, index: usize) -> LibraryResult<Book> {
        let removed = self.store.remove_at(index).map_err(|err| {
            warn!(
                "event=book_remove module=service status=rejected index={} len={}",
                index,
                self.store.len()
            );
            LibraryError::from(err)
        })?;

        if let Err(err) = self.persist("book_remove") {
            self.store.insert_at(index, removed);
            return Err(err);
        }
        info!(
            "event=book_remove module=service status=ok index={} total={}",
            index,
            self.store.len()
        );
        Ok(removed)
    }

    /// Flips the read flag at `index`, persists, and returns the new value.
    pub fn toggle_read(&mut self, index: usize) -> LibraryResult<bool> {
        let current = self.read_status_at(index)?;
        self.set_read_status(index, !current)?;
        Ok(!current)
    }

    /// Sets the read flag at `index` and persists the library.
    pub fn set_read_status(&mut self, index: usize, value: bool) -> LibraryResult<()> {
        let previous = self.read_status_at(index)?;
        self.store.set_read_status(index, value)?;

        if let Err(err) = self.persist("book_toggle_read") {
            self.store.set_read_status(index, previous)?;
            return Err(err);
        }
        info!(
            "event=book_toggle_read module=service status=ok index={} read={}",
            index, value
        );
        Ok(())
    }

    pub fn search(&self, term: &str, field: SearchField) -> Vec<Book> {
        search_books(self.store.all(), term, field)
    }

    /// Searches like [`Self::search`], keeping each hit's library position.
    ///
    /// The positions are valid arguments for [`Self::remove_at`] and
    /// [`Self::toggle_read`] until the next mutation.
    pub fn search_positions(&self, term: &str, field: SearchField) -> Vec<(usize, Book)> {
        search_positions(self.store.all(), term, field)
    }

    pub fn compute_stats(&self) -> LibraryStats {
        compute_stats(self.store.all())
    }

    fn read_status_at(&self, index: usize) -> LibraryResult<bool> {
        self.store
            .get(index)
            .map(|book| book.read_status)
            .ok_or_else(|| {
                warn!(
                    "event=book_toggle_read module=service status=rejected index={} len={}",
                    index,
                    self.store.len()
                );
                LibraryError::IndexOutOfRange {
                    index,
                    len: self.store.len(),
                }
            })
    }

    fn persist(&self, event: &str) -> LibraryResult<()> {
        self.repo.save_all(self.store.all()).map_err(|err| {
            warn!(
                "event={} module=service status=rolled_back error={}",
                event, err
            );
            LibraryError::Persistence(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{LibraryError, LibraryService};
    use crate::model::book::BookInput;
    use crate::repo::json_repo::MemoryBookRepository;

    fn input(title: &str) -> BookInput {
        BookInput::new(title, "Author", 1990, "History", false)
    }

    #[test]
    fn add_persists_immediately() {
        let repo = MemoryBookRepository::new();
        let mut service = LibraryService::open(&repo).unwrap();

        let index = service.add(input("first")).unwrap();
        assert_eq!(index, 0);
        assert_eq!(repo.snapshot().len(), 1);
        assert_eq!(repo.snapshot()[0].title, "first");
    }

    #[test]
    fn failed_save_rolls_back_every_mutation() {
        let repo = MemoryBookRepository::new();
        let mut service = LibraryService::open(&repo).unwrap();
        service.add(input("a")).unwrap();
        service.add(input("b")).unwrap();
        let before = service.books().to_vec();

        repo.set_failing(true);
        assert!(matches!(
            service.add(input("c")),
            Err(LibraryError::Persistence(_))
        ));
        assert!(matches!(
            service.remove_at(0),
            Err(LibraryError::Persistence(_))
        ));
        assert!(matches!(
            service.toggle_read(1),
            Err(LibraryError::Persistence(_))
        ));

        assert_eq!(service.books(), before.as_slice());
    }

    #[test]
    fn open_or_empty_reports_load_failure() {
        let repo = MemoryBookRepository::new();
        repo.set_failing(true);

        let (service, err) = LibraryService::open_or_empty(&repo);
        assert!(service.is_empty());
        assert!(matches!(err, Some(LibraryError::Persistence(_))));
    }

    #[test]
    fn index_error_display_mentions_position() {
        let err = LibraryError::IndexOutOfRange { index: 5, len: 2 };
        assert_eq!(err.to_string(), "no book at position 5; library holds 2");
    }
}
