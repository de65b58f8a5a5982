//! In-memory record store for one session.
//!
//! # Responsibility
//! - Own the ordered book sequence between load and process end.
//! - Reject positional operations that fall outside current bounds.
//!
//! # Invariants
//! - Insertion order is preserved; removal shifts later records left by one.
//! - A rejected operation leaves the sequence untouched.

use crate::model::book::Book;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Positional-operation error for [`BookStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for {len} books")
            }
        }
    }
}

impl Error for StoreError {}

/// Ordered book collection owned by the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookStore {
    books: Vec<Book>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire sequence, typically with the persisted collection.
    pub fn load(&mut self, books: Vec<Book>) {
        self.books = books;
    }

    /// Appends a book and returns its index.
    pub fn add(&mut self, book: Book) -> usize {
        self.books.push(book);
        self.books.len() - 1
    }

    /// Removes and returns the book at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Book, StoreError> {
        self.check_index(index)?;
        Ok(self.books.remove(index))
    }

    pub fn set_read_status(&mut self, index: usize, value: bool) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.books[index].read_status = value;
        Ok(())
    }

    /// Flips `read_status` at `index` and returns the new value.
    pub fn toggle_read(&mut self, index: usize) -> Result<bool, StoreError> {
        self.check_index(index)?;
        let book = &mut self.books[index];
        book.read_status = !book.read_status;
        Ok(book.read_status)
    }

    /// Puts a previously removed book back at `index`.
    ///
    /// Only used to undo a removal whose save failed, so `index <= len` holds.
    pub(crate) fn insert_at(&mut self, index: usize, book: Book) {
        let index = index.min(self.books.len());
        self.books.insert(index, book);
    }

    pub(crate) fn pop(&mut self) -> Option<Book> {
        self.books.pop()
    }

    pub fn all(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index >= self.books.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.books.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BookStore, StoreError};
    use crate::model::book::{Book, BookInput};

    fn book(title: &str, read: bool) -> Book {
        Book::with_added_date(
            BookInput::new(title, "Author", 2000, "Fantasy", read),
            "2024-05-01 12:00:00",
        )
    }

    #[test]
    fn remove_shifts_later_records_left() {
        let mut store = BookStore::new();
        store.load(vec![book("a", false), book("b", false), book("c", false)]);

        let removed = store.remove_at(0).unwrap();
        assert_eq!(removed.title, "a");
        let titles: Vec<_> = store.all().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);
    }

    #[test]
    fn out_of_range_is_rejected_without_change() {
        let mut store = BookStore::new();
        store.load(vec![book("a", false), book("b", true)]);
        let before = store.clone();

        assert_eq!(
            store.remove_at(5).unwrap_err(),
            StoreError::IndexOutOfRange { index: 5, len: 2 }
        );
        assert_eq!(
            store.toggle_read(2).unwrap_err(),
            StoreError::IndexOutOfRange { index: 2, len: 2 }
        );
        assert!(store.set_read_status(9, true).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn toggle_and_set_mutate_in_place() {
        let mut store = BookStore::new();
        store.add(book("a", false));

        assert!(store.toggle_read(0).unwrap());
        assert!(store.get(0).unwrap().read_status);
        store.set_read_status(0, false).unwrap();
        assert!(!store.get(0).unwrap().read_status);
    }

    #[test]
    fn insert_at_restores_removed_position() {
        let mut store = BookStore::new();
        store.load(vec![book("a", false), book("b", false), book("c", false)]);
        let before = store.clone();

        let removed = store.remove_at(1).unwrap();
        store.insert_at(1, removed);
        assert_eq!(store, before);
    }

    #[test]
    fn error_display_names_index_and_len() {
        let err = StoreError::IndexOutOfRange { index: 5, len: 2 };
        assert_eq!(err.to_string(), "index 5 is out of range for 2 books");
    }
}
