//! Aggregate statistics over a collection snapshot.
//!
//! # Responsibility
//! - Derive read/unread totals and per-genre, per-author, per-decade counts.
//!
//! # Invariants
//! - `percent_read` is within `[0, 100]` and exactly `0` for an empty collection.
//! - Genre and author entries are sorted by descending count; ties keep
//!   first-encounter order.
//! - Decade entries are sorted ascending by decade.

use crate::model::book::Book;
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;

/// Number of authors shown in the "favorite authors" view.
pub const FAVORITE_AUTHORS_LIMIT: usize = 5;

/// One `(key, count)` bucket of a distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountEntry<K> {
    pub key: K,
    pub count: usize,
}

impl<K> CountEntry<K> {
    pub fn new(key: K, count: usize) -> Self {
        Self { key, count }
    }
}

/// Snapshot statistics returned by [`compute_stats`].
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryStats {
    pub total_books: usize,
    pub read_books: usize,
    pub unread_books: usize,
    pub percent_read: f64,
    pub genre_counts: Vec<CountEntry<String>>,
    pub author_counts: Vec<CountEntry<String>>,
    pub decade_counts: Vec<CountEntry<i32>>,
}

impl LibraryStats {
    /// Returns up to `limit` most frequent authors.
    pub fn top_authors(&self, limit: usize) -> &[CountEntry<String>] {
        &self.author_counts[..limit.min(self.author_counts.len())]
    }

    pub fn genre_count(&self, genre: &str) -> usize {
        lookup(&self.genre_counts, |key| key == genre)
    }

    pub fn author_count(&self, author: &str) -> usize {
        lookup(&self.author_counts, |key| key == author)
    }

    pub fn decade_count(&self, decade: i32) -> usize {
        lookup(&self.decade_counts, |key| *key == decade)
    }
}

fn lookup<K>(entries: &[CountEntry<K>], matches: impl Fn(&K) -> bool) -> usize {
    entries
        .iter()
        .find(|entry| matches(&entry.key))
        .map_or(0, |entry| entry.count)
}

/// Formats a decade bucket for display (`1960 -> "1960s"`).
pub fn decade_label(decade: i32) -> String {
    format!("{decade}s")
}

/// Computes all statistics for `books` in one pass plus three sorts.
pub fn compute_stats(books: &[Book]) -> LibraryStats {
    let total_books = books.len();
    let mut read_books = 0;
    let mut genres = Tally::default();
    let mut authors = Tally::default();
    let mut decades = Tally::default();

    for book in books {
        if book.read_status {
            read_books += 1;
        }
        genres.bump(book.genre.as_str());
        authors.bump(book.author.as_str());
        decades.bump(book.decade());
    }

    let percent_read = if total_books == 0 {
        0.0
    } else {
        read_books as f64 / total_books as f64 * 100.0
    };

    let mut genre_counts = genres.into_entries(|key| key.to_string());
    let mut author_counts = authors.into_entries(|key| key.to_string());
    let mut decade_counts = decades.into_entries(|key| key);

    // `sort_by` is stable, so equal counts keep encounter order.
    genre_counts.sort_by(|a, b| b.count.cmp(&a.count));
    author_counts.sort_by(|a, b| b.count.cmp(&a.count));
    decade_counts.sort_by_key(|entry| entry.key);

    debug!(
        "event=stats module=stats status=ok total={} read={} genres={} authors={} decades={}",
        total_books,
        read_books,
        genre_counts.len(),
        author_counts.len(),
        decade_counts.len()
    );

    LibraryStats {
        total_books,
        read_books,
        unread_books: total_books - read_books,
        percent_read,
        genre_counts,
        author_counts,
        decade_counts,
    }
}

/// Counter that remembers first-encounter order of its keys.
struct Tally<K> {
    order: Vec<K>,
    counts: HashMap<K, usize>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Copy> Tally<K> {
    fn bump(&mut self, key: K) {
        let count = self.counts.entry(key).or_insert(0);
        if *count == 0 {
            self.order.push(key);
        }
        *count += 1;
    }

    fn into_entries<T>(self, convert: impl Fn(K) -> T) -> Vec<CountEntry<T>> {
        let Self { order, counts } = self;
        order
            .into_iter()
            .map(|key| CountEntry::new(convert(key), counts.get(&key).copied().unwrap_or(0)))
            .collect()
    }
}
