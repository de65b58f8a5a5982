//! Case-insensitive substring search over one book field.
//!
//! # Responsibility
//! - Filter a collection snapshot by title, author or genre.
//!
//! # Invariants
//! - Results keep the collection's relative order.
//! - An empty term matches nothing.
//! - Searching never mutates the collection.

use crate::model::book::Book;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Field a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Title,
    Author,
    Genre,
}

impl SearchField {
    pub const ALL: [SearchField; 3] = [Self::Title, Self::Author, Self::Genre];

    fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            Self::Title => &book.title,
            Self::Author => &book.author,
            Self::Genre => &book.genre,
        }
    }
}

impl Display for SearchField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Genre => "genre",
        };
        f.write_str(label)
    }
}

/// Unknown search field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSearchFieldError(String);

impl Display for ParseSearchFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown search field `{}`; expected title|author|genre",
            self.0
        )
    }
}

impl Error for ParseSearchFieldError {}

impl FromStr for SearchField {
    type Err = ParseSearchFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            // The add form labels genre as "Category".
            "genre" | "category" => Ok(Self::Genre),
            _ => Err(ParseSearchFieldError(value.to_string())),
        }
    }
}

/// Search request: a term and the field it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub field: SearchField,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, field: SearchField) -> Self {
        Self {
            term: term.into(),
            field,
        }
    }

    /// Runs this query against `books`.
    pub fn run(&self, books: &[Book]) -> Vec<Book> {
        search_books(books, &self.term, self.field)
    }
}

/// Returns the books whose `field` contains `term`, ignoring case.
///
/// Returns an empty list for an empty term.
pub fn search_books(books: &[Book], term: &str, field: SearchField) -> Vec<Book> {
    search_positions(books, term, field)
        .into_iter()
        .map(|(_, book)| book)
        .collect()
}

/// Like [`search_books`], but pairs every hit with its position in `books`.
///
/// The position is the handle for positional operations such as removal.
pub fn search_positions(books: &[Book], term: &str, field: SearchField) -> Vec<(usize, Book)> {
    let Some(matcher) = Matcher::new(term) else {
        return Vec::new();
    };

    let hits: Vec<(usize, Book)> = books
        .iter()
        .enumerate()
        .filter(|(_, book)| matcher.is_match(field.value_of(book)))
        .map(|(index, book)| (index, book.clone()))
        .collect();

    debug!(
        "event=search module=search status=ok field={} term_chars={} scanned={} hits={} matcher={}",
        field,
        term.chars().count(),
        books.len(),
        hits.len(),
        matcher.kind()
    );
    hits
}

enum Matcher {
    Pattern(Regex),
    /// Lowercased term, used when the pattern exceeds the regex size limit.
    Folded(String),
}

impl Matcher {
    fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            return None;
        }

        // Escaped literal: only the compiled-size limit can reject it.
        let matcher = match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => Self::Pattern(pattern),
            Err(err) => {
                debug!(
                    "event=search module=search status=fallback term_chars={} error={}",
                    term.chars().count(),
                    err
                );
                Self::Folded(term.to_lowercase())
            }
        };
        Some(matcher)
    }

    fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Pattern(pattern) => pattern.is_match(value),
            Self::Folded(needle) => value.to_lowercase().contains(needle.as_str()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Pattern(_) => "regex",
            Self::Folded(_) => "folded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{search_books, search_positions, Matcher, SearchField, SearchQuery};
    use crate::model::book::{Book, BookInput};

    fn shelf() -> Vec<Book> {
        vec![
            Book::with_added_date(
                BookInput::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
                "2024-01-01 09:00:00",
            ),
            Book::with_added_date(
                BookInput::new("The Hobbit", "J.R.R. Tolkien", 1937, "Fantasy", false),
                "2024-01-02 09:00:00",
            ),
            Book::with_added_date(
                BookInput::new("Dune Messiah", "Frank Herbert", 1969, "Sci-Fi", false),
                "2024-01-03 09:00:00",
            ),
        ]
    }

    #[test]
    fn field_parses_case_insensitively() {
        assert_eq!("Title".parse::<SearchField>(), Ok(SearchField::Title));
        assert_eq!(" AUTHOR ".parse::<SearchField>(), Ok(SearchField::Author));
        assert_eq!("category".parse::<SearchField>(), Ok(SearchField::Genre));
        assert!("year".parse::<SearchField>().is_err());
    }

    #[test]
    fn genre_match_ignores_case() {
        let hits = search_books(&shelf(), "sci", SearchField::Genre);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let hits = search_books(&shelf(), "J.R.R.", SearchField::Author);
        assert_eq!(hits.len(), 1);
        assert!(search_books(&shelf(), "J.*", SearchField::Author).is_empty());
    }

    #[test]
    fn hits_keep_collection_order() {
        let titles: Vec<_> = search_books(&shelf(), "DUNE", SearchField::Title)
            .into_iter()
            .map(|book| book.title)
            .collect();
        assert_eq!(titles, vec!["Dune", "Dune Messiah"]);
    }

    #[test]
    fn query_runs_against_snapshot() {
        let query = SearchQuery::new("herbert", SearchField::Author);
        assert_eq!(query.run(&shelf()).len(), 2);
    }

    #[test]
    fn positions_refer_to_the_collection() {
        let hits = search_positions(&shelf(), "obb", SearchField::Title);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 1);
        assert_eq!(hits[0].1.title, "The Hobbit");

        let positions: Vec<_> = search_positions(&shelf(), "herbert", SearchField::Author)
            .into_iter()
            .map(|(index, _)| index)
            .collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn oversized_term_still_matches() {
        let term = "ab".repeat(200_000);
        let mut books = shelf();
        books[1].title = format!("x{}y", term.to_uppercase());

        let hits = search_books(&books, &term, SearchField::Title);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, books[1].title);
    }

    #[test]
    fn folded_matcher_ignores_case() {
        let matcher = Matcher::Folded("hobbit".to_string());
        assert!(matcher.is_match("The HOBBIT"));
        assert!(!matcher.is_match("Dune"));
    }

    #[test]
    fn empty_term_matches_nothing() {
        for field in SearchField::ALL {
            assert!(search_books(&shelf(), "", field).is_empty());
        }
    }
}
