//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical book record persisted in the backing file.
//! - Provide optional input checks the presentation layer may run before `add`.
//!
//! # Invariants
//! - Records carry no identity field; position in the collection is the handle.
//! - `added_date` is stamped once at creation and never mutated.
//! - The store never calls [`BookInput::validate`]; it accepts any well-typed value.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// `strftime` pattern used for `added_date`.
pub const ADDED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Lower bound for publication year accepted by [`BookInput::validate`].
pub const MIN_PUBLICATION_YEAR: i32 = 1000;
/// Upper bound for title/author length accepted by [`BookInput::validate`].
pub const MAX_TEXT_CHARS: usize = 100;

/// Genre choices offered by the add form.
///
/// Genre stays free-form text; this list is a suggestion only.
pub const GENRE_SUGGESTIONS: [&str; 10] = [
    "Gaming",
    "Crime",
    "Philosophy",
    "Fantasy",
    "History",
    "Science Fiction",
    "Memoir",
    "Biography",
    "Self-Help",
    "Humor",
];

/// Raw field values collected by the presentation layer for a new book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    pub read_status: bool,
}

impl BookInput {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        genre: impl Into<String>,
        read_status: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publication_year,
            genre: genre.into(),
            read_status,
        }
    }

    /// Checks the form-level constraints for a new book.
    ///
    /// # Errors
    /// - [`BookValidationError::EmptyField`] when title or author is blank.
    /// - [`BookValidationError::FieldTooLong`] when title or author exceeds
    ///   [`MAX_TEXT_CHARS`] characters.
    /// - [`BookValidationError::YearOutOfRange`] when the year is outside
    ///   `[MIN_PUBLICATION_YEAR, current_year]`.
    pub fn validate(&self, current_year: i32) -> Result<(), BookValidationError> {
        check_text("title", &self.title)?;
        check_text("author", &self.author)?;

        if self.publication_year < MIN_PUBLICATION_YEAR || self.publication_year > current_year {
            return Err(BookValidationError::YearOutOfRange {
                year: self.publication_year,
                min: MIN_PUBLICATION_YEAR,
                max: current_year,
            });
        }

        Ok(())
    }
}

fn check_text(field: &'static str, value: &str) -> Result<(), BookValidationError> {
    if value.trim().is_empty() {
        return Err(BookValidationError::EmptyField(field));
    }
    let chars = value.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(BookValidationError::FieldTooLong {
            field,
            max: MAX_TEXT_CHARS,
            actual: chars,
        });
    }
    Ok(())
}

/// Rejection reason returned by [`BookInput::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyField(&'static str),
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    YearOutOfRange {
        year: i32,
        min: i32,
        max: i32,
    },
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max, actual } => {
                write!(f, "{field} is {actual} characters long; at most {max} allowed")
            }
            Self::YearOutOfRange { year, min, max } => {
                write!(f, "publication year {year} is outside [{min}, {max}]")
            }
        }
    }
}

impl Error for BookValidationError {}

/// One entry of the collection, exactly as stored in the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    pub read_status: bool,
    /// Local creation time, formatted with [`ADDED_DATE_FORMAT`].
    pub added_date: String,
}

impl Book {
    /// Creates a book from form input, stamping `added_date` with local now.
    pub fn new(input: BookInput) -> Self {
        let added_date = Local::now().format(ADDED_DATE_FORMAT).to_string();
        Self::with_added_date(input, added_date)
    }

    /// Creates a book with a caller-provided `added_date`.
    ///
    /// Used by import and test paths where the timestamp already exists.
    pub fn with_added_date(input: BookInput, added_date: impl Into<String>) -> Self {
        Self {
            title: input.title,
            author: input.author,
            publication_year: input.publication_year,
            genre: input.genre,
            read_status: input.read_status,
            added_date: added_date.into(),
        }
    }

    /// Decade bucket of the publication year (`1965 -> 1960`).
    pub fn decade(&self) -> i32 {
        self.publication_year.div_euclid(10) * 10
    }
}
