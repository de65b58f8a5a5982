//! Whole-collection persistence contracts and JSON file implementation.
//!
//! # Responsibility
//! - Load the full collection from, and write it back to, durable storage.
//! - Surface every I/O or decode failure to the caller.
//!
//! # Invariants
//! - A missing backing file loads as an empty collection, not an error.
//! - A present but malformed file is an error; it is never treated as empty here.
//! - Saves replace the target with a rename, so readers never observe a
//!   partially written file.

use crate::model::book::Book;
use log::{error, info};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, PersistenceError>;

/// Backing-store failure for load or save.
#[derive(Debug)]
pub enum PersistenceError {
    /// The backing file could not be read, written or renamed.
    Io { path: PathBuf, source: io::Error },
    /// The backing file exists but does not hold a valid book array.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The in-memory collection could not be encoded.
    Encode(serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "library file `{}` is not accessible: {source}", path.display())
            }
            Self::Malformed { path, source } => {
                write!(f, "library file `{}` is malformed: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode library: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

/// Repository interface for whole-collection load/save.
pub trait BookRepository {
    fn load_all(&self) -> RepoResult<Vec<Book>>;
    fn save_all(&self, books: &[Book]) -> RepoResult<()>;
}

/// JSON-array file repository.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BookRepository for JsonFileRepository {
    fn load_all(&self) -> RepoResult<Vec<Book>> {
        let started_at = Instant::now();

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(
                    "event=library_load module=repo status=ok source=missing count=0 duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=library_load module=repo status=error error_code=read_failed error={}",
                    err
                );
                return Err(self.io_error(err));
            }
        };

        let books: Vec<Book> = serde_json::from_slice(&bytes).map_err(|err| {
            error!(
                "event=library_load module=repo status=error error_code=malformed error={}",
                err
            );
            PersistenceError::Malformed {
                path: self.path.clone(),
                source: err,
            }
        })?;

        info!(
            "event=library_load module=repo status=ok source=file count={} duration_ms={}",
            books.len(),
            started_at.elapsed().as_millis()
        );
        Ok(books)
    }

    fn save_all(&self, books: &[Book]) -> RepoResult<()> {
        let started_at = Instant::now();
        let data = serde_json::to_vec_pretty(books).map_err(PersistenceError::Encode)?;

        if let Err(err) = atomic_write(&self.path, &data) {
            error!(
                "event=library_save module=repo status=error count={} duration_ms={} error_code=write_failed error={}",
                books.len(),
                started_at.elapsed().as_millis(),
                err
            );
            return Err(self.io_error(err));
        }

        info!(
            "event=library_save module=repo status=ok count={} bytes={} duration_ms={}",
            books.len(),
            data.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Writes `data` to a sibling temp file, syncs it, then renames over `path`.
fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "library".to_string());
    let tmp = dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

    if let Err(err) = write_then_rename(&tmp, path, data) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }

    // Best effort: flush the directory entry where the platform allows it.
    let sync_dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    if let Ok(dir_file) = fs::File::open(sync_dir) {
        let _ = dir_file.sync_all();
    }

    Ok(())
}

fn write_then_rename(tmp: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(tmp, path)
}

/// In-memory repository for tests and embedding.
///
/// `set_failing(true)` makes every call fail with an I/O error so callers can
/// exercise their error paths.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    books: RefCell<Vec<Book>>,
    failing: Cell<bool>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RefCell::new(books),
            failing: Cell::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Returns a copy of what was last saved.
    pub fn snapshot(&self) -> Vec<Book> {
        self.books.borrow().clone()
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.failing.get() {
            return Err(PersistenceError::Io {
                path: PathBuf::from("<memory>"),
                source: io::Error::other("memory repository set to fail"),
            });
        }
        Ok(())
    }
}

impl BookRepository for MemoryBookRepository {
    fn load_all(&self) -> RepoResult<Vec<Book>> {
        self.check_available()?;
        Ok(self.books.borrow().clone())
    }

    fn save_all(&self, books: &[Book]) -> RepoResult<()> {
        self.check_available()?;
        *self.books.borrow_mut() = books.to_vec();
        Ok(())
    }
}

impl<R: BookRepository + ?Sized> BookRepository for &R {
    fn load_all(&self) -> RepoResult<Vec<Book>> {
        (**self).load_all()
    }

    fn save_all(&self, books: &[Book]) -> RepoResult<()> {
        (**self).save_all(books)
    }
}
