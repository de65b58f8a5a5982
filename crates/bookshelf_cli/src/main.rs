//! Command-line front end for the bookshelf core.
//!
//! # Responsibility
//! - Parse user input, run one core use-case, print the result as plain text.
//! - Enforce form-level input checks before calling `add`.
//! - Report every failure on stderr with a non-zero exit code.

use bookshelf_core::{
    core_version, decade_label, init_from_config, Book, BookInput, JsonFileRepository,
    LibraryConfig, LibraryService, LibraryStats, SearchField, FAVORITE_AUTHORS_LIMIT,
    GENRE_SUGGESTIONS,
};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Track the books you own and the ones you have read")]
struct Cli {
    /// JSON file holding the library [env: BOOKSHELF_DATA]
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error [env: BOOKSHELF_LOG_LEVEL]
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files [env: BOOKSHELF_LOG_DIR]
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every book with its position
    List,
    /// Add a book to the library
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        genre: String,
        /// Mark the book as already read
        #[arg(long)]
        read: bool,
    },
    /// Remove the book at a position shown by `list`
    Remove { index: usize },
    /// Flip the read status of the book at a position
    Toggle { index: usize },
    /// Find books whose field contains the term, ignoring case
    Search {
        term: String,
        #[arg(long, default_value = "title")]
        by: SearchField,
    },
    /// Show reading statistics
    Stats {
        /// Number of favorite authors to show
        #[arg(long, default_value_t = FAVORITE_AUTHORS_LIMIT)]
        top: usize,
    },
    /// Print the suggested genres
    Genres,
    /// Print the core version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(&cli);
    if let Err(err) = init_from_config(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }

    match cli.command {
        Command::Version => {
            println!("bookshelf core {}", core_version());
            return Ok(());
        }
        Command::Genres => {
            for genre in GENRE_SUGGESTIONS {
                println!("{genre}");
            }
            return Ok(());
        }
        _ => {}
    }

    let mut library = LibraryService::open(JsonFileRepository::new(&config.data_path))?;

    match cli.command {
        Command::List => {
            if library.is_empty() {
                println!("Your library is empty.");
            }
            for (index, book) in library.books().iter().enumerate() {
                println!("{}", format_book(index, book));
            }
        }
        Command::Add {
            title,
            author,
            year,
            genre,
            read,
        } => {
            let input = BookInput::new(title, author, year, genre, read);
            input.validate(Local::now().year())?;
            let index = library.add(input)?;
            println!("Added at position {index}.");
        }
        Command::Remove { index } => {
            let removed = library.remove_at(index)?;
            println!("Removed \"{}\" by {}.", removed.title, removed.author);
        }
        Command::Toggle { index } => {
            let read = library.toggle_read(index)?;
            let label = if read { "read" } else { "to read" };
            println!("Position {index} marked as {label}.");
        }
        Command::Search { term, by } => {
            if term.is_empty() {
                return Err("search term must not be empty".into());
            }
            let hits = library.search_positions(&term, by);
            if hits.is_empty() {
                println!("No books match \"{term}\" by {by}.");
            } else {
                println!("Found {} matches:", hits.len());
            }
            for (index, book) in &hits {
                println!("{}", format_book(*index, book));
            }
        }
        Command::Stats { top } => print_stats(&library.compute_stats(), top),
        Command::Genres | Command::Version => {}
    }

    Ok(())
}

/// Environment first, then explicit flags.
fn resolve_config(cli: &Cli) -> LibraryConfig {
    let mut config = LibraryConfig::from_env();
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config
}

fn format_book(index: usize, book: &Book) -> String {
    let status = if book.read_status { "read" } else { "to read" };
    format!(
        "[{index}] {} by {} ({}) - {} - {status}",
        book.title, book.author, book.publication_year, book.genre
    )
}

fn print_stats(stats: &LibraryStats, top: usize) {
    println!("Total books:  {}", stats.total_books);
    println!("Read:         {}", stats.read_books);
    println!("To read:      {}", stats.unread_books);
    println!("Percent read: {:.1}%", stats.percent_read);

    if !stats.genre_counts.is_empty() {
        println!("\nBooks by genre:");
        for entry in &stats.genre_counts {
            println!("  {:<20} {}", entry.key, entry.count);
        }
    }

    let authors = stats.top_authors(top);
    if !authors.is_empty() {
        println!("\nFavorite authors:");
        for entry in authors {
            println!("  {:<20} {}", entry.key, entry.count);
        }
    }

    if !stats.decade_counts.is_empty() {
        println!("\nBooks by decade:");
        for entry in &stats.decade_counts {
            println!("  {:<20} {}", decade_label(entry.key), entry.count);
        }
    }
}
