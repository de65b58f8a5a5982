use bookshelf_core::{
    compute_stats, search_books, search_positions, Book, BookInput, BookRepository,
    JsonFileRepository, LibraryError, LibraryService, MemoryBookRepository, SearchField,
};
use proptest::prelude::*;

fn arb_book() -> impl Strategy<Value = Book> {
    (
        "[A-Za-z ]{1,16}",
        "[A-Za-z ]{1,12}",
        1000i32..2100,
        "[A-Za-z-]{1,10}",
        any::<bool>(),
    )
        .prop_map(|(title, author, year, genre, read)| {
            Book::with_added_date(
                BookInput::new(title, author, year, genre, read),
                "2024-06-01 08:30:00",
            )
        })
}

fn arb_books() -> impl Strategy<Value = Vec<Book>> {
    prop::collection::vec(arb_book(), 0..24)
}

fn field_value(book: &Book, field: SearchField) -> &str {
    match field {
        SearchField::Title => &book.title,
        SearchField::Author => &book.author,
        SearchField::Genre => &book.genre,
    }
}

fn arb_field() -> impl Strategy<Value = SearchField> {
    prop::sample::select(SearchField::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_file_roundtrip_preserves_collection(books in arb_books()) {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("library.json"));

        repo.save_all(&books).unwrap();
        prop_assert_eq!(repo.load_all().unwrap(), books);
    }

    #[test]
    fn prop_add_then_remove_last_restores(books in arb_books(), extra in arb_book()) {
        let repo = MemoryBookRepository::with_books(books.clone());
        let mut library = LibraryService::open(&repo).unwrap();

        let index = library.add_book(extra.clone()).unwrap();
        prop_assert_eq!(index, books.len());
        let removed = library.remove_at(index).unwrap();

        prop_assert_eq!(removed, extra);
        prop_assert_eq!(library.books(), books.as_slice());
        prop_assert_eq!(repo.snapshot(), books);
    }

    #[test]
    fn prop_index_bounds_are_enforced(books in arb_books(), index in 0usize..32) {
        let repo = MemoryBookRepository::with_books(books.clone());
        let mut library = LibraryService::open(&repo).unwrap();
        let len = books.len();

        let toggled = library.toggle_read(index);
        let removed = library.remove_at(index);

        if index < len {
            prop_assert!(toggled.is_ok());
            prop_assert!(removed.is_ok());
            prop_assert_eq!(library.len(), len - 1);
        } else {
            let out_of_range = matches!(toggled, Err(LibraryError::IndexOutOfRange { .. }));
            prop_assert!(out_of_range);
            let out_of_range = matches!(removed, Err(LibraryError::IndexOutOfRange { .. }));
            prop_assert!(out_of_range);
            prop_assert_eq!(library.books(), books.as_slice());
        }
    }

    #[test]
    fn prop_percent_read_stays_in_range(books in arb_books()) {
        let stats = compute_stats(&books);

        prop_assert!((0.0..=100.0).contains(&stats.percent_read));
        if books.is_empty() {
            prop_assert_eq!(stats.percent_read, 0.0);
        }
        prop_assert_eq!(stats.read_books + stats.unread_books, stats.total_books);
        let genre_total: usize = stats.genre_counts.iter().map(|entry| entry.count).sum();
        let decade_total: usize = stats.decade_counts.iter().map(|entry| entry.count).sum();
        prop_assert_eq!(genre_total, books.len());
        prop_assert_eq!(decade_total, books.len());
    }

    #[test]
    fn prop_search_is_an_idempotent_stable_filter(
        books in arb_books(),
        term in "[A-Za-z]{1,3}",
        field in arb_field(),
    ) {
        let first = search_books(&books, &term, field);
        let second = search_books(&books, &term, field);
        prop_assert_eq!(&first, &second);

        let needle = term.to_lowercase();
        let expected: Vec<Book> = books
            .iter()
            .filter(|book| field_value(book, field).to_lowercase().contains(&needle))
            .cloned()
            .collect();
        prop_assert_eq!(&first, &expected);

        let positioned = search_positions(&books, &term, field);
        prop_assert_eq!(positioned.len(), first.len());
        for (index, hit) in &positioned {
            prop_assert_eq!(&books[*index], hit);
        }
    }
}
