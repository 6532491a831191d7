//! In-memory book collection backed by a [`JsonStore`]. Every mutation writes
//! the full list back to disk before returning, so the session copy and the
//! file agree after each successful call.

use std::path::Path;

use tracing::{debug, info};

use crate::models::{Book, SearchField, Statistics};
use crate::store::{JsonStore, LoadWarning, StoreError};

#[derive(Debug)]
pub struct Catalog {
    store: JsonStore,
    books: Vec<Book>,
}

impl Catalog {
    /// Load the collection once for the session. A decode problem is not an
    /// error: the catalog opens empty and the warning is handed back.
    pub fn open(store: JsonStore) -> Result<(Self, Option<LoadWarning>), StoreError> {
        let loaded = store.load()?;
        let catalog = Self {
            store,
            books: loaded.books,
        };
        Ok((catalog, loaded.warning))
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Append a book and persist. No dedup, no sorting.
    pub fn add(&mut self, book: Book) -> Result<(), StoreError> {
        info!(title = %book.title, "adding book");
        self.books.push(book);
        if let Err(err) = self.store.save(&self.books) {
            self.books.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Remove every book whose title equals `title` exactly, persist, and
    /// return how many were dropped. Titles are not unique, so this can take
    /// out several entries at once.
    pub fn remove(&mut self, title: &str) -> Result<usize, StoreError> {
        let previous = self.books.clone();
        self.books.retain(|book| book.title != title);
        let removed = previous.len() - self.books.len();

        if let Err(err) = self.store.save(&self.books) {
            self.books = previous;
            return Err(err);
        }

        info!(title, removed, "removed books");
        Ok(removed)
    }

    /// Case-insensitive substring match on one field, in insertion order. An
    /// empty term matches everything.
    pub fn search(&self, term: &str, field: SearchField) -> Vec<Book> {
        let needle = term.to_lowercase();
        let results: Vec<Book> = self
            .books
            .iter()
            .filter(|book| field.value_of(book).to_lowercase().contains(&needle))
            .cloned()
            .collect();
        debug!(term, %field, matches = results.len(), "searched library");
        results
    }

    pub fn list_all(&self) -> &[Book] {
        &self.books
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_books(&self.books)
    }

    /// Titles in display order, duplicates included.
    pub fn titles(&self) -> Vec<&str> {
        self.books.iter().map(|book| book.title.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn empty_catalog() -> (TempDir, Catalog) {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("library.json"));
        let (catalog, warning) = Catalog::open(store).unwrap();
        assert!(warning.is_none());
        (dir, catalog)
    }

    fn dune() -> Book {
        Book::new("Dune", "Herbert", 1965, "Sci-Fi", false)
    }

    #[test]
    fn add_to_empty_catalog_lists_one_record() {
        let (_dir, mut catalog) = empty_catalog();

        catalog.add(dune()).unwrap();

        assert_eq!(catalog.list_all(), &[dune()]);
        let stats = catalog.statistics();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.read_count, 0);
        assert_eq!(stats.read_percent, 0.0);
    }

    #[test]
    fn list_all_keeps_insertion_order() {
        let (_dir, mut catalog) = empty_catalog();
        let books = vec![
            Book::new("Zebra", "A", 2001, "g", false),
            Book::new("Apple", "B", 1999, "g", true),
            Book::new("Mango", "C", 2010, "g", false),
            Book::new("Apple", "D", 1990, "g", false),
        ];

        for book in books.clone() {
            catalog.add(book).unwrap();
        }

        assert_eq!(catalog.list_all(), books.as_slice());
    }

    #[test]
    fn every_mutation_is_persisted() {
        let (_dir, mut catalog) = empty_catalog();
        catalog.add(dune()).unwrap();
        catalog
            .add(Book::new("Emma", "Austen", 1815, "Classic", true))
            .unwrap();

        let on_disk = JsonStore::new(catalog.path()).load().unwrap().books;
        assert_eq!(on_disk, catalog.list_all());

        catalog.remove("Dune").unwrap();

        let on_disk = JsonStore::new(catalog.path()).load().unwrap().books;
        assert_eq!(on_disk, catalog.list_all());
        assert_eq!(on_disk.len(), 1);
    }

    #[test]
    fn remove_drops_every_book_sharing_the_title() {
        let (_dir, mut catalog) = empty_catalog();
        catalog
            .add(Book::new("Echo", "First", 2000, "g", false))
            .unwrap();
        catalog
            .add(Book::new("Echo", "Second", 2005, "g", true))
            .unwrap();

        let removed = catalog.remove("Echo").unwrap();

        assert_eq!(removed, 2);
        assert!(catalog.list_all().is_empty());
    }

    #[test]
    fn remove_then_search_finds_nothing() {
        let (_dir, mut catalog) = empty_catalog();
        catalog.add(dune()).unwrap();
        catalog
            .add(Book::new("Dune Messiah", "Herbert", 1969, "Sci-Fi", true))
            .unwrap();

        catalog.remove("Dune").unwrap();

        let exact: Vec<Book> = catalog
            .search("Dune", SearchField::Title)
            .into_iter()
            .filter(|book| book.title == "Dune")
            .collect();
        assert!(exact.is_empty());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn remove_requires_exact_title() {
        let (_dir, mut catalog) = empty_catalog();
        catalog.add(dune()).unwrap();

        assert_eq!(catalog.remove("dune").unwrap(), 0);
        assert_eq!(catalog.remove("Dun").unwrap(), 0);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn search_is_case_insensitive() {
        let (_dir, mut catalog) = empty_catalog();
        catalog
            .add(Book::new(
                "Harry Potter",
                "J. K. Rowling",
                1997,
                "Fantasy",
                true,
            ))
            .unwrap();
        catalog.add(dune()).unwrap();

        let results = catalog.search("HARRY", SearchField::Title);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Harry Potter");
    }

    #[test]
    fn search_only_looks_at_the_chosen_field() {
        let (_dir, mut catalog) = empty_catalog();
        catalog
            .add(Book::new("Herbert West", "Lovecraft", 1922, "Horror", false))
            .unwrap();
        catalog.add(dune()).unwrap();

        let by_author = catalog.search("herbert", SearchField::Author);
        let by_title = catalog.search("herbert", SearchField::Title);

        assert_eq!(by_author, vec![dune()]);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Herbert West");
    }

    #[test]
    fn empty_term_matches_everything() {
        let (_dir, mut catalog) = empty_catalog();
        catalog.add(dune()).unwrap();
        catalog
            .add(Book::new("", "", 0, "", false))
            .unwrap();

        assert_eq!(catalog.search("", SearchField::Title).len(), 2);
        assert_eq!(catalog.search("", SearchField::Author).len(), 2);
    }

    #[test]
    fn statistics_total_tracks_list_length() {
        let (_dir, mut catalog) = empty_catalog();
        assert_eq!(catalog.statistics().total, 0);
        assert_eq!(catalog.statistics().read_percent, 0.0);

        catalog.add(dune()).unwrap();
        catalog
            .add(Book::new("Emma", "Austen", 1815, "Classic", true))
            .unwrap();

        let stats = catalog.statistics();
        assert_eq!(stats.total, catalog.list_all().len());
        assert_eq!(stats.read_count, 1);
        assert_eq!(stats.read_percent, 50.0);
    }

    #[test]
    fn invalid_field_values_are_accepted() {
        let (_dir, mut catalog) = empty_catalog();

        catalog.add(Book::new("", "", -42, "", false)).unwrap();

        assert_eq!(catalog.list_all()[0].year, -42);
    }

    #[test]
    fn malformed_file_opens_empty_with_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "not json at all").unwrap();

        let (catalog, warning) = Catalog::open(JsonStore::new(&path)).unwrap();

        assert!(catalog.is_empty());
        assert!(matches!(warning, Some(LoadWarning::Decode { .. })));
    }

    #[test]
    fn failed_save_leaves_memory_unchanged() {
        let dir = tempdir().unwrap();
        let (mut catalog, _) = Catalog::open(JsonStore::new(dir.path().join("library.json"))).unwrap();
        catalog.add(dune()).unwrap();
        // A directory in place of the file makes every write fail.
        fs::remove_file(catalog.path()).unwrap();
        fs::create_dir(catalog.path()).unwrap();

        let err = catalog
            .add(Book::new("Emma", "Austen", 1815, "Classic", true))
            .unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(catalog.list_all(), &[dune()]);

        let err = catalog.remove("Dune").unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(catalog.list_all(), &[dune()]);
    }
}
