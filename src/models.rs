//! Domain models shared by the store, the catalog, and the TUI. They stay
//! plain data holders; persistence and presentation live elsewhere.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest publication year the add form accepts.
pub const MIN_YEAR: i32 = 0;
/// Highest publication year the add form accepts.
pub const MAX_YEAR: i32 = 2100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry in the personal library. The field names double as the JSON keys
/// of the persisted document, so renaming one is a format change.
pub struct Book {
    /// Title shown in lists. Also the key used when removing books, even
    /// though nothing keeps it unique.
    pub title: String,
    pub author: String,
    /// Publication year. Only the add form enforces [`MIN_YEAR`, `MAX_YEAR`].
    pub year: i32,
    pub genre: String,
    /// Whether the book has been read.
    pub read: bool,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read,
        }
    }

    /// Label for the read flag as shown in listings.
    pub fn status_label(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Unread"
        }
    }
}

impl fmt::Display for Book {
    /// `Title by Author (Year) - Genre - Read`, the same shape the listing
    /// screens render with styling applied.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {}",
            self.title,
            self.author,
            self.year,
            self.genre,
            self.status_label()
        )
    }
}

/// Which book field a search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Title,
    Author,
}

impl SearchField {
    /// Flip between the two searchable fields.
    pub fn toggle(self) -> Self {
        match self {
            SearchField::Title => SearchField::Author,
            SearchField::Author => SearchField::Title,
        }
    }

    /// Borrow the matching field out of a book.
    pub fn value_of(self, book: &Book) -> &str {
        match self {
            SearchField::Title => &book.title,
            SearchField::Author => &book.author,
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchField::Title => write!(f, "Title"),
            SearchField::Author => write!(f, "Author"),
        }
    }
}

/// Aggregate numbers shown on the statistics tab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub read_count: usize,
    /// `100 * read_count / total`, or `0.0` for an empty library.
    pub read_percent: f64,
}

impl Statistics {
    pub fn from_books(books: &[Book]) -> Self {
        let total = books.len();
        let read_count = books.iter().filter(|book| book.read).count();
        let read_percent = if total == 0 {
            0.0
        } else {
            read_count as f64 / total as f64 * 100.0
        };
        Self {
            total,
            read_count,
            read_percent,
        }
    }

    /// Percentage rounded to one decimal place, e.g. `66.7%`.
    pub fn read_percent_label(&self) -> String {
        format!("{:.1}%", self.read_percent)
    }
}
