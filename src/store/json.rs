use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{info, warn};

use super::error::{LoadWarning, StoreError};
use crate::models::Book;

/// Indentation used for the pretty-printed document.
const INDENT: &[u8] = b"    ";

/// Result of reading the library file.
#[derive(Debug, Default)]
pub struct Loaded {
    pub books: Vec<Book>,
    /// Set when the file existed but had to be ignored.
    pub warning: Option<LoadWarning>,
}

/// Reads and overwrites the whole library as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every book from disk. A missing file is an empty library; a file
    /// that does not decode is reported through [`Loaded::warning`] and also
    /// yields an empty library. The malformed content is left on disk until
    /// the next save replaces it.
    pub fn load(&self) -> Result<Loaded, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no library file yet, starting empty");
                return Ok(Loaded::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_slice::<Vec<Book>>(&raw) {
            Ok(books) => {
                info!(path = %self.path.display(), count = books.len(), "loaded library");
                Ok(Loaded {
                    books,
                    warning: None,
                })
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "could not decode library file, starting with an empty library"
                );
                Ok(Loaded {
                    books: Vec::new(),
                    warning: Some(LoadWarning::Decode {
                        path: self.path.clone(),
                        message: err.to_string(),
                    }),
                })
            }
        }
    }

    /// Replace the file contents with `books`. Not atomic: a crash while
    /// writing can leave a truncated document behind.
    pub fn save(&self, books: &[Book]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let document = encode(books)?;
        fs::write(&self.path, document).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), count = books.len(), "saved library");
        Ok(())
    }
}

/// Pretty-print the books with a fixed four-space indent.
fn encode(books: &[Book]) -> Result<Vec<u8>, StoreError> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    books.serialize(&mut serializer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample() -> Vec<Book> {
        vec![
            Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", false),
            Book::new("Emma", "Jane Austen", 1815, "Classic", true),
        ]
    }

    #[test]
    fn missing_file_loads_as_empty_library() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("library.json"));

        let loaded = store.load().unwrap();

        assert!(loaded.books.is_empty());
        assert!(loaded.warning.is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn malformed_file_loads_as_empty_with_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonStore::new(&path);

        let loaded = store.load().unwrap();

        assert!(loaded.books.is_empty());
        assert!(matches!(
            loaded.warning,
            Some(LoadWarning::Decode { ref path, .. }) if path == store.path()
        ));
        // Nothing is backed up or rewritten on load.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn wrong_shape_is_a_decode_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, r#"[{"title": "Dune"}]"#).unwrap();

        let loaded = JsonStore::new(&path).load().unwrap();

        assert!(loaded.books.is_empty());
        assert!(loaded.warning.is_some());
    }

    #[test]
    fn empty_file_is_a_decode_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "").unwrap();

        let loaded = JsonStore::new(&path).load().unwrap();

        assert!(loaded.books.is_empty());
        assert!(loaded.warning.is_some());
    }

    #[test]
    fn non_utf8_file_is_a_decode_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, [0xff, 0xfe, b'[', 0x80, b']']).unwrap();

        let loaded = JsonStore::new(&path).load().unwrap();

        assert!(loaded.books.is_empty());
        assert!(matches!(loaded.warning, Some(LoadWarning::Decode { .. })));
    }

    #[test]
    fn save_then_load_preserves_records_and_order() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("library.json"));

        store.save(&sample()).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.books, sample());
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn save_uses_four_space_indent() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("library.json"));

        store
            .save(&[Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", false)])
            .unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        let expected = "[\n    {\n        \"title\": \"Dune\",\n        \"author\": \"Frank Herbert\",\n        \"year\": 1965,\n        \"genre\": \"Sci-Fi\",\n        \"read\": false\n    }\n]";
        assert_eq!(written, expected);
    }

    #[test]
    fn save_overwrites_previous_content() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("library.json"));
        store.save(&sample()).unwrap();

        store.save(&[]).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        assert!(store.load().unwrap().books.is_empty());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/data/library.json"));

        store.save(&sample()).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn unreadable_path_is_a_read_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be cannot be read as text.
        let store = JsonStore::new(dir.path());

        let err = store.load().unwrap_err();

        assert!(matches!(err, StoreError::Read { .. }));
    }
}
