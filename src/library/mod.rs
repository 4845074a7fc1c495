//! Persistent book collection.
//!
//! The whole library is one JSON array of [`Book`]s. Every mutation rewrites
//! the file: the new contents go to a sibling temp file which is then renamed
//! over the old one, so a crash leaves either the old or the new library.
//! Mutations build the next collection, write it and only then replace the
//! in-memory books, so a failed write leaves the store unchanged.

use crate::model::{Book, BookId, LibraryError};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Suffix for a library file that failed to decode and was moved aside.
pub const CORRUPT_SUFFIX: &str = "corrupt";

/// Book collection backed by a JSON file.
#[derive(Debug)]
pub struct LibraryStore {
    path: PathBuf,
    books: Vec<Book>,
}

impl LibraryStore {
    /// Load the library at `path`.
    ///
    /// A missing file is an empty library. A file that is not a valid library
    /// is renamed to `<file>.corrupt` and the library starts empty.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read, or a corrupt file cannot
    /// be moved aside.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let path = path.into();
        let books = load_books(&path)?;
        info!(path = %path.display(), books = books.len(), "Library loaded");
        Ok(Self { path, books })
    }

    /// Library file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All books in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Number of books.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the library has no books.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Book by id.
    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| &book.id == id)
    }

    /// Books the timeline can place.
    pub fn placed(&self) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(|book| book.is_placeable())
    }

    /// Books without a historical era, shown in the sidebar.
    pub fn needs_era(&self) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(|book| !book.has_historical_era)
    }

    /// Add one book unless it duplicates an existing one.
    ///
    /// A book with an ISBN duplicates any book with the same ISBN; a book
    /// without one duplicates a book with the same id. Returns whether the
    /// book was added.
    pub fn add(&mut self, book: Book) -> Result<bool, LibraryError> {
        let duplicate = match &book.isbn {
            Some(isbn) => self.books.iter().any(|b| b.isbn.as_ref() == Some(isbn)),
            None => self.books.iter().any(|b| b.id == book.id),
        };
        if duplicate {
            debug!(title = %book.title, "Skipping duplicate book");
            return Ok(false);
        }

        let mut next = self.books.clone();
        next.push(book);
        self.commit(next)?;
        Ok(true)
    }

    /// Add many books, skipping any whose ISBN or id is already present
    /// (including earlier books of the same batch). Returns how many were added.
    pub fn add_many(&mut self, incoming: Vec<Book>) -> Result<usize, LibraryError> {
        let mut isbns: HashSet<String> = self.books.iter().filter_map(|b| b.isbn.clone()).collect();
        let mut ids: HashSet<BookId> = self.books.iter().map(|b| b.id.clone()).collect();
        let mut next = self.books.clone();

        for book in incoming {
            let isbn_taken = book.isbn.as_ref().is_some_and(|isbn| isbns.contains(isbn));
            if isbn_taken || ids.contains(&book.id) {
                debug!(title = %book.title, "Skipping duplicate book");
                continue;
            }
            if let Some(isbn) = &book.isbn {
                isbns.insert(isbn.clone());
            }
            ids.insert(book.id.clone());
            next.push(book);
        }

        let added = next.len() - self.books.len();
        if added > 0 {
            self.commit(next)?;
        }
        Ok(added)
    }

    /// Remove a book by id, returning it.
    pub fn remove(&mut self, id: &BookId) -> Result<Book, LibraryError> {
        let index = self.index_of(id)?;
        let mut next = self.books.clone();
        let book = next.remove(index);
        self.commit(next)?;
        Ok(book)
    }

    /// Modify a book in place and persist.
    pub fn update(&mut self, id: &BookId, edit: impl FnOnce(&mut Book)) -> Result<&Book, LibraryError> {
        let index = self.index_of(id)?;
        let mut next = self.books.clone();
        edit(&mut next[index]);
        self.commit(next)?;
        Ok(&self.books[index])
    }

    /// Apply `edit` to every book matching `filter`, then persist once.
    /// Returns how many books matched.
    pub fn update_where(
        &mut self,
        filter: impl Fn(&Book) -> bool,
        mut edit: impl FnMut(&mut Book),
    ) -> Result<usize, LibraryError> {
        let mut next = self.books.clone();
        let mut touched = 0;
        for book in next.iter_mut().filter(|book| filter(book)) {
            edit(book);
            touched += 1;
        }
        if touched > 0 {
            self.commit(next)?;
        }
        Ok(touched)
    }

    /// Write the whole collection atomically.
    pub fn save(&self) -> Result<(), LibraryError> {
        write_books(&self.path, &self.books)
    }

    fn index_of(&self, id: &BookId) -> Result<usize, LibraryError> {
        self.books
            .iter()
            .position(|book| &book.id == id)
            .ok_or_else(|| LibraryError::NotFound(id.clone()))
    }

    /// Persist `next` and adopt it as the collection.
    fn commit(&mut self, next: Vec<Book>) -> Result<(), LibraryError> {
        write_books(&self.path, &next)?;
        self.books = next;
        Ok(())
    }
}

fn write_books(path: &Path, books: &[Book]) -> Result<(), LibraryError> {
    let write_err = |source| LibraryError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let json = serde_json::to_string_pretty(books)?;
    let tmp = sibling(path, "tmp");
    fs::write(&tmp, json).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)?;

    debug!(path = %path.display(), books = books.len(), "Library saved");
    Ok(())
}

fn load_books(path: &Path) -> Result<Vec<Book>, LibraryError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(LibraryError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(&contents) {
        Ok(books) => Ok(books),
        Err(e) => {
            let aside = sibling(path, CORRUPT_SUFFIX);
            warn!(
                path = %path.display(),
                moved_to = %aside.display(),
                error = %e,
                "Library file is corrupt; starting empty"
            );
            fs::rename(path, &aside).map_err(|source| LibraryError::Write {
                path: aside.clone(),
                source,
            })?;
            Ok(Vec::new())
        }
    }
}

/// `<path>.<suffix>` in the same directory.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EraSource, EraSpan};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LibraryStore {
        LibraryStore::open(dir.path().join("library.json")).unwrap()
    }

    fn book(title: &str, isbn: Option<&str>) -> Book {
        let mut book = Book::new(title, "Author");
        book.isbn = isbn.map(str::to_string);
        book
    }

    fn historical(title: &str, start: i32) -> Book {
        let mut book = book(title, None);
        book.era = EraSpan {
            start_year: Some(start),
            end_year: None,
            era_label: None,
            era_source: EraSource::Auto,
        };
        book.has_historical_era = true;
        book
    }

    #[test]
    fn missing_file_is_empty_library() {
        let dir = TempDir::new().unwrap();
        let library = store(&dir);
        assert!(library.is_empty());
        assert!(!library.path().exists());
    }

    #[test]
    fn saved_books_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);
        let original = historical("Band of Brothers", 1942);
        library.add(original.clone()).unwrap();

        let reopened = store(&dir);
        assert_eq!(reopened.books(), [original]);
    }

    #[test]
    fn save_creates_parent_directories_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("library.json");
        let mut library = LibraryStore::open(&path).unwrap();

        library.add(book("Dune", None)).unwrap();

        assert!(path.exists());
        assert!(!sibling(&path, "tmp").exists());
    }

    #[test]
    fn corrupt_file_is_moved_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "{not a library").unwrap();

        let library = LibraryStore::open(&path).unwrap();

        assert!(library.is_empty());
        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(sibling(&path, CORRUPT_SUFFIX)).unwrap(),
            "{not a library"
        );
    }

    #[test]
    fn blank_file_is_empty_library() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "\n").unwrap();

        assert!(LibraryStore::open(&path).unwrap().is_empty());
    }

    #[test]
    fn add_dedups_by_isbn() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);

        assert!(library.add(book("Sapiens", Some("9780062316097"))).unwrap());
        assert!(!library.add(book("Sapiens (reissue)", Some("9780062316097"))).unwrap());
        assert_eq!(library.len(), 1);
        assert_eq!(library.books()[0].title, "Sapiens");
    }

    #[test]
    fn add_without_isbn_dedups_by_id() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);
        let first = book("Dune", None);
        let same_id = Book {
            title: "Dune Messiah".to_string(),
            ..first.clone()
        };

        assert!(library.add(first).unwrap());
        assert!(!library.add(same_id).unwrap());
        assert!(library.add(book("Dune", None)).unwrap(), "fresh id is not a duplicate");
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn add_many_skips_existing_isbns_and_ids() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);
        let existing = book("Band of Brothers", Some("9780743224543"));
        library.add(existing.clone()).unwrap();

        let added = library
            .add_many(vec![
                book("Band of Brothers", Some("9780743224543")),
                existing,
                book("Atomic Habits", Some("9780735211292")),
                book("Atomic Habits (again)", Some("9780735211292")),
                book("No ISBN", None),
            ])
            .unwrap();

        assert_eq!(added, 2);
        let titles: Vec<&str> = library.books().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Band of Brothers", "Atomic Habits", "No ISBN"]);
    }

    #[test]
    fn add_many_of_nothing_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);
        assert_eq!(library.add_many(Vec::new()).unwrap(), 0);
        assert!(!library.path().exists());
    }

    #[test]
    fn remove_by_id() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);
        let dune = book("Dune", None);
        let id = dune.id.clone();
        library.add(dune).unwrap();
        library.add(book("Emma", None)).unwrap();

        let removed = library.remove(&id).unwrap();

        assert_eq!(removed.title, "Dune");
        assert_eq!(store(&dir).len(), 1);
        assert!(matches!(library.remove(&id), Err(LibraryError::NotFound(_))));
    }

    #[test]
    fn update_persists_edit() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);
        let dune = book("Dune", None);
        let id = dune.id.clone();
        library.add(dune).unwrap();

        let updated = library.update(&id, |b| b.set_manual_era("10191", "", "Arrakis")).unwrap();
        assert!(updated.has_historical_era);

        let reopened = store(&dir);
        let stored = reopened.get(&id).unwrap();
        assert_eq!(stored.era.start_year, Some(10191));
        assert_eq!(stored.era.era_source, EraSource::Manual);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);
        let missing = BookId::new("missing").unwrap();
        assert!(matches!(
            library.update(&missing, |_| {}),
            Err(LibraryError::NotFound(_))
        ));
    }

    #[test]
    fn partitions() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);
        let mut flagged_without_year = book("Odd", None);
        flagged_without_year.has_historical_era = true;
        library
            .add_many(vec![
                historical("Band of Brothers", 1942),
                book("Atomic Habits", None),
                flagged_without_year,
            ])
            .unwrap();

        let placed: Vec<&str> = library.placed().map(|b| b.title.as_str()).collect();
        let needs: Vec<&str> = library.needs_era().map(|b| b.title.as_str()).collect();
        assert_eq!(placed, ["Band of Brothers"]);
        assert_eq!(needs, ["Atomic Habits"]);
    }

    #[test]
    fn update_where_touches_matching_books_only() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);
        library
            .add_many(vec![historical("A", 1), book("B", None), book("C", None)])
            .unwrap();

        let touched = library
            .update_where(|b| !b.has_historical_era, |b| b.description = Some("x".into()))
            .unwrap();

        assert_eq!(touched, 2);
        assert_eq!(library.books()[0].description, None);
    }

    /// Occupy the library path with a directory so the final rename fails.
    fn block_writes(library: &LibraryStore) {
        if library.path().exists() {
            fs::remove_file(library.path()).unwrap();
        }
        fs::create_dir(library.path()).unwrap();
        fs::write(library.path().join("occupied"), "").unwrap();
    }

    #[test]
    fn failed_write_leaves_books_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut library = store(&dir);
        let dune = book("Dune", None);
        let id = dune.id.clone();
        library.add(dune).unwrap();
        block_writes(&library);

        assert!(matches!(
            library.add(book("Emma", None)),
            Err(LibraryError::Write { .. })
        ));
        assert!(library.add_many(vec![book("Emma", None)]).is_err());
        assert!(library.remove(&id).is_err());
        assert!(library
            .update(&id, |b| b.set_manual_era("10191", "", "Arrakis"))
            .is_err());
        assert!(library.update_where(|_| true, |b| b.title.clear()).is_err());

        assert_eq!(library.len(), 1);
        let stored = library.get(&id).unwrap();
        assert_eq!(stored.title, "Dune");
        assert!(!stored.has_historical_era);
    }
}
