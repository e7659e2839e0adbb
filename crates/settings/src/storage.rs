//! Abstraction over the non-volatile storage holding the persisted settings
//! document, plus the two provided implementations.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

/// Fixed name of the blob holding the persisted settings document.
pub const SETTINGS_BLOB: &str = "settings.json";

/// Terminator appended after the document text when persisting.
pub const BLOB_TERMINATOR: char = '\0';

/// One named text blob on non-volatile storage.
///
/// The store accesses it at two points only (boot load and explicit save),
/// single-threaded, so implementations need no internal locking.
pub trait BlobStore {
    /// Whether a blob with this name exists.
    fn exists(&self, name: &str) -> bool;

    /// Read the blob's text up to (not including) the terminator.
    fn read(&self, name: &str) -> io::Result<String>;

    /// Overwrite the blob with `contents` followed by the terminator.
    fn write(&self, name: &str, contents: &str) -> io::Result<()>;

    /// Remove the blob. Returns whether a blob existed.
    fn remove(&self, name: &str) -> io::Result<bool>;
}

fn strip_terminator(text: String) -> String {
    match text.find(BLOB_TERMINATOR) {
        Some(end) => text[..end].to_owned(),
        None => text,
    }
}

/// Filesystem-backed blob store rooted at a directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl BlobStore for FsBlobStore {
    fn exists(&self, name: &str) -> bool {
        self.blob_path(name).exists()
    }

    fn read(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.blob_path(name)).map(strip_terminator)
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.blob_path(name), format!("{contents}{BLOB_TERMINATOR}"))
    }

    fn remove(&self, name: &str) -> io::Result<bool> {
        let path = self.blob_path(name);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}

/// In-memory blob store.
///
/// Clones share the same backing map, so a test (or a RAM-disk deployment)
/// can keep a handle to the storage it handed to the settings store. The
/// execution model is single-threaded, hence `Rc<RefCell<..>>`.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn exists(&self, name: &str) -> bool {
        self.blobs.borrow().contains_key(name)
    }

    fn read(&self, name: &str) -> io::Result<String> {
        self.blobs
            .borrow()
            .get(name)
            .cloned()
            .map(strip_terminator)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no blob named {name}")))
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        self.blobs
            .borrow_mut()
            .insert(name.to_owned(), format!("{contents}{BLOB_TERMINATOR}"));
        Ok(())
    }

    fn remove(&self, name: &str) -> io::Result<bool> {
        Ok(self.blobs.borrow_mut().remove(name).is_some())
    }
}
