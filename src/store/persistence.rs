//! Document persistence
//!
//! A [`DocumentSink`] owns the backing location of one store document.
//! [`FileSink`] writes through a sibling temporary file so readers only ever
//! observe the old or the new document; [`MemorySink`] keeps the text in
//! memory and counts writes.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Backing storage for a single document
pub trait DocumentSink {
    /// Current document text, or `None` if no document exists.
    fn read(&self) -> io::Result<Option<String>>;

    /// Replace the document with `text`.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Delete the document. Returns false if there was nothing to delete.
    fn remove(&mut self) -> io::Result<bool>;

    fn location(&self) -> &Path;
}

/// Filesystem document with atomic replacement
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Sibling temporary path used during writes: `<path>~`.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push("~");
        PathBuf::from(name)
    }

    fn write_temp(&self, temp: &Path, text: &str) -> io::Result<()> {
        let mut file = File::create(temp)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()
    }
}

impl DocumentSink for FileSink {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    io::Error::new(
                        e.kind(),
                        format!("Failed to create parent directory {:?}: {}", parent, e),
                    )
                })?;
            }
        }

        let temp = self.temp_path();
        if let Err(e) = self.write_temp(&temp, text) {
            let _ = fs::remove_file(&temp);
            return Err(io::Error::new(
                e.kind(),
                format!("Failed to write {:?}: {}", temp, e),
            ));
        }

        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            io::Error::new(
                e.kind(),
                format!("Failed to rename temp file to {:?}: {}", self.path, e),
            )
        })?;

        debug!(path = ?self.path, bytes = text.len(), "Document written");
        Ok(())
    }

    fn remove(&mut self) -> io::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = ?self.path, "Document removed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// In-memory document, for tests and ephemeral stores
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    location: PathBuf,
    text: Option<String>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            location: PathBuf::from("<memory>"),
            ..Self::default()
        }
    }

    /// Start with an existing document.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new()
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DocumentSink for MemorySink {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.text.clone())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.text = Some(text.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self) -> io::Result<bool> {
        Ok(self.text.take().is_some())
    }

    fn location(&self) -> &Path {
        &self.location
    }
}
