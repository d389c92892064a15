//! Durable Store
//!
//! Owns one root tree and keeps it in sync with a JSON document. Loading
//! decodes the document onto the root; saving encodes the root with defaults
//! omitted, merged over the previous document so unknown keys survive.
//! Saving skips the write when nothing changed and deletes the document when
//! the root has nothing left to persist.

pub mod persistence;

pub use persistence::{DocumentSink, FileSink, MemorySink};

use crate::codec::{decode, encode_into, Encoded};
use crate::diagnostics::Diagnostics;
use crate::error::StoreError;
use crate::tree::node::Node;
use crate::tree::walker::{walk, Traversal};
use serde_json::Value;
use std::io;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use tracing::debug;

/// Whether the root reflects a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// No document has been decoded; the root holds its defaults or
    /// whatever the application set directly.
    Unloaded,
    Loaded,
}

/// What a call to [`Store::save`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The merged document was written.
    Written,
    /// The merged document equals the one already stored; nothing written.
    Unchanged,
    /// The root has no content, and the existing document was deleted.
    Removed,
    /// The root has no content, and there was no document to delete.
    Absent,
}

/// Store behaviour switches
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Render documents with indentation instead of compact text.
    pub pretty: bool,
    /// Channel for recoverable load and save issues.
    pub diagnostics: Diagnostics,
}

impl StoreOptions {
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// A persistent root tree
///
/// Single-writer: the store assumes exclusive access to the root for the
/// duration of every call. Hosts that share a store across threads wrap it in
/// [`SharedStore`](crate::sync::SharedStore).
pub struct Store<T: Node + Default, S: DocumentSink = FileSink> {
    root: T,
    sink: S,
    options: StoreOptions,
    state: StoreState,
}

impl<T: Node + Default> Store<T, FileSink> {
    /// Open the store backed by the file at `path` and load it.
    ///
    /// A document that fails to load is reported through the diagnostic
    /// channel and the root keeps its defaults.
    pub fn open<P: AsRef<Path>>(path: P, options: StoreOptions) -> Self {
        Self::with_sink(FileSink::new(path), options)
    }
}

impl<T: Node + Default, S: DocumentSink> Store<T, S> {
    /// Create a store over an arbitrary sink and load it.
    pub fn with_sink(sink: S, options: StoreOptions) -> Self {
        let mut store = Self {
            root: T::default(),
            sink,
            options,
            state: StoreState::Unloaded,
        };
        if let Err(err) = store.load() {
            store.options.diagnostics.report(err);
        }
        store
    }

    pub fn root(&self) -> &T {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut T {
        &mut self.root
    }

    pub fn path(&self) -> &Path {
        self.sink.location()
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.options.diagnostics
    }

    pub fn into_root(self) -> T {
        self.root
    }

    /// Decode the stored document onto the root.
    ///
    /// A missing document is not an error and leaves the state unchanged.
    /// Unparsable text fails the call without touching the root. Shape
    /// mismatches inside a parsable document are reported and skipped.
    pub fn load(&mut self) -> Result<(), StoreError> {
        let Some(text) = self.sink.read()? else {
            debug!(path = ?self.sink.location(), "No document to load");
            return Ok(());
        };

        let value: Value = serde_json::from_str(&text).map_err(|source| StoreError::Parse {
            path: self.sink.location().to_path_buf(),
            source,
        })?;

        if let Err(err) = decode(&value, &mut self.root, &self.options.diagnostics) {
            self.options.diagnostics.report(err);
        }
        self.state = StoreState::Loaded;
        debug!(path = ?self.sink.location(), "Document loaded");
        Ok(())
    }

    /// Persist the root.
    pub fn save(&mut self) -> Result<SaveOutcome, StoreError> {
        let diag = &self.options.diagnostics;

        // Corrupt content on disk is overwritten rather than blocking the save.
        let previous = match self.sink.read() {
            Ok(Some(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => Some(value),
                Err(e) => {
                    diag.report(format_args!(
                        "ignoring unreadable document {:?}: {}",
                        self.sink.location(),
                        e
                    ));
                    None
                }
            },
            Ok(None) => None,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                diag.report(format_args!(
                    "ignoring undecodable document {:?}: {}",
                    self.sink.location(),
                    e
                ));
                None
            }
            Err(e) => return Err(e.into()),
        };

        let mut document = previous.clone().unwrap_or(Value::Null);
        if encode_into(&self.root, &mut document, true, diag) != Encoded::Content {
            let outcome = if self.sink.remove()? {
                SaveOutcome::Removed
            } else {
                SaveOutcome::Absent
            };
            debug!(path = ?self.sink.location(), ?outcome, "Nothing to persist");
            return Ok(outcome);
        }

        if previous.as_ref() == Some(&document) {
            debug!(path = ?self.sink.location(), "Document unchanged, skipping write");
            return Ok(SaveOutcome::Unchanged);
        }

        let rendered = if self.options.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        let text = rendered.map_err(|source| StoreError::Render {
            path: self.sink.location().to_path_buf(),
            source,
        })?;

        self.sink.write(&text)?;
        Ok(SaveOutcome::Written)
    }

    /// Call `visitor` on every scalar leaf of the root with its path.
    pub fn for_each_leaf(&self, mut visitor: impl FnMut(&str, &dyn Node)) {
        walk(&self.root, Traversal::Leaves, &mut |path, node| visitor(path, node));
    }
}

impl<T: Node + Default, S: DocumentSink> Deref for Store<T, S> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.root
    }
}

impl<T: Node + Default, S: DocumentSink> DerefMut for Store<T, S> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.root
    }
}
