//! Collaborators an edit session pushes results to.
//!
//! The session never owns the document: it reads the current text from a
//! [`DocumentStore`] at save time and hands the new text to the document,
//! parsed-JSON and graph stores in that order.
use crate::backup::zip_backup;
use crate::edit::to_pretty;
use crate::error::{Error, Result};
use crate::node::NodeSnapshot;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Source of truth for the document's serialized content.
pub trait DocumentStore {
    fn current_text(&self) -> Result<String>;
    /// Persists `text`, reformatting it as the store sees fit.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Last successfully parsed document text, as shown by the viewer.
pub trait ParsedJsonStore {
    fn text(&self) -> &str;
    fn set_text(&mut self, text: &str);
}

pub trait GraphStore {
    fn rebuild_from(&mut self, text: &str) -> Result<()>;
    fn list_nodes(&self) -> Vec<NodeSnapshot>;
    fn select_node(&mut self, node: &NodeSnapshot);
}

/// The three stores a save touches, borrowed for the duration of one save.
pub struct Collaborators<'a> {
    pub document: &'a mut dyn DocumentStore,
    pub parsed: &'a mut dyn ParsedJsonStore,
    pub graph: &'a mut dyn GraphStore,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    text: String,
    writes: usize,
}

impl MemoryDocumentStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            writes: 0,
        }
    }

    /// Number of successful `set_text` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn current_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        self.writes += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryParsedJsonStore {
    text: String,
}

impl MemoryParsedJsonStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl ParsedJsonStore for MemoryParsedJsonStore {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Zip the existing file next to it before every overwrite.
    pub backup_on_save: bool,
}

/// JSON document on disk. Writes are reformatted to 2-space pretty JSON.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    path: PathBuf,
    options: StoreOptions,
    last_backup: Option<PathBuf>,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            path: path.into(),
            options,
            last_backup: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options_mut(&mut self) -> &mut StoreOptions {
        &mut self.options
    }

    pub fn last_backup(&self) -> Option<&Path> {
        self.last_backup.as_deref()
    }
}

impl DocumentStore for FileDocumentStore {
    fn current_text(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::InvalidDocument(e.to_string()))?;
        if self.options.backup_on_save && self.path.exists() {
            let dest = zip_backup(&self.path).map_err(|e| Error::Backup(e.to_string()))?;
            self.last_backup = Some(dest);
        }
        fs::write(&self.path, to_pretty(&value)?)?;
        log::debug!("wrote {}", self.path.display());
        Ok(())
    }
}
