//! Whole-document JSON persistence for the sanction ledger
use crate::error::StoreError;
use crate::ledger::LedgerDocument;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Flat-file store: the full document is read at the start of an operation
/// and written back at the end. No locking; callers keep the load → mutate →
/// save cycle inside one operation and hold nothing across requests.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted document. A missing, unreadable or malformed file
    /// yields an empty document instead of an error: a broken ledger file
    /// must not take the bot down.
    pub fn load(&self) -> LedgerDocument {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "ledger file absent, starting empty");
                return LedgerDocument::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ledger file unreadable, starting empty");
                return LedgerDocument::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ledger file malformed, starting empty");
                LedgerDocument::default()
            }
        }
    }

    /// Serialize the full document back to disk. Errors are typed so the
    /// service can decide whether to log or surface them.
    pub fn save(&self, doc: &LedgerDocument) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let raw = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
