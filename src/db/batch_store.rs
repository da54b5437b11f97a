// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON file store for a single batch.
//!
//! A batch is always written as a whole: the new contents go to a temporary
//! file in the same directory, which is then renamed over the old file. A
//! crash mid-write leaves the previous ledger intact, never a partially
//! cascaded one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{LedgerError, Result};
use crate::models::Batch;

/// Batch file on disk.
#[derive(Debug, Clone)]
pub struct BatchStore {
    path: PathBuf,
}

impl BatchStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the batch.
    pub fn load(&self) -> Result<Batch> {
        let data = fs::read_to_string(&self.path).map_err(|e| {
            LedgerError::Storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let batch: Batch = serde_json::from_str(&data).map_err(|e| {
            LedgerError::Storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            batch_id = %batch.id,
            activities = batch.activities.len(),
            "Loaded batch"
        );
        Ok(batch)
    }

    /// Replace the stored batch atomically.
    pub fn save(&self, batch: &Batch) -> Result<()> {
        let data = serde_json::to_vec_pretty(batch)
            .map_err(|e| LedgerError::Storage(format!("Failed to serialize batch: {}", e)))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write = || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(dir)?;
            tmp.write_all(&data)?;
            tmp.write_all(b"\n")?;
            tmp.as_file().sync_all()?;
            tmp.persist(&self.path)?;
            Ok(())
        };

        write().map_err(|e| {
            LedgerError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        tracing::info!(
            path = %self.path.display(),
            batch_id = %batch.id,
            activities = batch.activities.len(),
            "Saved batch"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_leaves_only_the_batch_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = BatchStore::new(dir.path().join("mead.json"));
        store.save(&Batch::new("b1", "Mead")).unwrap();
        store.save(&Batch::new("b1", "Mead")).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("mead.json")]);
        assert_eq!(store.path(), dir.path().join("mead.json"));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let store = BatchStore::new("/nonexistent/dir/batch.json");
        let err = store.save(&Batch::new("b1", "Mead")).unwrap_err();
        assert_eq!(err.code(), "storage_error");
        assert!(err.to_string().contains("/nonexistent/dir/batch.json"));
    }

    #[test]
    fn test_missing_file_is_storage_error() {
        let store = BatchStore::new("/nonexistent/dir/batch.json");
        let err = store.load().unwrap_err();
        assert_eq!(err.code(), "storage_error");
    }
}
