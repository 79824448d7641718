//! Whole-file JSON collection.
//!
//! # Responsibility
//! - Load and rewrite one JSON array file as a unit.
//! - Serialize read-modify-write cycles for callers sharing one value.
//!
//! # Invariants
//! - Files are written pretty-printed with 2-space indentation.
//! - The target file is replaced atomically via rename; readers never see a
//!   partial write.

use super::{StoreError, StoreResult};
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

/// Append-only JSON array stored in a single file.
pub struct JsonCollection<T> {
    name: &'static str,
    path: PathBuf,
    lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a handle for `path`. Nothing touches the filesystem until the
    /// first read or write.
    pub fn new(name: &'static str, path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            path: path.into(),
            lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every record in insertion order.
    pub fn load(&self) -> StoreResult<Vec<T>> {
        let _guard = self.guard();
        self.load_unlocked()
    }

    /// Appends one record and rewrites the file. Returns the new length.
    pub fn append(&self, record: T) -> StoreResult<usize> {
        let _guard = self.guard();
        let mut records = self.load_unlocked()?;
        records.push(record);
        self.write_unlocked(&records)?;
        debug!(
            "event=collection_append module=store status=ok collection={} count={}",
            self.name,
            records.len()
        );
        Ok(records.len())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load_unlocked(&self) -> StoreResult<Vec<T>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                error!(
                    "event=collection_load module=store status=error collection={} error_code=read_failed error={}",
                    self.name, err
                );
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        serde_json::from_str(&text).map_err(|err| {
            error!(
                "event=collection_load module=store status=error collection={} error_code=corrupt error={}",
                self.name, err
            );
            StoreError::Corrupt {
                path: self.path.clone(),
                message: err.to_string(),
            }
        })
    }

    fn write_unlocked(&self, records: &[T]) -> StoreResult<()> {
        let encoded = serde_json::to_string_pretty(records).map_err(|err| StoreError::Encode {
            path: self.path.clone(),
            message: err.to_string(),
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|err| self.io_error(&dir, err))?;

        let mut staged = NamedTempFile::new_in(&dir).map_err(|err| self.io_error(&dir, err))?;
        write_staged(&mut staged, encoded.as_bytes())
            .map_err(|err| self.io_error(staged.path(), err))?;
        staged
            .persist(&self.path)
            .map_err(|err| self.io_error(&self.path, err.error))?;
        Ok(())
    }

    fn io_error(&self, path: &Path, err: std::io::Error) -> StoreError {
        error!(
            "event=collection_write module=store status=error collection={} error_code=write_failed error={}",
            self.name, err
        );
        StoreError::Io {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

fn write_staged(staged: &mut NamedTempFile, bytes: &[u8]) -> std::io::Result<()> {
    staged.write_all(bytes)?;
    staged.write_all(b"\n")?;
    staged.as_file().sync_all()
}
