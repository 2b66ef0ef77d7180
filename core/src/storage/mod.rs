//! Storage abstraction for persisted tracker state
//!
//! The store talks to an injected byte-oriented key-value backend, keeping
//! the core storage-agnostic and testable with an in-memory fake. Payload
//! encoding (JSON) is the store's concern; backends only move bytes.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Storage keys, one logical record per key
pub mod keys {
    pub const USER_PROFILE: &str = "userProfile";
    pub const DAILY_RECORDS: &str = "dailyRecords";
    pub const CRAVING_RECORDS: &str = "cravingRecords";
    pub const USER_GOALS: &str = "userGoals";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const APP_SETTINGS: &str = "appSettings";
    pub const HAS_COMPLETED_ONBOARDING: &str = "hasCompletedOnboarding";

    pub const ALL: [&str; 7] = [
        USER_PROFILE,
        DAILY_RECORDS,
        CRAVING_RECORDS,
        USER_GOALS,
        ACHIEVEMENTS,
        APP_SETTINGS,
        HAS_COMPLETED_ONBOARDING,
    ];
}

/// Errors from a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Byte-oriented key-value storage backend
pub trait Storage {
    /// Read the payload stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Durably associate `key` with `bytes`, replacing any prior payload.
    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Drop the payload stored under `key`; removing an absent key is not
    /// an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend for tests and ephemeral sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed backend: one JSON document per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    /// Open a file-backed store rooted at `data_dir`, creating the
    /// directory if needed.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.entry_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        fs::write(self.entry_path(key), bytes)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
