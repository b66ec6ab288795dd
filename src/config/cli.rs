use crate::domain::ports::Storage;
use crate::utils::error::{RationError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads reference tables from the local filesystem, relative to `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".".to_string())
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        tracing::debug!("Reading {}", full_path.display());

        if !full_path.is_file() {
            return Err(RationError::MissingFile {
                path: path.to_string(),
            });
        }

        fs::read(&full_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RationError::MissingFile {
                path: path.to_string(),
            },
            _ => RationError::IoError(e),
        })
    }
}
