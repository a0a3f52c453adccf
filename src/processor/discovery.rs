//! File discovery module for TSF datasets
//!
//! Resolves the input path into the list of TSF files to convert: a single
//! file is taken as-is, a directory is walked recursively for `*.tsf`.

use crate::constants::TSF_EXTENSION;
use crate::error::{Result, TsfError};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File discovery component for TSF inputs
#[derive(Debug)]
pub struct FileDiscovery {
    input_path: PathBuf,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(input_path: PathBuf) -> Self {
        Self { input_path }
    }

    /// Root that discovered files are relative to
    pub fn root(&self) -> &Path {
        if self.input_path.is_file() {
            self.input_path.parent().unwrap_or_else(|| Path::new("."))
        } else {
            &self.input_path
        }
    }

    /// Discover all TSF files, sorted by path
    pub fn discover_tsf_files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_path.exists() {
            return Err(TsfError::FileNotFound {
                path: self.input_path.clone(),
            });
        }

        if self.input_path.is_file() {
            return Ok(vec![self.input_path.clone()]);
        }

        debug!("Searching for TSF files in: {}", self.input_path.display());

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.input_path).follow_links(true) {
            let entry = entry.map_err(|e| TsfError::ProcessingFailed {
                path: self.input_path.clone(),
                reason: format!("Directory traversal failed: {}", e),
            })?;
            if entry.file_type().is_file() && is_tsf(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!("Found {} TSF files", files.len());
        Ok(files)
    }
}

fn is_tsf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TSF_EXTENSION))
}
