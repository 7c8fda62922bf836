//! Journal file discovery
//!
//! Walks the configured directories recursively, in a fixed order, and sorts
//! every file into one of three buckets: journal-like, candidate document or
//! other file.

use crate::models::journal::JOURNAL_KEYWORD;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// File scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Bucket a discovered file falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileClass {
    /// Named like a journal; gets a full record
    Journal,
    /// Word document that may be a misnamed journal
    Candidate,
    /// Anything else
    Other,
}

/// Files found in all scanned directories, in discovery order
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub journals: Vec<PathBuf>,
    pub candidates: Vec<PathBuf>,
    pub other_files: Vec<PathBuf>,
}

impl ScanResult {
    pub fn total(&self) -> usize {
        self.journals.len() + self.candidates.len() + self.other_files.len()
    }
}

/// Recursive journal file scanner
pub struct FileScanner {
    ignore_patterns: Vec<String>,
    max_distance: usize,
}

impl FileScanner {
    /// Create a scanner; `max_distance` is the typo tolerance for the journal keyword
    ///
    /// Ignores system files like .DS_Store, Thumbs.db, .git.
    pub fn new(max_distance: usize) -> Self {
        Self {
            ignore_patterns: vec![
                ".DS_Store".to_string(),
                "Thumbs.db".to_string(),
                ".git".to_string(),
            ],
            max_distance,
        }
    }

    /// Scan every directory in order and classify the files found
    ///
    /// Directories that cannot be scanned are logged and skipped.
    pub fn scan_all(&self, roots: &[PathBuf]) -> ScanResult {
        let mut result = ScanResult::default();
        for root in roots {
            match self.scan(root) {
                Ok(files) => {
                    for file in files {
                        match self.classify(&file) {
                            FileClass::Journal => result.journals.push(file),
                            FileClass::Candidate => result.candidates.push(file),
                            FileClass::Other => result.other_files.push(file),
                        }
                    }
                }
                Err(e) => tracing::warn!("Skipping directory: {}", e),
            }
        }

        tracing::info!(
            journals = result.journals.len(),
            candidates = result.candidates.len(),
            other = result.other_files.len(),
            "Scan complete"
        );
        result
    }

    /// All files below `root`, sorted by file name within each directory
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let mut files = Vec::new();
        let mut symlink_visited = HashSet::new();

        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, &mut symlink_visited));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                }
            }
        }

        tracing::debug!(root = %root_path.display(), files = files.len(), "Directory scanned");
        Ok(files)
    }

    /// Decide which bucket `path` belongs to
    pub fn classify(&self, path: &Path) -> FileClass {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if self.is_journal_name(&file_name) {
            return FileClass::Journal;
        }

        let is_document = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase().contains("doc"))
            .unwrap_or(false);
        if is_document {
            FileClass::Candidate
        } else {
            FileClass::Other
        }
    }

    /// Contains the keyword, or starts with a near miss of it
    fn is_journal_name(&self, lower_name: &str) -> bool {
        if lower_name.contains(JOURNAL_KEYWORD) {
            return true;
        }
        let prefix: String = lower_name
            .chars()
            .take(JOURNAL_KEYWORD.chars().count())
            .collect();
        strsim::levenshtein(&prefix, JOURNAL_KEYWORD) <= self.max_distance
    }

    fn should_process_entry(
        &self,
        entry: &DirEntry,
        symlink_visited: &mut HashSet<PathBuf>,
    ) -> bool {
        let file_name = entry.file_name().to_string_lossy();

        for pattern in &self.ignore_patterns {
            if file_name.contains(pattern) {
                return false;
            }
        }

        if entry.file_type().is_symlink() {
            if let Ok(canonical) = entry.path().canonicalize() {
                if !symlink_visited.insert(canonical) {
                    tracing::warn!("Symlink loop detected: {}", entry.path().display());
                    return false;
                }
            }
        }

        true
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new(jc_common::config::DEFAULT_MAX_DISTANCE)
    }
}
