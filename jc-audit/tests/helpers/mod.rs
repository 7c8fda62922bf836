//! Shared helpers for jc-audit integration tests

#![allow(dead_code)]

use jc_common::config::AuditConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Temp workspace with a `journals/` directory and a roster file
pub struct Workspace {
    pub temp_dir: TempDir,
    pub journals: PathBuf,
    pub roster: PathBuf,
}

impl Workspace {
    pub fn new(roster: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let journals = temp_dir.path().join("journals");
        fs::create_dir_all(&journals).unwrap();
        let roster_path = write_file(temp_dir.path(), "names.txt", roster);
        Self {
            temp_dir,
            journals,
            roster: roster_path,
        }
    }

    /// Add a file below `journals/`
    pub fn journal(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.journals, relative, content)
    }

    pub fn config(&self, first_week: u32) -> AuditConfig {
        AuditConfig {
            directories: vec![self.journals.clone()],
            roster: Some(self.roster.clone()),
            first_week_of_work_year: first_week,
            max_distance: 2,
            log_level: "info".to_string(),
        }
    }
}
