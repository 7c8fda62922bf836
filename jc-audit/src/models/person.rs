//! People and the roster of journal owners

use crate::error::{AuditError, AuditResult};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// A person who may own journals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    first_name: String,
    last_name: String,
    full_name: String,
}

impl Person {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let full_name = format!("{} {}", last_name, first_name);
        Self {
            first_name,
            last_name,
            full_name,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// "lastName firstName"
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

/// Ordered list of known journal owners
///
/// Built once per run and immutable afterwards. Owners are referenced by their
/// index, and resolution tie-breaks depend on this order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Roster {
    people: Vec<Person>,
}

impl Roster {
    /// Build a roster from an explicit list, keeping its order
    pub fn new(people: Vec<Person>) -> Self {
        Self { people }
    }

    /// Parse roster text with one `lastName;firstName` entry per line
    ///
    /// Whole lines are sorted lexicographically before parsing, so the sort key
    /// is the raw line and not just the last name. Blank lines are ignored.
    pub fn parse(content: &str) -> AuditResult<Self> {
        let mut lines: Vec<&str> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        lines.sort_unstable();

        let mut people = Vec::with_capacity(lines.len());
        for line in lines {
            let (last, first) = line.split_once(';').ok_or_else(|| {
                AuditError::Roster(format!("Expected 'lastName;firstName', got '{}'", line))
            })?;
            let first = first.split(';').next().unwrap_or_default().trim();
            let last = last.trim();
            if last.is_empty() || first.is_empty() {
                return Err(AuditError::Roster(format!("Incomplete roster entry '{}'", line)));
            }
            people.push(Person::new(first, last));
        }

        debug!(entries = people.len(), "Parsed roster");
        Ok(Self { people })
    }

    /// Read and parse a roster file
    pub fn load(path: &Path) -> AuditResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AuditError::Roster(format!("Cannot read roster {}: {}", path.display(), e))
        })?;
        let roster = Self::parse(&content)?;
        info!(path = %path.display(), entries = roster.len(), "Loaded roster");
        Ok(roster)
    }

    pub fn get(&self, index: usize) -> Option<&Person> {
        self.people.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
