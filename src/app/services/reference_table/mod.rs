//! OCD-ID reference tables keyed by composite district identifier
//!
//! Each table is one CSV file mapping a `census_geoid_14` value of the form
//! `{sldu|sldl}-{GEOID}` to an OCD division `id`. Rows are kept in file order
//! with every column preserved, and an index built at load time gives O(1)
//! lookups with first-row-wins semantics for repeated keys.

use crate::app::models::MatchSource;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod loader;

#[cfg(test)]
pub mod tests;

/// One row of a reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRow {
    pub census_geoid_14: String,
    pub id: String,
    /// Every field of the source row, in header order
    pub values: Vec<String>,
}

/// A loaded reference table
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    pub(crate) path: PathBuf,
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<ReferenceRow>,

    /// Composite key to index of the first row carrying it
    pub(crate) index: HashMap<String, usize>,

    /// Rows whose key was already taken by an earlier row
    pub(crate) duplicate_keys: usize,
}

impl ReferenceTable {
    /// Create an empty table with the given header
    pub fn new(path: impl Into<PathBuf>, headers: Vec<String>) -> Self {
        Self {
            path: path.into(),
            headers,
            rows: Vec::new(),
            index: HashMap::new(),
            duplicate_keys: 0,
        }
    }

    /// Append a row; returns false if its key was already present
    pub fn push_row(&mut self, row: ReferenceRow) -> bool {
        let position = self.rows.len();
        let is_new = match self.index.entry(row.census_geoid_14.clone()) {
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(position);
                true
            }
            std::collections::hash_map::Entry::Occupied(_) => {
                self.duplicate_keys += 1;
                false
            }
        };
        self.rows.push(row);
        is_new
    }

    /// First row whose `census_geoid_14` equals `key`
    pub fn get(&self, key: &str) -> Option<&ReferenceRow> {
        self.index.get(key).map(|&position| &self.rows[position])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Value of an arbitrary column for a row of this table
    pub fn value<'a>(&self, row: &'a ReferenceRow, column: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|header| header == column)
            .and_then(|position| row.values.get(position))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }
}

/// The upper and lower chamber tables, consulted in that order
#[derive(Debug, Clone)]
pub struct DistrictReferences {
    pub sldu: ReferenceTable,
    pub sldl: ReferenceTable,
}

impl DistrictReferences {
    pub fn new(sldu: ReferenceTable, sldl: ReferenceTable) -> Self {
        Self { sldu, sldl }
    }

    /// Resolve a composite key to an OCD-ID, preferring the upper table
    pub fn lookup(&self, key: &str) -> Option<(MatchSource, &str)> {
        if let Some(row) = self.sldu.get(key) {
            return Some((MatchSource::Upper, row.id.as_str()));
        }
        self.sldl
            .get(key)
            .map(|row| (MatchSource::Lower, row.id.as_str()))
    }

    pub fn total_rows(&self) -> usize {
        self.sldu.len() + self.sldl.len()
    }

    pub fn duplicate_keys(&self) -> usize {
        self.sldu.duplicate_keys() + self.sldl.duplicate_keys()
    }
}
