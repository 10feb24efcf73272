//! Redundancy map (`.names`) reader.
//!
//! Each line maps a representative identifier to the comma separated list of
//! identical sequences it stands for, the representative included.

use crate::bio::split_names;
use crate::{AbundSplitError, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a names file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut map = Self::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(representative) = fields.next() else {
                continue;
            };

            let duplicates = fields.next().map(split_names).unwrap_or_default();
            if duplicates.is_empty() {
                return Err(AbundSplitError::Parse(format!(
                    "line {}: {} has no duplicate list",
                    index + 1,
                    representative
                )));
            }

            if map.entries.contains_key(representative) {
                tracing::warn!(
                    "{} is listed more than once in the names file, keeping the last entry",
                    representative
                );
            }
            map.insert(representative.to_string(), duplicates);
        }

        Ok(map)
    }

    /// Build a map where every identifier only stands for itself
    pub fn identity<'a, I>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let entries = identifiers
            .into_iter()
            .map(|id| (id.to_string(), vec![id.to_string()]))
            .collect();
        Self { entries }
    }

    pub fn insert(&mut self, representative: String, duplicates: Vec<String>) {
        self.entries.insert(representative, duplicates);
    }

    pub fn get(&self, representative: &str) -> Option<&[String]> {
        self.entries.get(representative).map(Vec::as_slice)
    }

    /// Duplicates of `representative`, or the identifier alone when it has no
    /// entry of its own
    pub fn duplicates_of<'a>(&'a self, representative: &'a str) -> Vec<&'a str> {
        match self.entries.get(representative) {
            Some(duplicates) => duplicates.iter().map(String::as_str).collect(),
            None => vec![representative],
        }
    }

    /// Entries in representative order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(rep, dups)| (rep.as_str(), dups.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
