//! Sample group map (`.groups`) reader.

use crate::{AbundSplitError, Result};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Maps sequence identifiers to the sample group they were observed in.
#[derive(Debug, Clone, Default)]
pub struct GroupMap {
    groups: HashMap<String, String>,
    names: BTreeSet<String>,
}

impl GroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut map = Self::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(id) = fields.next() else {
                continue;
            };
            let group = fields.next().ok_or_else(|| {
                AbundSplitError::Parse(format!("line {}: {} has no group", index + 1, id))
            })?;

            if map.groups.contains_key(id) {
                return Err(AbundSplitError::Parse(format!(
                    "line {}: {} is already in the group file",
                    index + 1,
                    id
                )));
            }
            map.insert(id.to_string(), group.to_string());
        }

        Ok(map)
    }

    pub fn insert(&mut self, id: String, group: String) {
        self.names.insert(group.clone());
        self.groups.insert(id, group);
    }

    /// Group of `id`, `None` when the identifier is not in the map
    pub fn group_of(&self, id: &str) -> Option<&str> {
        self.groups.get(id).map(String::as_str)
    }

    /// Every group name present in the map, sorted
    pub fn names_of_groups(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
