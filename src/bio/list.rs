//! Clustering snapshot (`.list`) reader.
//!
//! Each non-blank line holds one snapshot:
//! `label <tab> number-of-bins <tab> bin <tab> bin ...`, where a bin is a
//! comma separated list of sequence identifiers.

use crate::bio::split_names;
use crate::{AbundSplitError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One labeled clustering of the sequence collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListVector {
    label: String,
    bins: Vec<Vec<String>>,
}

impl ListVector {
    pub fn new(label: impl Into<String>, bins: Vec<Vec<String>>) -> Self {
        Self {
            label: label.into(),
            bins,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bins(&self) -> &[Vec<String>] {
        &self.bins
    }

    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    /// Total number of identifiers across all bins
    pub fn num_seqs(&self) -> usize {
        self.bins.iter().map(Vec::len).sum()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.bins.iter().flatten().map(String::as_str)
    }

    /// Parse a single snapshot line
    pub fn parse_line(line: &str, line_number: usize) -> Result<Self> {
        let mut fields = line.split_whitespace();

        let label = fields.next().ok_or_else(|| {
            AbundSplitError::Parse(format!("line {}: missing snapshot label", line_number))
        })?;

        let declared: usize = fields
            .next()
            .ok_or_else(|| {
                AbundSplitError::Parse(format!(
                    "line {}: missing bin count for label {}",
                    line_number, label
                ))
            })?
            .parse()
            .map_err(|_| {
                AbundSplitError::Parse(format!(
                    "line {}: bin count for label {} is not a number",
                    line_number, label
                ))
            })?;

        let bins: Vec<Vec<String>> = fields
            .map(split_names)
            .filter(|bin| !bin.is_empty())
            .collect();

        if bins.len() != declared {
            return Err(AbundSplitError::Parse(format!(
                "line {}: label {} declares {} bins but has {}",
                line_number,
                label,
                declared,
                bins.len()
            )));
        }

        Ok(Self::new(label, bins))
    }
}

/// A lazily advanced sequence of labeled snapshots.
pub trait SnapshotSource {
    /// Pull the next snapshot, `None` once the source is exhausted
    fn next_snapshot(&mut self) -> Result<Option<ListVector>>;

    /// Fetch the snapshot whose label matches `label` exactly
    fn snapshot_for(&mut self, label: &str) -> Result<Option<ListVector>>;
}

/// Reads snapshots from a `.list` file one line at a time.
pub struct ListReader {
    path: PathBuf,
    lines: std::io::Lines<BufReader<File>>,
    line_number: usize,
}

impl ListReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            path,
            line_number: 0,
        })
    }
}

impl SnapshotSource for ListReader {
    fn next_snapshot(&mut self) -> Result<Option<ListVector>> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return ListVector::parse_line(&line, self.line_number).map(Some);
        }
        Ok(None)
    }

    fn snapshot_for(&mut self, label: &str) -> Result<Option<ListVector>> {
        // A fresh reader keeps the forward iteration position untouched
        let mut lookup = ListReader::open(&self.path)?;
        while let Some(snapshot) = lookup.next_snapshot()? {
            if snapshot.label() == label {
                return Ok(Some(snapshot));
            }
        }
        Ok(None)
    }
}
