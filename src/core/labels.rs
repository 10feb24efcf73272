//! Chooses which clustering snapshots get classified.
//!
//! Snapshots arrive ordered by increasing dissimilarity. A requested label
//! that never shows up is answered by the next coarser snapshot when one
//! follows it in the file, otherwise by the last snapshot seen.

use crate::bio::list::{ListVector, SnapshotSource};
use crate::bio::split_at_dash;
use crate::core::cancel::CancellationToken;
use crate::{AbundSplitError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Which snapshot labels the caller asked for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LabelSelection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl std::str::FromStr for LabelSelection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(LabelSelection::All);
        }
        let labels: BTreeSet<String> = split_at_dash(s).into_iter().collect();
        if labels.is_empty() {
            return Err(format!("No labels in '{}'", s));
        }
        Ok(LabelSelection::Only(labels))
    }
}

impl TryFrom<String> for LabelSelection {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LabelSelection> for String {
    fn from(selection: LabelSelection) -> Self {
        match selection {
            LabelSelection::All => "all".to_string(),
            LabelSelection::Only(labels) => labels.into_iter().collect::<Vec<_>>().join("-"),
        }
    }
}

/// Numeric position of a label in the snapshot ordering, `unique` first.
fn label_rank(label: &str) -> Option<f64> {
    if label.eq_ignore_ascii_case("unique") {
        return Some(-1.0);
    }
    label.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Compare two labels, `None` when either cannot be ordered
pub fn compare_labels(a: &str, b: &str) -> Option<Ordering> {
    label_rank(a)?.partial_cmp(&label_rank(b)?)
}

pub struct LabelResolver {
    /// `None` means every label is wanted
    pending: Option<BTreeSet<String>>,
    processed: BTreeSet<String>,
    processed_order: Vec<String>,
    last_label_seen: Option<String>,
    warnings: Vec<String>,
}

impl LabelResolver {
    pub fn new(selection: LabelSelection) -> Self {
        let pending = match selection {
            LabelSelection::All => None,
            LabelSelection::Only(labels) => Some(labels),
        };
        Self {
            pending,
            processed: BTreeSet::new(),
            processed_order: Vec::new(),
            last_label_seen: None,
            warnings: Vec::new(),
        }
    }

    /// Labels classified so far, in processing order
    pub fn processed(&self) -> &[String] {
        &self.processed_order
    }

    /// Label warnings raised during the run
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn wants(&self, label: &str) -> bool {
        match &self.pending {
            None => true,
            Some(pending) => pending.contains(label),
        }
    }

    fn is_done(&self) -> bool {
        matches!(&self.pending, Some(pending) if pending.is_empty())
    }

    fn mark_processed(&mut self, label: &str) {
        if self.processed.insert(label.to_string()) {
            self.processed_order.push(label.to_string());
        }
        if let Some(pending) = &mut self.pending {
            pending.remove(label);
        }
    }

    fn warn(&mut self, message: String) {
        tracing::debug!("{}", message);
        self.warnings.push(message);
    }

    /// Walk `source`, calling `process` once for every snapshot chosen.
    pub fn run<S, F>(
        &mut self,
        source: &mut S,
        cancel: &CancellationToken,
        mut process: F,
    ) -> Result<()>
    where
        S: SnapshotSource + ?Sized,
        F: FnMut(&ListVector) -> Result<()>,
    {
        while !self.is_done() {
            cancel.check()?;

            let Some(snapshot) = source.next_snapshot()? else {
                break;
            };
            let label = snapshot.label().to_string();

            if self.wants(&label) {
                tracing::debug!("Classifying requested label {}", label);
                process(&snapshot)?;
                self.mark_processed(&label);
            }

            // Pending labels ordered before this one can no longer appear
            let overtaken: Vec<String> = match &self.pending {
                Some(pending) => pending
                    .iter()
                    .filter(|missing| compare_labels(missing, &label) == Some(Ordering::Less))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            };
            for missing in overtaken {
                if let Some(pending) = &mut self.pending {
                    pending.remove(&missing);
                }
                if self.processed.contains(&label) {
                    self.warn(format!(
                        "Your file does not include the label {}. Please refer to {}.",
                        missing, label
                    ));
                } else {
                    self.warn(format!(
                        "Your file does not include the label {}. I will use {}.",
                        missing, label
                    ));
                    process(&snapshot)?;
                    self.mark_processed(&label);
                }
            }

            self.last_label_seen = Some(label);
        }

        let remaining: Vec<String> = match self.pending.take() {
            Some(pending) => pending.into_iter().collect(),
            None => Vec::new(),
        };
        if remaining.is_empty() {
            return Ok(());
        }

        let Some(last) = self.last_label_seen.clone() else {
            for missing in remaining {
                self.warn(format!("Your file does not include the label {}.", missing));
            }
            self.pending = Some(BTreeSet::new());
            return Ok(());
        };

        let mut need_to_run = false;
        for missing in remaining {
            if self.processed.contains(&last) || need_to_run {
                self.warn(format!(
                    "Your file does not include the label {}. Please refer to {}.",
                    missing, last
                ));
            } else {
                self.warn(format!(
                    "Your file does not include the label {}. I will use {}.",
                    missing, last
                ));
                need_to_run = true;
            }
        }

        if need_to_run {
            cancel.check()?;
            let snapshot = source.snapshot_for(&last)?.ok_or_else(|| {
                AbundSplitError::Other(format!("Label {} disappeared from the list file", last))
            })?;
            process(&snapshot)?;
            self.mark_processed(&last);
        }

        self.pending = Some(BTreeSet::new());
        Ok(())
    }
}
