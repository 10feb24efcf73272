//! Rare/abundant partition of one snapshot or of a whole redundancy map.

use crate::bio::list::ListVector;
use crate::bio::names::NameMap;
use crate::core::abundance::{classify, Abundance};
use crate::core::cancel::CancellationToken;
use crate::Result;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Size-frequency distribution of a snapshot: bin size to number of bins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SAbund {
    frequencies: BTreeMap<usize, usize>,
}

impl SAbund {
    pub fn from_list(list: &ListVector) -> Self {
        let mut frequencies = BTreeMap::new();
        for bin in list.bins() {
            *frequencies.entry(bin.len()).or_insert(0) += 1;
        }
        Self { frequencies }
    }

    pub fn num_bins(&self) -> usize {
        self.frequencies.values().sum()
    }

    /// Bins whose size does not exceed `cutoff`
    pub fn bins_up_to(&self, cutoff: usize) -> usize {
        self.frequencies.range(..=cutoff).map(|(_, count)| count).sum()
    }
}

/// Every identifier filed under exactly one abundance class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    label: Option<String>,
    cutoff: usize,
    classes: BTreeMap<String, Abundance>,
    rare_bins: usize,
    abundant_bins: usize,
}

impl Partition {
    fn empty(label: Option<String>, cutoff: usize) -> Self {
        Self {
            label,
            cutoff,
            classes: BTreeMap::new(),
            rare_bins: 0,
            abundant_bins: 0,
        }
    }

    fn file(&mut self, id: &str, class: Abundance) {
        match self.classes.entry(id.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(class);
            }
            Entry::Occupied(existing) => {
                tracing::warn!(
                    "{} appears more than once, keeping its first classification ({})",
                    id,
                    existing.get()
                );
            }
        }
    }

    /// Classify every bin of a snapshot by its number of identifiers
    pub fn from_snapshot(
        snapshot: &ListVector,
        cutoff: usize,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let mut partition = Self::empty(Some(snapshot.label().to_string()), cutoff);

        for bin in snapshot.bins() {
            cancel.check()?;
            let class = classify(bin.len(), cutoff);
            for id in bin {
                partition.file(id, class);
            }
        }

        let sabund = SAbund::from_list(snapshot);
        partition.rare_bins = sabund.bins_up_to(cutoff);
        partition.abundant_bins = sabund.num_bins() - partition.rare_bins;

        tracing::debug!(
            "Label {}: {} rare bins, {} abundant bins",
            snapshot.label(),
            partition.rare_bins,
            partition.abundant_bins
        );

        Ok(partition)
    }

    /// Classify every representative by the size of its duplicate list
    pub fn from_names(names: &NameMap, cutoff: usize, cancel: &CancellationToken) -> Result<Self> {
        let mut partition = Self::empty(None, cutoff);

        for (representative, duplicates) in names.iter() {
            cancel.check()?;
            partition.file(representative, classify(duplicates.len(), cutoff));
        }

        Ok(partition)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    pub fn class_of(&self, id: &str) -> Option<Abundance> {
        self.classes.get(id).copied()
    }

    /// All identifiers with their class, in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Abundance)> {
        self.classes.iter().map(|(id, class)| (id.as_str(), *class))
    }

    /// Identifiers of one class, in identifier order
    pub fn ids(&self, class: Abundance) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(move |(_, c)| *c == class)
            .map(|(id, _)| id)
    }

    pub fn count(&self, class: Abundance) -> usize {
        self.ids(class).count()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Bin totals; both zero outside snapshot mode
    pub fn bins(&self, class: Abundance) -> usize {
        match class {
            Abundance::Rare => self.rare_bins,
            Abundance::Abundant => self.abundant_bins,
        }
    }
}
