//! Refines a partition by sample group.

use crate::bio::groups::GroupMap;
use crate::bio::names::NameMap;
use crate::core::abundance::Abundance;
use crate::core::cancel::CancellationToken;
use crate::core::partition::Partition;
use crate::Result;
use std::collections::{BTreeMap, BTreeSet};

/// Identifiers bucketed by `(group, class)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StratifiedPartition {
    groups: Vec<String>,
    buckets: BTreeMap<(String, Abundance), BTreeSet<String>>,
    unresolved: BTreeSet<String>,
}

impl StratifiedPartition {
    /// Bucket every identifier of `partition` whose group is one of `groups`.
    ///
    /// Representatives and duplicates missing from the group map are
    /// collected in [`unresolved`](Self::unresolved) and left out; the
    /// partition itself is not touched.
    pub fn build(
        partition: &Partition,
        names: &NameMap,
        group_map: &GroupMap,
        groups: &[String],
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let selected: BTreeSet<&str> = groups.iter().map(String::as_str).collect();
        let mut stratified = Self {
            groups: groups.to_vec(),
            ..Self::default()
        };

        for (id, class) in partition.iter() {
            cancel.check()?;
            match group_map.group_of(id) {
                Some(group) if selected.contains(group) => {
                    stratified
                        .buckets
                        .entry((group.to_string(), class))
                        .or_default()
                        .insert(id.to_string());
                }
                Some(_) => {}
                None => {
                    stratified.unresolved.insert(id.to_string());
                }
            }

            for duplicate in names.duplicates_of(id) {
                if group_map.group_of(duplicate).is_none() {
                    stratified.unresolved.insert(duplicate.to_string());
                }
            }
        }

        Ok(stratified)
    }

    /// Selected groups, in selection order
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn get(&self, group: &str, class: Abundance) -> Option<&BTreeSet<String>> {
        self.buckets.get(&(group.to_string(), class))
    }

    pub fn ids<'a>(&'a self, group: &str, class: Abundance) -> impl Iterator<Item = &'a str> {
        self.get(group, class)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Identifiers left out because the group map has no entry for them,
    /// in identifier order
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.unresolved.iter().map(String::as_str)
    }
}
