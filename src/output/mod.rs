//! Fan-out of one partition into rare/abundant output files.

pub mod accnos;
pub mod fasta;
pub mod groups;
pub mod handles;
pub mod list;
pub mod names;

use crate::bio::groups::GroupMap;
use crate::bio::names::NameMap;
use crate::core::abundance::Abundance;
use crate::core::cancel::CancellationToken;
use crate::core::partition::Partition;
use crate::core::stratify::StratifiedPartition;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

pub use handles::PassHandles;

/// Kinds of file the splitter writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputKind {
    List,
    Names,
    Groups,
    Accnos,
    Fasta,
}

impl OutputKind {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::List => "list",
            OutputKind::Names => "names",
            OutputKind::Groups => "groups",
            OutputKind::Accnos => "accnos",
            OutputKind::Fasta => "fasta",
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Every file written, in emission order and grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFiles {
    by_kind: IndexMap<OutputKind, Vec<PathBuf>>,
    order: Vec<PathBuf>,
}

impl OutputFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: OutputKind, path: PathBuf) {
        self.by_kind.entry(kind).or_default().push(path.clone());
        self.order.push(path);
    }

    pub fn paths(&self, kind: OutputKind) -> &[PathBuf] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all(&self) -> &[PathBuf] {
        &self.order
    }

    /// Kinds with at least one file, in the order they were first written
    pub fn kinds(&self) -> impl Iterator<Item = (OutputKind, &[PathBuf])> {
        self.by_kind.iter().map(|(kind, paths)| (*kind, paths.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Input file name without its format extension (and without `.gz`)
pub fn stem_of(path: &Path) -> String {
    let mut stem = PathBuf::from(path.file_name().unwrap_or_default());
    if stem.extension().and_then(|e| e.to_str()) == Some("gz") {
        stem = PathBuf::from(stem.file_stem().unwrap_or_default());
    }
    stem.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// Builds output paths: `<dir>/<stem>.[<label>.][<group>.]<rare|abund>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNamer {
    dir: PathBuf,
    stem: String,
    tag: Option<String>,
}

impl OutputNamer {
    pub fn new(dir: impl Into<PathBuf>, input: &Path, tag: Option<&str>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem_of(input),
            tag: tag.map(str::to_string),
        }
    }

    pub fn path(&self, kind: OutputKind, group: Option<&str>, class: Abundance) -> PathBuf {
        let mut name = self.stem.clone();
        for part in [self.tag.as_deref(), group].into_iter().flatten() {
            name.push('.');
            name.push_str(part);
        }
        name.push('.');
        name.push_str(class.suffix());
        name.push('.');
        name.push_str(kind.extension());
        self.dir.join(name)
    }
}

/// Everything a writer pass reads. Shared, read-only, across all passes for
/// one label.
pub struct PassContext<'a> {
    pub partition: &'a Partition,
    pub stratified: Option<&'a StratifiedPartition>,
    /// Supplied names file, or the identity map of the snapshot
    pub names: &'a NameMap,
    pub group_map: Option<&'a GroupMap>,
    /// Selected groups; empty when not stratifying
    pub groups: &'a [String],
    pub cancel: &'a CancellationToken,
}

impl<'a> PassContext<'a> {
    pub fn stratifying(&self) -> bool {
        !self.groups.is_empty() && self.group_map.is_some()
    }

    pub fn is_selected(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    pub fn group_of(&self, id: &str) -> Option<&'a str> {
        self.group_map.and_then(|map| map.group_of(id))
    }

    /// Classified representatives with their duplicates, in identifier order.
    /// Representatives without a names entry stand for themselves.
    pub fn representatives(&self) -> impl Iterator<Item = (&'a str, Abundance, Vec<&'a str>)> + '_ {
        let names = self.names;
        self.partition
            .iter()
            .map(move |(id, class)| (id, class, names.duplicates_of(id)))
    }
}
