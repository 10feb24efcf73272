/// Rare/abundant split pipeline

use crate::bio::groups::GroupMap;
use crate::bio::list::{ListReader, ListVector};
use crate::bio::names::NameMap;
use crate::core::abundance::Abundance;
use crate::core::cancel::CancellationToken;
use crate::core::config::SplitConfig;
use crate::core::labels::LabelResolver;
use crate::core::partition::Partition;
use crate::core::stratify::StratifiedPartition;
use crate::output::{
    accnos::write_accnos, fasta::write_fasta, groups::write_groups, list::write_list,
    names::write_names, OutputFiles, OutputNamer, PassContext,
};
use crate::{AbundSplitError, Result};
use std::path::{Path, PathBuf};

/// Input files of a split run
#[derive(Debug, Clone, Default)]
pub struct SplitInputs {
    pub list: Option<PathBuf>,
    pub names: Option<PathBuf>,
    pub groups: Option<PathBuf>,
    pub fasta: Option<PathBuf>,
}

/// Class sizes of one classified label (or of the names file)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSummary {
    pub label: Option<String>,
    pub rare: usize,
    pub abundant: usize,
    pub rare_bins: usize,
    pub abundant_bins: usize,
}

#[derive(Debug, Default)]
pub struct SplitOutcome {
    pub outputs: OutputFiles,
    pub summaries: Vec<LabelSummary>,
    /// Label substitutions reported while resolving requested labels
    pub warnings: Vec<String>,
    /// Set when the run stopped early; the interrupted pass left no files
    pub cancelled: bool,
}

/// Read-only state shared by every pass of a run
struct Loaded {
    names: Option<NameMap>,
    group_map: Option<GroupMap>,
    groups: Vec<String>,
    output_dir: PathBuf,
}

pub struct Splitter {
    config: SplitConfig,
    inputs: SplitInputs,
    cancel: CancellationToken,
    progress_callback: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl Splitter {
    pub fn new(config: SplitConfig, inputs: SplitInputs) -> Self {
        Self {
            config,
            inputs,
            cancel: CancellationToken::new(),
            progress_callback: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    fn report(&self, message: &str) {
        if let Some(callback) = &self.progress_callback {
            callback(message);
        }
    }

    /// Reject runs that could not produce anything
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if self.inputs.list.is_none() && self.inputs.names.is_none() {
            return Err(AbundSplitError::Config(
                "A list or names file is required to determine abundance".to_string(),
            ));
        }
        Ok(())
    }

    /// File whose name and location seed accnos naming and the default output directory
    fn abundance_input(&self) -> Result<&Path> {
        self.inputs
            .list
            .as_deref()
            .or(self.inputs.names.as_deref())
            .ok_or_else(|| AbundSplitError::Config("No abundance input".to_string()))
    }

    fn load(&self) -> Result<Loaded> {
        let names = self.inputs.names.as_ref().map(NameMap::load).transpose()?;
        let group_map = self.inputs.groups.as_ref().map(GroupMap::load).transpose()?;
        let groups = self.config.groups.resolve(group_map.as_ref());

        let output_dir = match &self.config.output_dir {
            Some(dir) => dir.clone(),
            None => match self.abundance_input()?.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        };
        std::fs::create_dir_all(&output_dir)?;

        Ok(Loaded {
            names,
            group_map,
            groups,
            output_dir,
        })
    }

    pub fn run(&self) -> Result<SplitOutcome> {
        self.validate()?;
        let loaded = self.load()?;
        let mut outcome = SplitOutcome::default();

        let result = match &self.inputs.list {
            Some(list) => self.run_list(list, &loaded, &mut outcome),
            None => self.run_names(&loaded, &mut outcome),
        };

        match result {
            Ok(()) => Ok(outcome),
            Err(AbundSplitError::Cancelled) => {
                tracing::warn!("Split cancelled, partial output of the interrupted pass removed");
                outcome.cancelled = true;
                Ok(outcome)
            }
            Err(e) => Err(e),
        }
    }

    fn run_list(&self, list: &Path, loaded: &Loaded, outcome: &mut SplitOutcome) -> Result<()> {
        let mut reader = ListReader::open(list)?;
        let mut resolver = LabelResolver::new(self.config.labels.clone());

        let result = resolver.run(&mut reader, &self.cancel, |snapshot| {
            self.split_snapshot(snapshot, loaded, outcome)
        });
        outcome.warnings.extend(resolver.warnings().iter().cloned());
        result
    }

    fn split_snapshot(&self, snapshot: &ListVector, loaded: &Loaded, outcome: &mut SplitOutcome) -> Result<()> {
        tracing::info!("Processing label {}", snapshot.label());
        self.report(snapshot.label());

        let partition = Partition::from_snapshot(snapshot, self.config.cutoff, &self.cancel)?;

        let identity;
        let names = match &loaded.names {
            Some(names) => names,
            None => {
                identity = NameMap::identity(snapshot.identifiers());
                &identity
            }
        };

        self.fan_out(&partition, Some(snapshot), names, loaded, outcome)
    }

    fn run_names(&self, loaded: &Loaded, outcome: &mut SplitOutcome) -> Result<()> {
        let names = loaded
            .names
            .as_ref()
            .ok_or_else(|| AbundSplitError::Config("No names file to split".to_string()))?;

        self.report("names");
        let partition = Partition::from_names(names, self.config.cutoff, &self.cancel)?;
        self.fan_out(&partition, None, names, loaded, outcome)
    }

    /// Write every requested output kind for one partition
    fn fan_out(
        &self,
        partition: &Partition,
        snapshot: Option<&ListVector>,
        names: &NameMap,
        loaded: &Loaded,
        outcome: &mut SplitOutcome,
    ) -> Result<()> {
        let stratified = match &loaded.group_map {
            Some(group_map) if !loaded.groups.is_empty() => Some(StratifiedPartition::build(
                partition,
                names,
                group_map,
                &loaded.groups,
                &self.cancel,
            )?),
            _ => None,
        };
        for id in stratified.iter().flat_map(|s| s.unresolved()) {
            tracing::warn!("{} is not in your groupfile, ignoring, please correct.", id);
        }

        let ctx = PassContext {
            partition,
            stratified: stratified.as_ref(),
            names,
            group_map: loaded.group_map.as_ref(),
            groups: &loaded.groups,
            cancel: &self.cancel,
        };

        let tag = partition.label();
        let namer = |input: &Path| OutputNamer::new(&loaded.output_dir, input, tag);
        let outputs = &mut outcome.outputs;

        if let (Some(snapshot), Some(list)) = (snapshot, &self.inputs.list) {
            self.cancel.check()?;
            write_list(&ctx, snapshot, namer(list.as_path()), outputs)?;
        }
        if let Some(names_file) = &self.inputs.names {
            self.cancel.check()?;
            write_names(&ctx, namer(names_file.as_path()), outputs)?;
        }
        if let (Some(groups_file), Some(_)) = (&self.inputs.groups, &loaded.group_map) {
            self.cancel.check()?;
            write_groups(&ctx, namer(groups_file.as_path()), outputs)?;
        }
        if self.config.accnos {
            self.cancel.check()?;
            write_accnos(&ctx, namer(self.abundance_input()?), outputs)?;
        }
        if let Some(fasta) = &self.inputs.fasta {
            self.cancel.check()?;
            write_fasta(&ctx, fasta, namer(fasta.as_path()), outputs)?;
        }

        outcome.summaries.push(LabelSummary {
            label: tag.map(str::to_string),
            rare: partition.count(Abundance::Rare),
            abundant: partition.count(Abundance::Abundant),
            rare_bins: partition.bins(Abundance::Rare),
            abundant_bins: partition.bins(Abundance::Abundant),
        });

        Ok(())
    }
}
