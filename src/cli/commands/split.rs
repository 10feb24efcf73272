use crate::cli::formatter::{
    create_spinner_style, print_output_files, print_success, print_summary_table, print_warning,
};
use crate::core::cancel::CancellationToken;
use crate::core::config::{load_config, save_config, SplitConfig};
use crate::core::splitter::{SplitInputs, Splitter};
use crate::AbundSplitError;
use clap::Args;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// OTU list file; bins are classified by their number of sequences
    #[arg(short, long, value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// Names file; without a list, redundancy groups are classified by size
    #[arg(short, long, value_name = "FILE")]
    pub names: Option<PathBuf>,

    /// Group file mapping sequences to samples
    #[arg(short, long, value_name = "FILE")]
    pub group: Option<PathBuf>,

    /// FASTA file to split
    #[arg(short, long, value_name = "FILE")]
    pub fasta: Option<PathBuf>,

    /// Bins or groups with at most this many sequences are rare
    #[arg(short = 'k', long)]
    pub cutoff: Option<usize>,

    /// List labels to process, dash separated (e.g. 0.01-0.03), or "all"
    #[arg(long, value_name = "LABELS")]
    pub label: Option<String>,

    /// Groups to split by, dash separated (e.g. A-B-C), or "all"
    #[arg(long, value_name = "GROUPS")]
    pub groups: Option<String>,

    /// Also write .rare.accnos and .abund.accnos files
    #[arg(long)]
    pub accnos: bool,

    /// Output directory (default: directory of the list or names file)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Configuration file; command line flags take precedence
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective configuration to this file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,
}

impl SplitArgs {
    /// Merge the config file (if any) with command line overrides
    pub fn effective_config(&self) -> Result<SplitConfig, AbundSplitError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SplitConfig::default(),
        };

        if let Some(cutoff) = self.cutoff {
            config.cutoff = cutoff;
        }
        if let Some(label) = &self.label {
            config.labels = label.parse().map_err(AbundSplitError::Config)?;
        }
        if let Some(groups) = &self.groups {
            config.groups = groups.parse().map_err(AbundSplitError::Config)?;
        }
        if self.accnos {
            config.accnos = true;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }

        Ok(config)
    }

    pub fn inputs(&self) -> SplitInputs {
        SplitInputs {
            list: self.list.clone(),
            names: self.names.clone(),
            groups: self.group.clone(),
            fasta: self.fasta.clone(),
        }
    }
}

/// Cancel `cancel` when the user presses Ctrl-C
fn install_interrupt_handler(cancel: CancellationToken) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::debug!("Interrupt handler unavailable: {}", e);
                return;
            }
        };

        runtime.block_on(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping");
                cancel.cancel();
            }
        });
    });
}

pub fn run(args: SplitArgs) -> anyhow::Result<()> {
    let config = args.effective_config()?;
    config.validate()?;

    if let Some(path) = &args.save_config {
        save_config(path, &config)?;
        tracing::info!("Saved configuration to {}", path.display());
    }

    let cancel = CancellationToken::new();
    install_interrupt_handler(cancel.clone());

    let pb = ProgressBar::new_spinner();
    pb.set_style(create_spinner_style());
    pb.enable_steady_tick(Duration::from_millis(100));

    let progress = pb.clone();
    let splitter = Splitter::new(config, args.inputs())
        .with_cancellation(cancel)
        .with_progress_callback(move |label| progress.set_message(format!("Splitting {}...", label)));

    let outcome = splitter.run();
    pb.finish_and_clear();
    let outcome = outcome?;

    for warning in &outcome.warnings {
        print_warning(warning);
    }

    if outcome.cancelled {
        print_warning("Split interrupted; files of the interrupted pass were removed");
    } else {
        print_success(&format!(
            "Split {} label(s) at cutoff {}",
            outcome.summaries.len(),
            splitter.config().cutoff
        ));
    }

    if !outcome.summaries.is_empty() {
        print_summary_table(&outcome.summaries);
    }
    print_output_files(&outcome.outputs);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GroupSelection;
    use crate::core::labels::LabelSelection;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SplitArgs,
    }

    fn parse(argv: &[&str]) -> SplitArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_flags_build_config() {
        let args = parse(&["--names", "x.names", "-k", "3", "--groups", "A-B", "--accnos"]);
        let config = args.effective_config().unwrap();
        assert_eq!(config.cutoff, 3);
        assert_eq!(
            config.groups,
            GroupSelection::Only(vec!["A".to_string(), "B".to_string()])
        );
        assert_eq!(config.labels, LabelSelection::All);
        assert!(config.accnos);
        assert_eq!(args.inputs().names, Some(PathBuf::from("x.names")));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("split.toml");
        std::fs::write(&path, "cutoff = 10\nlabels = \"0.05\"\naccnos = true\n").unwrap();

        let args = parse(&["--list", "x.list", "-c", path.to_str().unwrap(), "-k", "2"]);
        let config = args.effective_config().unwrap();
        assert_eq!(config.cutoff, 2);
        assert_eq!(config.labels, "0.05".parse::<LabelSelection>().unwrap());
        assert!(config.accnos);
    }

    #[test]
    fn test_missing_cutoff_fails_validation() {
        let args = parse(&["--list", "x.list"]);
        assert!(args.effective_config().unwrap().validate().is_err());
    }
}
