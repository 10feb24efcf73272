pub mod commands;
pub mod formatter;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "abundsplit",
    version,
    about = "Split clustered sequence collections into rare and abundant fractions",
    long_about = "abundsplit classifies OTU bins or redundancy groups as rare or abundant using a \
                  size cutoff, then writes matching rare/abundant list, names, group, accnos and \
                  FASTA files, optionally split further by sample group."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split files into rare and abundant fractions
    Split(commands::split::SplitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_split_command() {
        let cli = Cli::try_parse_from([
            "abundsplit",
            "split",
            "--list",
            "run.list",
            "--cutoff",
            "2",
            "--label",
            "0.03",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Split(args) = cli.command;
        assert_eq!(args.cutoff, Some(2));
        assert_eq!(args.label.as_deref(), Some("0.03"));
    }
}
