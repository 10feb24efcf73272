pub mod bio;
pub mod cli;
pub mod core;
pub mod output;

pub use crate::core::{
    abundance::{classify, Abundance},
    cancel::CancellationToken,
    config::SplitConfig,
    splitter::{SplitOutcome, Splitter},
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbundSplitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AbundSplitError>;
