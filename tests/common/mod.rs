//! Shared fixtures for the split integration tests

#![allow(dead_code)]

use abundsplit::core::splitter::SplitInputs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory holding input files for one test
pub struct Fixture {
    temp_dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", name, e))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    /// File names in the fixture directory, sorted
    pub fn listing(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir())
            .expect("Failed to list fixture")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub const LIST: &str = "unique\t6\tA\tB\tC\tD\tE\tF\n0.03\t3\tA,B,C\tD\tE,F\n0.05\t2\tA,B,C,D\tE,F\n";

pub const GROUPS: &str = "A\tg1\nB\tg2\nC\tg1\nD\tg1\nE\tg2\nF\tg2\n";

pub const FASTA: &str = ">A\nAC\nGT\n>B\nACGA\n>C\nACGC\n>D sample=g1\nTTTT\n>E\nGGGG\n>F\nCCCC\n>G\nAAAA\n";

pub fn list_inputs(fixture: &Fixture) -> SplitInputs {
    SplitInputs {
        list: Some(fixture.write("run.list", LIST)),
        ..SplitInputs::default()
    }
}
