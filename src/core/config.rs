use crate::bio::groups::GroupMap;
use crate::bio::split_at_dash;
use crate::core::labels::LabelSelection;
use crate::AbundSplitError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which sample groups to stratify by
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GroupSelection {
    #[default]
    None,
    All,
    Only(Vec<String>),
}

impl std::str::FromStr for GroupSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(GroupSelection::None);
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(GroupSelection::All);
        }
        let mut groups: Vec<String> = Vec::new();
        for group in split_at_dash(s) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        if groups.is_empty() {
            return Err(format!("No groups in '{}'", s));
        }
        Ok(GroupSelection::Only(groups))
    }
}

impl TryFrom<String> for GroupSelection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GroupSelection> for String {
    fn from(selection: GroupSelection) -> Self {
        match selection {
            GroupSelection::None => String::new(),
            GroupSelection::All => "all".to_string(),
            GroupSelection::Only(groups) => groups.join("-"),
        }
    }
}

impl GroupSelection {
    /// Concrete group names to stratify by; empty means no stratification
    pub fn resolve(&self, group_map: Option<&GroupMap>) -> Vec<String> {
        match (self, group_map) {
            (GroupSelection::None, _) => Vec::new(),
            (_, None) => {
                tracing::warn!(
                    "You cannot select groups without a valid groupfile, I will disregard your groups selection."
                );
                Vec::new()
            }
            (GroupSelection::All, Some(map)) => map.names_of_groups(),
            (GroupSelection::Only(groups), Some(_)) => groups.clone(),
        }
    }
}

/// Settings for one split run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Bins or redundancy groups with at most this many sequences are rare
    pub cutoff: usize,
    pub labels: LabelSelection,
    pub groups: GroupSelection,
    /// Also write `.accnos` lists of the classified identifiers
    pub accnos: bool,
    /// Defaults to the directory of the abundance input
    pub output_dir: Option<PathBuf>,
}

impl SplitConfig {
    pub fn new(cutoff: usize) -> Self {
        Self {
            cutoff,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), AbundSplitError> {
        if self.cutoff == 0 {
            return Err(AbundSplitError::Config(
                "You must provide a cutoff to qualify what is abundant".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SplitConfig, AbundSplitError> {
    let contents = std::fs::read_to_string(path)?;
    let config: SplitConfig = toml::from_str(&contents)
        .map_err(|e| AbundSplitError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &SplitConfig) -> Result<(), AbundSplitError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| AbundSplitError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
