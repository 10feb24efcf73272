pub mod fasta;
pub mod groups;
pub mod list;
pub mod names;
pub mod sequence;

pub use groups::GroupMap;
pub use list::{ListReader, ListVector, SnapshotSource};
pub use names::NameMap;
pub use sequence::Sequence;

/// Split a comma separated identifier list, skipping empty entries.
pub fn split_names(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a dash separated selection such as `0.01-0.03` or `A-B-C`.
pub fn split_at_dash(field: &str) -> Vec<String> {
    field
        .split('-')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
