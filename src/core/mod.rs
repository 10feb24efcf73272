pub mod abundance;
pub mod cancel;
pub mod config;
pub mod labels;
pub mod partition;
pub mod splitter;
pub mod stratify;
