pub mod config;
pub mod dictionary;
pub mod entry;
pub mod error;
pub mod merge;
pub mod report;
pub mod tag_ref;
pub mod translator;
pub mod tree_walk;
