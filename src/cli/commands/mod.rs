//! CLI command implementations

pub mod add;
pub mod export;
pub mod import;
pub mod list;
