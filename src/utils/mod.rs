//! Shared utilities: environment probing, path resolution, terminal output.

pub mod env;
pub mod paths;
pub mod terminal;
