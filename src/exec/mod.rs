//! External process execution.

pub mod subprocess;
