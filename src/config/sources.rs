//! Configuration sources, applied after the merge-policy defaults.

pub mod env;
pub mod file;
