//! Shared helpers: process execution, paths, files, globs.

pub mod exec;
pub mod fs;
pub mod glob;
pub mod path;
pub mod plural;
