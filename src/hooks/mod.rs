//! External collaborators of the build.
//!
//! This module provides:
//! - `runner`: `$ASSETS_*` variables and command execution
//! - `preprocess`: templated style rendering per system
//! - `modules`: per-module asset processing and routing-file touch
//! - `collect`: static collection per system

mod collect;
mod modules;
mod preprocess;
mod runner;

pub use collect::collect_assets;
pub use modules::{process_module_assets, touch_routing_files};
pub use preprocess::preprocess_styles;
pub use runner::HookContext;
