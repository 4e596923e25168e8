//! Core types - pure abstractions shared across the codebase.

mod options;
mod state;
mod system;
mod tree;

pub use options::CompileOptions;
pub use state::{is_shutdown, register_watch, setup_shutdown_handler, unregister_watch};
pub use system::System;
pub use tree::{Applicability, OutputTarget, SourceTree, ThemeOverlay};
