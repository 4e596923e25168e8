//! Command-line interface module.
//!
//! One entry function per subcommand. Each checks only the external
//! programs it is going to run.

mod args;
pub mod scripts;
pub mod styles;
pub mod update;
pub mod watch;

pub use args::{Cli, Commands, Companion, UpdateArgs};
