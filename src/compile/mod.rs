//! Script and style compilation.
//!
//! | Module    | Purpose                                            |
//! |-----------|----------------------------------------------------|
//! | `scripts` | Batch and per-file script transpiling              |
//! | `styles`  | Full style passes over trees and explicit targets  |

pub mod scripts;
pub mod styles;

pub use scripts::ScriptCompiler;
pub use styles::{OutputStyle, SassCommand, StyleCompiler, StyleEngine};
