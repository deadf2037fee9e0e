//! # Rewind Demos
//!
//! Demo programs showcasing Rewind undo/redo.
//!
//! ## Available Demos
//!
//! - `history_demo` - Line-based editing session with undo, redo, compound
//!   edits and sub-manager panels

pub mod session;

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
