//! # Rewind Core
//!
//! Undo/redo for interactive applications.
//!
//! - [`reactive`]: observable [`Variable`](reactive::Variable)s that UI code
//!   binds to
//! - [`undo`]: reversible edits and the hierarchical [`EditHistory`](undo::EditHistory)
//!   that records them

pub mod reactive;
pub mod undo;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
