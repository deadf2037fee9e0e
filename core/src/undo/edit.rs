//! Reversible edits.
//!
//! - [`Edit`]: a single reversible change with a human-readable description
//! - [`EditError`] / [`EditResult`]: failures reported by an edit's own
//!   `undo`/`redo`
//!
//! Edits are self-contained: each implementation stores the handles and
//! values it needs (a [`Variable`](crate::reactive::Variable), old and new
//! values, ...) and mutates them directly.

use std::any::Any;
use std::fmt;

use thiserror::Error;

/// Helper trait for downcasting trait objects to concrete types.
///
/// Automatically implemented for all `'static` types. Used by
/// [`Edit::merge`] to downcast `&dyn Edit` to a concrete edit type.
pub trait AsAny: 'static {
    /// Returns a reference to `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: 'static> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Error returned by [`Edit::undo`] and [`Edit::redo`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The edited object is not in the state the edit expects.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// A custom error with a description.
    #[error("{0}")]
    Custom(String),
}

/// Result type for edit operations.
pub type EditResult<T = ()> = Result<T, EditError>;

/// A reversible change (Command pattern).
///
/// `undo` followed by `redo` (or the other way round) must restore exactly
/// the same observable state.
///
/// # Merging
///
/// Edits that represent incremental changes (every step of a spinner drag)
/// can override [`merge`](Self::merge) so that consecutive edits coalesce
/// into one history entry. Use [`AsAny::as_any`] on `*other` (the boxed
/// edit, not the box) to downcast it.
///
/// # Object Safety
///
/// This trait is dyn-compatible so that different edit types can share one
/// history as `Box<dyn Edit>`.
///
/// # Example
///
/// ```
/// use rewind_core::reactive::Variable;
/// use rewind_core::undo::{Edit, EditResult};
///
/// #[derive(Debug)]
/// struct Rename {
///     name: Variable<String>,
///     old: String,
///     new: String,
/// }
///
/// impl Edit for Rename {
///     fn redo(&mut self) -> EditResult {
///         self.name.set(self.new.clone());
///         Ok(())
///     }
///
///     fn undo(&mut self) -> EditResult {
///         self.name.set(self.old.clone());
///         Ok(())
///     }
///
///     fn description(&self) -> &str {
///         "Rename"
///     }
/// }
/// ```
pub trait Edit: fmt::Debug + AsAny + Send {
    /// Re-applies the change.
    fn redo(&mut self) -> EditResult;

    /// Reverses the change.
    ///
    /// Must restore the state that existed before the change was made.
    fn undo(&mut self) -> EditResult;

    /// A short label for menus, e.g. `"Set width"`.
    fn description(&self) -> &str;

    /// Whether this edit may be placed on an undo stack.
    ///
    /// Default: `true`.
    fn can_undo(&self) -> bool {
        true
    }

    /// Tries to absorb `other`, which happened right after `self`.
    ///
    /// Returns `None` if `self` now covers both changes, or hands `other`
    /// back unchanged if the two edits cannot be combined. Only edits on the
    /// same target may be merged.
    ///
    /// Returns `Some(other)` by default (no merging).
    fn merge(&mut self, other: Box<dyn Edit>) -> Option<Box<dyn Edit>> {
        Some(other)
    }
}
