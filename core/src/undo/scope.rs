//! Scoped helpers around an [`UndoManager`].
//!
//! Both guards restore the manager on every exit path, including unwinding
//! panics, so a failing action can neither leave a compound edit open nor
//! leave recording disabled.

use super::manager::{UndoError, UndoManager};

/// Groups everything recorded while `f` runs into one undo step called
/// `description`.
///
/// ```
/// use rewind_core::reactive::Variable;
/// use rewind_core::undo::{compound_edit, update_variable, EditHistory, UndoManager};
///
/// let history = EditHistory::new();
/// let (width, height) = (Variable::new(1), Variable::new(1));
///
/// compound_edit(&history, "Resize", || -> Result<(), rewind_core::undo::UndoError> {
///     update_variable(&width, 4, &history, "Set width")?;
///     update_variable(&height, 3, &history, "Set height")
/// })??;
///
/// assert_eq!(history.undo_text().get(), "Undo Resize");
/// history.undo()?;
/// assert_eq!((width.get(), height.get()), (1, 1));
/// # Ok::<(), rewind_core::undo::UndoError>(())
/// ```
pub fn compound_edit<M, R>(
    manager: &M,
    description: impl Into<String>,
    f: impl FnOnce() -> R,
) -> Result<R, UndoError>
where
    M: UndoManager + ?Sized,
{
    let guard = CompoundEditGuard::begin(manager, description);
    let result = f();
    guard.finish()?;
    Ok(result)
}

/// Runs `f` with recording disabled on `manager`, then restores it.
pub fn without_undo<M, R>(manager: &M, f: impl FnOnce() -> R) -> R
where
    M: UndoManager + ?Sized,
{
    let _suspended = ActivitySuspension::new(manager);
    f()
}

/// An open compound edit that is closed when the guard goes away.
///
/// If the manager already had a compound edit open, `begin` is ignored by the
/// manager and this guard does not close the outer one.
#[must_use = "the compound edit is closed as soon as the guard is dropped"]
pub struct CompoundEditGuard<'a, M: UndoManager + ?Sized> {
    manager: &'a M,
    /// `Some` while this guard owns the open compound edit.
    description: Option<String>,
}

impl<'a, M: UndoManager + ?Sized> CompoundEditGuard<'a, M> {
    pub fn begin(manager: &'a M, description: impl Into<String>) -> Self {
        let opened = manager.begin_compound_edit(None);
        Self {
            manager,
            description: opened.then(|| description.into()),
        }
    }

    /// Whether this guard opened the compound edit it will close.
    pub fn owns_compound(&self) -> bool {
        self.description.is_some()
    }

    /// Closes the compound edit and records it.
    pub fn finish(mut self) -> Result<(), UndoError> {
        match self.description.take() {
            Some(description) => self.manager.finish_compound_edit(Some(&description)),
            None => Ok(()),
        }
    }
}

impl<M: UndoManager + ?Sized> Drop for CompoundEditGuard<'_, M> {
    fn drop(&mut self) {
        if let Some(description) = self.description.take()
            && let Err(err) = self.manager.finish_compound_edit(Some(&description))
        {
            log::error!("closing compound edit '{description}' failed: {err}");
        }
    }
}

/// Disables recording on a manager until dropped.
///
/// Does nothing if the manager was already inactive.
pub struct ActivitySuspension<'a, M: UndoManager + ?Sized> {
    manager: &'a M,
    suspended: bool,
}

impl<'a, M: UndoManager + ?Sized> ActivitySuspension<'a, M> {
    pub fn new(manager: &'a M) -> Self {
        let suspended = manager.is_active();
        if suspended {
            manager.set_active(false);
        }
        Self { manager, suspended }
    }
}

impl<M: UndoManager + ?Sized> Drop for ActivitySuspension<'_, M> {
    fn drop(&mut self) {
        if self.suspended {
            self.manager.set_active(true);
        }
    }
}
