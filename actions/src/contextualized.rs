//! Actions bound to a concrete context.

use std::fmt;
use std::sync::Arc;

use rewind_core::undo::{ToggleEdit, UndoError, UndoManager, compound_edit};

use crate::action::{Action, Category, IfNotApplicable, ToggleState};
use crate::shortcut::Shortcut;

/// An [`Action`] together with the context it runs in. This is what menus,
/// toolbars and shortcut handlers work with.
pub struct ContextualizedAction<C> {
    action: Action<C>,
    context: C,
}

impl<C: fmt::Debug> fmt::Debug for ContextualizedAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextualizedAction")
            .field("action", &self.action)
            .field("context", &self.context)
            .finish()
    }
}

impl<C: Clone> Clone for ContextualizedAction<C> {
    fn clone(&self) -> Self {
        Self {
            action: self.action.clone(),
            context: self.context.clone(),
        }
    }
}

impl<C: 'static> ContextualizedAction<C> {
    pub fn new(action: Action<C>, context: C) -> Self {
        Self { action, context }
    }

    pub fn action(&self) -> &Action<C> {
        &self.action
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn name(&self) -> &str {
        self.action.name()
    }

    pub fn category(&self) -> Category {
        self.action.category()
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        self.action.shortcuts()
    }

    pub fn if_not_applicable(&self) -> IfNotApplicable {
        self.action.if_not_applicable()
    }

    pub fn description(&self) -> String {
        self.action.description(&self.context)
    }

    pub fn is_applicable(&self) -> bool {
        self.action.is_applicable(&self.context)
    }

    pub fn toggle_state(&self) -> Option<ToggleState> {
        self.action.toggle_state(&self.context)
    }

    pub fn undo_manager(&self) -> Option<Arc<dyn UndoManager>> {
        self.action.undo_manager(&self.context)
    }

    /// Runs the action.
    ///
    /// Without an undo manager the body just runs. With one, a writable
    /// toggle variable that the body flipped is recorded as a single
    /// [`ToggleEdit`]; any other action is wrapped in a compound edit named
    /// after the action's description, so everything it records undoes in
    /// one step.
    pub fn execute(&self) -> Result<(), UndoError> {
        let run = || (self.action.execute)(&self.context);
        let Some(manager) = self.undo_manager() else {
            run();
            return Ok(());
        };

        match self.toggle_state() {
            Some(ToggleState::Writable(variable)) => {
                let before = variable.get();
                run();
                if variable.get() != before {
                    manager.record(Box::new(ToggleEdit::new(self.description(), variable)))?;
                }
                Ok(())
            }
            _ => compound_edit(&*manager, self.description(), run),
        }
    }

    /// Runs the action if it is applicable. Returns whether it ran.
    pub fn trigger(&self) -> Result<bool, UndoError> {
        if !self.is_applicable() {
            log::debug!("action '{}' is not applicable, ignoring", self.name());
            return Ok(false);
        }
        self.execute()?;
        Ok(true)
    }
}

/// Triggers the first applicable action bound to `shortcut`.
///
/// Returns `Ok(false)` if no applicable action uses the shortcut.
pub fn dispatch_shortcut<C: 'static>(
    actions: &[ContextualizedAction<C>],
    shortcut: &Shortcut,
) -> Result<bool, UndoError> {
    for action in actions {
        if action.shortcuts().contains(shortcut) && action.is_applicable() {
            log::trace!("shortcut {shortcut} triggers '{}'", action.name());
            action.execute()?;
            return Ok(true);
        }
    }
    Ok(false)
}
