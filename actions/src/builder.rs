//! Fluent construction of [`Action`]s.

use std::sync::Arc;

use rewind_core::reactive::Variable;
use rewind_core::undo::UndoManager;
use thiserror::Error;

use crate::action::{Action, Body, Category, IfNotApplicable, Provider, ToggleState};
use crate::shortcut::{Shortcut, ShortcutError};

/// Error returned by [`ActionBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("action '{action}' has an invalid shortcut '{literal}': {source}")]
    InvalidShortcut {
        action: String,
        literal: String,
        source: ShortcutError,
    },
}

/// Builder for [`Action`].
///
/// Defaults: category [`Category::Unknown`], the name as description, always
/// applicable (hidden otherwise), no toggle state, an empty body and no undo
/// manager.
///
/// ```
/// use rewind_actions::{Action, Category};
/// use rewind_core::reactive::Variable;
///
/// let grid = Variable::new(false);
/// let action: Action<Variable<bool>> = Action::builder("toggle grid")
///     .category(Category::View)
///     .description("Show grid")
///     .shortcut("Ctrl+G")
///     .toggles(|grid: &Variable<bool>| grid.clone())
///     .build()?;
///
/// action.with_context(grid.clone()).execute()?;
/// assert!(grid.get());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ActionBuilder<C> {
    name: String,
    category: Category,
    shortcuts: Vec<String>,
    if_not_applicable: IfNotApplicable,
    description: Provider<C, String>,
    applicability: Provider<C, bool>,
    toggle_state: Provider<C, Option<ToggleState>>,
    execute: Body<C>,
    undo_manager: Provider<C, Option<Arc<dyn UndoManager>>>,
}

impl<C: 'static> ActionBuilder<C> {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let description = name.clone();
        Self {
            name,
            category: Category::Unknown,
            shortcuts: Vec::new(),
            if_not_applicable: IfNotApplicable::Hide,
            description: Arc::new(move |_: &C| description.clone()),
            applicability: Arc::new(|_: &C| true),
            toggle_state: Arc::new(|_: &C| None::<ToggleState>),
            execute: Arc::new(|_: &C| {}),
            undo_manager: Arc::new(|_: &C| None::<Arc<dyn UndoManager>>),
        }
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Sets a fixed description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = Arc::new(move |_: &C| description.clone());
        self
    }

    /// Computes the description from the context, e.g. `"Delete 3 items"`.
    #[must_use]
    pub fn description_with(
        mut self,
        description: impl Fn(&C) -> String + Send + Sync + 'static,
    ) -> Self {
        self.description = Arc::new(description);
        self
    }

    /// Adds a shortcut literal such as `"Ctrl+Shift+Z"`, validated by
    /// [`build`](Self::build).
    #[must_use]
    pub fn shortcut(mut self, literal: impl Into<String>) -> Self {
        self.shortcuts.push(literal.into());
        self
    }

    #[must_use]
    pub fn shortcuts<I, S>(mut self, literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shortcuts.extend(literals.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn executes(mut self, body: impl Fn(&C) + Send + Sync + 'static) -> Self {
        self.execute = Arc::new(body);
        self
    }

    /// Sets a toggle state without changing what the action does.
    #[must_use]
    pub fn toggle_state(
        mut self,
        state: impl Fn(&C) -> Option<ToggleState> + Send + Sync + 'static,
    ) -> Self {
        self.toggle_state = Arc::new(state);
        self
    }

    /// Makes the action flip the variable returned by `variable`.
    #[must_use]
    pub fn toggles(
        self,
        variable: impl Fn(&C) -> Variable<bool> + Send + Sync + 'static,
    ) -> Self {
        self.toggles_with(variable, |_, now| !now)
    }

    /// Like [`toggles`](Self::toggles), with `toggle` computing the next value
    /// from the context and the current one.
    #[must_use]
    pub fn toggles_with(
        self,
        variable: impl Fn(&C) -> Variable<bool> + Send + Sync + 'static,
        toggle: impl Fn(&C, bool) -> bool + Send + Sync + 'static,
    ) -> Self {
        let variable = Arc::new(variable);
        let state = Arc::clone(&variable);
        self.toggle_state(move |ctx| Some(ToggleState::Writable(state(ctx))))
            .executes(move |ctx| {
                let v = variable(ctx);
                v.set(toggle(ctx, v.get()));
            })
    }

    /// Makes the action set the variable to `value`. The action is toggled on
    /// while the variable holds `value`.
    #[must_use]
    pub fn selects<T>(
        self,
        value: T,
        variable: impl Fn(&C) -> Variable<T> + Send + Sync + 'static,
    ) -> Self
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        let variable = Arc::new(variable);
        let state = Arc::clone(&variable);
        let selected = value.clone();
        self.toggle_state(move |ctx| {
            let v = state(ctx);
            let selected = selected.clone();
            Some(ToggleState::Derived(Arc::new(move || v.get() == selected)))
        })
        .executes(move |ctx| variable(ctx).set(value.clone()))
    }

    /// Shows the action disabled whenever `predicate` is false.
    #[must_use]
    pub fn enable_when(mut self, predicate: impl Fn(&C) -> bool + Send + Sync + 'static) -> Self {
        self.applicability = Arc::new(predicate);
        self.if_not_applicable = IfNotApplicable::Disable;
        self
    }

    /// Hides the action whenever `predicate` is false.
    #[must_use]
    pub fn applicable_if(
        mut self,
        predicate: impl Fn(&C) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.applicability = Arc::new(predicate);
        self.if_not_applicable = IfNotApplicable::Hide;
        self
    }

    #[must_use]
    pub fn if_not_applicable(mut self, consequence: IfNotApplicable) -> Self {
        self.if_not_applicable = consequence;
        self
    }

    /// Records executions of the action on the manager returned by `manager`.
    #[must_use]
    pub fn undoable(
        mut self,
        manager: impl Fn(&C) -> Option<Arc<dyn UndoManager>> + Send + Sync + 'static,
    ) -> Self {
        self.undo_manager = Arc::new(manager);
        self
    }

    pub fn build(self) -> Result<Action<C>, ActionError> {
        let shortcuts = self
            .shortcuts
            .iter()
            .map(|literal| {
                literal
                    .parse::<Shortcut>()
                    .map_err(|source| ActionError::InvalidShortcut {
                        action: self.name.clone(),
                        literal: literal.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Action {
            name: self.name,
            category: self.category,
            shortcuts,
            if_not_applicable: self.if_not_applicable,
            description: self.description,
            applicability: self.applicability,
            toggle_state: self.toggle_state,
            execute: self.execute,
            undo_manager: self.undo_manager,
        })
    }
}
