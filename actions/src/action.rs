//! Context-generic actions.

use std::fmt;
use std::sync::Arc;

use rewind_core::reactive::Variable;
use rewind_core::undo::UndoManager;

use crate::builder::ActionBuilder;
use crate::contextualized::ContextualizedAction;
use crate::shortcut::Shortcut;

/// Description shown for a mapped action whose target is missing.
pub const NOT_APPLICABLE: &str = "<not applicable>";

/// Menu an action belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    Unknown,
    File,
    Edit,
    View,
}

/// How UI surfaces present an action that is not applicable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IfNotApplicable {
    #[default]
    Hide,
    Disable,
}

/// The on/off state of a toggling or selecting action.
#[derive(Clone)]
pub enum ToggleState {
    /// A variable flipped by the action itself. Executing the action through
    /// an undo manager records the flip as one [`ToggleEdit`](rewind_core::undo::ToggleEdit).
    Writable(Variable<bool>),
    /// A state computed from other values, e.g. "this option is selected".
    Derived(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl ToggleState {
    pub fn get(&self) -> bool {
        match self {
            Self::Writable(variable) => variable.get(),
            Self::Derived(compute) => compute(),
        }
    }
}

impl fmt::Debug for ToggleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Writable(variable) => f.debug_tuple("Writable").field(&variable.get()).finish(),
            Self::Derived(compute) => f.debug_tuple("Derived").field(&compute()).finish(),
        }
    }
}

pub(crate) type Provider<C, T> = Arc<dyn Fn(&C) -> T + Send + Sync>;
pub(crate) type Body<C> = Arc<dyn Fn(&C) + Send + Sync>;

/// A named command that runs against a context of type `C`.
///
/// Everything besides the name, category and shortcuts is computed from the
/// context, so one `Action` serves every window or document it is shown in.
/// Bind it to a concrete context with [`with_context`](Self::with_context).
///
/// Actions are cheap to clone.
pub struct Action<C> {
    pub(crate) name: String,
    pub(crate) category: Category,
    pub(crate) shortcuts: Vec<Shortcut>,
    pub(crate) if_not_applicable: IfNotApplicable,
    pub(crate) description: Provider<C, String>,
    pub(crate) applicability: Provider<C, bool>,
    pub(crate) toggle_state: Provider<C, Option<ToggleState>>,
    pub(crate) execute: Body<C>,
    pub(crate) undo_manager: Provider<C, Option<Arc<dyn UndoManager>>>,
}

impl<C> Clone for Action<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            category: self.category,
            shortcuts: self.shortcuts.clone(),
            if_not_applicable: self.if_not_applicable,
            description: Arc::clone(&self.description),
            applicability: Arc::clone(&self.applicability),
            toggle_state: Arc::clone(&self.toggle_state),
            execute: Arc::clone(&self.execute),
            undo_manager: Arc::clone(&self.undo_manager),
        }
    }
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("shortcuts", &self.shortcuts)
            .field("if_not_applicable", &self.if_not_applicable)
            .finish_non_exhaustive()
    }
}

impl<C: 'static> Action<C> {
    /// Starts building an action called `name`.
    pub fn builder(name: impl Into<String>) -> ActionBuilder<C> {
        ActionBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn if_not_applicable(&self) -> IfNotApplicable {
        self.if_not_applicable
    }

    pub fn description(&self, context: &C) -> String {
        (self.description)(context)
    }

    pub fn is_applicable(&self, context: &C) -> bool {
        (self.applicability)(context)
    }

    pub fn toggle_state(&self, context: &C) -> Option<ToggleState> {
        (self.toggle_state)(context)
    }

    pub fn undo_manager(&self, context: &C) -> Option<Arc<dyn UndoManager>> {
        (self.undo_manager)(context)
    }

    /// Binds the action to `context`.
    pub fn with_context(&self, context: C) -> ContextualizedAction<C> {
        ContextualizedAction::new(self.clone(), context)
    }

    /// Lifts this action to contexts of type `D`.
    ///
    /// `f` extracts the target from the outer context. Where it yields `None`
    /// the mapped action is not applicable, describes itself as
    /// [`NOT_APPLICABLE`] and does nothing (with a warning) when executed.
    pub fn map<D, F>(&self, name: impl Into<String>, f: F) -> Action<D>
    where
        D: 'static,
        F: Fn(&D) -> Option<C> + Send + Sync + 'static,
    {
        let name = name.into();
        let f = Arc::new(f);
        let inner = self.clone();

        let description = {
            let (f, inner) = (Arc::clone(&f), inner.clone());
            Arc::new(move |d: &D| match f(d) {
                Some(target) => inner.description(&target),
                None => NOT_APPLICABLE.to_owned(),
            })
        };
        let applicability = {
            let (f, inner) = (Arc::clone(&f), inner.clone());
            Arc::new(move |d: &D| f(d).is_some_and(|target| inner.is_applicable(&target)))
        };
        let toggle_state = {
            let (f, inner) = (Arc::clone(&f), inner.clone());
            Arc::new(move |d: &D| f(d).and_then(|target| inner.toggle_state(&target)))
        };
        let execute = {
            let (f, inner, name) = (Arc::clone(&f), inner.clone(), name.clone());
            Arc::new(move |d: &D| match f(d) {
                Some(target) => (inner.execute)(&target),
                None => log::warn!("action '{name}' is not applicable in this context"),
            })
        };
        let undo_manager = {
            let (f, inner) = (Arc::clone(&f), inner.clone());
            Arc::new(move |d: &D| f(d).and_then(|target| inner.undo_manager(&target)))
        };

        Action {
            name,
            category: inner.category,
            shortcuts: inner.shortcuts.clone(),
            if_not_applicable: inner.if_not_applicable,
            description,
            applicability,
            toggle_state,
            execute,
            undo_manager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone)]
    struct Editor {
        text: Arc<Mutex<String>>,
    }

    fn clear_action() -> Action<Editor> {
        Action::builder("clear")
            .description("Clear text")
            .shortcut("Ctrl+L")
            .category(Category::Edit)
            .applicable_if(|e: &Editor| !e.text.lock().is_empty())
            .executes(|e: &Editor| e.text.lock().clear())
            .build()
            .unwrap()
    }

    #[test]
    fn accessors() {
        let action = clear_action();
        let editor = Editor {
            text: Arc::new(Mutex::new("abc".into())),
        };
        assert_eq!(action.name(), "clear");
        assert_eq!(action.category(), Category::Edit);
        assert_eq!(action.shortcuts()[0].to_string(), "Ctrl+L");
        assert_eq!(action.description(&editor), "Clear text");
        assert!(action.is_applicable(&editor));
        assert!(action.toggle_state(&editor).is_none());
        assert!(action.undo_manager(&editor).is_none());
    }

    #[test]
    fn mapped_action_follows_target() {
        let action = clear_action().map("clear focused", |focus: &Option<Editor>| focus.clone());
        let editor = Editor {
            text: Arc::new(Mutex::new("abc".into())),
        };

        let focused = Some(editor.clone());
        assert_eq!(action.name(), "clear focused");
        assert_eq!(action.description(&focused), "Clear text");
        assert!(action.is_applicable(&focused));
        action.with_context(focused).execute().unwrap();
        assert!(editor.text.lock().is_empty());
    }

    #[test]
    fn mapped_action_without_target() {
        let action = clear_action().map("clear focused", |focus: &Option<Editor>| focus.clone());
        assert_eq!(action.description(&None), NOT_APPLICABLE);
        assert!(!action.is_applicable(&None));
        assert!(action.with_context(None).execute().is_ok());
        assert_eq!(action.shortcuts().len(), 1);
    }

    #[test]
    fn derived_toggle_state() {
        let mode = Variable::new(1);
        let watched = mode.clone();
        let state = ToggleState::Derived(Arc::new(move || watched.get() == 2));
        assert!(!state.get());
        mode.set(2);
        assert!(state.get());
        assert_eq!(format!("{state:?}"), "Derived(true)");
    }
}
