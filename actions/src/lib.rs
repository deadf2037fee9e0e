//! # Rewind Actions
//!
//! Named commands for menus, toolbars and keyboard shortcuts.
//!
//! - [`Action`]: a command generic over its context type, built with
//!   [`ActionBuilder`]
//! - [`ActionCollector`]: the actions one component offers
//! - [`ContextualizedAction`]: an action bound to a context, ready to execute
//!
//! An action with an [undo manager](ActionBuilder::undoable) records its
//! effects as one undo step: toggles become a
//! [`ToggleEdit`](rewind_core::undo::ToggleEdit), everything else is grouped
//! into a compound edit named after the action.

mod action;
mod builder;
mod collector;
mod contextualized;
mod shortcut;

pub use action::{Action, Category, IfNotApplicable, NOT_APPLICABLE, ToggleState};
pub use builder::{ActionBuilder, ActionError};
pub use collector::ActionCollector;
pub use contextualized::{ContextualizedAction, dispatch_shortcut};
pub use shortcut::{Modifiers, Shortcut, ShortcutError};
