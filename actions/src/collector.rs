//! Named sets of actions sharing one context type.

use crate::action::{Action, Category};
use crate::builder::{ActionBuilder, ActionError};
use crate::contextualized::ContextualizedAction;

/// An ordered list of actions for context `C`, e.g. everything a text editor
/// offers in its menus.
///
/// Actions added through [`add_action`](Self::add_action) get the collector's
/// current [`category`](Self::set_category) as their default.
pub struct ActionCollector<C> {
    actions: Vec<Action<C>>,
    category: Category,
}

impl<C> Default for ActionCollector<C> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            category: Category::Unknown,
        }
    }
}

impl<C> std::fmt::Debug for ActionCollector<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionCollector")
            .field("actions", &self.actions)
            .field("category", &self.category)
            .finish()
    }
}

impl<C: 'static> ActionCollector<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn add(&mut self, action: Action<C>) {
        self.actions.push(action);
    }

    /// Appends every action of `other`.
    pub fn add_all(&mut self, other: &ActionCollector<C>) {
        self.actions.extend(other.actions.iter().cloned());
    }

    /// Adds `action` lifted to this collector's context through `f`.
    pub fn add_mapped<D: 'static>(
        &mut self,
        action: &Action<D>,
        f: impl Fn(&C) -> Option<D> + Send + Sync + 'static,
    ) {
        self.add(action.map(action.name(), f));
    }

    /// Adds every action of `other`, lifted through `f`.
    pub fn add_all_mapped<D, F>(&mut self, other: &ActionCollector<D>, f: F)
    where
        D: 'static,
        F: Fn(&C) -> Option<D> + Clone + Send + Sync + 'static,
    {
        for action in &other.actions {
            self.add(action.map(action.name(), f.clone()));
        }
    }

    /// Builds an action in place.
    ///
    /// ```
    /// use rewind_actions::{ActionCollector, Category};
    ///
    /// let mut actions = ActionCollector::<()>::new();
    /// actions.set_category(Category::File);
    /// actions.add_action("save", |a| a.description("Save").shortcut("Ctrl+S"))?;
    ///
    /// let save = actions.get("save").unwrap();
    /// assert_eq!(save.category(), Category::File);
    /// # Ok::<(), rewind_actions::ActionError>(())
    /// ```
    pub fn add_action(
        &mut self,
        name: impl Into<String>,
        configure: impl FnOnce(ActionBuilder<C>) -> ActionBuilder<C>,
    ) -> Result<(), ActionError> {
        let builder = ActionBuilder::new(name).category(self.category);
        self.add(configure(builder).build()?);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Action<C>> {
        self.actions.iter().find(|action| action.name() == name)
    }

    pub fn actions(&self) -> &[Action<C>] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Binds every action to `context`.
    pub fn with_context(&self, context: C) -> Vec<ContextualizedAction<C>>
    where
        C: Clone,
    {
        self.actions
            .iter()
            .map(|action| action.with_context(context.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewind_core::reactive::Variable;

    fn view_actions() -> ActionCollector<Variable<bool>> {
        let mut actions = ActionCollector::<Variable<bool>>::new();
        actions.set_category(Category::View);
        actions
            .add_action("grid", |a| a.toggles(|grid: &Variable<bool>| grid.clone()))
            .unwrap();
        actions
            .add_action("hide grid", |a| {
                a.category(Category::Edit)
                    .executes(|grid: &Variable<bool>| grid.set(false))
            })
            .unwrap();
        actions
    }

    #[test]
    fn add_action_uses_collector_category() {
        let actions = view_actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions.get("grid").unwrap().category(), Category::View);
        assert_eq!(actions.get("hide grid").unwrap().category(), Category::Edit);
        assert!(actions.get("missing").is_none());
    }

    #[test]
    fn with_context_binds_all() {
        let grid = Variable::new(false);
        let bound = view_actions().with_context(grid.clone());
        bound[0].execute().unwrap();
        assert!(grid.get());
        bound[1].execute().unwrap();
        assert!(!grid.get());
    }

    #[test]
    fn mapped_collectors() {
        #[derive(Clone)]
        struct Window {
            grid: Option<Variable<bool>>,
        }

        let mut window_actions = ActionCollector::<Window>::new();
        window_actions.add_all_mapped(&view_actions(), |w: &Window| w.grid.clone());
        assert_eq!(window_actions.len(), 2);

        let grid = Variable::new(false);
        let with_canvas = Window {
            grid: Some(grid.clone()),
        };
        let without_canvas = Window { grid: None };

        let toggle = window_actions.get("grid").unwrap();
        assert!(toggle.is_applicable(&with_canvas));
        assert!(!toggle.is_applicable(&without_canvas));
        toggle.with_context(with_canvas).execute().unwrap();
        assert!(grid.get());
    }

    #[test]
    fn add_all_and_add_mapped() {
        let mut all = ActionCollector::new();
        all.add_all(&view_actions());
        all.add_all(&view_actions());
        assert_eq!(all.len(), 4);

        let mut lifted = ActionCollector::<(Variable<bool>, u8)>::new();
        lifted.add_mapped(all.get("grid").unwrap(), |(grid, _)| Some(grid.clone()));
        assert_eq!(lifted.actions()[0].name(), "grid");
    }
}
