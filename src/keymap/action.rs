//! Actions and the name-to-action registry consulted by the keymap compiler
//!
//! An action is any `Fn(&mut C, Key)` that is `Send + Sync`, where `C` is the
//! host's application context. The registry resolves the names used in keymap
//! files; the compiled table stores the resolved action next to its name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::config::KeymapError;
use super::types::Key;
use crate::context::InputContext;

/// An executable capability bound to a key or chain
pub trait Action<C>: Send + Sync {
    /// Run the action against the application context
    ///
    /// `event` is the key that completed the binding (for the literal-insert
    /// fallback, the key being inserted).
    fn execute(&self, ctx: &mut C, event: Key);
}

impl<C, F> Action<C> for F
where
    F: Fn(&mut C, Key) + Send + Sync,
{
    fn execute(&self, ctx: &mut C, event: Key) {
        self(ctx, event)
    }
}

/// An action together with the registry name it was resolved from
pub struct BoundAction<C> {
    name: Arc<str>,
    action: Arc<dyn Action<C>>,
}

impl<C> BoundAction<C> {
    pub fn new(name: impl Into<Arc<str>>, action: Arc<dyn Action<C>>) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn execute(&self, ctx: &mut C, event: Key) {
        tracing::trace!(action = %self.name, key = %event, "Executing action");
        self.action.execute(ctx, event);
    }
}

impl<C> Clone for BoundAction<C> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            action: Arc::clone(&self.action),
        }
    }
}

impl<C> fmt::Debug for BoundAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoundAction").field(&self.name).finish()
    }
}

/// Fixed mapping from action names to actions
pub struct ActionRegistry<C> {
    actions: BTreeMap<String, Arc<dyn Action<C>>>,
}

impl<C> ActionRegistry<C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// Register (or replace) an action under `name`
    pub fn register<A>(&mut self, name: impl Into<String>, action: A) -> &mut Self
    where
        A: Action<C> + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    /// Resolve a name into a bound action
    pub fn get(&self, name: &str) -> Option<BoundAction<C>> {
        self.actions
            .get(name)
            .map(|action| BoundAction::new(name, Arc::clone(action)))
    }

    /// Resolve a name, failing with [`KeymapError::UnknownAction`]
    pub fn resolve(&self, name: &str) -> Result<BoundAction<C>, KeymapError> {
        self.get(name)
            .ok_or_else(|| KeymapError::UnknownAction(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<C: InputContext + 'static> ActionRegistry<C> {
    /// Registry preloaded with the query-editing actions
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::builtins::register_builtins(&mut registry);
        registry
    }
}

impl<C> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ActionRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.actions.keys()).finish()
    }
}
