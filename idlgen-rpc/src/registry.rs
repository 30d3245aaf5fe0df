//! Action registry routing request names to action factories.

use std::collections::HashMap;

use crate::action::Action;

type ActionFactory = Box<dyn Fn() -> Box<dyn Action> + Send + Sync>;

/// Maps action names to factories creating a fresh action per request.
#[derive(Default)]
pub struct ActionRegistry {
    factories: HashMap<&'static str, ActionFactory>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers a factory for `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: &'static str, factory: F)
    where
        F: Fn() -> Box<dyn Action> + Send + Sync + 'static,
    {
        if self.factories.insert(name, Box::new(factory)).is_some() {
            tracing::debug!(action = name, "replaced action factory");
        }
    }

    /// Creates an action for `name`, if one is registered.
    #[must_use]
    pub fn create(&self, name: &str) -> Option<Box<dyn Action>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Returns true if a factory is registered for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered action names in ascending order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionParameters, Dispatcher};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Noop;

    impl Action for Noop {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn execute(&mut self, _parameters: &mut ActionParameters<'_>, _dispatcher: &dyn Dispatcher) {}
    }

    #[test]
    fn test_registry_new() {
        let registry = ActionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.create("noop").is_none());
    }

    #[test]
    fn test_register_and_create() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let mut registry = ActionRegistry::new();
        registry.register("noop", move || -> Box<dyn Action> {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(Noop)
        });

        assert!(registry.contains("noop"));
        assert!(!registry.contains("other"));
        let first = registry.create("noop").unwrap();
        let _second = registry.create("noop").unwrap();
        assert_eq!(first.name(), "noop");
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = ActionRegistry::new();
        registry.register("zip", || -> Box<dyn Action> { Box::new(Noop) });
        registry.register("add", || -> Box<dyn Action> { Box::new(Noop) });
        registry.register("add", || -> Box<dyn Action> { Box::new(Noop) });
        assert_eq!(registry.names(), ["add", "zip"]);
        assert_eq!(registry.len(), 2);
    }
}
