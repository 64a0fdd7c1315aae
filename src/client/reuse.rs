//! Pluggable connection reuse policies.
//!
//! The underlying client keeps a set of idle connections; a
//! [`ReuseStrategy`] decides which of them is picked for the next request.
//! Strategies are configured by name
//! ([`ConnectionSettings::connection_reuse_strategy`](crate::ConnectionSettings))
//! and resolved against a [`StrategyRegistry`] -- a fixed, compile-time
//! mapping from names to factory functions. An unknown name is logged and
//! the builder default ([`Lifo`]) remains in place.

use std::{collections::HashMap, sync::Arc};

/// Policy that decides which idle connection is reused for the next request.
pub trait ReuseStrategy: std::fmt::Debug + Send + Sync {
    /// The name under which the strategy is configured.
    fn name(&self) -> &'static str;

    /// Given the number of currently idle connections, returns the index of
    /// the connection to reuse, or `None` to open a fresh one.
    fn pick(&self, idle: usize) -> Option<usize>;
}

/// Reuses the most recently returned connection first.
///
/// This is the default strategy of the underlying client.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lifo;
impl ReuseStrategy for Lifo {
    fn name(&self) -> &'static str {
        "lifo"
    }
    fn pick(&self, idle: usize) -> Option<usize> {
        idle.checked_sub(1)
    }
}

/// Reuses the longest-idle connection first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fifo;
impl ReuseStrategy for Fifo {
    fn name(&self) -> &'static str {
        "fifo"
    }
    fn pick(&self, idle: usize) -> Option<usize> {
        (idle > 0).then_some(0)
    }
}

/// Constructor for a shared [`ReuseStrategy`] instance.
pub type StrategyFactory = fn() -> Arc<dyn ReuseStrategy>;

/// Registry of connection reuse strategies, keyed by case-insensitive name.
#[derive(Clone, Debug)]
pub struct StrategyRegistry {
    factories: HashMap<String, StrategyFactory>,
}

impl StrategyRegistry {
    /// Returns a registry without any strategies.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Returns a registry with the strategies the underlying client ships:
    /// `lifo` and `fifo`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("lifo", || Arc::new(Lifo));
        registry.register("fifo", || Arc::new(Fifo));
        registry
    }

    /// Registers a strategy under the given name.
    ///
    /// An already registered strategy of the same name is replaced.
    pub fn register<S: AsRef<str>>(&mut self, name: S, factory: StrategyFactory) -> &mut Self {
        self.factories
            .insert(name.as_ref().to_lowercase(), factory);
        self
    }

    /// Instantiates the strategy registered under `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn ReuseStrategy>> {
        self.factories
            .get(&name.trim().to_lowercase())
            .map(|factory| factory())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod test {
    use super::{Fifo, Lifo, ReuseStrategy, StrategyRegistry};
    use std::sync::Arc;

    #[test]
    fn test_default_registry() {
        let registry = StrategyRegistry::default();
        assert_eq!(registry.resolve("lifo").unwrap().name(), "lifo");
        assert_eq!(registry.resolve("FIFO").unwrap().name(), "fifo");
        assert!(registry.resolve("round_robin").is_none());
    }

    #[test]
    fn test_custom_strategy() {
        #[derive(Debug)]
        struct Sticky;
        impl ReuseStrategy for Sticky {
            fn name(&self) -> &'static str {
                "sticky"
            }
            fn pick(&self, idle: usize) -> Option<usize> {
                (idle > 0).then_some(0)
            }
        }

        let mut registry = StrategyRegistry::with_defaults();
        registry.register("sticky", || Arc::new(Sticky));
        assert_eq!(registry.resolve("Sticky").unwrap().name(), "sticky");
    }

    #[test]
    fn test_pick_order() {
        assert_eq!(Lifo.pick(3), Some(2));
        assert_eq!(Fifo.pick(3), Some(0));
        assert_eq!(Lifo.pick(0), None);
        assert_eq!(Fifo.pick(0), None);
    }
}
