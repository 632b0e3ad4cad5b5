//! Locating the scrollable element of a view.
//!
//! The controller never queries the UI itself. Each side supplies a
//! [`ScrollAccessor`]; for editors whose scroll container is hard to reach,
//! [`LayeredAccessor`] tries a list of lookup strategies in order and
//! reports "not found" when all of them fail.

use super::metrics::ScrollMetrics;
use std::fmt;
use tracing::trace;

/// A scrollable element.
pub trait ScrollView {
    /// Reads the current geometry.
    fn metrics(&self) -> ScrollMetrics;

    /// Moves the top edge to `scroll_top`.
    fn set_scroll_top(&mut self, scroll_top: f64);
}

/// Finds the scrollable element of a view for the current tick.
pub trait ScrollAccessor {
    /// Handle to the located element.
    type View: ScrollView;

    /// Returns the element, or `None` if it cannot be found right now.
    fn locate(&mut self) -> Option<Self::View>;
}

/// Where a lookup strategy searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupStrategy {
    /// A handle the view hands out directly
    Direct,
    /// A property nested inside the view object
    Nested,
    /// Search upward from a known child element
    Ancestor,
    /// Document-wide lookup
    Global,
}

impl LookupStrategy {
    /// Default probing order, most specific first.
    pub const ORDER: [LookupStrategy; 4] = [
        LookupStrategy::Direct,
        LookupStrategy::Nested,
        LookupStrategy::Ancestor,
        LookupStrategy::Global,
    ];
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupStrategy::Direct => "direct",
            LookupStrategy::Nested => "nested",
            LookupStrategy::Ancestor => "ancestor",
            LookupStrategy::Global => "global",
        };
        f.write_str(name)
    }
}

type Lookup<V> = Box<dyn FnMut() -> Option<V>>;

/// Accessor that falls through a chain of lookup strategies.
pub struct LayeredAccessor<V> {
    layers: Vec<(LookupStrategy, Lookup<V>)>,
    last_hit: Option<LookupStrategy>,
}

impl<V> Default for LayeredAccessor<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LayeredAccessor<V> {
    /// Creates an accessor with no strategies; it never finds anything.
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            last_hit: None,
        }
    }

    /// Adds a strategy. Strategies run in the order they were added.
    pub fn with_layer<F>(mut self, strategy: LookupStrategy, lookup: F) -> Self
    where
        F: FnMut() -> Option<V> + 'static,
    {
        self.layers.push((strategy, Box::new(lookup)));
        self
    }

    /// Strategy that produced the most recent hit.
    pub fn last_hit(&self) -> Option<LookupStrategy> {
        self.last_hit
    }

    /// Number of configured strategies.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if no strategy is configured.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<V: ScrollView> ScrollAccessor for LayeredAccessor<V> {
    type View = V;

    fn locate(&mut self) -> Option<V> {
        self.last_hit = None;
        for (strategy, lookup) in &mut self.layers {
            if let Some(view) = lookup() {
                trace!(%strategy, "located scroll container");
                self.last_hit = Some(*strategy);
                return Some(view);
            }
        }
        trace!("scroll container not found");
        None
    }
}

impl<V> fmt::Debug for LayeredAccessor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategies: Vec<_> = self.layers.iter().map(|(s, _)| *s).collect();
        f.debug_struct("LayeredAccessor")
            .field("layers", &strategies)
            .field("last_hit", &self.last_hit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Fixed(f64);

    impl ScrollView for Fixed {
        fn metrics(&self) -> ScrollMetrics {
            ScrollMetrics::new(self.0, 100.0, 10.0)
        }

        fn set_scroll_top(&mut self, scroll_top: f64) {
            self.0 = scroll_top;
        }
    }

    #[test]
    fn test_first_hit_wins() {
        let mut accessor = LayeredAccessor::new()
            .with_layer(LookupStrategy::Direct, || None)
            .with_layer(LookupStrategy::Nested, || Some(Fixed(1.0)))
            .with_layer(LookupStrategy::Global, || Some(Fixed(2.0)));

        assert_eq!(accessor.locate(), Some(Fixed(1.0)));
        assert_eq!(accessor.last_hit(), Some(LookupStrategy::Nested));
    }

    #[test]
    fn test_global_fallback() {
        let mut accessor = LayeredAccessor::new();
        for strategy in &LookupStrategy::ORDER[..3] {
            accessor = accessor.with_layer(*strategy, || None);
        }
        accessor = accessor.with_layer(LookupStrategy::Global, || Some(Fixed(5.0)));

        assert_eq!(accessor.len(), 4);
        assert_eq!(accessor.locate(), Some(Fixed(5.0)));
        assert_eq!(accessor.last_hit(), Some(LookupStrategy::Global));
    }

    #[test]
    fn test_not_found() {
        let mut accessor: LayeredAccessor<Fixed> =
            LayeredAccessor::new().with_layer(LookupStrategy::Direct, || None);
        assert!(accessor.locate().is_none());
        assert!(accessor.last_hit().is_none());

        let mut empty: LayeredAccessor<Fixed> = LayeredAccessor::new();
        assert!(empty.is_empty());
        assert!(empty.locate().is_none());
    }

    #[test]
    fn test_lookup_reevaluated_each_tick() {
        let mut mounted = false;
        let mut accessor = LayeredAccessor::new().with_layer(LookupStrategy::Direct, move || {
            let found = mounted.then_some(Fixed(0.0));
            mounted = true;
            found
        });

        assert!(accessor.locate().is_none(), "Not mounted on first tick");
        assert!(accessor.locate().is_some(), "Mounted on second tick");
    }
}
