//! Cost-model knobs for strategy selection.

use std::fmt;

/// Policy for selecting a filter strategy per constraint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StrategyPolicy {
    /// Pick by size and density of the current row map.
    Auto,
    /// Always scan the covering range (falls back to indexed when an
    /// overlay cannot map ranges).
    Bounded,
    /// Always look up the explicit candidate indices.
    Indexed,
}

/// Strategy actually used for one constraint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterStrategy {
    /// Linear scan over the candidates' covering range; cost grows with span.
    Bounded,
    /// Per-index lookup; cost grows with candidate count.
    Indexed,
}

impl FilterStrategy {
    /// Returns a textual representation of the strategy.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FilterStrategy::Bounded => "bounded",
            FilterStrategy::Indexed => "indexed",
        }
    }
}

impl fmt::Display for FilterStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for [`QueryExecutor`](crate::query::QueryExecutor).
///
/// Sparse candidate sets (fewer than `indexed_max_size` rows filling less
/// than `indexed_max_density` of their span) use the indexed strategy; all
/// others use the bounded one.
#[derive(Clone, Debug)]
pub struct FilterConfig {
    pub(crate) policy: StrategyPolicy,
    pub(crate) indexed_max_size: u32,
    pub(crate) indexed_max_density: f64,
    pub(crate) max_overlay_count: usize,
    pub(crate) selector_overlays: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            policy: StrategyPolicy::Auto,
            indexed_max_size: 1024,
            indexed_max_density: 0.5,
            max_overlay_count: 8,
            selector_overlays: false,
        }
    }
}

impl FilterConfig {
    /// Strategy selection policy.
    pub fn policy(self, policy: StrategyPolicy) -> Self {
        FilterConfig { policy, ..self }
    }

    /// Candidate sets must be smaller than this to use the indexed strategy.
    pub fn indexed_max_size(self, indexed_max_size: u32) -> Self {
        FilterConfig {
            indexed_max_size,
            ..self
        }
    }

    /// Candidate sets must be sparser than this to use the indexed strategy.
    pub fn indexed_max_density(self, indexed_max_density: f64) -> Self {
        FilterConfig {
            indexed_max_density,
            ..self
        }
    }

    /// Upper bound on the overlay stack of a single column.
    pub fn max_overlay_count(self, max_overlay_count: usize) -> Self {
        FilterConfig {
            max_overlay_count,
            ..self
        }
    }

    /// Route columns with a non-identity row map through the overlay fast
    /// path instead of the per-row fallback.
    pub fn selector_overlays(self, selector_overlays: bool) -> Self {
        FilterConfig {
            selector_overlays,
            ..self
        }
    }
}

impl FilterConfig {
    /// Strategy for a candidate set of `size` rows spread over `span`
    /// (`last - first`) table positions.
    pub(crate) fn choose_strategy(&self, size: u32, span: u32) -> FilterStrategy {
        match self.policy {
            StrategyPolicy::Bounded => FilterStrategy::Bounded,
            StrategyPolicy::Indexed => FilterStrategy::Indexed,
            StrategyPolicy::Auto => {
                // A zero span divides to +inf, which always reads as dense.
                let density = f64::from(size) / f64::from(span);
                if size < self.indexed_max_size && density < self.indexed_max_density {
                    FilterStrategy::Indexed
                } else {
                    FilterStrategy::Bounded
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_small_sets_are_indexed() {
        let config = FilterConfig::default();
        assert_eq!(config.choose_strategy(10, 10_000), FilterStrategy::Indexed);
    }

    #[test]
    fn dense_or_large_sets_are_bounded() {
        let config = FilterConfig::default();
        assert_eq!(config.choose_strategy(9_000, 10_000), FilterStrategy::Bounded);
        assert_eq!(config.choose_strategy(2_000, 1_000_000), FilterStrategy::Bounded);
        assert_eq!(config.choose_strategy(1, 0), FilterStrategy::Bounded);
    }

    #[test]
    fn thresholds_are_adjustable() {
        let config = FilterConfig::default()
            .indexed_max_size(10)
            .indexed_max_density(0.9);
        assert_eq!(config.choose_strategy(10, 10_000), FilterStrategy::Bounded);
        assert_eq!(config.choose_strategy(8, 10), FilterStrategy::Indexed);
    }

    #[test]
    fn forced_policies_ignore_density() {
        let bounded = FilterConfig::default().policy(StrategyPolicy::Bounded);
        assert_eq!(bounded.choose_strategy(1, 1_000_000), FilterStrategy::Bounded);
        let indexed = FilterConfig::default().policy(StrategyPolicy::Indexed);
        assert_eq!(indexed.choose_strategy(9_000, 9_001), FilterStrategy::Indexed);
    }
}
