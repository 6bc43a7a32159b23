//! Initial-value resolution.
//!
//! A run starts from one value per node. Candidates come from an ordered
//! stack of sources: the node's own stored value first, then any number of
//! named override layers applied left to right (last write wins). Keys that
//! do not name a node in the graph are dropped.

use std::collections::BTreeMap;

use fcm_core::Real;
use fcm_graph::ModelGraph;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::state::State;

/// Node key → value, as supplied by callers.
pub type ValueMap = BTreeMap<String, Real>;

/// One named source of initial values.
#[derive(Debug, Clone, Copy)]
pub struct OverrideLayer<'a> {
    pub name: &'static str,
    pub values: &'a ValueMap,
}

/// Ordered override stack.
#[derive(Debug, Clone)]
pub struct InitialValueResolver<'a> {
    use_stored: bool,
    layers: Vec<OverrideLayer<'a>>,
}

impl Default for InitialValueResolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> InitialValueResolver<'a> {
    /// Resolver seeded with each node's stored value.
    pub fn new() -> Self {
        Self {
            use_stored: true,
            layers: Vec::new(),
        }
    }

    /// Resolver that ignores stored node values; every node must then be
    /// covered by some layer.
    pub fn without_stored_values() -> Self {
        Self {
            use_stored: false,
            layers: Vec::new(),
        }
    }

    /// Push a layer on top of the stack. `None` layers are skipped so callers
    /// can pass optional request fields straight through.
    pub fn layer(mut self, name: &'static str, values: Option<&'a ValueMap>) -> Self {
        if let Some(values) = values {
            self.layers.push(OverrideLayer { name, values });
        }
        self
    }

    pub fn layers(&self) -> &[OverrideLayer<'a>] {
        &self.layers
    }

    /// Produce one value per node, in node order.
    pub fn resolve(&self, graph: &ModelGraph) -> SimResult<State> {
        let mut slots: Vec<Option<Real>> = if self.use_stored {
            graph.nodes().iter().map(|n| n.value).collect()
        } else {
            vec![None; graph.node_count()]
        };

        for layer in &self.layers {
            for (key, &value) in layer.values {
                match graph.index().get(key) {
                    Some(id) => slots[id.slot()] = Some(value),
                    None => debug!(layer = layer.name, key = %key, "dropping override for unknown node"),
                }
            }
        }

        let mut values = Vec::with_capacity(slots.len());
        for (node, slot) in graph.nodes().iter().zip(slots) {
            match slot {
                Some(v) => values.push(v),
                None => {
                    return Err(SimError::invalid_model(format!(
                        "node '{}' has no initial value",
                        node.key
                    )));
                }
            }
        }

        Ok(State::from(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcm_graph::GraphBuilder;

    fn graph() -> ModelGraph {
        let mut b = GraphBuilder::new();
        b.add_node("n", "N", Some(0.1));
        b.add_node("m", "M", None);
        b.build().unwrap()
    }

    fn map(pairs: &[(&str, Real)]) -> ValueMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn missing_value_is_model_error() {
        let g = graph();
        let err = InitialValueResolver::new().resolve(&g).unwrap_err();
        assert!(matches!(err, SimError::InvalidModel { ref what } if what.contains("'m'")));
    }

    #[test]
    fn later_layer_wins() {
        let g = graph();
        let low = map(&[("n", 0.2), ("m", 0.5)]);
        let high = map(&[("n", 0.9)]);
        let resolver = InitialValueResolver::new()
            .layer("low", Some(&low))
            .layer("skipped", None)
            .layer("high", Some(&high));
        let names: Vec<_> = resolver.layers().iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["low", "high"]);

        let state = resolver.resolve(&g).unwrap();
        assert_eq!(state.as_slice(), &[0.9, 0.5]);
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let g = graph();
        let layer = map(&[("m", 0.0), ("ghost", 7.0)]);
        let state = InitialValueResolver::new()
            .layer("request", Some(&layer))
            .resolve(&g)
            .unwrap();
        assert_eq!(state.len(), 2);
        assert_eq!(state.as_slice(), &[0.1, 0.0]);
    }

    #[test]
    fn without_stored_values_needs_full_cover() {
        let g = graph();
        let partial = map(&[("m", 0.3)]);
        let resolver = InitialValueResolver::without_stored_values().layer("only", Some(&partial));
        assert!(resolver.resolve(&g).is_err());

        let full = map(&[("m", 0.3), ("n", 0.0)]);
        let state = InitialValueResolver::without_stored_values()
            .layer("only", Some(&full))
            .resolve(&g)
            .unwrap();
        assert_eq!(state.as_slice(), &[0.0, 0.3]);
    }
}
