//! Key → dense id lookup.
//!
//! Callers name nodes by string ids; the engine works on contiguous slots.
//! `KeyIndex` is the bridge, built once when the graph is frozen.

use std::collections::HashMap;

use fcm_core::NodeId;

use crate::graph::Node;

#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    by_key: HashMap<String, NodeId>,
}

impl KeyIndex {
    /// Build from an already de-duplicated node list.
    pub(crate) fn from_nodes(nodes: &[Node]) -> Self {
        let by_key = nodes.iter().map(|n| (n.key.clone(), n.id)).collect();
        Self { by_key }
    }

    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
