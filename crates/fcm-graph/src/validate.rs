//! Graph validation logic.

use std::collections::HashSet;

use crate::builder::PendingEdge;
use crate::error::{EdgeEnd, GraphError, GraphResult};
use crate::graph::{Edge, Node};
use crate::indexing::KeyIndex;

/// Node keys must be non-empty and unique.
pub(crate) fn validate_nodes(nodes: &[Node]) -> GraphResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for (position, node) in nodes.iter().enumerate() {
        if node.key.is_empty() {
            return Err(GraphError::EmptyNodeKey { position });
        }
        if !seen.insert(node.key.as_str()) {
            return Err(GraphError::DuplicateNode {
                key: node.key.clone(),
            });
        }
    }
    Ok(())
}

/// Resolve every edge endpoint against the node set.
pub(crate) fn resolve_edges(index: &KeyIndex, pending: &[PendingEdge]) -> GraphResult<Vec<Edge>> {
    pending
        .iter()
        .map(|p| {
            let source = index
                .get(&p.source)
                .ok_or_else(|| GraphError::DanglingEdge {
                    edge: p.id,
                    end: EdgeEnd::Source,
                    key: p.source.clone(),
                })?;
            let target = index
                .get(&p.target)
                .ok_or_else(|| GraphError::DanglingEdge {
                    edge: p.id,
                    end: EdgeEnd::Target,
                    key: p.target.clone(),
                })?;
            Ok(Edge {
                id: p.id,
                source,
                target,
                weight: p.weight,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcm_core::Id;

    fn node(i: u32, key: &str) -> Node {
        Node {
            id: Id::from_index(i),
            key: key.into(),
            label: String::new(),
            value: Some(0.0),
            driver: false,
        }
    }

    #[test]
    fn validate_empty_graph() {
        assert!(validate_nodes(&[]).is_ok());
        assert!(resolve_edges(&KeyIndex::default(), &[]).unwrap().is_empty());
    }

    #[test]
    fn validate_duplicate_key() {
        let nodes = vec![node(0, "a"), node(1, "a")];
        assert_eq!(
            validate_nodes(&nodes),
            Err(GraphError::DuplicateNode { key: "a".into() })
        );
    }

    #[test]
    fn validate_empty_key() {
        let nodes = vec![node(0, "a"), node(1, "")];
        assert_eq!(
            validate_nodes(&nodes),
            Err(GraphError::EmptyNodeKey { position: 1 })
        );
    }

    #[test]
    fn dangling_target_reported() {
        let nodes = vec![node(0, "a")];
        let index = KeyIndex::from_nodes(&nodes);
        let pending = vec![PendingEdge {
            id: Id::from_index(0),
            source: "a".into(),
            target: "ghost".into(),
            weight: 1.0,
        }];
        let err = resolve_edges(&index, &pending).unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingEdge {
                edge: Id::from_index(0),
                end: EdgeEnd::Target,
                key: "ghost".into(),
            }
        );
        assert!(err.to_string().contains("ghost"));
    }
}
