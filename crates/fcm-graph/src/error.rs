//! Graph-specific error types.

use fcm_core::EdgeId;

pub type GraphResult<T> = Result<T, GraphError>;

/// Which end of an edge a reference error is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    Source,
    Target,
}

impl std::fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeEnd::Source => f.write_str("source"),
            EdgeEnd::Target => f.write_str("target"),
        }
    }
}

/// Graph construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two nodes share the same key.
    DuplicateNode { key: String },

    /// A node was declared with an empty key.
    EmptyNodeKey { position: usize },

    /// An edge endpoint names a node that is not in the node set.
    DanglingEdge {
        edge: EdgeId,
        end: EdgeEnd,
        key: String,
    },

    /// Lookup of a key that is not in the graph.
    UnknownNode { key: String },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicateNode { key } => {
                write!(f, "Node id '{}' is declared more than once", key)
            }
            GraphError::EmptyNodeKey { position } => {
                write!(f, "Node at position {} has an empty id", position)
            }
            GraphError::DanglingEdge { edge, end, key } => {
                write!(
                    f,
                    "Edge {} {} refers to non-existent node '{}'",
                    edge, end, key
                )
            }
            GraphError::UnknownNode { key } => {
                write!(f, "Node '{}' not found in graph", key)
            }
        }
    }
}

impl std::error::Error for GraphError {}
