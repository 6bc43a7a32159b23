//! fcm-graph: model graph layer for the FCM engine.
//!
//! Provides:
//! - Core graph data structures (Node, Edge, ModelGraph)
//! - Incremental graph builder with structural validation
//! - String key → dense id lookup for callers that speak in node ids
//!
//! # Example
//!
//! ```
//! use fcm_graph::GraphBuilder;
//!
//! let mut builder = GraphBuilder::new();
//! let rain = builder.add_node("rain", "Rainfall", Some(0.8));
//! builder.add_node("yield", "Crop yield", Some(0.1));
//! builder.set_driver(rain, true);
//! builder.add_edge("rain", "yield", 0.6);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert_eq!(graph.edges().len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use error::{EdgeEnd, GraphError, GraphResult};
pub use graph::{Edge, ModelGraph, Node};
pub use indexing::KeyIndex;
