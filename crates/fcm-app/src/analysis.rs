//! Network structure metrics.
//!
//! - Size, density, weak connectivity, presence of any directed cycle
//! - Degree / in-degree / out-degree centrality, normalised by `n - 1`
//! - Betweenness (Brandes, unweighted, normalised by `(n-1)(n-2)`)
//! - Closeness over inward distances with the Wasserman–Faust correction
//! - Dense adjacency matrix, row = source, column = target
//!
//! Centralities treat the map as a simple digraph: parallel edges between
//! the same ordered pair count once. The adjacency matrix sums their weights.

use std::collections::{BTreeMap, VecDeque};

use fcm_graph::ModelGraph;
use fcm_project::schema::{EdgeDef, NodeDef};
use petgraph::Direction;
use petgraph::algo::{connected_components, is_cyclic_directed};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::compile::build_graph;
use crate::error::{AppError, AppResult};

pub type ScoreMap = BTreeMap<String, f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Centrality {
    pub degree: ScoreMap,
    pub in_degree: ScoreMap,
    pub out_degree: ScoreMap,
    pub betweenness: ScoreMap,
    pub closeness: ScoreMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub is_connected: bool,
    pub has_loop: bool,
    pub centrality: Centrality,
    pub adjacency_matrix: Vec<Vec<f64>>,
    pub node_ids: Vec<String>,
}

/// Analyze node and edge documents.
pub fn analyze_documents(nodes: &[NodeDef], edges: &[EdgeDef]) -> AppResult<NetworkMetrics> {
    if nodes.is_empty() {
        return Err(AppError::InvalidInput("No nodes provided".to_string()));
    }
    let graph = build_graph(nodes, edges)?;
    Ok(analyze_graph(&graph))
}

pub fn analyze_graph(graph: &ModelGraph) -> NetworkMetrics {
    let n = graph.node_count();
    let node_ids: Vec<String> = graph.nodes().iter().map(|node| node.key.clone()).collect();

    let mut adjacency_matrix = vec![vec![0.0; n]; n];
    let mut g: DiGraph<(), ()> = DiGraph::with_capacity(n, graph.edges().len());
    for _ in 0..n {
        g.add_node(());
    }
    for edge in graph.edges() {
        let (s, t) = (edge.source.slot(), edge.target.slot());
        adjacency_matrix[s][t] += edge.weight;
        g.update_edge(NodeIndex::new(s), NodeIndex::new(t), ());
    }

    let m = g.edge_count();
    let density = if n > 1 {
        m as f64 / (n * (n - 1)) as f64
    } else {
        0.0
    };
    let has_loop =
        g.edge_references().any(|e| e.source() == e.target()) || is_cyclic_directed(&g);

    let keyed = |scores: Vec<f64>| -> ScoreMap { node_ids.iter().cloned().zip(scores).collect() };
    let centrality = Centrality {
        degree: keyed(degree_centrality(&g, None)),
        in_degree: keyed(degree_centrality(&g, Some(Direction::Incoming))),
        out_degree: keyed(degree_centrality(&g, Some(Direction::Outgoing))),
        betweenness: keyed(betweenness_centrality(&g)),
        closeness: keyed(closeness_centrality(&g)),
    };

    NetworkMetrics {
        node_count: n,
        edge_count: m,
        density,
        is_connected: n > 0 && connected_components(&g) == 1,
        has_loop,
        centrality,
        adjacency_matrix,
        node_ids,
    }
}

/// `None` counts both directions (a self-loop counts twice).
fn degree_centrality(g: &DiGraph<(), ()>, dir: Option<Direction>) -> Vec<f64> {
    let n = g.node_count();
    if n <= 1 {
        return vec![1.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    g.node_indices()
        .map(|v| {
            let d = match dir {
                Some(dir) => g.edges_directed(v, dir).count(),
                None => {
                    g.edges_directed(v, Direction::Incoming).count()
                        + g.edges_directed(v, Direction::Outgoing).count()
                }
            };
            d as f64 * scale
        })
        .collect()
}

fn betweenness_centrality(g: &DiGraph<(), ()>) -> Vec<f64> {
    let n = g.node_count();
    let mut cb = vec![0.0; n];

    for s in g.node_indices() {
        let mut stack = Vec::with_capacity(n);
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist: Vec<Option<usize>> = vec![None; n];
        sigma[s.index()] = 1.0;
        dist[s.index()] = Some(0);

        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            stack.push(v.index());
            let dv = dist[v.index()].unwrap_or(0);
            for w in g.neighbors_directed(v, Direction::Outgoing) {
                let wi = w.index();
                if dist[wi].is_none() {
                    dist[wi] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[wi] == Some(dv + 1) {
                    sigma[wi] += sigma[v.index()];
                    preds[wi].push(v.index());
                }
            }
        }

        let mut delta = vec![0.0_f64; n];
        while let Some(w) = stack.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s.index() {
                cb[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for score in &mut cb {
            *score *= scale;
        }
    }
    cb
}

fn closeness_centrality(g: &DiGraph<(), ()>) -> Vec<f64> {
    let n = g.node_count();
    g.node_indices()
        .map(|u| {
            let dist = bfs_distances(g, u, Direction::Incoming);
            let reached: Vec<usize> = dist.into_iter().flatten().collect();
            let total: usize = reached.iter().sum();
            if total == 0 || n <= 1 {
                return 0.0;
            }
            let r = (reached.len() - 1) as f64;
            (r / total as f64) * (r / (n - 1) as f64)
        })
        .collect()
}

fn bfs_distances(g: &DiGraph<(), ()>, start: NodeIndex, dir: Direction) -> Vec<Option<usize>> {
    let mut dist = vec![None; g.node_count()];
    dist[start.index()] = Some(0);
    let mut queue = VecDeque::from([(start, 0usize)]);
    while let Some((v, d)) = queue.pop_front() {
        for w in g.neighbors_directed(v, dir) {
            if dist[w.index()].is_none() {
                dist[w.index()] = Some(d + 1);
                queue.push_back((w, d + 1));
            }
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcm_core::{Tolerances, nearly_equal};

    fn docs(keys: &[&str], edges: &[(&str, &str, f64)]) -> (Vec<NodeDef>, Vec<EdgeDef>) {
        let nodes = keys.iter().map(|k| NodeDef::new(*k, *k, 0.0)).collect();
        let edges = edges
            .iter()
            .map(|(s, t, w)| EdgeDef::new(*s, *t, *w))
            .collect();
        (nodes, edges)
    }

    fn close(a: f64, b: f64) -> bool {
        nearly_equal(a, b, Tolerances::default())
    }

    #[test]
    fn chain_metrics() {
        let (nodes, edges) = docs(&["a", "b", "c"], &[("a", "b", 0.5), ("b", "c", -0.25)]);
        let m = analyze_documents(&nodes, &edges).unwrap();

        assert_eq!(m.node_count, 3);
        assert_eq!(m.edge_count, 2);
        assert!(close(m.density, 1.0 / 3.0));
        assert!(m.is_connected);
        assert!(!m.has_loop);
        assert_eq!(m.node_ids, vec!["a", "b", "c"]);

        let c = &m.centrality;
        assert!(close(c.degree["b"], 1.0));
        assert!(close(c.degree["a"], 0.5));
        assert!(close(c.in_degree["a"], 0.0));
        assert!(close(c.out_degree["a"], 0.5));
        assert!(close(c.betweenness["b"], 0.5));
        assert!(close(c.betweenness["a"], 0.0));
        assert!(close(c.closeness["a"], 0.0));
        assert!(close(c.closeness["b"], 0.5));
        assert!(close(c.closeness["c"], 2.0 / 3.0));

        assert_eq!(m.adjacency_matrix[0][1], 0.5);
        assert_eq!(m.adjacency_matrix[1][2], -0.25);
        assert_eq!(m.adjacency_matrix[2][0], 0.0);
    }

    #[test]
    fn cycles_and_self_loops_are_loops() {
        let (nodes, edges) = docs(&["a", "b"], &[("a", "b", 1.0), ("b", "a", 1.0)]);
        assert!(analyze_documents(&nodes, &edges).unwrap().has_loop);

        let (nodes, edges) = docs(&["a", "b"], &[("a", "a", 0.3)]);
        let m = analyze_documents(&nodes, &edges).unwrap();
        assert!(m.has_loop);
        assert!(!m.is_connected);
        assert!(close(m.centrality.degree["a"], 2.0));
    }

    #[test]
    fn parallel_edges_sum_in_matrix_only() {
        let (nodes, edges) = docs(&["a", "b"], &[("a", "b", 0.25), ("a", "b", 0.5)]);
        let m = analyze_documents(&nodes, &edges).unwrap();
        assert_eq!(m.edge_count, 1);
        assert_eq!(m.adjacency_matrix[0][1], 0.75);
        assert!(close(m.density, 0.5));
    }

    #[test]
    fn single_node() {
        let (nodes, edges) = docs(&["only"], &[]);
        let m = analyze_documents(&nodes, &edges).unwrap();
        assert!(m.is_connected);
        assert_eq!(m.density, 0.0);
        assert_eq!(m.centrality.degree["only"], 1.0);
        assert_eq!(m.centrality.closeness["only"], 0.0);
        assert_eq!(m.centrality.betweenness["only"], 0.0);
    }

    #[test]
    fn empty_node_list_rejected() {
        let err = analyze_documents(&[], &[]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
