use crate::edge_list::parse_edge_list;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;
use tracing::debug;

/// Identifier usable as a graph node
///
/// Implemented for every type with the required capabilities; node ids
/// from user input should be normalized to one such type before building
/// a graph.
pub trait NodeKey: Copy + Ord + Hash + fmt::Debug + fmt::Display {}

impl<T> NodeKey for T where T: Copy + Ord + Hash + fmt::Debug + fmt::Display {}

/// Identifier of a directed edge, displayed as `"from-to"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId<N> {
    pub from: N,
    pub to: N,
}

impl<N> EdgeId<N> {
    pub fn new(from: N, to: N) -> Self {
        Self { from, to }
    }
}

impl<N: fmt::Display> fmt::Display for EdgeId<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// A directed weighted edge as enumerated by a [`GraphView`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeightedEdge<N> {
    pub from: N,
    pub to: N,
    pub weight: i64,
}

impl<N: Copy> WeightedEdge<N> {
    pub fn new(from: N, to: N, weight: i64) -> Self {
        Self { from, to, weight }
    }

    pub fn id(&self) -> EdgeId<N> {
        EdgeId::new(self.from, self.to)
    }
}

/// Outgoing edge entry of an adjacency list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Neighbor<N> {
    pub to: N,
    pub weight: i64,
}

/// Node id to outgoing edges, in edge enumeration order
pub type Adjacency<N> = HashMap<N, Vec<Neighbor<N>>>;

/// Read-only view of a weighted directed graph
///
/// Every call reflects the graph at call time; the algorithms capture
/// what they need on their first step.
pub trait GraphView {
    /// The type used to identify nodes in the graph
    type NodeId: NodeKey;

    /// All node ids, in the graph's own order
    fn node_ids(&self) -> Vec<Self::NodeId>;

    /// All edges, in the graph's enumeration order
    fn edges(&self) -> Vec<WeightedEdge<Self::NodeId>>;

    /// Outgoing edges of every node
    ///
    /// Nodes without outgoing edges map to an empty list. Edges whose source
    /// is not a node of the graph are left out.
    fn adjacency(&self) -> Adjacency<Self::NodeId> {
        let mut adjacency: Adjacency<Self::NodeId> = self
            .node_ids()
            .into_iter()
            .map(|node| (node, Vec::new()))
            .collect();

        for edge in self.edges() {
            if let Some(neighbors) = adjacency.get_mut(&edge.from) {
                neighbors.push(Neighbor {
                    to: edge.to,
                    weight: edge.weight,
                });
            }
        }

        adjacency
    }

    fn contains_node(&self, node: &Self::NodeId) -> bool {
        self.node_ids().contains(node)
    }
}

impl<N: NodeKey> GraphView for DiGraphMap<N, i64> {
    type NodeId = N;

    fn node_ids(&self) -> Vec<N> {
        self.nodes().collect()
    }

    fn edges(&self) -> Vec<WeightedEdge<N>> {
        self.all_edges()
            .map(|(from, to, &weight)| WeightedEdge::new(from, to, weight))
            .collect()
    }

    fn contains_node(&self, node: &N) -> bool {
        DiGraphMap::<N, i64>::contains_node(self, *node)
    }
}

/// Errors raised while editing a [`Graph`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError<N>
where
    N: fmt::Debug + fmt::Display,
{
    /// An edge endpoint does not reference a node of the graph
    #[error("node {0} does not exist")]
    UnknownNode(N),

    /// No edge exists between the given nodes
    #[error("edge {0}-{1} does not exist")]
    UnknownEdge(N, N),

    /// A generated graph needs at least two nodes
    #[error("a graph needs at least 2 nodes, got {0}")]
    TooFewNodes(usize),

    /// A generated graph would exceed [`MAX_GENERATED_NODES`]
    #[error("a generated graph holds at most {} nodes, got {0}", MAX_GENERATED_NODES)]
    TooManyNodes(usize),
}

/// Upper bound on the node count accepted by [`Graph::generate`]
pub const MAX_GENERATED_NODES: usize = 10_000;

/// Editable weighted directed graph
///
/// At most one edge exists per ordered pair of nodes; adding an edge that
/// already exists leaves the graph unchanged.
#[derive(Debug, Clone)]
pub struct Graph<N>
where
    N: NodeKey,
{
    inner: DiGraphMap<N, i64>,
}

impl<N: NodeKey> Default for Graph<N> {
    fn default() -> Self {
        Self {
            inner: DiGraphMap::new(),
        }
    }
}

impl<N: NodeKey> Graph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returns `false` if it was already present
    pub fn add_node(&mut self, node: N) -> bool {
        if self.inner.contains_node(node) {
            return false;
        }
        self.inner.add_node(node);
        true
    }

    /// Add the edge `from -> to`, returns `Ok(false)` if it already existed
    ///
    /// # Errors
    /// Returns an error if either endpoint is not a node of the graph
    pub fn add_edge(&mut self, from: N, to: N, weight: i64) -> Result<bool, GraphError<N>> {
        for node in [from, to] {
            if !self.inner.contains_node(node) {
                return Err(GraphError::UnknownNode(node));
            }
        }
        if self.inner.contains_edge(from, to) {
            return Ok(false);
        }
        self.inner.add_edge(from, to, weight);
        Ok(true)
    }

    /// Change the weight of an existing edge
    pub fn set_weight(&mut self, from: N, to: N, weight: i64) -> Result<(), GraphError<N>> {
        match self.inner.edge_weight_mut(from, to) {
            Some(w) => {
                *w = weight;
                Ok(())
            }
            None => Err(GraphError::UnknownEdge(from, to)),
        }
    }

    pub fn weight(&self, from: N, to: N) -> Option<i64> {
        self.inner.edge_weight(from, to).copied()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Remove every node and edge
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Underlying petgraph map
    pub fn as_graph_map(&self) -> &DiGraphMap<N, i64> {
        &self.inner
    }
}

impl Graph<i64> {
    /// The five node graph shown when the visualizer starts
    pub fn sample() -> Self {
        let mut graph = Self::new();
        for node in 1..=5 {
            graph.add_node(node);
        }
        for (from, to, weight) in [
            (1, 2, 4),
            (1, 3, 2),
            (2, 3, 1),
            (2, 4, 5),
            (3, 4, 8),
            (3, 5, 10),
            (4, 5, 2),
        ] {
            graph.inner.add_edge(from, to, weight);
        }
        graph
    }

    /// Add a node numbered one past the highest id and return it
    ///
    /// An empty graph starts at 1.
    pub fn add_next_node(&mut self) -> i64 {
        let mut id = self
            .inner
            .nodes()
            .max()
            .map_or(1, |max| max.checked_add(1).unwrap_or(1));
        while self.inner.contains_node(id) {
            id += 1;
        }
        self.inner.add_node(id);
        id
    }

    /// Build a graph with nodes `1..=node_count` and the edges listed in
    /// `edge_text`
    ///
    /// Edges referencing nodes outside the range are skipped.
    ///
    /// # Errors
    /// Returns an error if `node_count` is smaller than 2 or larger than
    /// [`MAX_GENERATED_NODES`]
    pub fn generate(node_count: usize, edge_text: &str) -> Result<Self, GraphError<i64>> {
        if node_count < 2 {
            return Err(GraphError::TooFewNodes(node_count));
        }
        let last = match i64::try_from(node_count) {
            Ok(last) if node_count <= MAX_GENERATED_NODES => last,
            _ => return Err(GraphError::TooManyNodes(node_count)),
        };

        let mut graph = Self::new();
        for node in 1..=last {
            graph.add_node(node);
        }

        for edge in parse_edge_list(edge_text) {
            if let Err(err) = graph.add_edge(edge.from, edge.to, edge.weight) {
                debug!("Skipping edge {}: {err}", edge.id());
            }
        }

        Ok(graph)
    }
}

impl<N: NodeKey> GraphView for Graph<N> {
    type NodeId = N;

    fn node_ids(&self) -> Vec<N> {
        self.inner.node_ids()
    }

    fn edges(&self) -> Vec<WeightedEdge<N>> {
        GraphView::edges(&self.inner)
    }

    fn contains_node(&self, node: &N) -> bool {
        self.inner.contains_node(*node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn duplicate_edge_is_a_noop() {
        let mut graph = Graph::new();
        graph.add_node(1);
        graph.add_node(2);

        assert_eq!(graph.add_edge(1, 2, 3), Ok(true));
        assert_eq!(graph.add_edge(1, 2, 9), Ok(false));
        assert_eq!(graph.weight(1, 2), Some(3));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn edges_are_directed() {
        let mut graph = Graph::new();
        graph.add_node('a');
        graph.add_node('b');
        graph.add_edge('a', 'b', 1).unwrap();

        let adjacency = graph.adjacency();
        assert_eq!(adjacency[&'a'], vec![Neighbor { to: 'b', weight: 1 }]);
        assert!(adjacency[&'b'].is_empty());
    }

    #[test]
    fn edge_to_unknown_node_is_rejected() {
        let mut graph = Graph::new();
        graph.add_node(1);

        assert_eq!(graph.add_edge(1, 7, 1), Err(GraphError::UnknownNode(7)));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn self_loops_are_allowed() {
        let mut graph = Graph::new();
        graph.add_node(1);

        assert_eq!(graph.add_edge(1, 1, 0), Ok(true));
        assert_eq!(graph.edges(), vec![WeightedEdge::new(1, 1, 0)]);
    }

    #[test]
    fn set_weight_requires_existing_edge() {
        let mut graph = Graph::sample();

        graph.set_weight(1, 2, 40).unwrap();
        assert_eq!(graph.weight(1, 2), Some(40));
        assert_eq!(graph.set_weight(2, 1, 1), Err(GraphError::UnknownEdge(2, 1)));
    }

    #[test]
    fn edges_keep_insertion_order() {
        let graph = Graph::sample();
        let ids: Vec<String> = graph.edges().iter().map(|e| e.id().to_string()).collect();

        assert_eq!(ids, ["1-2", "1-3", "2-3", "2-4", "3-4", "3-5", "4-5"]);
        assert_eq!(
            graph.adjacency()[&3],
            vec![Neighbor { to: 4, weight: 8 }, Neighbor { to: 5, weight: 10 }]
        );
    }

    #[test]
    fn next_node_skips_taken_ids() {
        let mut graph = Graph::sample();
        assert_eq!(graph.add_next_node(), 6);

        graph.clear();
        assert_eq!(graph.node_count(), 0);
        graph.add_node(1);
        assert_eq!(graph.add_next_node(), 2);

        let mut graph: Graph<i64> = Graph::new();
        assert_eq!(graph.add_next_node(), 1);
        graph.add_node(10);
        assert_eq!(graph.add_next_node(), 11);
    }

    #[test]
    fn generate_builds_numbered_nodes() {
        let graph = Graph::generate(3, "1 2 5\n2,3,1\n3 9 4\nnot an edge").unwrap();

        assert_eq!(graph.node_ids(), vec![1, 2, 3]);
        assert_eq!(
            graph.edges(),
            vec![WeightedEdge::new(1, 2, 5), WeightedEdge::new(2, 3, 1)]
        );
    }

    #[test]
    fn generate_needs_two_nodes() {
        assert_eq!(
            Graph::generate(1, "").unwrap_err(),
            GraphError::TooFewNodes(1)
        );
    }

    #[test]
    fn generate_rejects_oversized_graphs() {
        let graph = Graph::generate(MAX_GENERATED_NODES, "1 2 1").unwrap();
        assert_eq!(graph.node_count(), MAX_GENERATED_NODES);

        for count in [MAX_GENERATED_NODES + 1, usize::MAX] {
            let err = Graph::generate(count, "").unwrap_err();
            assert_eq!(err, GraphError::TooManyNodes(count));
        }
    }

    #[test]
    fn petgraph_maps_are_graph_views() {
        let mut map = DiGraphMap::new();
        map.add_edge("x", "y", -2);

        assert_eq!(map.node_ids(), vec!["x", "y"]);
        assert!(GraphView::contains_node(&map, &"y"));
        assert_eq!(map.adjacency()[&"x"], vec![Neighbor { to: "y", weight: -2 }]);
    }
}
