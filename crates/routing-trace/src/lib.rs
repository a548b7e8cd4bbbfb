//! Replayable step traces of shortest path and routing algorithms
//!
//! This crate recomputes Dijkstra, Bellman-Ford, a simulated Link-State
//! flood and a simulated Distance-Vector exchange over any graph exposing
//! the [`GraphView`] contract, and emits the algorithm's progress as a lazy
//! sequence of [`Step`] records. Nothing is computed until the caller pulls
//! the next step, so playback speed is entirely up to the consumer.
//!
//! # Algorithms
//!
//! - [`Dijkstra`]: priority-frontier shortest paths
//! - [`BellmanFord`]: round-based relaxation with negative cycle detection
//! - [`LinkState`]: narrative preamble followed by Dijkstra
//! - [`DistanceVector`]: round-based vector exchange, next-hop tracking
//!
//! # Example
//!
//! ```
//! use routing_trace::{run_algorithm, Algorithm, Distance, Graph, StepKind};
//!
//! let graph = Graph::sample();
//! let algorithm: Algorithm = "dijkstra".parse().unwrap();
//!
//! // Pull steps one at a time, e.g. from a render loop
//! let mut trace = run_algorithm(algorithm, &graph, 1);
//! let first = trace.next().unwrap();
//! assert_eq!(first.kind, StepKind::Init);
//!
//! // Or drain the whole run and inspect the final snapshot
//! let last = trace.last().unwrap();
//! assert_eq!(last.kind, StepKind::Finished);
//! assert_eq!(last.snapshot.distance(&5), Some(Distance::Finite(11)));
//! ```

mod engine;
mod graph;
mod step;

pub mod algorithms;
pub mod edge_list;

pub use engine::{run_algorithm, Algorithm, ParseAlgorithmError, Trace};
pub use graph::{
    Adjacency, EdgeId, Graph, GraphError, GraphView, Neighbor, NodeKey, WeightedEdge,
    MAX_GENERATED_NODES,
};
pub use step::{Distance, Snapshot, Step, StepKind};

pub use algorithms::{BellmanFord, Dijkstra, DistanceVector, LinkState};

// Re-export the petgraph map type the engine works with out of the box
pub use petgraph::graphmap::DiGraphMap;
