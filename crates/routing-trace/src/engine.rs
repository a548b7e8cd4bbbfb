use crate::algorithms::{BellmanFord, Dijkstra, DistanceVector, LinkState};
use crate::graph::GraphView;
use crate::step::Step;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;
use thiserror::Error;

/// Algorithms the engine can trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Dijkstra,
    #[serde(rename = "bellman")]
    BellmanFord,
    LinkState,
    DistanceVector,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Dijkstra,
        Algorithm::BellmanFord,
        Algorithm::LinkState,
        Algorithm::DistanceVector,
    ];

    /// Name accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::BellmanFord => "bellman",
            Algorithm::LinkState => "link-state",
            Algorithm::DistanceVector => "distance-vector",
        }
    }

    /// One line summary shown next to a running trace
    pub fn description(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => {
                "Dijkstra's Algorithm: Finds the shortest path from a source node to all other nodes."
            }
            Algorithm::BellmanFord => {
                "Bellman-Ford: Handles negative weights, relaxes edges V-1 times."
            }
            Algorithm::LinkState => {
                "Link State: Floods information to build a map, then runs Dijkstra."
            }
            Algorithm::DistanceVector => {
                "Distance Vector: Iterative distributed algorithm (simulated)."
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown algorithm name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm {0:?}, expected one of dijkstra, bellman, link-state, distance-vector")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "bellman" | "bellman-ford" => Ok(Algorithm::BellmanFord),
            "link-state" => Ok(Algorithm::LinkState),
            "distance-vector" => Ok(Algorithm::DistanceVector),
            other => Err(ParseAlgorithmError(other.to_string())),
        }
    }
}

/// Lazy step sequence of whichever algorithm was selected
pub enum Trace<'g, G>
where
    G: GraphView,
{
    Dijkstra(Dijkstra<'g, G>),
    BellmanFord(BellmanFord<'g, G>),
    LinkState(LinkState<'g, G>),
    DistanceVector(DistanceVector<'g, G>),
}

impl<'g, G> Iterator for Trace<'g, G>
where
    G: GraphView,
{
    type Item = Step<G::NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Trace::Dijkstra(trace) => trace.next(),
            Trace::BellmanFord(trace) => trace.next(),
            Trace::LinkState(trace) => trace.next(),
            Trace::DistanceVector(trace) => trace.next(),
        }
    }
}

impl<'g, G> FusedIterator for Trace<'g, G> where G: GraphView {}

/// Start tracing `algorithm` over `graph` from `start`
///
/// No work is done until the first step is pulled. The graph stays
/// borrowed for as long as the trace is alive.
pub fn run_algorithm<G>(algorithm: Algorithm, graph: &G, start: G::NodeId) -> Trace<'_, G>
where
    G: GraphView,
{
    match algorithm {
        Algorithm::Dijkstra => Trace::Dijkstra(Dijkstra::new(graph, start)),
        Algorithm::BellmanFord => Trace::BellmanFord(BellmanFord::new(graph, start)),
        Algorithm::LinkState => Trace::LinkState(LinkState::new(graph, start)),
        Algorithm::DistanceVector => Trace::DistanceVector(DistanceVector::new(graph, start)),
    }
}
