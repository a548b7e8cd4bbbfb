//! Step-emitting implementations of the supported algorithms
//!
//! Every algorithm is an explicit state machine implementing [`Iterator`].
//! Construction does no work: the graph is read on the first call to
//! `next`, and each further call advances the run just far enough to
//! produce one [`Step`](crate::Step). Once exhausted an iterator keeps
//! returning `None`; dropping it early releases nothing but its own state.

mod dijkstra;
mod link_state;
mod rounds;

pub use dijkstra::Dijkstra;
pub use link_state::LinkState;
pub use rounds::{BellmanFord, DistanceVector};

use crate::graph::NodeKey;
use crate::step::{Distance, Snapshot, Step};
use std::collections::BTreeMap;
use tracing::trace;

/// Distances and predecessors owned by a single run
#[derive(Debug, Clone)]
pub(crate) struct RunState<N> {
    distances: BTreeMap<N, Distance>,
    previous: BTreeMap<N, Option<N>>,
}

impl<N: NodeKey> RunState<N> {
    /// Every node unreachable except `start`, which is at distance zero
    pub(crate) fn new(nodes: &[N], start: N) -> Self {
        let mut distances: BTreeMap<N, Distance> =
            nodes.iter().map(|&node| (node, Distance::Infinite)).collect();
        let previous = nodes.iter().map(|&node| (node, None)).collect();
        distances.insert(start, Distance::Finite(0));
        Self {
            distances,
            previous,
        }
    }

    pub(crate) fn distance(&self, node: N) -> Distance {
        self.distances.get(&node).copied().unwrap_or_default()
    }

    /// Distance `to` would get through the edge `from -> to`, if that is an
    /// improvement
    ///
    /// Unreachable sources and targets outside the run never improve.
    pub(crate) fn improvement(&self, from: N, to: N, weight: i64) -> Option<Distance> {
        let current = *self.distances.get(&to)?;
        let candidate = self.distances.get(&from)?.extend(weight)?;
        (candidate < current).then_some(candidate)
    }

    /// Relax the edge `from -> to`, returns the new distance of `to` if it
    /// improved
    pub(crate) fn relax(&mut self, from: N, to: N, weight: i64) -> Option<Distance> {
        let candidate = self.improvement(from, to, weight)?;
        self.distances.insert(to, candidate);
        self.previous.insert(to, Some(from));
        Some(candidate)
    }

    pub(crate) fn distances(&self) -> Snapshot<N> {
        Snapshot::with_distances(&self.distances)
    }

    pub(crate) fn complete(&self) -> Snapshot<N> {
        Snapshot::complete(&self.distances, &self.previous)
    }
}

/// Log a step on its way out of an iterator
pub(crate) fn emit<N: NodeKey>(algorithm: &str, step: Step<N>) -> Option<Step<N>> {
    trace!("{algorithm}: {} {}", step.kind, step.message);
    Some(step)
}
