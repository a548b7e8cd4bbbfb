use super::{emit, RunState};
use crate::graph::{Adjacency, EdgeId, GraphView, Neighbor};
use crate::step::{Distance, Step, StepKind};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::iter::FusedIterator;
use tracing::debug;

const NAME: &str = "Dijkstra";

/// Dijkstra's shortest paths from a single source
///
/// Emits `init`, then for every finalized node a `visit` followed by a
/// `check` per outgoing edge and an `update` whenever that edge relaxes,
/// and a closing `finished`. Negative weights are not rejected and may
/// produce wrong distances.
pub struct Dijkstra<'g, G>
where
    G: GraphView,
{
    graph: &'g G,
    start: G::NodeId,
    phase: Phase<G::NodeId>,
}

enum Phase<N> {
    Pending,
    Running(Box<Run<N>>),
    Done,
}

struct Run<N> {
    state: RunState<N>,
    adjacency: Adjacency<N>,
    /// Ordered by tentative distance, then by insertion sequence
    frontier: BinaryHeap<Reverse<(Distance, u64, N)>>,
    pushed: u64,
    finalized: HashSet<N>,
    cursor: Cursor<N>,
}

#[derive(Clone, Copy)]
enum Cursor<N> {
    Extract,
    Check { node: N, index: usize },
    Relax { node: N, index: usize },
}

impl<'g, G> Dijkstra<'g, G>
where
    G: GraphView,
{
    pub fn new(graph: &'g G, start: G::NodeId) -> Self {
        Self {
            graph,
            start,
            phase: Phase::Pending,
        }
    }

    fn begin(&mut self) -> Option<Step<G::NodeId>> {
        let nodes = self.graph.node_ids();
        let start = self.start;
        if !nodes.contains(&start) {
            self.phase = Phase::Done;
            return emit(NAME, Step::start_not_found(start));
        }

        debug!("Starting {NAME} from node {start} over {} nodes", nodes.len());
        let mut run = Run {
            state: RunState::new(&nodes, start),
            adjacency: self.graph.adjacency(),
            frontier: BinaryHeap::new(),
            pushed: 0,
            finalized: HashSet::new(),
            cursor: Cursor::Extract,
        };
        run.push(start, Distance::Finite(0));

        let step = Step::new(
            StepKind::Init,
            run.state.distances(),
            format!("Initialized distances. Start node: {start}"),
        )
        .nodes([start]);
        self.phase = Phase::Running(Box::new(run));
        emit(NAME, step)
    }
}

impl<N: crate::NodeKey> Run<N> {
    fn push(&mut self, node: N, distance: Distance) {
        self.frontier.push(Reverse((distance, self.pushed, node)));
        self.pushed += 1;
    }

    fn neighbor(&self, node: N, index: usize) -> Option<Neighbor<N>> {
        self.adjacency.get(&node)?.get(index).copied()
    }

    /// Produce the next step, `None` once the frontier is exhausted
    fn advance(&mut self) -> Option<Step<N>> {
        loop {
            match self.cursor {
                Cursor::Extract => {
                    let Reverse((distance, _, node)) = self.frontier.pop()?;
                    if distance > self.state.distance(node) || !self.finalized.insert(node) {
                        continue;
                    }
                    self.cursor = Cursor::Check { node, index: 0 };
                    return Some(
                        Step::new(
                            StepKind::Visit,
                            self.state.distances(),
                            format!("Visiting Node {node} (Current Dist: {distance})"),
                        )
                        .nodes([node]),
                    );
                }
                Cursor::Check { node, index } => {
                    let Some(edge) = self.neighbor(node, index) else {
                        self.cursor = Cursor::Extract;
                        continue;
                    };
                    self.cursor = Cursor::Relax { node, index };
                    return Some(
                        Step::new(
                            StepKind::Check,
                            self.state.distances(),
                            format!(
                                "Checking edge {node} -> {} (weight: {})",
                                edge.to, edge.weight
                            ),
                        )
                        .nodes([node, edge.to])
                        .edges([EdgeId::new(node, edge.to)]),
                    );
                }
                Cursor::Relax { node, index } => {
                    self.cursor = Cursor::Check {
                        node,
                        index: index + 1,
                    };
                    let Some(edge) = self.neighbor(node, index) else {
                        continue;
                    };
                    let Some(distance) = self.state.relax(node, edge.to, edge.weight) else {
                        continue;
                    };
                    self.push(edge.to, distance);
                    return Some(
                        Step::new(
                            StepKind::Update,
                            self.state.distances(),
                            format!("Updated distance for Node {} to {distance}", edge.to),
                        )
                        .nodes([edge.to])
                        .edges([EdgeId::new(node, edge.to)]),
                    );
                }
            }
        }
    }
}

impl<'g, G> Iterator for Dijkstra<'g, G>
where
    G: GraphView,
{
    type Item = Step<G::NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.phase, Phase::Pending) {
            return self.begin();
        }
        let Phase::Running(run) = &mut self.phase else {
            return None;
        };
        if let Some(step) = run.advance() {
            return emit(NAME, step);
        }

        let step = Step::new(StepKind::Finished, run.state.complete(), "Dijkstra completed.");
        debug!("{NAME} finished after finalizing {} nodes", run.finalized.len());
        self.phase = Phase::Done;
        emit(NAME, step)
    }
}

impl<'g, G> FusedIterator for Dijkstra<'g, G> where G: GraphView {}
