use super::{emit, RunState};
use crate::graph::{GraphView, NodeKey, WeightedEdge};
use crate::step::{Distance, Step, StepKind};
use std::iter::FusedIterator;
use tracing::debug;

/// Labels and end-of-run behaviour of a round-based algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Protocol {
    BellmanFord,
    DistanceVector,
}

impl Protocol {
    fn name(self) -> &'static str {
        match self {
            Protocol::BellmanFord => "Bellman-Ford",
            Protocol::DistanceVector => "Distance-Vector",
        }
    }

    fn init_message(self, rounds: usize) -> String {
        match self {
            Protocol::BellmanFord => {
                format!("Initialized Bellman-Ford. Relaxing edges V-1 = {rounds} times.")
            }
            Protocol::DistanceVector => {
                "Initialized Distance Vector. Nodes will exchange vectors.".to_string()
            }
        }
    }

    fn round_message(self, round: usize, rounds: usize) -> String {
        match self {
            Protocol::BellmanFord => format!("Iteration {round}/{rounds}"),
            Protocol::DistanceVector => format!("Round {round}: Exchanging Vectors..."),
        }
    }

    fn update_message<N: NodeKey>(self, edge: &WeightedEdge<N>, distance: Distance) -> String {
        match self {
            Protocol::BellmanFord => {
                format!("Relaxed {}->{}: New dist {distance}", edge.from, edge.to)
            }
            Protocol::DistanceVector => format!(
                "Node {} updates Node {}: New Path Cost {distance}",
                edge.from, edge.to
            ),
        }
    }

    fn converged_message(self) -> &'static str {
        match self {
            Protocol::BellmanFord => "No changes in this iteration, stopping early.",
            Protocol::DistanceVector => "Convergence reached. No more updates.",
        }
    }

    fn finished_message(self) -> &'static str {
        match self {
            Protocol::BellmanFord => "Bellman-Ford completed.",
            Protocol::DistanceVector => "Distance Vector Protocol Converged (Simulated).",
        }
    }

    fn detects_negative_cycles(self) -> bool {
        self == Protocol::BellmanFord
    }
}

/// Shared machine relaxing every edge once per round, at most `V - 1`
/// rounds, stopping after the first round without changes
struct Rounds<'g, G>
where
    G: GraphView,
{
    protocol: Protocol,
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
    edges: Vec<WeightedEdge<N>>,
    rounds: usize,
    cursor: Cursor,
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Round(usize),
    Edge {
        round: usize,
        index: usize,
        changed: bool,
    },
    Settled,
}

impl<'g, G> Rounds<'g, G>
where
    G: GraphView,
{
    fn new(protocol: Protocol, graph: &'g G, start: G::NodeId) -> Self {
        Self {
            protocol,
            graph,
            start,
            phase: Phase::Pending,
        }
    }

    fn begin(&mut self) -> Option<Step<G::NodeId>> {
        let name = self.protocol.name();
        let nodes = self.graph.node_ids();
        let start = self.start;
        if !nodes.contains(&start) {
            self.phase = Phase::Done;
            return emit(name, Step::start_not_found(start));
        }

        let rounds = nodes.len().saturating_sub(1);
        debug!("Starting {name} from node {start}, at most {rounds} rounds");
        let run = Run {
            state: RunState::new(&nodes, start),
            edges: self.graph.edges(),
            rounds,
            cursor: Cursor::Round(0),
        };

        let step = Step::new(
            StepKind::Init,
            run.state.distances(),
            self.protocol.init_message(rounds),
        )
        .nodes([start]);
        self.phase = Phase::Running(Box::new(run));
        emit(name, step)
    }

    fn step(&mut self) -> Option<Step<G::NodeId>> {
        let protocol = self.protocol;
        let Phase::Running(run) = &mut self.phase else {
            return None;
        };

        loop {
            match run.cursor {
                Cursor::Round(round) if round < run.rounds => {
                    run.cursor = Cursor::Edge {
                        round,
                        index: 0,
                        changed: false,
                    };
                    return Some(Step::new(
                        StepKind::Iteration,
                        run.state.distances(),
                        protocol.round_message(round + 1, run.rounds),
                    ));
                }
                Cursor::Round(_) => run.cursor = Cursor::Settled,
                Cursor::Edge {
                    round,
                    index,
                    changed,
                } => {
                    let Some(edge) = run.edges.get(index).copied() else {
                        if changed {
                            run.cursor = Cursor::Round(round + 1);
                            continue;
                        }
                        debug!("{} settled after {} rounds", protocol.name(), round + 1);
                        run.cursor = Cursor::Settled;
                        return Some(Step::new(
                            StepKind::Info,
                            run.state.distances(),
                            protocol.converged_message(),
                        ));
                    };

                    let improved = run.state.relax(edge.from, edge.to, edge.weight);
                    run.cursor = Cursor::Edge {
                        round,
                        index: index + 1,
                        changed: changed || improved.is_some(),
                    };
                    if let Some(distance) = improved {
                        return Some(
                            Step::new(
                                StepKind::Update,
                                run.state.distances(),
                                protocol.update_message(&edge, distance),
                            )
                            .nodes([edge.to])
                            .edges([edge.id()]),
                        );
                    }
                }
                Cursor::Settled => {
                    let step = match run.negative_cycle_edge(protocol) {
                        Some(edge) => {
                            debug!("{} found a negative cycle through {}", protocol.name(), edge.id());
                            Step::new(
                                StepKind::Error,
                                run.state.distances(),
                                "Negative weight cycle detected!",
                            )
                            .nodes([edge.from, edge.to])
                            .edges([edge.id()])
                        }
                        None => Step::new(
                            StepKind::Finished,
                            run.state.complete(),
                            protocol.finished_message(),
                        ),
                    };
                    self.phase = Phase::Done;
                    return Some(step);
                }
            }
        }
    }
}

impl<N: NodeKey> Run<N> {
    /// First edge that still relaxes after the rounds are over
    fn negative_cycle_edge(&self, protocol: Protocol) -> Option<WeightedEdge<N>> {
        if !protocol.detects_negative_cycles() {
            return None;
        }
        self.edges
            .iter()
            .find(|edge| self.state.improvement(edge.from, edge.to, edge.weight).is_some())
            .copied()
    }
}

impl<'g, G> Iterator for Rounds<'g, G>
where
    G: GraphView,
{
    type Item = Step<G::NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.phase, Phase::Pending) {
            return self.begin();
        }
        let step = self.step()?;
        emit(self.protocol.name(), step)
    }
}

/// Bellman-Ford shortest paths with negative cycle detection
///
/// Emits `init`, then per round an `iteration` and an `update` for every
/// edge that relaxes. A round without changes emits `info` and ends the
/// relaxation early. A final pass over all edges emits a single `error`
/// if any edge still relaxes; otherwise the run ends with `finished`.
pub struct BellmanFord<'g, G>(Rounds<'g, G>)
where
    G: GraphView;

impl<'g, G> BellmanFord<'g, G>
where
    G: GraphView,
{
    pub fn new(graph: &'g G, start: G::NodeId) -> Self {
        Self(Rounds::new(Protocol::BellmanFord, graph, start))
    }
}

impl<'g, G> Iterator for BellmanFord<'g, G>
where
    G: GraphView,
{
    type Item = Step<G::NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<'g, G> FusedIterator for BellmanFord<'g, G> where G: GraphView {}

/// Simulated distance-vector exchange
///
/// Each round every edge `u -> v` stands for `u` advertising its vector to
/// `v`; the predecessor recorded for a node is its next hop. No negative
/// cycle check is performed.
pub struct DistanceVector<'g, G>(Rounds<'g, G>)
where
    G: GraphView;

impl<'g, G> DistanceVector<'g, G>
where
    G: GraphView,
{
    pub fn new(graph: &'g G, start: G::NodeId) -> Self {
        Self(Rounds::new(Protocol::DistanceVector, graph, start))
    }
}

impl<'g, G> Iterator for DistanceVector<'g, G>
where
    G: GraphView,
{
    type Item = Step<G::NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<'g, G> FusedIterator for DistanceVector<'g, G> where G: GraphView {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Graph;
    use test_log::test;

    fn chain(weights: &[i64]) -> Graph<i64> {
        let mut graph = Graph::new();
        for node in 1..=weights.len() as i64 + 1 {
            graph.add_node(node);
        }
        for (i, &weight) in weights.iter().enumerate() {
            let from = i as i64 + 1;
            graph.add_edge(from, from + 1, weight).unwrap();
        }
        graph
    }

    #[test]
    fn bellman_ford_messages() {
        let graph = chain(&[2]);
        let steps: Vec<_> = BellmanFord::new(&graph, 1).collect();
        let messages: Vec<_> = steps.iter().map(|s| s.message.as_str()).collect();

        assert_eq!(
            messages,
            vec![
                "Initialized Bellman-Ford. Relaxing edges V-1 = 1 times.",
                "Iteration 1/1",
                "Relaxed 1->2: New dist 2",
                "Bellman-Ford completed.",
            ]
        );
        assert_eq!(steps[0].highlighted_nodes, vec![1]);
        assert_eq!(steps[2].highlighted_nodes, vec![2]);
        assert_eq!(steps[2].highlighted_edges[0].to_string(), "1-2");
        assert!(steps[1].highlighted_nodes.is_empty());
        assert!(steps[3].snapshot.is_complete());
    }

    #[test]
    fn stops_after_a_quiet_round() {
        // Edges listed backwards need one round per edge, then a quiet one
        let mut graph = Graph::new();
        for node in 1..=4 {
            graph.add_node(node);
        }
        graph.add_edge(3, 4, 1).unwrap();
        graph.add_edge(1, 2, 1).unwrap();
        graph.add_edge(2, 3, 1).unwrap();

        let kinds: Vec<_> = BellmanFord::new(&graph, 1).map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Init,
                StepKind::Iteration,
                StepKind::Update,
                StepKind::Update,
                StepKind::Iteration,
                StepKind::Update,
                StepKind::Iteration,
                StepKind::Info,
                StepKind::Finished,
            ]
        );
    }

    #[test]
    fn negative_cycle_ends_without_finished() {
        let mut graph = chain(&[1, -3]);
        graph.add_edge(3, 2, 1).unwrap();

        let steps: Vec<_> = BellmanFord::new(&graph, 1).collect();
        let last = steps.last().unwrap();

        assert_eq!(last.kind, StepKind::Error);
        assert_eq!(last.message, "Negative weight cycle detected!");
        assert_eq!(last.highlighted_nodes.len(), 2);
        assert!(last.snapshot.distances.is_some());
        assert!(steps.iter().all(|s| s.kind != StepKind::Finished));
        assert_eq!(steps.iter().filter(|s| s.kind == StepKind::Error).count(), 1);
    }

    #[test]
    fn negative_self_loop_on_a_single_node() {
        let mut graph = Graph::new();
        graph.add_node(1);
        graph.add_edge(1, 1, -1).unwrap();

        let steps: Vec<_> = BellmanFord::new(&graph, 1).collect();
        assert_eq!(
            steps.iter().map(|s| s.kind).collect::<Vec<_>>(),
            vec![StepKind::Init, StepKind::Error]
        );
        assert_eq!(steps[1].highlighted_nodes, vec![1, 1]);
    }

    #[test]
    fn negative_cycle_with_extreme_weights_is_detected() {
        let mut graph = chain(&[0]);
        graph.add_edge(2, 2, i64::MIN).unwrap();

        let last = BellmanFord::new(&graph, 1).last().unwrap();
        assert_eq!(last.kind, StepKind::Error);
        assert_eq!(last.highlighted_nodes, vec![2, 2]);

        let mut graph = chain(&[0, -(1 << 62)]);
        graph.add_edge(3, 2, -(1 << 62)).unwrap();

        let last = BellmanFord::new(&graph, 1).last().unwrap();
        assert_eq!(last.kind, StepKind::Error);
        assert_eq!(last.message, "Negative weight cycle detected!");
    }

    #[test]
    fn large_path_costs_are_exact() {
        let graph = chain(&[i64::MAX, i64::MAX]);

        let steps: Vec<_> = BellmanFord::new(&graph, 1).collect();
        let last = steps.last().unwrap();
        assert_eq!(last.kind, StepKind::Finished);
        assert_eq!(
            last.snapshot.distance(&3),
            Some(Distance::Finite(2 * i128::from(i64::MAX)))
        );
        assert!(steps
            .iter()
            .any(|s| s.message == "Relaxed 2->3: New dist 18446744073709551614"));
    }

    #[test]
    fn distance_vector_messages_and_next_hops() {
        let graph = chain(&[3, 4]);
        let steps: Vec<_> = DistanceVector::new(&graph, 1).collect();
        let messages: Vec<_> = steps.iter().map(|s| s.message.as_str()).collect();

        assert_eq!(
            messages,
            vec![
                "Initialized Distance Vector. Nodes will exchange vectors.",
                "Round 1: Exchanging Vectors...",
                "Node 1 updates Node 2: New Path Cost 3",
                "Node 2 updates Node 3: New Path Cost 7",
                "Round 2: Exchanging Vectors...",
                "Convergence reached. No more updates.",
                "Distance Vector Protocol Converged (Simulated).",
            ]
        );
        let last = steps.last().unwrap();
        assert_eq!(last.snapshot.predecessor(&3), Some(2));
        assert_eq!(last.snapshot.predecessor(&1), None);
    }

    #[test]
    fn distance_vector_ignores_negative_cycles() {
        let mut graph = chain(&[1, -3]);
        graph.add_edge(3, 2, 1).unwrap();

        let last = DistanceVector::new(&graph, 1).last().unwrap();
        assert_eq!(last.kind, StepKind::Finished);
    }

    #[test]
    fn unreachable_nodes_stay_infinite() {
        let mut graph = chain(&[1]);
        graph.add_node(9);

        let last = BellmanFord::new(&graph, 1).last().unwrap();
        assert_eq!(last.snapshot.distance(&9), Some(Distance::Infinite));
        assert_eq!(last.snapshot.predecessor(&9), None);
    }
}
