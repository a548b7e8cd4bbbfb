use super::{emit, Dijkstra};
use crate::graph::GraphView;
use crate::step::{Snapshot, Step, StepKind};
use std::iter::FusedIterator;

const NAME: &str = "Link-State";

/// Simulated link-state routing
///
/// Once every router has flooded its link-state packets, each one holds the
/// full topology and runs Dijkstra locally. The trace is therefore a single
/// `info` step naming those phases followed by the unmodified Dijkstra
/// trace. An unknown start node yields only Dijkstra's `error` step.
pub struct LinkState<'g, G>
where
    G: GraphView,
{
    graph: &'g G,
    start: G::NodeId,
    announced: bool,
    dijkstra: Dijkstra<'g, G>,
}

impl<'g, G> LinkState<'g, G>
where
    G: GraphView,
{
    pub fn new(graph: &'g G, start: G::NodeId) -> Self {
        Self {
            graph,
            start,
            announced: false,
            dijkstra: Dijkstra::new(graph, start),
        }
    }
}

impl<'g, G> Iterator for LinkState<'g, G>
where
    G: GraphView,
{
    type Item = Step<G::NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.announced {
            self.announced = true;
            if self.graph.contains_node(&self.start) {
                return emit(
                    NAME,
                    Step::new(
                        StepKind::Info,
                        Snapshot::empty(),
                        "Link State: 1. Nodes Flood LSPs. 2. Build Graph. 3. Run Dijkstra.",
                    ),
                );
            }
        }
        self.dijkstra.next()
    }
}

impl<'g, G> FusedIterator for LinkState<'g, G> where G: GraphView {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Graph;
    use test_log::test;

    #[test]
    fn preamble_then_dijkstra() {
        let graph = Graph::sample();
        let steps: Vec<_> = LinkState::new(&graph, 1).collect();
        let dijkstra: Vec<_> = Dijkstra::new(&graph, 1).collect();

        assert_eq!(steps[0].kind, StepKind::Info);
        assert_eq!(steps[0].snapshot, Snapshot::empty());
        assert_eq!(&steps[1..], dijkstra.as_slice());
    }

    #[test]
    fn unknown_start_is_only_an_error() {
        let graph = Graph::sample();
        let steps: Vec<_> = LinkState::new(&graph, 42).collect();

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::Error);
        assert_eq!(steps[0].message, "Start node 42 not found.");
    }
}
