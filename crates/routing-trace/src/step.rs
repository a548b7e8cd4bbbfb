use crate::graph::{EdgeId, NodeKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Best known path cost to a node
///
/// `Finite` always orders before `Infinite`, so comparing two distances
/// is the relaxation test. Finite costs are held wider than edge weights
/// so summing the weights along any relaxation chain stays exact.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Distance {
    Finite(i128),
    #[default]
    Infinite,
}

impl Distance {
    /// Whether a path to the node is known
    pub fn is_finite(self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// Extend this distance by an edge weight, `None` if unreachable
    pub fn extend(self, weight: i64) -> Option<Distance> {
        match self {
            Distance::Finite(d) => Some(Distance::Finite(d.saturating_add(i128::from(weight)))),
            Distance::Infinite => None,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{d}"),
            Distance::Infinite => f.write_str("∞"),
        }
    }
}

/// Kind of observable event carried by a [`Step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Init,
    Visit,
    Check,
    Update,
    Iteration,
    Info,
    Error,
    Finished,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Init => "init",
            StepKind::Visit => "visit",
            StepKind::Check => "check",
            StepKind::Update => "update",
            StepKind::Iteration => "iteration",
            StepKind::Info => "info",
            StepKind::Error => "error",
            StepKind::Finished => "finished",
        };
        f.pad(name)
    }
}

/// Copy of the run state taken when a step is emitted
///
/// A field is `None` when the step does not carry that part of the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "N: Serialize + Ord",
    deserialize = "N: Deserialize<'de> + Ord"
))]
pub struct Snapshot<N> {
    pub distances: Option<BTreeMap<N, Distance>>,
    pub previous: Option<BTreeMap<N, Option<N>>>,
}

impl<N> Default for Snapshot<N> {
    fn default() -> Self {
        Self {
            distances: None,
            previous: None,
        }
    }
}

impl<N: NodeKey> Snapshot<N> {
    /// Snapshot carrying nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot carrying only the distances
    pub fn with_distances(distances: &BTreeMap<N, Distance>) -> Self {
        Self {
            distances: Some(distances.clone()),
            previous: None,
        }
    }

    /// Snapshot carrying both distances and predecessors
    pub fn complete(distances: &BTreeMap<N, Distance>, previous: &BTreeMap<N, Option<N>>) -> Self {
        Self {
            distances: Some(distances.clone()),
            previous: Some(previous.clone()),
        }
    }

    /// Distance recorded for `node`, if distances are carried
    pub fn distance(&self, node: &N) -> Option<Distance> {
        self.distances.as_ref()?.get(node).copied()
    }

    /// Predecessor (or next hop) recorded for `node`
    pub fn predecessor(&self, node: &N) -> Option<N> {
        self.previous.as_ref()?.get(node).copied().flatten()
    }

    /// Whether this snapshot is enough to render a routing table
    pub fn is_complete(&self) -> bool {
        self.distances.is_some() && self.previous.is_some()
    }
}

/// One discrete, ordered, immutable unit of algorithm progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "N: Serialize + Ord",
    deserialize = "N: Deserialize<'de> + Ord"
))]
pub struct Step<N> {
    pub kind: StepKind,
    pub snapshot: Snapshot<N>,
    pub message: String,
    pub highlighted_nodes: Vec<N>,
    pub highlighted_edges: Vec<EdgeId<N>>,
}

impl<N: NodeKey> Step<N> {
    pub fn new(kind: StepKind, snapshot: Snapshot<N>, message: impl Into<String>) -> Self {
        Self {
            kind,
            snapshot,
            message: message.into(),
            highlighted_nodes: Vec::new(),
            highlighted_edges: Vec::new(),
        }
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = N>) -> Self {
        self.highlighted_nodes.extend(nodes);
        self
    }

    pub fn edges(mut self, edges: impl IntoIterator<Item = EdgeId<N>>) -> Self {
        self.highlighted_edges.extend(edges);
        self
    }

    /// The single step emitted when the start node is absent from the graph
    pub(crate) fn start_not_found(start: N) -> Self {
        Step::new(
            StepKind::Error,
            Snapshot::empty(),
            format!("Start node {start} not found."),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn finite_orders_before_infinite() {
        assert!(Distance::Finite(i128::MAX) < Distance::Infinite);
        assert!(Distance::Finite(-3) < Distance::Finite(2));
        assert_eq!(Distance::default(), Distance::Infinite);
    }

    #[test]
    fn extend_is_exact_and_skips_unreachable() {
        assert_eq!(Distance::Finite(2).extend(3), Some(Distance::Finite(5)));
        assert_eq!(
            Distance::Finite(i64::MAX.into()).extend(i64::MAX),
            Some(Distance::Finite(2 * i128::from(i64::MAX)))
        );
        assert_eq!(
            Distance::Finite(i64::MIN.into()).extend(i64::MIN),
            Some(Distance::Finite(2 * i128::from(i64::MIN)))
        );
        assert_eq!(Distance::Infinite.extend(1), None);
    }

    #[test]
    fn distance_display() {
        assert_eq!(Distance::Finite(-4).to_string(), "-4");
        assert_eq!(Distance::Infinite.to_string(), "∞");
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut distances = BTreeMap::new();
        distances.insert(1, Distance::Finite(0));
        let snapshot = Snapshot::with_distances(&distances);

        distances.insert(1, Distance::Finite(7));

        assert_eq!(snapshot.distance(&1), Some(Distance::Finite(0)));
        assert!(!snapshot.is_complete());
    }

    #[test]
    fn step_builder_keeps_highlight_order() {
        let step = Step::new(StepKind::Check, Snapshot::empty(), "checking")
            .nodes([3, 1])
            .edges([EdgeId::new(3, 1)]);

        assert_eq!(step.highlighted_nodes, vec![3, 1]);
        assert_eq!(step.highlighted_edges[0].to_string(), "3-1");
        assert_eq!(step.kind.to_string(), "check");
    }
}
