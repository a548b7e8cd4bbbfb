use routing_trace::{Distance, NodeKey, Snapshot};
use std::fmt;

/// One destination of the final routing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<N> {
    pub destination: N,
    pub cost: Distance,
    pub previous_hop: Option<N>,
}

/// Final routing table rendered from a `finished` step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable<N> {
    pub routes: Vec<Route<N>>,
}

impl<N: NodeKey> RoutingTable<N> {
    /// Build the table, `None` unless the snapshot carries both distances
    /// and predecessors
    pub fn from_snapshot(snapshot: &Snapshot<N>) -> Option<Self> {
        let (distances, previous) = (snapshot.distances.as_ref()?, snapshot.previous.as_ref()?);
        let routes = distances
            .iter()
            .map(|(&destination, &cost)| Route {
                destination,
                cost,
                previous_hop: previous.get(&destination).copied().flatten(),
            })
            .collect();
        Some(Self { routes })
    }
}

impl<N: NodeKey> fmt::Display for RoutingTable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<[String; 3]> = self
            .routes
            .iter()
            .map(|route| {
                [
                    route.destination.to_string(),
                    route.cost.to_string(),
                    route
                        .previous_hop
                        .map_or_else(|| "-".to_string(), |hop| hop.to_string()),
                ]
            })
            .collect();

        let header = ["Destination", "Cost", "Prev Hop"];
        let mut widths = header.map(|title| title.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        writeln!(f, "Final Routing Table")?;
        write_row(f, &header.map(str::to_string), &widths)?;
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String; 3], widths: &[usize; 3]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            // Pad by characters, `∞` is wider in bytes than on screen
            let fill = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(fill))
        })
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}
