//! Textual edge list used to bulk-populate a graph
//!
//! One edge per line, `<from> <to> <weight>`, fields separated by any run
//! of whitespace and/or commas. All three fields must parse as integers;
//! anything after the third field is ignored and lines that do not match
//! are skipped without error.

use crate::graph::WeightedEdge;
use std::fmt::Write;
use tracing::debug;

/// Parse a single line, `None` if it does not describe an edge
pub fn parse_edge_line(line: &str) -> Option<WeightedEdge<i64>> {
    let mut fields = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|field| !field.is_empty());

    let from = fields.next()?.parse().ok()?;
    let to = fields.next()?.parse().ok()?;
    let weight = fields.next()?.parse().ok()?;

    Some(WeightedEdge::new(from, to, weight))
}

/// Parse every well-formed line of `text`
pub fn parse_edge_list(text: &str) -> Vec<WeightedEdge<i64>> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let edge = parse_edge_line(line);
            if edge.is_none() && !line.trim().is_empty() {
                debug!("Skipping malformed edge line {}: {line:?}", index + 1);
            }
            edge
        })
        .collect()
}

/// Format edges back into the textual form, one `from to weight` per line
pub fn format_edge_list<'a>(edges: impl IntoIterator<Item = &'a WeightedEdge<i64>>) -> String {
    let mut text = String::new();
    for edge in edges {
        // Writing to a String cannot fail
        let _ = writeln!(text, "{} {} {}", edge.from, edge.to, edge.weight);
    }
    text
}
