use crate::table::RoutingTable;
use anyhow::{Context, Result};
use clap::ValueEnum;
use routing_trace::{NodeKey, Step, StepKind};
use serde::Serialize;
use std::io::Write;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// How steps are written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable log lines and a routing table at the end
    #[default]
    Text,
    /// One RON encoded step per line
    Ron,
}

/// Delay between two steps for a playback speed in `0..=100`
pub fn delay_for_speed(speed: u8) -> Duration {
    let speed = u64::from(speed.min(100));
    Duration::from_millis(1000 - speed * 9)
}

/// What a playback ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub steps: usize,
    pub last: Option<StepKind>,
}

/// Pulls steps from a trace at a fixed pace and writes them out
pub struct Player {
    pub delay: Option<Duration>,
    pub format: OutputFormat,
}

impl Player {
    pub fn play<N, I, W>(&self, trace: I, out: &mut W) -> Result<Summary>
    where
        N: NodeKey + Serialize,
        I: IntoIterator<Item = Step<N>>,
        W: Write,
    {
        let mut summary = Summary {
            steps: 0,
            last: None,
        };

        for step in trace {
            if summary.steps > 0 {
                if let Some(delay) = self.delay {
                    thread::sleep(delay);
                }
            }

            match self.format {
                OutputFormat::Text => write_text(&step, out)?,
                OutputFormat::Ron => {
                    let line = ron::to_string(&step).context("Failed to encode step")?;
                    writeln!(out, "{line}")?;
                }
            }
            out.flush()?;

            summary.steps += 1;
            summary.last = Some(step.kind);
        }

        debug!("Played {} steps, last was {:?}", summary.steps, summary.last);
        Ok(summary)
    }
}

/// Log line for a step, followed by the routing table on completion
fn write_text<N: NodeKey, W: Write>(step: &Step<N>, out: &mut W) -> Result<()> {
    let mut line = format!("{:>9} > {}", step.kind, step.message);

    if !step.highlighted_nodes.is_empty() {
        let nodes: Vec<String> = step.highlighted_nodes.iter().map(|n| n.to_string()).collect();
        line.push_str(&format!("  [nodes: {}]", nodes.join(", ")));
    }
    if !step.highlighted_edges.is_empty() {
        let edges: Vec<String> = step.highlighted_edges.iter().map(|e| e.to_string()).collect();
        line.push_str(&format!("  [edges: {}]", edges.join(", ")));
    }
    writeln!(out, "{line}")?;

    if step.kind == StepKind::Finished {
        if let Some(table) = RoutingTable::from_snapshot(&step.snapshot) {
            writeln!(out)?;
            write!(out, "{table}")?;
        }
    }
    Ok(())
}
