mod player;
mod table;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use player::{delay_for_speed, OutputFormat, Player};
use routing_trace::{edge_list, run_algorithm, Algorithm, Graph, GraphError, GraphView};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Algorithm to trace: dijkstra, bellman, link-state or distance-vector
    #[arg(short, long, default_value = "dijkstra")]
    algorithm: Algorithm,

    /// Node the run starts from
    #[arg(short, long, default_value_t = 1)]
    start: i64,

    /// Edge list to load, one `from to weight` per line, `-` for stdin.
    /// The sample graph is used when omitted
    #[arg(short, long)]
    edges: Option<PathBuf>,

    /// Number of nodes of a loaded edge list, defaults to the highest
    /// node id it references. At most 10000
    #[arg(short, long)]
    nodes: Option<usize>,

    /// Playback speed, from 0 (one step per second) to 100
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    speed: u8,

    /// Print every step immediately
    #[arg(long)]
    no_delay: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// List the available algorithms and exit
    #[arg(long)]
    list: bool,
}

fn read_edge_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read edge list from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read edge list {}", path.display()))
    }
}

/// Build the numbered graph for `text`, sized by `nodes` or by the highest
/// node id the edge list references
fn build_graph(text: &str, nodes: Option<usize>) -> Result<Graph<i64>, GraphError<i64>> {
    let node_count = nodes.unwrap_or_else(|| {
        edge_list::parse_edge_list(text)
            .iter()
            .flat_map(|edge| [edge.from, edge.to])
            .max()
            .map_or(0, |max| usize::try_from(max.max(0)).unwrap_or(usize::MAX))
    });
    debug!("Building graph with {node_count} nodes");
    Graph::generate(node_count, text)
}

fn load_graph(args: &Args) -> Result<Graph<i64>> {
    let Some(path) = &args.edges else {
        return Ok(Graph::sample());
    };

    let text = read_edge_text(path)?;
    let graph = build_graph(&text, args.nodes)
        .with_context(|| format!("Failed to build graph from {}", path.display()))?;
    info!(
        "Generated graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    if args.list {
        for algorithm in Algorithm::ALL {
            println!("{:<16} {}", algorithm.name(), algorithm.description());
        }
        return Ok(());
    }

    let graph = load_graph(&args)?;
    debug!("Nodes: {:?}", graph.node_ids());

    let player = Player {
        delay: (!args.no_delay).then(|| delay_for_speed(args.speed)),
        format: args.format,
    };
    if args.format == OutputFormat::Text {
        println!("{}", args.algorithm.description());
    }

    let mut stdout = io::stdout().lock();
    let summary = player.play(run_algorithm(args.algorithm, &graph, args.start), &mut stdout)?;
    info!("Completed {} after {} steps", args.algorithm, summary.steps);

    Ok(())
}
