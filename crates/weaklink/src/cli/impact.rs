//! `weaklink impact` command implementation.

use std::collections::BTreeSet;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use weaklink::{
    EngineConfig, ImpactAnalyzer, ImpactReport, NodeKey, ReachabilityMode, Topology,
};

use super::display::print_keys;

/// Flags of the impact command.
pub struct ImpactArgs {
    pub directed: bool,
    pub weak: bool,
    pub threshold: Option<usize>,
    pub json: bool,
}

#[derive(Serialize)]
struct ImpactOutput<'a> {
    #[serde(flatten)]
    report: &'a ImpactReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    weak_nodes: Option<&'a BTreeSet<NodeKey>>,
}

/// Run the impact command.
pub fn run(
    config: &EngineConfig,
    edges: &Path,
    endpoints: &[String],
    args: &ImpactArgs,
) -> Result<(), weaklink::Error> {
    let connections = super::load_edges(edges)?;

    let mut topology = Topology::from_connections(&connections);
    for endpoint in endpoints {
        topology.mark_endpoint(&NodeKey::from(endpoint.as_str()));
    }

    let analyzer = if args.directed {
        ImpactAnalyzer::new(ReachabilityMode::Directed)
    } else {
        config.analyzer()
    };
    let report = analyzer.analyze(&topology);

    let weak_nodes = args.weak.then(|| {
        let threshold = args.threshold.unwrap_or(config.impact.weak_link_threshold);
        analyzer.weak_nodes(&topology, threshold)
    });

    if args.json {
        return super::print_json(&ImpactOutput {
            report: &report,
            weak_nodes: weak_nodes.as_ref(),
        });
    }

    print_report(&report);
    if let Some(weak) = &weak_nodes {
        println!();
        println!("  {} ({}):", "Weak nodes".yellow(), weak.len());
        print_keys(weak.iter(), "(none)");
    }

    Ok(())
}

fn print_report(report: &ImpactReport) {
    println!(
        "{} ({} mode): {} nodes, {} connections, {} endpoints",
        "Impact analysis".white().bold(),
        report.mode,
        report.node_count,
        report.edge_count,
        report.endpoint_count
    );
    println!();

    if report.is_fully_reachable() {
        println!("  {}", "Every resource reaches an endpoint.".green());
    } else {
        println!(
            "  {} ({}):",
            "Unreachable resources".red(),
            report.unreachable.len()
        );
        print_keys(report.unreachable.iter(), "(none)");

        println!();
        println!(
            "  {} ({}):",
            "Stranded connections".yellow(),
            report.unreachable_edges.len()
        );
        for edge in &report.unreachable_edges {
            println!(
                "    {} {} {} {} {}",
                "•".dimmed(),
                edge.from,
                "→".dimmed(),
                edge.to,
                format!("({})", edge.label).dimmed()
            );
        }
    }

    println!();
    println!(
        "{}: {} unreachable in {:.1}ms",
        "Summary".dimmed(),
        report.unreachable.len().to_string().red(),
        report.elapsed.as_secs_f64() * 1000.0
    );
}
