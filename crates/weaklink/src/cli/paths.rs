//! `weaklink paths` command implementation.

use std::collections::HashSet;
use std::path::Path;

use colored::Colorize;
use weaklink::{
    Direction, EdgeListSource, EngineConfig, Neighbor, NodeKey, PathEnumerator, TraversalPath,
    TraversalResult,
};

/// Maximum paths to display.
const MAX_PATHS: usize = 50;

/// Arguments of the paths command.
pub struct PathsArgs {
    pub start: String,
    pub end: Option<String>,
    pub max_depth: Option<usize>,
    pub direction: Option<Direction>,
    pub exclude: Vec<String>,
    pub only_up: bool,
    pub json: bool,
}

/// Run the paths command.
pub fn run(config: &EngineConfig, edges: &Path, args: &PathsArgs) -> Result<(), weaklink::Error> {
    let connections = super::load_edges(edges)?;
    let source = EdgeListSource::from_connections(&connections);

    let start = NodeKey::from(args.start.as_str());
    let end = args.end.as_deref().map(NodeKey::from);
    let max_depth = args.max_depth.or(config.traversal.max_depth);
    let direction = args.direction.unwrap_or(config.traversal.direction);

    let excluded: HashSet<NodeKey> = args
        .exclude
        .iter()
        .map(|key| NodeKey::from(key.as_str()))
        .collect();
    let only_up = args.only_up;
    let filter = |neighbor: &Neighbor| {
        !excluded.contains(&neighbor.key) && (!only_up || neighbor.status.is_up())
    };

    let enumerator = PathEnumerator::with_options(&source, config.traversal_options(None));
    let result = enumerator.find_all_paths(&start, end.as_ref(), max_depth, direction, filter)?;

    if args.json {
        return super::print_json(&result);
    }

    print_result(&result, &start, end.as_ref(), direction);
    Ok(())
}

fn print_result(
    result: &TraversalResult,
    start: &NodeKey,
    end: Option<&NodeKey>,
    direction: Direction,
) {
    let target = end.map_or_else(|| "anywhere".to_string(), ToString::to_string);

    if result.paths.is_empty() {
        println!(
            "No paths from \"{}\" to \"{}\" ({direction})",
            start.as_str().cyan(),
            target
        );
    } else {
        println!(
            "{} from \"{}\" to \"{}\" ({direction}):",
            "Paths".white().bold(),
            start.as_str().cyan().bold(),
            target.cyan().bold()
        );
        println!();

        for path in result.paths.iter().take(MAX_PATHS) {
            println!("  {} {}", "•".dimmed(), format_path(path));
        }
        if result.paths.len() > MAX_PATHS {
            println!(
                "  {} ... and {} more",
                "•".dimmed(),
                result.paths.len() - MAX_PATHS
            );
        }
    }

    if result.cancelled {
        println!();
        println!(
            "{}",
            "Traversal stopped early; results are partial.".yellow()
        );
    }

    println!();
    println!(
        "{}: {} paths, {} nodes visited in {}ms",
        "Summary".dimmed(),
        result.paths.len().to_string().green(),
        result.iterations,
        result.elapsed_ms()
    );
}

fn format_path(path: &TraversalPath) -> String {
    let mut out = String::new();
    for element in path.elements() {
        if let Some(label) = &element.edge {
            out.push_str(&format!(" {} ", format!("-[{label}]→").dimmed()));
        }
        out.push_str(element.node.as_str());
    }
    out
}
