//! `weaklink circuit` command implementation.

use std::fs;
use std::path::Path;

use colored::Colorize;
use weaklink::{CircuitHealth, EngineConfig, IntegrityEvaluator, NodeKey};

use super::display::{flag, print_keys};

/// Run the circuit command.
pub fn run(
    config: &EngineConfig,
    edges: &Path,
    a_point: &str,
    z_point: &str,
    previous: Option<&Path>,
    json: bool,
) -> Result<(), weaklink::Error> {
    let path = super::load_edges(edges)?;

    let previous = match previous {
        Some(file) => {
            let content = fs::read_to_string(file)?;
            serde_json::from_str::<CircuitHealth>(&content).map_err(|e| {
                weaklink::Error::Config(format!(
                    "invalid health record in {}: {e}",
                    file.display()
                ))
            })?
        }
        None => CircuitHealth::default(),
    };

    let verdict = IntegrityEvaluator::new(config.impact.mode).evaluate(
        &path,
        &NodeKey::from(a_point),
        &NodeKey::from(z_point),
        &previous,
    );

    if json {
        return super::print_json(&verdict.health);
    }

    println!(
        "{} {} {} {}:",
        "Circuit".white().bold(),
        a_point.cyan().bold(),
        "↔".dimmed(),
        z_point.cyan().bold()
    );
    println!();

    if verdict.invalid {
        println!(
            "  {}",
            "A-point and Z-point are the same resource; circuit is invalid.".red()
        );
    }

    let health = &verdict.health;
    let status = if health.operational_status.is_up() {
        health.operational_status.to_string().green()
    } else {
        health.operational_status.to_string().red()
    };
    println!("  {:<10} {status}", "status");
    println!("  {:<10} {}", "broken", flag(health.broken));
    println!("  {:<10} {}", "degraded", flag(health.degraded));

    if health.broken && !verdict.invalid {
        println!();
        println!(
            "  {} ({}):",
            "Broken resources".red(),
            health.broken_resources.len()
        );
        print_keys(health.broken_resources.iter(), "(none)");
    }

    println!();
    let change = if verdict.changed {
        "changed".yellow()
    } else {
        "unchanged".dimmed()
    };
    println!("{}: {change} from previous record", "Summary".dimmed());

    Ok(())
}
