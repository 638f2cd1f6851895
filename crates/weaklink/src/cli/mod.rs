//! CLI command implementations.

mod display;

pub mod circuit;
pub mod impact;
pub mod paths;

use std::path::Path;

use weaklink::{ConnectionRecord, EngineConfig, load_connections};

/// Load the engine configuration, or defaults when no file was given.
pub fn load_config(path: Option<&Path>) -> weaklink::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    }
}

/// Load a connection export, reporting skipped lines on stderr.
fn load_edges(path: &Path) -> weaklink::Result<Vec<ConnectionRecord>> {
    let (records, warnings) = load_connections(path)?;
    display::print_load_warnings(path, &warnings);
    Ok(records)
}

/// Write `value` to stdout as pretty JSON.
fn print_json<T: serde::Serialize>(value: &T) -> weaklink::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}
