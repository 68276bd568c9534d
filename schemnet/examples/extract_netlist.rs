//! Extract a schematic snapshot and print its netlist.

use anyhow::Context;
use schemnet::prelude::*;
use schemnet::CircuitGraph;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/valid/inverter.sch.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example extract_netlist [path/to/file.sch.json]");
        std::process::exit(1);
    }

    let library = ElementLibrary::default();
    let result = SchemnetCore::extract_file(path, &library, &ExtractOptions::default())
        .with_context(|| format!("extracting {}", path.display()))?;

    println!("Circuit {} from {}", result.circuit.name, path.display());
    println!();

    let graph = CircuitGraph::from_circuit(&result.circuit)?;
    for signal in graph.signals() {
        println!("{} ({})", signal.name, signal.portdir);
        for (instance, port) in graph.instances_on(&signal.name) {
            println!("  {}.{}", instance.name, port);
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    println!();
    println!("Junction dots: {}", result.dots.len());
    Ok(())
}
