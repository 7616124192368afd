//! Loading Transition Tables
//!
//! This example loads two small state machines from a YAML config file into
//! the process-wide registry and walks an order through one of them.
//!
//! Key concepts:
//! - One registry, many namespaces
//! - Invalid entries are skipped, not fatal
//! - `${...}` references in the config are resolved before loading
//!
//! Run with: RUST_LOG=debug cargo run --example load_transitions

use std::fs;
use tracing_subscriber::EnvFilter;
use transition_table::fsm::{default_registry, load_default_from_file};

const CONFIG: &str = r#"
statuses:
  final: delivered
fsm:
  order:
    pay:
      current: created
      event: pay
      target: paid
    ship:
      current: paid
      event: ship
      target: shipped
    deliver:
      current: shipped
      event: deliver
      target: ${statuses.final}
    incomplete:
      current: created
      event: cancel
  door:
    open:
      current: closed
      event: push
      target: opened
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Transition Table Example ===\n");

    // Deleted when dropped, whether or not the load succeeds.
    let file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    fs::write(file.path(), CONFIG)?;
    let loaded = load_default_from_file(file.path());
    file.close()?;
    let report = loaded?;

    println!("Loaded {} transitions, skipped {}", report.loaded, report.skipped);

    let registry = default_registry();
    for namespace in registry.namespaces() {
        println!("  {namespace}: {} transitions", registry.namespace_len(&namespace));
    }

    println!("\nWalking an order:");
    let mut status = "created".to_string();
    for event in ["pay", "ship", "deliver", "cancel"] {
        match registry.get_target_transition("order", &status, event) {
            Some(transition) => {
                println!("  {status} --{event}--> {}", transition.target_status);
                status = transition.target_status.clone();
            }
            None => println!("  {status} has no transition for '{event}'"),
        }
    }

    println!("\nSnapshot:\n{}", serde_json::to_string_pretty(&registry.snapshot())?);

    println!("\n=== Example Complete ===");
    Ok(())
}
