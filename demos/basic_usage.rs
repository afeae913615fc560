// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the settings tree.
//!
//! This example demonstrates:
//! - Reading declared settings and their defaults
//! - Writing settings and persisting them to a JSON file
//! - Typed projections and what happens on a type mismatch
//! - Settings created on demand from unknown paths
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use formcfg::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== formcfg: Basic Usage ===\n");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.json");
    let config = Configuration::new(Arc::new(JsonFileStore::from_file(&path)));

    // Example 1: Declared settings
    println!("--- Example 1: Defaults ---");
    println!("general.name = {}", config.get("general.name").as_string());
    println!("general.port = {}", config.get("general.port").as_int());
    println!("features.share.enable = {}", config.get("features.share.enable").as_bool());

    // Example 2: Writes persist
    println!("\n--- Example 2: Writing ---");
    config.get("general.port").set(9999);
    config.get("general.name").set("My Files");
    println!("general.port = {}", config.get("general.port").as_int());
    println!("Saved to {}", path.display());

    // Example 3: Soft typing
    println!("\n--- Example 3: Type Mismatch ---");
    let name = config.get("general.name");
    let decoded = name.decode::<i64>();
    println!(
        "general.name as int = {} (type matched: {})",
        decoded.value, decoded.matched
    );

    // Example 4: Settings created on demand
    println!("\n--- Example 4: Unknown Paths ---");
    config
        .get("plugins.thumbnailer.enable")
        .set_default(true)
        .schema(|el| el.kind = "boolean".to_string());
    let el = config.get("plugins.thumbnailer.enable").element();
    println!("plugins.thumbnailer.enable: type={} effective={}", el.kind, el.effective());

    // Example 5: The persisted document keeps declaration order
    println!("\n--- Example 5: Persisted Document ---");
    println!("{}", std::fs::read_to_string(&path)?);

    Ok(())
}
