// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the store.
//!
//! This example demonstrates:
//! - Loading a configuration tree
//! - Reading and writing values by colon-delimited path
//! - Deep-merging a partial mapping with `extend`
//! - Holding a snapshot while the store keeps changing
//!
//! To run this example:
//! ```bash
//! RUST_LOG=debug cargo run --example basic_usage
//! ```

use immutmem::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== ImmutMem: Basic Usage ===\n");

    let store = PersistentStore::builder()
        .with_value(Value::from(json!({
            "server": { "host": "localhost", "port": 8080 },
            "database": { "pool": { "min": 1, "max": 4 }, "url": "postgres://db" },
            "features": ["auth"],
        })))?
        .build()?;

    println!("Store created at version {}.\n", store.version());

    // Example 1: Reading values
    println!("--- Example 1: Reading ---");
    if let Some(host) = store.get("server:host")? {
        println!("✓ server:host = {}", host);
    }
    match store.get("server:tls")? {
        Some(value) => println!("✓ server:tls = {}", value),
        None => println!("✗ server:tls not set"),
    }
    let port = store.require("server:port")?.as_u64("server:port")?;
    println!("✓ server:port = {} (as u64)", port);

    // Example 2: Writing nested values
    println!("\n--- Example 2: Writing ---");
    store.set("server:tls:enabled", Value::from(true))?;
    println!("✓ server = {}", store.require("server")?);

    // Example 3: Invalid keys are rejected
    println!("\n--- Example 3: Invalid Keys ---");
    match store.set("server::port", Value::from(1)) {
        Ok(()) => println!("✗ unexpectedly accepted"),
        Err(e) => println!("✓ rejected: {}", e),
    }

    // Example 4: Deep merge
    println!("\n--- Example 4: Extend ---");
    let snapshot = store.snapshot();
    store.extend("database", Value::from(json!({ "pool": { "max": 16 } })))?;
    println!("✓ database = {}", store.require("database")?);
    println!("  snapshot still sees {}", snapshot.get("database:pool:max")?.unwrap_or_default());

    // Example 5: Returned values belong to the caller
    println!("\n--- Example 5: Isolation ---");
    let mut features = store.require("features")?;
    if let Some(list) = features.as_sequence_mut() {
        list.push(Value::from("metrics"));
    }
    println!("  local copy: {}", features);
    println!("  store:      {}", store.require("features")?);

    println!("\nFinal version: {}", store.version());
    Ok(())
}
