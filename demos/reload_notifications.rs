// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reload notification example.
//!
//! This example demonstrates:
//! - Subscribing to reload notifications from async tasks
//! - Editing the persisted document behind the configuration's back
//! - Reloading and observing the new values
//! - Coalescing of notifications a subscriber has not consumed yet
//!
//! To run this example:
//! ```bash
//! cargo run --example reload_notifications
//!
//! # With automatic reload on file changes
//! cargo run --example reload_notifications --features reload
//! ```

use formcfg::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== formcfg: Reload Notifications ===\n");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.json");
    let config = Arc::new(Configuration::new(Arc::new(JsonFileStore::from_file(&path))));
    config.save()?;

    let mut subscription = config.subscribe();
    let watcher_config = Arc::clone(&config);
    let listener = tokio::spawn(async move {
        let mut seen = 0;
        while subscription.changed().await {
            seen += 1;
            println!(
                "  [listener] reload #{}: general.port = {}",
                seen,
                watcher_config.get("general.port").as_int()
            );
            if seen == 2 {
                break;
            }
        }
    });

    println!("--- Editing the file and reloading ---");
    let mut document: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)
        .map_err(ConfigError::from_json_error)?;
    document["general"]["port"] = serde_json::json!(7000);
    std::fs::write(&path, document.to_string())?;
    config.reload()?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("--- Three reloads in a row coalesce into one notification ---");
    document["general"]["port"] = serde_json::json!(7001);
    std::fs::write(&path, document.to_string())?;
    for _ in 0..3 {
        config.reload()?;
    }

    if tokio::time::timeout(Duration::from_secs(2), listener).await.is_err() {
        println!("listener timed out");
    }

    #[cfg(feature = "reload")]
    {
        println!("\n--- Automatic reload on file change ---");
        let mut watcher = FileWatcher::new(&path, Some(Duration::from_millis(200)))?;
        watcher.watch(reload_on_change(Arc::clone(&config)))?;

        let mut subscription = config.subscribe();
        document["general"]["port"] = serde_json::json!(7002);
        std::fs::write(&path, document.to_string())?;

        match tokio::time::timeout(Duration::from_secs(3), subscription.changed()).await {
            Ok(true) => println!("general.port = {}", config.get("general.port").as_int()),
            _ => println!("no change observed"),
        }
        watcher.stop()?;
    }

    Ok(())
}
