// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for reloading and change notifications.

mod common;

use common::{assert_quiet, wait_for, RecordingStore, SAMPLE_DOCUMENT};
use formcfg::adapters::{JsonFileStore, TracingVerbosity};
use formcfg::service::Configuration;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload;

#[cfg(feature = "reload")]
use formcfg::adapters::{reload_on_change, FileWatcher};
#[cfg(feature = "reload")]
use formcfg::ports::ConfigWatcher;

const WAIT: Duration = Duration::from_secs(2);

#[test]
fn test_manual_reload_picks_up_external_edit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let config = Configuration::new(Arc::new(JsonFileStore::from_file(&path)));
    config.save().unwrap();

    // Get the value to populate the cache
    assert_eq!(config.get("general.port").as_int(), 8334);

    let edited = fs::read_to_string(&path)
        .unwrap()
        .replace("\"port\": null", "\"port\": 9000");
    fs::write(&path, edited).unwrap();
    config.reload().unwrap();

    assert_eq!(config.get("general.port").as_int(), 9000);
}

#[test]
fn test_reload_clears_stored_value_on_null() {
    let store = Arc::new(RecordingStore::with_document(r#"{"general":{"port":9000}}"#));
    let config = Configuration::new(store.clone());
    config.reload().unwrap();
    assert_eq!(config.get("general.port").as_int(), 9000);

    store.set_document(r#"{"general":{"port":null}}"#);
    config.reload().unwrap();
    assert_eq!(config.get("general.port").as_int(), 8334);
}

#[test]
fn test_reload_keeps_values_missing_from_document() {
    let store = Arc::new(RecordingStore::with_document(SAMPLE_DOCUMENT));
    let config = Configuration::new(store.clone());
    config.reload().unwrap();

    store.set_document(r#"{"general":{"name":"Renamed"}}"#);
    config.reload().unwrap();

    assert_eq!(config.get("general.name").as_string(), "Renamed");
    assert_eq!(config.get("general.port").as_int(), 9999);
    assert!(config.connections().is_empty());
}

#[test]
fn test_reload_does_not_write() {
    let store = Arc::new(RecordingStore::with_document(SAMPLE_DOCUMENT));
    let config = Configuration::new(store.clone());
    config.reload().unwrap();
    config.reload().unwrap();
    assert!(store.writes().is_empty());
}

#[test]
fn test_notification_fanout_and_unsubscribe() {
    let store = Arc::new(RecordingStore::with_document(SAMPLE_DOCUMENT));
    let config = Configuration::new(store);

    let mut first = config.subscribe();
    let mut second = config.subscribe();
    assert_eq!(config.subscribers(), 2);

    config.reload().unwrap();
    assert_eq!(wait_for(&mut first, WAIT), Some(true));
    assert_eq!(wait_for(&mut second, WAIT), Some(true));
    assert_quiet(&mut first);

    config.unsubscribe(first.id());
    assert_eq!(config.subscribers(), 1);
    config.reload().unwrap();

    assert_eq!(wait_for(&mut second, WAIT), Some(true));
    assert_eq!(wait_for(&mut first, WAIT), Some(false));
}

#[test]
fn test_unsubscribe_unknown_is_noop() {
    let config = Configuration::new(Arc::new(RecordingStore::with_document("{}")));
    let mut sub = config.subscribe();
    config.unsubscribe(sub.id());
    config.unsubscribe(sub.id());
    assert_eq!(config.subscribers(), 0);
    assert_eq!(sub.try_changed(), Some(false));
}

#[test]
fn test_failed_reload_does_not_notify() {
    let store = Arc::new(RecordingStore::with_document(SAMPLE_DOCUMENT));
    let config = Configuration::new(store.clone());
    config.reload().unwrap();
    let mut sub = config.subscribe();

    store.fail_reads(true);
    assert!(config.reload().is_err());
    assert_quiet(&mut sub);
    assert_eq!(config.get("general.port").as_int(), 9999);

    store.fail_reads(false);
    store.set_document("[1, 2");
    assert!(config.reload().is_err());
    assert_quiet(&mut sub);
}

#[test]
fn test_undrained_notifications_coalesce() {
    let config = Configuration::new(Arc::new(RecordingStore::with_document("{}")));
    let mut sub = config.subscribe();

    for _ in 0..5 {
        config.reload().unwrap();
    }
    assert_eq!(wait_for(&mut sub, WAIT), Some(true));
    assert_quiet(&mut sub);
}

#[test]
fn test_slow_subscriber_does_not_block_reload() {
    let config = Configuration::new(Arc::new(RecordingStore::with_document("{}")));
    let _never_read = config.subscribe();

    let started = std::time::Instant::now();
    for _ in 0..100 {
        config.reload().unwrap();
    }
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_async_subscriber() {
    let store = Arc::new(RecordingStore::with_document(SAMPLE_DOCUMENT));
    let config = Arc::new(Configuration::new(store));
    let mut sub = config.subscribe();

    let reloader = Arc::clone(&config);
    tokio::spawn(async move {
        let _ = reloader.reload();
    });

    let changed = tokio::time::timeout(WAIT, sub.changed()).await;
    assert_eq!(changed.ok(), Some(true));
    assert_eq!(config.get("general.port").as_int(), 9999);
}

#[test]
fn test_blocking_subscriber_on_thread() {
    let config = Arc::new(Configuration::new(Arc::new(RecordingStore::with_document("{}"))));
    let mut sub = config.subscribe();

    let waiter = std::thread::spawn(move || sub.blocking_changed());
    config.reload().unwrap();
    assert!(waiter.join().unwrap());
}

#[test]
fn test_reload_applies_log_level() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    let store = Arc::new(RecordingStore::with_document(SAMPLE_DOCUMENT));
    let config = Configuration::builder()
        .with_store(store.clone())
        .with_verbosity(move |level: &str| seen_clone.lock().unwrap().push(level.to_string()))
        .build();

    config.reload().unwrap();
    store.set_document(r#"{"log":{"level":"ERROR"}}"#);
    config.reload().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["DEBUG", "ERROR"]);
}

#[test]
fn test_reload_drives_tracing_filter() {
    let (filter, handle) = reload::Layer::new(LevelFilter::INFO);
    let _subscriber = tracing_subscriber::registry().with(filter);

    let config = Configuration::builder()
        .with_store(Arc::new(RecordingStore::with_document(SAMPLE_DOCUMENT)))
        .with_verbosity(TracingVerbosity::new(handle.clone()))
        .build();
    config.reload().unwrap();

    assert_eq!(handle.clone_current(), Some(LevelFilter::DEBUG));
}

#[cfg(feature = "reload")]
#[test]
fn test_file_watcher_creation() {
    let dir = TempDir::new().unwrap();
    let watcher = FileWatcher::new(dir.path().join("config.json"), None);
    assert!(watcher.is_ok());
}

#[cfg(all(feature = "reload", target_os = "linux"))]
#[test]
fn test_watcher_reloads_and_notifies() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let config = Arc::new(Configuration::new(Arc::new(JsonFileStore::from_file(&path))));
    config.save().unwrap();

    let mut watcher = FileWatcher::new(&path, Some(Duration::from_millis(100))).unwrap();
    watcher.watch(reload_on_change(Arc::clone(&config))).unwrap();
    let mut sub = config.subscribe();

    // Wait a bit for the watcher to initialize
    std::thread::sleep(Duration::from_millis(100));
    fs::write(&path, r#"{"general":{"port":4242}}"#).unwrap();

    assert_eq!(wait_for(&mut sub, Duration::from_secs(5)), Some(true));
    assert_eq!(config.get("general.port").as_int(), 4242);
    watcher.stop().unwrap();
}
