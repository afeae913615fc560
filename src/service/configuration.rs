// SPDX-License-Identifier: MIT OR Apache-2.0

//! The settings facade.
//!
//! [`Configuration`] owns the schema tree, the lookup cache and the connection list
//! behind one lock, and persists through a [`DocumentStore`] after every effective
//! change. Individual settings are reached through the [`Setting`] cursor returned
//! by [`Configuration::get`].

use crate::domain::hydrator::{extract_connections, hydrate};
use crate::domain::schema::{default_forms, CONNECTIONS_KEY, LOG_LEVEL_PATH};
use crate::domain::serializer::{pretty, render_forms, render_value, JsonNode};
use crate::domain::{
    ConfigError, ConfigPath, ConfigValue, Connection, Decoded, Form, FormElement,
    FromConfigValue, LeafId, Result, SchemaTree,
};
use crate::ports::{DocumentStore, VerbositySink};
use crate::service::cache::LookupCache;
use crate::service::notifier::{ChangeNotifier, Subscription, SubscriptionId};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Hashes the admin password override before it is stored.
pub type PasswordHasher = Arc<dyn Fn(&str) -> String + Send + Sync>;

struct State {
    tree: SchemaTree,
    cache: LookupCache,
    connections: Vec<Connection>,
}

impl State {
    fn resolve(&mut self, path: &ConfigPath) -> LeafId {
        if let Some(id) = self.cache.get(path.as_str()) {
            return id;
        }
        let id = self.tree.resolve(path);
        self.cache.set(path.as_str(), id);
        id
    }

    fn find(&mut self, path: &ConfigPath) -> Option<LeafId> {
        if let Some(id) = self.cache.get(path.as_str()) {
            return Some(id);
        }
        let id = self.tree.find(path)?;
        self.cache.set(path.as_str(), id);
        Some(id)
    }

    fn effective(&self, id: LeafId) -> ConfigValue {
        self.tree
            .leaf(id)
            .map(FormElement::effective)
            .unwrap_or_default()
    }
}

/// Thread-safe hierarchical settings store.
///
/// Share it with `Arc`; every method takes `&self`.
///
/// # Examples
///
/// ```rust
/// use formcfg::adapters::MemoryStore;
/// use formcfg::service::Configuration;
/// use std::sync::Arc;
///
/// let config = Configuration::new(Arc::new(MemoryStore::new()));
/// assert_eq!(config.get("general.port").as_int(), 8334);
///
/// config.get("general.port").set(9999);
/// assert_eq!(config.get("general.port").as_int(), 9999);
/// ```
pub struct Configuration {
    state: Mutex<State>,
    store: Arc<dyn DocumentStore>,
    notifier: ChangeNotifier,
    verbosity: Option<Arc<dyn VerbositySink>>,
    hasher: Option<PasswordHasher>,
    connections_key: String,
}

impl Configuration {
    /// Creates a configuration with the default schema, persisting to `store`.
    ///
    /// Nothing is read from the store until [`reload`](Self::reload) is called.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::builder().with_store(store).build()
    }

    /// Creates a configuration builder.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cursor for `path`, creating the setting if it does not exist.
    pub fn get(&self, path: impl Into<ConfigPath>) -> Setting<'_> {
        let path = path.into();
        let id = self.lock().resolve(&path);
        Setting {
            config: self,
            id,
            path,
        }
    }

    /// Returns the cursor for `path` only if the setting already exists.
    pub fn lookup(&self, path: impl Into<ConfigPath>) -> Option<Setting<'_>> {
        let path = path.into();
        let id = self.lock().find(&path)?;
        Some(Setting {
            config: self,
            id,
            path,
        })
    }

    /// Number of paths currently memoized by the lookup cache.
    pub fn cached_paths(&self) -> usize {
        self.lock().cache.len()
    }

    /// Every setting path with its effective value, in declaration order.
    pub fn entries(&self) -> Vec<(ConfigPath, ConfigValue)> {
        let state = self.lock();
        state
            .tree
            .entries()
            .into_iter()
            .map(|(path, id)| {
                let value = state.effective(id);
                (path, value)
            })
            .collect()
    }

    /// Returns a copy of the connection list.
    pub fn connections(&self) -> Vec<Connection> {
        self.lock().connections.clone()
    }

    /// Replaces the connection list and persists.
    pub fn set_connections(&self, connections: Vec<Connection>) -> Result<()> {
        let mut state = self.lock();
        state.connections = connections;
        self.persist(&state)
    }

    /// Writes the persisted document to the store.
    pub fn save(&self) -> Result<()> {
        let state = self.lock();
        self.persist(&state)
    }

    /// Returns the persisted document as compact JSON.
    ///
    /// This is the exact text [`save`](Self::save) writes, before indentation.
    pub fn to_document(&self) -> String {
        let state = self.lock();
        self.render_document(&state).to_json()
    }

    /// Re-reads the persisted document and merges it into the tree.
    ///
    /// Values present in the document replace the stored values, unknown keys extend
    /// the schema and the connection list is replaced. On success the `log.level`
    /// setting is handed to the verbosity sink and subscribers are notified. On
    /// failure the current state is kept, nobody is notified and the error is
    /// returned.
    pub fn reload(&self) -> Result<()> {
        let document = match self.read_document() {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    "Failed to load settings from '{}': {}",
                    self.store.location(),
                    e
                );
                return Err(e);
            }
        };

        let level = {
            let mut state = self.lock();
            state.connections = extract_connections(&document, &self.connections_key);
            let changed = hydrate(&mut state.tree, &document);
            state.cache.clear();
            tracing::debug!(
                "Reloaded settings from '{}' ({} changed, {} connections)",
                self.store.location(),
                changed,
                state.connections.len()
            );
            state
                .tree
                .find(&ConfigPath::from(LOG_LEVEL_PATH))
                .map(|id| state.effective(id).as_string())
        };

        if let (Some(sink), Some(level)) = (&self.verbosity, level) {
            if !level.is_empty() {
                sink.set_level(&level);
            }
        }

        self.notifier.broadcast();
        Ok(())
    }

    /// Registers for reload notifications.
    pub fn subscribe(&self) -> Subscription {
        self.notifier.subscribe()
    }

    /// Cancels a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.notifier.unsubscribe(id);
    }

    /// Number of active subscriptions.
    pub fn subscribers(&self) -> usize {
        self.notifier.len()
    }

    /// Where the persisted document lives.
    pub fn location(&self) -> String {
        self.store.location()
    }

    pub(crate) fn hash_password(&self, password: &str) -> String {
        match &self.hasher {
            Some(hasher) => hasher(password),
            None => password.to_string(),
        }
    }

    pub(crate) fn with_tree<R>(&self, f: impl FnOnce(&SchemaTree) -> R) -> R {
        f(&self.lock().tree)
    }

    fn read_document(&self) -> Result<Value> {
        let text = self.store.read()?;
        serde_json::from_str(&text).map_err(ConfigError::from_json_error)
    }

    fn render_document(&self, state: &State) -> JsonNode {
        let roots = state
            .tree
            .roots()
            .iter()
            .filter(|node| node.title() != self.connections_key);
        let mut document = render_forms(&state.tree, roots, &render_value);
        let connections = Value::Array(
            state
                .connections
                .iter()
                .cloned()
                .map(Value::Object)
                .collect(),
        );
        document.push(
            self.connections_key.clone(),
            JsonNode::Raw(connections.to_string()),
        );
        document
    }

    fn persist(&self, state: &State) -> Result<()> {
        let text = pretty(&self.render_document(state).to_json());
        if let Err(e) = self.store.write(&text) {
            tracing::error!(
                "Failed to save settings to '{}': {}",
                self.store.location(),
                e
            );
            return Err(e);
        }
        tracing::trace!("Saved settings to '{}'", self.store.location());
        Ok(())
    }
}

/// Cursor over a single setting.
///
/// Every call takes the configuration lock for its own duration only, so a cursor
/// can be kept around and used from any thread that can reach the configuration.
pub struct Setting<'a> {
    config: &'a Configuration,
    id: LeafId,
    path: ConfigPath,
}

impl<'a> Setting<'a> {
    /// The path this cursor was obtained with.
    pub fn path(&self) -> &ConfigPath {
        &self.path
    }

    /// The stable handle of the underlying leaf.
    pub fn id(&self) -> LeafId {
        self.id
    }

    /// Assigns `value` and persists, unless it equals the stored value.
    ///
    /// `null` clears the stored value. The comparison is against the stored value
    /// only, so setting a leaf to its declared default still stores and persists it.
    pub fn set(&self, value: impl Into<Value>) -> &Self {
        // Failures are logged by persist; memory stays authoritative
        let _ = self.try_set(value);
        self
    }

    /// Like [`set`](Self::set), but reports whether the value changed and any
    /// failure to persist it.
    pub fn try_set(&self, value: impl Into<Value>) -> Result<bool> {
        let value = Some(value.into()).filter(|v| !v.is_null());
        let mut state = self.config.lock();
        state.cache.clear();
        let changed = match state.tree.leaf_mut(self.id) {
            Some(el) if el.value != value => {
                el.value = value;
                true
            }
            _ => false,
        };
        if changed {
            self.config.persist(&state)?;
        }
        Ok(changed)
    }

    /// Assigns the default if none is declared yet, then persists.
    ///
    /// An existing default is never replaced.
    pub fn set_default(&self, value: impl Into<Value>) -> &Self {
        let value = value.into();
        let mut state = self.config.lock();
        let Some(el) = state.tree.leaf_mut(self.id) else {
            return self;
        };
        match &el.default {
            None => {
                el.default = Some(value).filter(|v| !v.is_null());
                let _ = self.config.persist(&state);
            }
            Some(existing) if *existing == value => {}
            Some(existing) => {
                tracing::debug!(
                    "Ignoring default {} for '{}', already {}",
                    value,
                    self.path,
                    existing
                );
            }
        }
        self
    }

    /// Applies `f` to the leaf descriptor.
    pub fn schema<F>(&self, f: F) -> &Self
    where
        F: FnOnce(&mut FormElement),
    {
        let mut state = self.config.lock();
        if let Some(el) = state.tree.leaf_mut(self.id) {
            f(el);
        }
        state.cache.clear();
        self
    }

    /// Returns a copy of the leaf descriptor.
    pub fn element(&self) -> FormElement {
        let state = self.config.lock();
        state.tree.leaf(self.id).cloned().unwrap_or_default()
    }

    /// The effective value.
    pub fn value(&self) -> ConfigValue {
        self.config.lock().effective(self.id)
    }

    /// The effective value as raw JSON.
    pub fn raw_value(&self) -> Option<Value> {
        self.value().into_raw()
    }

    /// Decodes the effective value, reporting whether its type matched.
    pub fn decode<T: FromConfigValue>(&self) -> Decoded<T> {
        self.value().decode()
    }

    /// The effective value as a string, or `""`.
    pub fn as_string(&self) -> String {
        self.value().as_string()
    }

    /// The effective value as an integer, or `0`. Floats truncate toward zero.
    pub fn as_int(&self) -> i64 {
        self.value().as_int()
    }

    /// The effective value as a boolean, or `false`.
    pub fn as_bool(&self) -> bool {
        self.value().as_bool()
    }
}

/// Builder for [`Configuration`].
///
/// # Examples
///
/// ```rust
/// use formcfg::adapters::MemoryStore;
/// use formcfg::service::Configuration;
/// use std::sync::Arc;
///
/// let config = Configuration::builder()
///     .with_store(Arc::new(MemoryStore::new()))
///     .with_verbosity(|level: &str| println!("log level is now {}", level))
///     .with_password_hasher(|plain: &str| format!("hashed:{}", plain))
///     .build();
/// ```
pub struct ConfigurationBuilder {
    store: Option<Arc<dyn DocumentStore>>,
    forms: Option<Vec<Form>>,
    verbosity: Option<Arc<dyn VerbositySink>>,
    hasher: Option<PasswordHasher>,
    connections_key: String,
}

impl ConfigurationBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            store: None,
            forms: None,
            verbosity: None,
            hasher: None,
            connections_key: CONNECTIONS_KEY.to_string(),
        }
    }

    /// Sets the document store. Defaults to an in-memory store.
    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the built-in schema.
    pub fn with_forms(mut self, forms: Vec<Form>) -> Self {
        self.forms = Some(forms);
        self
    }

    /// Sets the sink receiving `log.level` after each reload.
    pub fn with_verbosity(mut self, sink: impl VerbositySink + 'static) -> Self {
        self.verbosity = Some(Arc::new(sink));
        self
    }

    /// Sets the hasher applied to the admin password override.
    pub fn with_password_hasher<F>(mut self, hasher: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.hasher = Some(Arc::new(hasher));
        self
    }

    /// Changes the top-level key holding the connection list.
    pub fn with_connections_key(mut self, key: impl Into<String>) -> Self {
        self.connections_key = key.into();
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Configuration {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(crate::adapters::MemoryStore::new()));
        Configuration {
            state: Mutex::new(State {
                tree: SchemaTree::new(self.forms.unwrap_or_else(default_forms)),
                cache: LookupCache::new(),
                connections: Vec::new(),
            }),
            store,
            notifier: ChangeNotifier::new(),
            verbosity: self.verbosity,
            hasher: self.hasher,
            connections_key: self.connections_key,
        }
    }
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use serde_json::json;

    fn setup() -> (Arc<MemoryStore>, Configuration) {
        let store = Arc::new(MemoryStore::new());
        let config = Configuration::new(store.clone());
        (store, config)
    }

    #[test]
    fn test_defaults_apply_without_document() {
        let (store, config) = setup();
        assert_eq!(config.get("general.port").as_int(), 8334);
        assert_eq!(config.get("general.name").as_string(), "Filestash");
        assert!(config.get("features.share.enable").as_bool());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_get_is_served_from_cache() {
        let (_, config) = setup();
        let first = config.get("general.port").id();
        assert_eq!(config.cached_paths(), 1);
        let second = config.get("general.port").id();
        assert_eq!(first, second);
        assert_eq!(config.cached_paths(), 1);
    }

    #[test]
    fn test_set_persists_and_clears_cache() {
        let (store, config) = setup();
        config.get("general.port").set(9999);
        assert_eq!(store.write_count(), 1);
        assert_eq!(config.cached_paths(), 0);

        let saved: Value = serde_json::from_str(&store.document().unwrap()).unwrap();
        assert_eq!(saved["general"]["port"], json!(9999));
        assert_eq!(config.get("general.port").as_int(), 9999);
    }

    #[test]
    fn test_set_same_value_does_not_write() {
        let (store, config) = setup();
        let port = config.get("general.port");
        port.set(9999);
        port.set(9999);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_set_null_clears_value() {
        let (_, config) = setup();
        let port = config.get("general.port");
        port.set(9999).set(Value::Null);
        assert_eq!(port.as_int(), 8334);
        assert!(port.element().value.is_none());
    }

    #[test]
    fn test_set_default_first_write_wins() {
        let (store, config) = setup();
        let setting = config.get("custom.limit");
        setting.set_default(10).set_default(20);
        assert_eq!(setting.element().default, Some(json!(10)));
        assert_eq!(setting.as_int(), 10);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_set_default_keeps_declared_default() {
        let (_, config) = setup();
        config.get("general.port").set_default(1234);
        assert_eq!(config.get("general.port").as_int(), 8334);
    }

    #[test]
    fn test_auto_vivification() {
        let (_, config) = setup();
        let el = config.get("newsection.newkey").element();
        assert_eq!(el.name, "newkey");
        assert_eq!(el.kind, "text");
        assert!(el.value.is_none());
        assert!(el.default.is_none());
        assert!(config.get("newsection.newkey").value().is_unset());
        assert!(config.to_document().contains(r#""newsection":{"newkey":null}"#));
    }

    #[test]
    fn test_lookup_is_strict() {
        let (_, config) = setup();
        assert!(config.lookup("general.port").is_some());
        assert!(config.lookup("general.missing").is_none());
        assert!(!config.to_document().contains("missing"));
    }

    #[test]
    fn test_typed_projection_mismatch() {
        let (_, config) = setup();
        let name = config.get("general.name");
        assert_eq!(name.as_int(), 0);
        assert!(!name.as_bool());
        assert!(!name.decode::<i64>().matched);
        assert!(name.decode::<String>().matched);

        let ratio = config.get("custom.ratio");
        ratio.set(2.9);
        assert_eq!(ratio.as_int(), 2);
    }

    #[test]
    fn test_schema_mutation() {
        let (_, config) = setup();
        config.get("general.port").schema(|el| {
            el.read_only = true;
            el.description = "fixed".to_string();
        });
        let el = config.get("general.port").element();
        assert!(el.read_only);
        assert_eq!(el.description, "fixed");
    }

    #[test]
    fn test_reload_overrides_values() {
        let store = Arc::new(MemoryStore::with_document(
            r#"{"general":{"port":9999},"connections":[{"type":"ftp"}]}"#,
        ));
        let config = Configuration::new(store.clone());
        config.reload().unwrap();

        assert_eq!(config.get("general.port").as_int(), 9999);
        assert_eq!(config.connections().len(), 1);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_reload_failure_keeps_state() {
        let (store, config) = setup();
        config.get("general.port").set(1000);
        store.set_document("{not json");

        let mut sub = config.subscribe();
        let err = config.reload().unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert_eq!(config.get("general.port").as_int(), 1000);

        std::thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(sub.try_changed(), None);
    }

    #[test]
    fn test_reload_missing_document() {
        let (_, config) = setup();
        let err = config.reload().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_reload_propagates_log_level() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen_clone = Arc::clone(&seen);
        let store = Arc::new(MemoryStore::with_document(r#"{"log":{"level":"DEBUG"}}"#));
        let config = Configuration::builder()
            .with_store(store)
            .with_verbosity(move |level: &str| seen_clone.lock().unwrap().push(level.to_string()))
            .build();

        config.reload().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["DEBUG".to_string()]);
    }

    #[test]
    fn test_save_failure_keeps_memory() {
        let store = Arc::new(MemoryStore::new().failing_writes());
        let config = Configuration::new(store.clone());
        config.get("general.port").set(4242);

        assert_eq!(config.get("general.port").as_int(), 4242);
        assert!(config.save().is_err());
        assert!(store.document().is_none());
    }

    #[test]
    fn test_try_set_reports_change_and_failure() {
        let (store, config) = setup();
        let name = config.get("general.name");
        assert!(name.try_set("Team").unwrap());
        assert!(!name.try_set("Team").unwrap());
        assert_eq!(store.write_count(), 1);

        let failing = Configuration::new(Arc::new(MemoryStore::new().failing_writes()));
        let port = failing.get("general.port");
        assert!(port.try_set(4242).is_err());
        assert_eq!(port.as_int(), 4242);
    }

    #[test]
    fn test_set_to_declared_default_is_stored() {
        let (store, config) = setup();
        let port = config.get("general.port");
        port.set(8334);
        assert_eq!(store.write_count(), 1);
        assert_eq!(port.element().value, Some(json!(8334)));

        port.set(8334);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_clashing_paths_stay_in_memory() {
        let (store, config) = setup();
        config.get("a.b").set(1);
        config.get("a.b.c").set(2);

        assert_eq!(config.get("a.b").as_int(), 1);
        assert_eq!(config.get("a.b.c").as_int(), 2);
        assert!(config.to_document().contains(r#""a":{"b":1}"#));
        let nested = config.get("a.b.c").id();
        assert!(config.with_tree(|tree| tree.is_detached(nested)));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_document_layout() {
        let config = Configuration::builder()
            .with_forms(vec![
                Form::new("b").element(FormElement::bare("y")),
                Form::new("a").element(FormElement::bare("x")),
            ])
            .build();
        config.get("b.y").set("value");
        assert_eq!(
            config.to_document(),
            r#"{"b":{"y":"value"},"a":{"x":null},"connections":[]}"#
        );
    }

    #[test]
    fn test_connections_container_not_duplicated() {
        let (_, config) = setup();
        config.get("connections.stray").set(true);
        let document = config.to_document();
        assert_eq!(document.matches("\"connections\"").count(), 1);
        assert!(document.ends_with(r#""connections":[]}"#));
    }

    #[test]
    fn test_custom_connections_key() {
        let store = Arc::new(MemoryStore::with_document(r#"{"backends":[{"type":"s3"}]}"#));
        let config = Configuration::builder()
            .with_store(store)
            .with_connections_key("backends")
            .build();
        config.reload().unwrap();
        assert_eq!(config.connections()[0].get("type"), Some(&json!("s3")));
        assert!(config.to_document().ends_with(r#""backends":[{"type":"s3"}]}"#));
    }

    #[test]
    fn test_set_connections_persists() {
        let (store, config) = setup();
        let mut conn = Connection::new();
        conn.insert("type".to_string(), json!("webdav"));
        config.set_connections(vec![conn]).unwrap();

        let saved: Value = serde_json::from_str(&store.document().unwrap()).unwrap();
        assert_eq!(saved["connections"][0]["type"], json!("webdav"));
    }

    #[test]
    fn test_entries_cover_defaults() {
        let (_, config) = setup();
        let entries = config.entries();
        let (path, value) = &entries[1];
        assert_eq!(path.as_str(), "general.port");
        assert_eq!(value.as_int(), 8334);
    }

    #[test]
    fn test_configuration_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Configuration>();
    }
}
