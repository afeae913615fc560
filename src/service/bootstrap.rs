// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-start initialisation and the read-only surfaces built on the settings.

use crate::adapters::EnvOverrides;
use crate::domain::schema::{ADMIN_PASSWORD_PATH, HOST_PATH, SECRET_KEY_PATH};
use crate::domain::serializer::{render_descriptor, render_tree};
use crate::domain::{ConfigValue, Connection, Form, FormElement, SchemaTree};
use crate::ports::{DocumentStore, EnvironmentProbe, MimeTypes};
use crate::service::Configuration;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Length of a generated secret key.
pub const SECRET_KEY_LEN: usize = 16;

/// Title of the synthesized container in the schema delivered to editors.
pub const CONSTANT_FORM: &str = "constant";

const DEFAULT_CONNECTIONS: [(&str, &str); 7] = [
    ("webdav", "WebDav"),
    ("ftp", "FTP"),
    ("sftp", "SFTP"),
    ("git", "GIT"),
    ("s3", "S3"),
    ("dropbox", "Dropbox"),
    ("gdrive", "Drive"),
];

/// The connection list installed when none is configured.
pub fn default_connections() -> Vec<Connection> {
    DEFAULT_CONNECTIONS
        .iter()
        .map(|(kind, label)| {
            let mut conn = Connection::new();
            conn.insert("type".to_string(), Value::from(*kind));
            conn.insert("label".to_string(), Value::from(*label));
            conn
        })
        .collect()
}

/// Generates a random alphanumeric secret key.
pub fn generate_secret_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_KEY_LEN)
        .map(char::from)
        .collect()
}

/// Settings published to the browser client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientExport {
    /// Editor keybindings
    pub editor: String,
    /// Whether the fork button is shown
    pub fork_button: bool,
    /// Whether dotfiles are listed
    pub display_hidden: bool,
    /// Whether a single connection logs in automatically
    pub auto_connect: bool,
    /// Application name
    pub name: String,
    /// Whether the login form offers "remember me"
    pub remember_me: bool,
    /// Whether the upload button is shown
    pub upload_button: bool,
    /// Configured storage connections
    pub connections: Vec<Connection>,
    /// Whether search is enabled
    pub enable_search: bool,
    /// Whether sharing is enabled
    pub enable_share: bool,
    /// Extension to mime-type table
    #[serde(rename = "mime")]
    pub mime_types: BTreeMap<String, String>,
}

impl Configuration {
    /// Creates a configuration over `store` and runs [`start`](Self::start).
    pub fn bootstrap(store: Arc<dyn DocumentStore>, overrides: &EnvOverrides) -> Self {
        let config = Self::new(store);
        config.start(overrides);
        config
    }

    /// Runs the first-start sequence: load whatever is persisted, write it back in
    /// canonical form, then [`initialise`](Self::initialise).
    ///
    /// A missing or unreadable document is not an error here; the defaults apply.
    pub fn start(&self, overrides: &EnvOverrides) {
        if let Err(e) = self.reload() {
            if e.is_not_found() {
                tracing::info!("No settings at '{}', starting from defaults", self.location());
            }
        }
        let _ = self.save();
        self.initialise(overrides);
    }

    /// Applies environment overrides and fills in settings that must never be empty.
    ///
    /// - the admin password override is hashed (when a hasher is configured) and
    ///   stored in `auth.admin`
    /// - the application URL override is stored in `general.host`
    /// - a secret key is generated if none is set
    /// - the default connection list is installed if none is configured
    pub fn initialise(&self, overrides: &EnvOverrides) {
        if !overrides.admin_password.is_empty() {
            let hashed = self.hash_password(&overrides.admin_password);
            self.get(ADMIN_PASSWORD_PATH).set(hashed);
        }
        if !overrides.application_url.is_empty() {
            self.get(HOST_PATH).set(overrides.application_url.as_str());
        }

        let secret = self.get(SECRET_KEY_PATH);
        if secret.as_string().is_empty() {
            secret.set(generate_secret_key());
            tracing::info!("Generated a new secret key");
        }

        if self.connections().is_empty() {
            let _ = self.set_connections(default_connections());
        }
    }

    /// The secret key used to derive other secrets.
    pub fn secret_key(&self) -> String {
        self.get(SECRET_KEY_PATH).as_string()
    }

    /// Builds the client export. Reading it never adds settings to the tree.
    pub fn export(&self, mime: &dyn MimeTypes) -> ClientExport {
        ClientExport {
            editor: self.peek("general.editor").as_string(),
            fork_button: self.peek("general.fork_button").as_bool(),
            display_hidden: self.peek("general.display_hidden").as_bool(),
            auto_connect: self.peek("general.auto_connect").as_bool(),
            name: self.peek("general.name").as_string(),
            remember_me: self.peek("general.remember_me").as_bool(),
            upload_button: self.peek("general.upload_button").as_bool(),
            connections: self.connections(),
            enable_search: self.peek("features.search.enable").as_bool(),
            enable_share: self.peek("features.share.enable").as_bool(),
            mime_types: mime.all(),
        }
    }

    /// Renders the full descriptor tree for schema editors, followed by a read-only
    /// `constant` container describing the host.
    pub fn schema_json(&self, probe: &dyn EnvironmentProbe) -> String {
        let mut tree = self.with_tree(SchemaTree::clone);
        tree.push_form(constant_form(probe));
        render_tree(&tree, &render_descriptor).to_json()
    }

    fn peek(&self, path: &str) -> ConfigValue {
        self.lookup(path).map(|s| s.value()).unwrap_or_default()
    }
}

fn constant_form(probe: &dyn EnvironmentProbe) -> Form {
    let user = probe
        .current_user()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "n/a".to_string());

    Form::new(CONSTANT_FORM)
        .element(FormElement::new("user", "boolean").read_only().with_value(user))
        .element(
            FormElement::new("emacs", "boolean")
                .read_only()
                .with_value(probe.has_executable("emacs")),
        )
        .element(
            FormElement::new("pdftotext", "boolean")
                .read_only()
                .with_value(probe.has_executable("pdftotext")),
        )
}
