// SPDX-License-Identifier: MIT OR Apache-2.0

//! The built-in settings schema.
//!
//! Declaration order here is the order of keys in the persisted document and in the
//! descriptor tree delivered to editors.

use crate::domain::form::{Form, FormElement};

/// Top-level key holding the opaque connection list in the persisted document.
pub const CONNECTIONS_KEY: &str = "connections";

/// Path of the log verbosity setting propagated on reload.
pub const LOG_LEVEL_PATH: &str = "log.level";

/// Path of the secret key generated on first start.
pub const SECRET_KEY_PATH: &str = "general.secret_key";

/// Path written from the admin password override.
pub const ADMIN_PASSWORD_PATH: &str = "auth.admin";

/// Path written from the public URL override.
pub const HOST_PATH: &str = "general.host";

/// Returns the default schema.
pub fn default_forms() -> Vec<Form> {
    vec![general(), features(), log(), email(), auth()]
}

fn general() -> Form {
    Form::new("general")
        .element(
            FormElement::new("name", "text")
                .with_default("Filestash")
                .with_description("Name has shown in the UI")
                .with_placeholder("Default: \"Filestash\""),
        )
        .element(
            FormElement::new("port", "number")
                .with_default(8334)
                .with_description("Port on which the application is available.")
                .with_placeholder("Default: 8334"),
        )
        .element(
            FormElement::new("host", "text")
                .with_description("The host people need to use to access this server")
                .with_placeholder("Eg: \"demo.filestash.app\""),
        )
        .element(FormElement::new("secret_key", "password").with_description(
            "The key that's used to encrypt and decrypt content. Update this settings will invalidate existing user sessions and shared links, use with caution!",
        ))
        .element(
            FormElement::new("force_ssl", "boolean")
                .with_description("Enable the web security mechanism called 'Strict Transport Security'"),
        )
        .element(
            FormElement::new("editor", "select")
                .with_default("emacs")
                .with_options(["base", "emacs", "vim"])
                .with_description("Keybinding to be use in the editor. Default: \"emacs\""),
        )
        .element(
            FormElement::new("fork_button", "boolean")
                .with_default(true)
                .with_description("Display the fork button in the login screen"),
        )
        .element(
            FormElement::new("display_hidden", "boolean")
                .with_default(false)
                .with_description("Should files starting with a dot be visible by default?"),
        )
        .element(
            FormElement::new("auto_connect", "boolean")
                .with_default(false)
                .with_description(
                    "User don't have to click on the login button if an admin is prefilling a unique backend",
                ),
        )
        .element(
            FormElement::new("remember_me", "boolean")
                .with_default(true)
                .with_description("Visiblity of the remember me button on the login screen"),
        )
        .element(
            FormElement::new("upload_button", "boolean")
                .with_default(false)
                .with_description("Display the upload button on any device"),
        )
}

fn features() -> Form {
    Form::new("features").form(
        Form::new("share").element(
            FormElement::new("enable", "boolean")
                .with_default(true)
                .with_description("Enable/Disable the share feature"),
        ),
    )
}

fn log() -> Form {
    Form::new("log")
        .element(
            FormElement::new("enable", "enable")
                .with_target(["log_level"])
                .with_default(true),
        )
        .element(
            FormElement::new("level", "select")
                .with_id("log_level")
                .with_default("INFO")
                .with_options(["DEBUG", "INFO", "WARNING", "ERROR"])
                .with_description(
                    "Default: \"INFO\". This setting determines the level of detail at which log events are written to the log file",
                ),
        )
        .element(
            FormElement::new("telemetry", "boolean")
                .with_default(false)
                .with_description(
                    "We won't share anything with any third party. This will only to be used to improve Filestash",
                ),
        )
}

fn email() -> Form {
    Form::new("email")
        .element(
            FormElement::new("server", "text")
                .with_default("smtp.gmail.com")
                .with_description("Address of the SMTP email server.")
                .with_placeholder("Default: smtp.gmail.com"),
        )
        .element(
            FormElement::new("port", "number")
                .with_default(587)
                .with_description("Port of the SMTP email server. Eg: 587")
                .with_placeholder("Default: 587"),
        )
        .element(
            FormElement::new("username", "text")
                .with_description("The username for authenticating to the SMTP server.")
                .with_placeholder("Eg: username@gmail.com"),
        )
        .element(
            FormElement::new("password", "password")
                .with_description("The password associated with the SMTP username.")
                .with_placeholder("Eg: Your google password"),
        )
        .element(
            FormElement::new("from", "text")
                .with_description("Email address visible on sent messages.")
                .with_placeholder("Eg: username@gmail.com"),
        )
}

fn auth() -> Form {
    Form::new("auth").element(
        FormElement::new("admin", "bcrypt")
            .with_default("")
            .with_description("Password of the admin section."),
    )
}
