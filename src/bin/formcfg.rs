// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line access to a settings document.

use clap::{Parser, Subcommand};
use formcfg::adapters::{EnvOverrides, JsonFileStore, StaticMimeTypes, SystemProbe, TracingVerbosity};
use formcfg::domain::serializer::pretty;
use formcfg::service::Configuration;
use serde_json::Value;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload};

const APP_NAME: &str = "formcfg";
const QUALIFIER: &str = "org.formcfg";

#[derive(Parser)]
#[command(name = "formcfg")]
#[command(about = "Inspect and edit a settings document", long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective value of a setting as JSON
    Get {
        /// Dot-separated path, e.g. general.port
        path: String,
    },
    /// Set a setting and save; the value is parsed as JSON, else taken as a string
    Set {
        /// Dot-separated path, e.g. general.port
        path: String,
        /// New value
        value: String,
    },
    /// Run first-start initialisation using ADMIN_PASSWORD and APPLICATION_URL
    Init,
    /// Print the descriptor tree delivered to schema editors
    Schema,
    /// Print the client export
    Export,
    /// Print the persisted document
    Dump,
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let (filter, handle) = reload::Layer::new(LevelFilter::WARN);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = match cli.config {
        Some(path) => JsonFileStore::from_file(path),
        None => JsonFileStore::from_default_location(APP_NAME, QUALIFIER)?,
    };
    let config = Configuration::builder()
        .with_store(Arc::new(store))
        .with_verbosity(TracingVerbosity::new(handle))
        .build();

    run(&config, cli.command, &mut std::io::stdout().lock())
}

fn run(config: &Configuration, command: Commands, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    if let Commands::Init = command {
        config.start(&EnvOverrides::from_env());
        writeln!(out, "Initialised {}", config.location())?;
        return Ok(());
    }

    // A missing or unreadable document is logged by reload; defaults apply
    let _ = config.reload();

    match command {
        Commands::Get { path } => {
            let value = config.get(path.as_str()).raw_value().unwrap_or(Value::Null);
            writeln!(out, "{}", value)?;
        }
        Commands::Set { path, value } => {
            if !config.get(path.as_str()).try_set(parse_value(&value))? {
                writeln!(out, "{} is unchanged", path)?;
            }
        }
        Commands::Init => {}
        Commands::Schema => {
            writeln!(out, "{}", pretty(&config.schema_json(&SystemProbe::new())))?;
        }
        Commands::Export => {
            let export = config.export(&StaticMimeTypes::new());
            writeln!(out, "{}", serde_json::to_string_pretty(&export)?)?;
        }
        Commands::Dump => {
            writeln!(out, "{}", pretty(&config.to_document()))?;
        }
    }

    Ok(())
}
