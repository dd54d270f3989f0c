//! Handles settings for the application.
//!
//! Values come from an optional `settings.toml` in the working directory and
//! are overridden by `INSIGHT__*` environment variables, e.g.
//! `INSIGHT__SERVER__PORT=8080` or `INSIGHT__ENGINE__ATOMIC_BATCHES=true`.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use engine::BatchPolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Default, Deserialize)]
pub struct Engine {
    /// Deadline for every engine call, in milliseconds.
    pub store_timeout_ms: Option<u64>,
    /// Apply account, category and operation batches atomically.
    #[serde(default)]
    pub atomic_batches: bool,
}

impl Engine {
    pub fn store_timeout(&self) -> Option<Duration> {
        self.store_timeout_ms.map(Duration::from_millis)
    }

    pub fn batch_policy(&self) -> BatchPolicy {
        if self.atomic_batches {
            BatchPolicy::atomic()
        } else {
            BatchPolicy::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
    #[serde(default)]
    pub engine: Engine,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("INSIGHT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
