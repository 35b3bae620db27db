//! # Engine Configuration
//!
//! Startup configuration, read once from TOML:
//!
//! ```toml
//! [events]
//! capacity = 4096
//!
//! [logging]
//! enabled = true
//!
//! [[resources]]
//! key = "water"
//! capacity = 100
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bus::{EventBus, EventReceiver, DEFAULT_EVENT_CAPACITY};
use crate::engine::ResourceBay;
use crate::error::ConfigError;
use crate::telemetry::TracingLogger;

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BayConfig {
    /// Event bus settings.
    #[serde(default)]
    pub events: EventsConfig,

    /// Log forwarding settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Resources defined at startup.
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

/// Event bus settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Bounded channel size. Events beyond it are dropped.
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

/// Log forwarding settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Attach a [`TracingLogger`] to the engine.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// One resource defined at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Resource key.
    pub key: String,
    /// Initial capacity.
    pub capacity: i64,
}

impl BayConfig {
    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed TOML, `Invalid` for semantic problems.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks semantic constraints.
    ///
    /// # Errors
    ///
    /// `Invalid` for a zero event capacity, an empty key, a duplicate key or
    /// a negative capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.events.capacity == 0 {
            return Err(ConfigError::Invalid(
                "events.capacity must be at least 1".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for resource in &self.resources {
            if resource.key.is_empty() {
                return Err(ConfigError::Invalid("resource key must not be empty".to_string()));
            }
            if !seen.insert(resource.key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "resource {} defined more than once",
                    resource.key
                )));
            }
            if resource.capacity < 0 {
                return Err(ConfigError::Invalid(format!(
                    "resource {} has negative capacity {}",
                    resource.key, resource.capacity
                )));
            }
        }
        Ok(())
    }
}

impl ResourceBay {
    /// Builds a pre-populated engine wired to a fresh [`EventBus`].
    ///
    /// # Returns
    ///
    /// The engine and the receiving end of its event bus. The
    /// `ResourceDefined` events of the initial resources are already queued.
    ///
    /// # Errors
    ///
    /// `Invalid` if the configuration does not validate.
    pub fn from_config(config: &BayConfig) -> Result<(Self, EventReceiver), ConfigError> {
        config.validate()?;

        let bus = EventBus::new(config.events.capacity);
        let mut builder = Self::builder().event_sink(Arc::new(bus.sender()));
        if config.logging.enabled {
            builder = builder.logger(Arc::new(TracingLogger));
        }
        let bay = builder.build();

        for resource in &config.resources {
            bay.define_resource(resource.key.as_str(), resource.capacity)
                .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        }

        Ok((bay, bus.receiver()))
    }
}
