//! Configuration-time selection of detection and connection strategies.
//!
//! A [`StrategyConfig`] names a strategy and carries an opaque TOML parameter
//! table. A [`StrategyRegistry`] maps names to factories for a fixed set of
//! variants and turns the config into a boxed trait object once per run:
//!
//! ```rust
//! use mzpick::detection::{self, MassDetector};
//! use mzpick::strategy::StrategyConfig;
//!
//! let registry = detection::default_registry();
//! let config = StrategyConfig::new("centroid").with_parameter("noise_level", 500.0);
//! let detector: Box<dyn MassDetector> = registry.create(&config)?;
//! assert_eq!(detector.name(), "centroid");
//! # Ok::<(), mzpick::strategy::StrategyError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Strategy name plus its opaque parameter bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Registry tag of the strategy (e.g. `"centroid"`, `"simple"`)
    pub name: String,

    /// Strategy-specific parameters, interpreted by the strategy's factory
    #[serde(default)]
    pub parameters: toml::Table,
}

impl StrategyConfig {
    /// Config with no parameters (the strategy's defaults apply).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: toml::Table::new(),
        }
    }

    /// Set one parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Config whose parameters are the serialized form of `parameters`.
    pub fn from_parameters<P: Serialize>(
        name: impl Into<String>,
        parameters: &P,
    ) -> Result<Self, ParameterError> {
        match toml::Value::try_from(parameters) {
            Ok(toml::Value::Table(parameters)) => Ok(Self {
                name: name.into(),
                parameters,
            }),
            Ok(other) => Err(ParameterError(format!(
                "parameters must serialize to a table, got {}",
                other.type_str()
            ))),
            Err(e) => Err(ParameterError(e.to_string())),
        }
    }
}

/// Parameter bundle that could not be turned into a strategy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ParameterError(pub String);

impl ParameterError {
    /// Build an error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Decode a parameter table into a typed parameter struct.
pub fn parse_parameters<P: DeserializeOwned>(parameters: &toml::Table) -> Result<P, ParameterError> {
    toml::Value::Table(parameters.clone())
        .try_into()
        .map_err(|e: toml::de::Error| ParameterError(e.message().to_string()))
}

/// Errors that can occur while constructing a strategy
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StrategyError {
    /// No factory is registered under the requested name
    #[error("Could not create {role} '{name}': unknown strategy (available: {available})")]
    Unknown {
        /// Kind of strategy ("mass detector", "peak builder")
        role: &'static str,
        /// Requested name
        name: String,
        /// Comma-separated registered names
        available: String,
    },

    /// The factory rejected the parameter bundle
    #[error("Could not create {role} '{name}': invalid parameters: {source}")]
    InvalidParameters {
        /// Kind of strategy ("mass detector", "peak builder")
        role: &'static str,
        /// Requested name
        name: String,
        /// What was wrong with the parameters
        source: ParameterError,
    },
}

/// Factory building one strategy variant from its parameters.
pub type StrategyFactory<T> = fn(&toml::Table) -> Result<Box<T>, ParameterError>;

/// Explicit name-to-factory map for one kind of strategy.
pub struct StrategyRegistry<T: ?Sized> {
    role: &'static str,
    factories: BTreeMap<&'static str, StrategyFactory<T>>,
}

impl<T: ?Sized> StrategyRegistry<T> {
    /// Create an empty registry. `role` is used in error messages.
    pub fn new(role: &'static str) -> Self {
        Self {
            role,
            factories: BTreeMap::new(),
        }
    }

    /// Register (or replace) the factory for `name`.
    pub fn register(&mut self, name: &'static str, factory: StrategyFactory<T>) -> &mut Self {
        self.factories.insert(name, factory);
        self
    }

    /// Kind of strategy this registry builds.
    pub fn role(&self) -> &'static str {
        self.role
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build the strategy described by `config`.
    pub fn create(&self, config: &StrategyConfig) -> Result<Box<T>, StrategyError> {
        let factory = self
            .factories
            .get(config.name.as_str())
            .ok_or_else(|| StrategyError::Unknown {
                role: self.role,
                name: config.name.clone(),
                available: self.names().collect::<Vec<_>>().join(", "),
            })?;

        factory(&config.parameters).map_err(|source| StrategyError::InvalidParameters {
            role: self.role,
            name: config.name.clone(),
            source,
        })
    }
}

impl<T: ?Sized> fmt::Debug for StrategyRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("role", &self.role)
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
