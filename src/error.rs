// SPDX-License-Identifier: MPL-2.0
//! Error types for the outer layers of the crate.
//!
//! The notification store itself never fails: every operation on an
//! unknown id or a late timer is a no-op. Only configuration, scenario
//! loading and diagnostics export surface errors.

use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Scenario(ScenarioError),
    Export(String),
}

/// Problems found while reading a scenario script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// The file is not valid TOML or does not match the scenario layout.
    Parse(String),

    /// A step other than `observe` has no `message`.
    MissingMessage { step: usize },

    /// The scenario contains no steps.
    Empty,
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Parse(msg) => write!(f, "invalid scenario: {}", msg),
            ScenarioError::MissingMessage { step } => {
                write!(f, "step {} needs a `message` to target a notification", step)
            }
            ScenarioError::Empty => write!(f, "scenario has no steps"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Scenario(e) => write!(f, "Scenario Error: {}", e),
            Error::Export(e) => write!(f, "Export Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ScenarioError> for Error {
    fn from(err: ScenarioError) -> Self {
        Error::Scenario(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
