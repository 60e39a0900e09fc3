// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Configuration errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Minimum protocol version {0:#04x} is not supported (must be 0x04..=0x06)")]
    UnsupportedVersion(u8),
    #[error("Pipeline name must not be empty")]
    EmptyPipelineName,
    #[error("'{0}' must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
    #[error("Invalid configuration document: {0}")]
    Parse(String),
}

/// Result-like type for configurations
pub type ConfigResult = Result<(), ConfigError>;

impl From<derive_builder::UninitializedFieldError> for ConfigError {
    fn from(value: derive_builder::UninitializedFieldError) -> Self {
        ConfigError::MissingParameter(value.field_name().to_string())
    }
}
