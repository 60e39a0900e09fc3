// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Translator configuration

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;
use tracing::debug;

use crate::errors::{ConfigError, ConfigResult};
use crate::profile::Profile;

/// Lowest protocol version the translator understands (`OpenFlow` 1.3)
pub const MIN_SUPPORTED_VERSION: u8 = 0x04;
/// Highest known protocol version (`OpenFlow` 1.5)
pub const MAX_KNOWN_VERSION: u8 = 0x06;
/// Pipeline name reported by default
pub const DEFAULT_PIPELINE: &str = "ofdpa-2.0";
/// Default number of frame bytes copied into packet-ins (no truncation)
pub const DEFAULT_PACKET_IN_MAX_LEN: u16 = u16::MAX;

/// Configuration of a translator instance. Every field has a default.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate", error = "ConfigError"))]
#[serde(default, deny_unknown_fields)]
pub struct XlateConfig {
    /// Deployment profile selecting the capability set
    #[builder(default)]
    pub profile: Profile,

    /// Requests below this protocol version are rejected
    #[builder(default = MIN_SUPPORTED_VERSION)]
    pub min_version: u8,

    /// Name reported as the (only) pipeline
    #[builder(setter(into), default = DEFAULT_PIPELINE.to_string())]
    pub pipeline: String,

    /// Bytes of a punted frame copied into the packet-in
    #[builder(default = DEFAULT_PACKET_IN_MAX_LEN)]
    pub packet_in_max_len: u16,

    /// How long one packet receive call waits, in milliseconds
    #[builder(default = 100)]
    pub rx_timeout_ms: u64,

    /// How often flow events are drained, in milliseconds
    #[builder(default = 250)]
    pub event_poll_interval_ms: u64,

    /// Optional `tag=level,...` tracing configuration
    #[builder(setter(into, strip_option), default)]
    pub tracing: Option<String>,
}

impl XlateConfigBuilder {
    fn validate(&self) -> ConfigResult {
        if let Some(version) = self.min_version {
            validate_version(version)?;
        }
        if let Some(pipeline) = &self.pipeline
            && pipeline.trim().is_empty()
        {
            return Err(ConfigError::EmptyPipelineName);
        }
        if self.rx_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroInterval("rx_timeout_ms"));
        }
        if self.event_poll_interval_ms == Some(0) {
            return Err(ConfigError::ZeroInterval("event_poll_interval_ms"));
        }
        Ok(())
    }
}

fn validate_version(version: u8) -> ConfigResult {
    if (MIN_SUPPORTED_VERSION..=MAX_KNOWN_VERSION).contains(&version) {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedVersion(version))
    }
}

impl Default for XlateConfig {
    fn default() -> Self {
        XlateConfig {
            profile: Profile::default(),
            min_version: MIN_SUPPORTED_VERSION,
            pipeline: DEFAULT_PIPELINE.to_string(),
            packet_in_max_len: DEFAULT_PACKET_IN_MAX_LEN,
            rx_timeout_ms: 100,
            event_poll_interval_ms: 250,
            tracing: None,
        }
    }
}

impl XlateConfig {
    /// Check a configuration obtained other than through the builder.
    pub fn validate(&self) -> ConfigResult {
        validate_version(self.min_version)?;
        if self.pipeline.trim().is_empty() {
            return Err(ConfigError::EmptyPipelineName);
        }
        if self.rx_timeout_ms == 0 {
            return Err(ConfigError::ZeroInterval("rx_timeout_ms"));
        }
        if self.event_poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("event_poll_interval_ms"));
        }
        Ok(())
    }

    /// Load and validate a configuration from a YAML document. Missing keys take defaults.
    pub fn from_yaml(doc: &str) -> Result<XlateConfig, ConfigError> {
        let config: XlateConfig =
            serde_yaml_ng::from_str(doc).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        debug!("Loaded translator configuration: {config}");
        Ok(config)
    }

    #[must_use]
    pub fn rx_timeout(&self) -> Duration {
        Duration::from_millis(self.rx_timeout_ms)
    }

    #[must_use]
    pub fn event_poll_interval(&self) -> Duration {
        Duration::from_millis(self.event_poll_interval_ms)
    }
}

impl Display for XlateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "profile={} min-version={:#04x} pipeline={} packet-in-max-len={} rx-timeout={}ms event-poll={}ms",
            self.profile,
            self.min_version,
            self.pipeline,
            self.packet_in_max_len,
            self.rx_timeout_ms,
            self.event_poll_interval_ms
        )
    }
}
