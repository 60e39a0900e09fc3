// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Configuration of the flow translator: deployment profile, protocol version floor,
//! reported pipeline name and the parameters of the packet / event polling loop.
//!
//! A configuration is either assembled with [`XlateConfigBuilder`] or loaded from YAML
//! with [`XlateConfig::from_yaml`]. Both paths validate the result.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]

pub mod errors;
pub mod profile;
pub mod xlate;

pub use errors::{ConfigError, ConfigResult}; // re-export
pub use profile::Profile; // re-export
pub use xlate::{XlateConfig, XlateConfigBuilder}; // re-export
