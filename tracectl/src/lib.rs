// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Runtime control of log levels.
//!
//! Crates declare their tracing targets with [`trace_target!`]; the declarations are
//! collected at link time and exposed through [`TracingControl`], which owns the global
//! subscriber and lets levels be changed per tag while the agent runs.

pub mod control;
pub mod targets;

pub use control::{TraceCtlError, TracingControl, get_trace_ctl};
pub use tracing_subscriber::filter::LevelFilter;
