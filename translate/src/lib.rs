// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Translation of `OpenFlow` 1.3 flow-mods, packet-outs and hardware events to and from
//! the `OF-DPA` flow model.
//!
//! A flow-mod goes through these steps, each of which can refuse it:
//!
//! 1. [`presence::analyze`] computes which match dimensions the request constrains;
//! 2. [`capability::capability`] tells whether the target table accepts them;
//! 3. [`prereq::validate_prerequisites`] checks cross-field rules;
//! 4. [`populate::populate`] builds the table-specific match record;
//! 5. [`instructions::translate_instructions`] builds the action section;
//! 6. the [`Translator`] hands the result to the SDK and maps its status.
//!
//! Nothing is programmed unless every step succeeds.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod actions;
pub mod capability;
pub mod error;
pub mod event;
pub mod flow;
pub mod instructions;
pub mod packet;
pub mod populate;
pub mod prereq;
pub mod presence;

use config::XlateConfig;
use tracectl::{TraceCtlError, get_trace_ctl, trace_target};

trace_target!("translate", LevelFilter::INFO, &["translate"]);

// re-exports
pub use error::{CompatError, ParamError, Unsupported, XlateError};
pub use event::{EventLoop, EventLoopHandle, Notifier};
pub use flow::{TableStats, Translator};
pub use packet::{PacketOutPlan, translate_packet_in, translate_packet_out};
pub use presence::{MatchFields, analyze};

/// Install the log subscriber and apply the tracing configuration of `config`, if any.
pub fn init_tracing(config: &XlateConfig) -> Result<(), TraceCtlError> {
    let tctl = get_trace_ctl();
    if let Some(tracing) = config.tracing.as_deref() {
        tctl.setup_from_string(tracing)?;
    }
    Ok(())
}
