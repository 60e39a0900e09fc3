// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::module_name_repetitions)]

//! Object model of the `OpenFlow` 1.3 messages handled by the translator.
//!
//! The types here are decoded protocol objects, not byte buffers: decoding the wire framing
//! happens upstream. Only the `OXM` set-field payloads are kept raw, as they are on the
//! wire, because their legality depends on the pipeline table they target.

pub mod action;
pub mod errors;
pub mod instruction;
pub mod matching;
pub mod message;
pub mod oxm;
pub mod port;
pub mod version;

pub use action::{Action, ActionKind};
pub use errors::OfpError;
pub use instruction::{Instruction, InstructionKind};
pub use matching::Match;
pub use message::{
    COOKIE_NONE, FlowMod, FlowRemoved, FlowRemovedReason, NO_BUFFER, PacketIn, PacketInReason,
    PacketOut,
};
pub use oxm::{OxmDecodeError, OxmField, OxmTlv, SetField};
pub use port::{InvalidPortNo, PortNo};
pub use version::Version;
