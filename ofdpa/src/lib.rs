// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::module_name_repetitions)]

//! Model of the `OF-DPA` hardware abstraction: pipeline tables, the flow descriptor
//! programmed into them, and the SDK calls used to do so.
//!
//! With the `testing` feature this crate also provides [`sim::SimOfdpa`], an in-memory SDK.

pub mod flow;
pub mod packet;
pub mod sdk;
pub mod status;
pub mod table;

#[cfg(any(test, feature = "testing"))]
pub mod sim;

pub use flow::{FlowActions, FlowEntry, FlowStats, MatchCriteria, OutputPort, TableInfo};
pub use packet::{FlowEvent, FlowEventKind, ReceivedPacket, RxReason, SendMode};
pub use sdk::Ofdpa;
pub use status::OfdpaError;
pub use table::TableId;
