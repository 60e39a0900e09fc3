// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packets and flow events surfaced by the SDK.

use crate::flow::{FlowEntry, FlowStats};
use crate::table::TableId;

/// Why the hardware punted a packet to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum RxReason {
    /// Table miss
    NoMatch,
    /// Explicit output-to-controller action
    Action,
    /// TTL expired
    InvalidTtl,
}

/// A frame received from the hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedPacket {
    pub frame: Vec<u8>,
    pub in_port: u32,
    pub table_id: TableId,
    pub reason: RxReason,
}

/// How a frame handed to [`crate::Ofdpa::packet_send`] is forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendMode {
    /// Sent out of `out_port` as is
    Direct,
    /// Processed by the whole pipeline as if received on `in_port`
    Pipeline,
}

/// Kind of flow event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum FlowEventKind {
    IdleTimeout,
    HardTimeout,
}

/// A flow removed by the hardware on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEvent {
    pub kind: FlowEventKind,
    pub entry: FlowEntry,
    pub stats: FlowStats,
}
