// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Flow-mod, packet-out, packet-in and flow-removed messages.

use crate::action::Action;
use crate::instruction::Instruction;
use crate::matching::Match;
use crate::port::PortNo;
use crate::version::Version;

/// Buffer id meaning "the packet is not buffered on the switch".
pub const NO_BUFFER: u32 = 0xffff_ffff;

/// Cookie reported on packet-ins which cannot be tied to a flow.
pub const COOKIE_NONE: u64 = u64::MAX;

/// An add or modify flow-mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowMod {
    pub version: Version,
    pub table_id: u8,
    pub priority: u16,
    /// Seconds of inactivity before expiry, zero for none.
    pub idle_timeout: u16,
    /// Seconds before expiry regardless of activity, zero for none.
    pub hard_timeout: u16,
    pub pattern: Match,
    pub instructions: Vec<Instruction>,
}

impl FlowMod {
    /// An `OpenFlow` 1.3 flow-mod with no timeouts, matching everything.
    #[must_use]
    pub fn new(table_id: u8, priority: u16) -> FlowMod {
        FlowMod {
            version: Version::OF_1_3,
            table_id,
            priority,
            idle_timeout: 0,
            hard_timeout: 0,
            pattern: Match::default(),
            instructions: vec![],
        }
    }

    #[must_use]
    pub fn with_match(mut self, pattern: Match) -> FlowMod {
        self.pattern = pattern;
        self
    }

    #[must_use]
    pub fn with_instruction(mut self, instruction: Instruction) -> FlowMod {
        self.instructions.push(instruction);
        self
    }

    #[must_use]
    pub fn with_timeouts(mut self, idle: u16, hard: u16) -> FlowMod {
        self.idle_timeout = idle;
        self.hard_timeout = hard;
        self
    }
}

/// A packet-out request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketOut {
    pub version: Version,
    /// [`NO_BUFFER`] when `data` carries the frame.
    pub buffer_id: u32,
    pub in_port: PortNo,
    pub actions: Vec<Action>,
    pub data: Vec<u8>,
}

/// Why a packet was sent to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum PacketInReason {
    /// No matching flow (table-miss)
    NoMatch,
    /// Explicit output-to-controller action
    Action,
    /// Packet has an invalid TTL
    InvalidTtl,
}

/// A packet-in notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketIn {
    pub version: Version,
    pub buffer_id: u32,
    /// Length of the frame as received, which may exceed `data.len()`.
    pub total_len: u16,
    pub reason: PacketInReason,
    pub table_id: u8,
    pub cookie: u64,
    pub pattern: Match,
    pub data: Vec<u8>,
}

/// Why a flow was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum FlowRemovedReason {
    IdleTimeout,
    HardTimeout,
    Delete,
    GroupDelete,
}

/// A flow-removed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRemoved {
    pub cookie: u64,
    pub priority: u16,
    pub reason: FlowRemovedReason,
    pub table_id: u8,
    pub duration_sec: u32,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub packet_count: u64,
    pub byte_count: u64,
}
