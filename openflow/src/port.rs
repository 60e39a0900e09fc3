// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Port numbers, including the reserved logical ports.

use std::fmt::Display;

/// A port number as found in output actions, packet-out and packet-in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortNo {
    /// A concrete port (physical or logical), at most [`PortNo::MAX`]
    Physical(u32),
    /// Send the packet back out of its ingress port
    InPort,
    /// Submit the packet to the first flow table (packet-out only)
    Table,
    /// Forward using the non-`OpenFlow` pipeline
    Normal,
    /// Flood using the non-`OpenFlow` pipeline
    Flood,
    /// All standard ports except the ingress port
    All,
    /// Send to the controller
    Controller,
    /// The switch's local networking stack
    Local,
    /// Wildcard / "no port"
    Any,
}

impl PortNo {
    /// Highest number of a concrete port
    pub const MAX: u32 = 0xffff_ff00;
    const IN_PORT: u32 = 0xffff_fff8;
    const TABLE: u32 = 0xffff_fff9;
    const NORMAL: u32 = 0xffff_fffa;
    const FLOOD: u32 = 0xffff_fffb;
    const ALL: u32 = 0xffff_fffc;
    const CONTROLLER: u32 = 0xffff_fffd;
    const LOCAL: u32 = 0xffff_fffe;
    const ANY: u32 = 0xffff_ffff;

    /// True for the reserved logical ports.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        !matches!(self, PortNo::Physical(_))
    }
}

/// Error for numbers in the reserved range which name no port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid port number {0:#x}")]
pub struct InvalidPortNo(pub u32);

impl TryFrom<u32> for PortNo {
    type Error = InvalidPortNo;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0..=PortNo::MAX => PortNo::Physical(value),
            PortNo::IN_PORT => PortNo::InPort,
            PortNo::TABLE => PortNo::Table,
            PortNo::NORMAL => PortNo::Normal,
            PortNo::FLOOD => PortNo::Flood,
            PortNo::ALL => PortNo::All,
            PortNo::CONTROLLER => PortNo::Controller,
            PortNo::LOCAL => PortNo::Local,
            PortNo::ANY => PortNo::Any,
            _ => return Err(InvalidPortNo(value)),
        })
    }
}

impl From<PortNo> for u32 {
    fn from(value: PortNo) -> Self {
        match value {
            PortNo::Physical(port) => port,
            PortNo::InPort => PortNo::IN_PORT,
            PortNo::Table => PortNo::TABLE,
            PortNo::Normal => PortNo::NORMAL,
            PortNo::Flood => PortNo::FLOOD,
            PortNo::All => PortNo::ALL,
            PortNo::Controller => PortNo::CONTROLLER,
            PortNo::Local => PortNo::LOCAL,
            PortNo::Any => PortNo::ANY,
        }
    }
}

impl Display for PortNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortNo::Physical(port) => write!(f, "{port}"),
            PortNo::InPort => write!(f, "IN_PORT"),
            PortNo::Table => write!(f, "TABLE"),
            PortNo::Normal => write!(f, "NORMAL"),
            PortNo::Flood => write!(f, "FLOOD"),
            PortNo::All => write!(f, "ALL"),
            PortNo::Controller => write!(f, "CONTROLLER"),
            PortNo::Local => write!(f, "LOCAL"),
            PortNo::Any => write!(f, "ANY"),
        }
    }
}
