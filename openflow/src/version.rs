// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Protocol version numbers.

use std::fmt::Display;

/// The wire protocol version carried in every message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub u8);

impl Version {
    /// `OpenFlow` 1.0
    pub const OF_1_0: Version = Version(0x01);
    /// `OpenFlow` 1.1
    pub const OF_1_1: Version = Version(0x02);
    /// `OpenFlow` 1.2
    pub const OF_1_2: Version = Version(0x03);
    /// `OpenFlow` 1.3
    pub const OF_1_3: Version = Version(0x04);
    /// `OpenFlow` 1.4
    pub const OF_1_4: Version = Version(0x05);
}

impl Default for Version {
    fn default() -> Self {
        Version::OF_1_3
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            0x01..=0x06 => write!(f, "1.{}", self.0 - 1),
            other => write!(f, "unknown({other:#04x})"),
        }
    }
}
