// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IP protocol numbers.

use std::fmt::Display;

/// The IP protocol (IPv4) / next header (IPv6) number.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IpProto(u8);

impl IpProto {
    /// Internet control message protocol
    pub const ICMP: IpProto = IpProto(1);
    /// Transmission control protocol
    pub const TCP: IpProto = IpProto(6);
    /// User datagram protocol
    pub const UDP: IpProto = IpProto(17);
    /// Internet control message protocol for IPv6
    pub const ICMPV6: IpProto = IpProto(58);
    /// Stream control transmission protocol
    pub const SCTP: IpProto = IpProto(132);

    /// Wrap a raw protocol number
    #[must_use]
    pub const fn new(raw: u8) -> IpProto {
        IpProto(raw)
    }

    /// The raw protocol number
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for IpProto {
    fn from(value: u8) -> Self {
        IpProto(value)
    }
}

impl Display for IpProto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            IpProto::ICMP => write!(f, "icmp"),
            IpProto::TCP => write!(f, "tcp"),
            IpProto::UDP => write!(f, "udp"),
            IpProto::ICMPV6 => write!(f, "icmpv6"),
            IpProto::SCTP => write!(f, "sctp"),
            IpProto(other) => write!(f, "{other}"),
        }
    }
}
