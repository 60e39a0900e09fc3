// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The match part of flow-mod and packet-in messages.

use net::{Mac, Masked};
use std::net::{Ipv4Addr, Ipv6Addr};

/// A decoded `OXM` match.
///
/// Every dimension the translator knows about is always present as a [`Masked`] pair. A
/// dimension absent from the wire request carries a zero mask (and, by convention, a zero
/// value); an exact match carries an all-ones mask. Upstream decoding is expected to only
/// set a mask when the matching value is meaningful.
///
/// The experimenter dimensions (`tunnel_id` onwards) are the `OF-DPA` pipeline extensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct Match {
    pub in_port: Masked<u32>,
    pub eth_dst: Masked<Mac>,
    pub eth_src: Masked<Mac>,
    pub eth_type: Masked<u16>,
    pub vlan_vid: Masked<u16>,
    pub vlan_pcp: Masked<u8>,
    pub vlan_dei: Masked<u8>,
    pub ip_dscp: Masked<u8>,
    pub ip_ecn: Masked<u8>,
    pub ip_proto: Masked<u8>,
    pub ipv4_src: Masked<Ipv4Addr>,
    pub ipv4_dst: Masked<Ipv4Addr>,
    pub arp_spa: Masked<Ipv4Addr>,
    pub ipv6_src: Masked<Ipv6Addr>,
    pub ipv6_dst: Masked<Ipv6Addr>,
    pub ipv6_flabel: Masked<u32>,
    pub tcp_src: Masked<u16>,
    pub tcp_dst: Masked<u16>,
    pub udp_src: Masked<u16>,
    pub udp_dst: Masked<u16>,
    pub sctp_src: Masked<u16>,
    pub sctp_dst: Masked<u16>,
    pub icmpv4_type: Masked<u8>,
    pub icmpv4_code: Masked<u8>,
    pub icmpv6_type: Masked<u8>,
    pub icmpv6_code: Masked<u8>,
    pub mpls_label: Masked<u32>,
    pub mpls_bos: Masked<u8>,
    pub mpls_tc: Masked<u8>,
    pub tunnel_id: Masked<u64>,
    pub vrf: Masked<u16>,
    pub ovid: Masked<u16>,
    pub mpls_l2_port: Masked<u32>,
    pub actset_output: Masked<u32>,
    pub allow_vlan_translation: Masked<u8>,
    pub qos_index: Masked<u8>,
    pub lmep_id: Masked<u32>,
    pub mpls_ttl: Masked<u8>,
    pub mpls_data_first_nibble: Masked<u8>,
    pub mpls_ach_channel: Masked<u16>,
    pub next_label_is_gal: Masked<u8>,
    pub oam_y1731_mdl: Masked<u8>,
    pub oam_y1731_opcode: Masked<u8>,
    pub color: Masked<u8>,
    pub traffic_class: Masked<u8>,
}

impl Match {
    /// A match on the ingress port only, as reported in packet-in messages.
    #[must_use]
    pub fn in_port(port: u32) -> Match {
        Match {
            in_port: Masked::exact(port),
            ..Match::default()
        }
    }

    /// True iff no dimension carries any bit.
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        *self == Match::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_port_only() {
        let m = Match::in_port(7);
        assert!(m.in_port.is_exact());
        assert_eq!(m.in_port.value, 7);
        let cleared = Match {
            in_port: Masked::ANY,
            ..m
        };
        assert_eq!(cleared, Match::default());
        assert!(Match::default().is_catch_all());
        assert!(!m.is_catch_all());
    }
}
