// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Which match dimensions a request constrains.

use bitflags::bitflags;
use openflow::Match;

bitflags! {
    /// Set of match dimensions, one flag per field of [`Match`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MatchFields: u64 {
        const IN_PORT = 1 << 0;
        const ETH_DST = 1 << 1;
        const ETH_SRC = 1 << 2;
        const ETH_TYPE = 1 << 3;
        const VLAN_VID = 1 << 4;
        const VLAN_PCP = 1 << 5;
        const VLAN_DEI = 1 << 6;
        const IP_DSCP = 1 << 7;
        const IP_ECN = 1 << 8;
        const IP_PROTO = 1 << 9;
        const IPV4_SRC = 1 << 10;
        const IPV4_DST = 1 << 11;
        const ARP_SPA = 1 << 12;
        const IPV6_SRC = 1 << 13;
        const IPV6_DST = 1 << 14;
        const IPV6_FLABEL = 1 << 15;
        const TCP_SRC = 1 << 16;
        const TCP_DST = 1 << 17;
        const UDP_SRC = 1 << 18;
        const UDP_DST = 1 << 19;
        const SCTP_SRC = 1 << 20;
        const SCTP_DST = 1 << 21;
        const ICMPV4_TYPE = 1 << 22;
        const ICMPV4_CODE = 1 << 23;
        const ICMPV6_TYPE = 1 << 24;
        const ICMPV6_CODE = 1 << 25;
        const MPLS_LABEL = 1 << 26;
        const MPLS_BOS = 1 << 27;
        const MPLS_TC = 1 << 28;
        const TUNNEL_ID = 1 << 29;
        const VRF = 1 << 30;
        const OVID = 1 << 31;
        const MPLS_L2_PORT = 1 << 32;
        const ACTSET_OUTPUT = 1 << 33;
        const ALLOW_VLAN_TRANSLATION = 1 << 34;
        const QOS_INDEX = 1 << 35;
        const LMEP_ID = 1 << 36;
        const MPLS_TTL = 1 << 37;
        const MPLS_DATA_FIRST_NIBBLE = 1 << 38;
        const MPLS_ACH_CHANNEL = 1 << 39;
        const NEXT_LABEL_IS_GAL = 1 << 40;
        const OAM_Y1731_MDL = 1 << 41;
        const OAM_Y1731_OPCODE = 1 << 42;
        const COLOR = 1 << 43;
        const TRAFFIC_CLASS = 1 << 44;

        const TCP_PORTS = Self::TCP_SRC.bits() | Self::TCP_DST.bits();
        const UDP_PORTS = Self::UDP_SRC.bits() | Self::UDP_DST.bits();
        const SCTP_PORTS = Self::SCTP_SRC.bits() | Self::SCTP_DST.bits();
        const ICMPV4 = Self::ICMPV4_TYPE.bits() | Self::ICMPV4_CODE.bits();
        const ICMPV6 = Self::ICMPV6_TYPE.bits() | Self::ICMPV6_CODE.bits();
    }
}

/// Compute the set of dimensions `request` constrains.
///
/// A dimension is present when its mask is non-zero. Address dimensions (IPv4, IPv6 and
/// ARP sender address) are also present when they carry a non-zero value with a zero mask:
/// some tables give such a value a default mask instead of ignoring it.
#[must_use]
pub fn analyze(request: &Match) -> MatchFields {
    let mut present = MatchFields::empty();
    let mut flag = |on: bool, field: MatchFields| present.set(field, on);

    flag(request.in_port.is_masked(), MatchFields::IN_PORT);
    flag(request.eth_dst.is_masked(), MatchFields::ETH_DST);
    flag(request.eth_src.is_masked(), MatchFields::ETH_SRC);
    flag(request.eth_type.is_masked(), MatchFields::ETH_TYPE);
    flag(request.vlan_vid.is_masked(), MatchFields::VLAN_VID);
    flag(request.vlan_pcp.is_masked(), MatchFields::VLAN_PCP);
    flag(request.vlan_dei.is_masked(), MatchFields::VLAN_DEI);
    flag(request.ip_dscp.is_masked(), MatchFields::IP_DSCP);
    flag(request.ip_ecn.is_masked(), MatchFields::IP_ECN);
    flag(request.ip_proto.is_masked(), MatchFields::IP_PROTO);
    flag(!request.ipv4_src.is_wildcard(), MatchFields::IPV4_SRC);
    flag(!request.ipv4_dst.is_wildcard(), MatchFields::IPV4_DST);
    flag(!request.arp_spa.is_wildcard(), MatchFields::ARP_SPA);
    flag(!request.ipv6_src.is_wildcard(), MatchFields::IPV6_SRC);
    flag(!request.ipv6_dst.is_wildcard(), MatchFields::IPV6_DST);
    flag(request.ipv6_flabel.is_masked(), MatchFields::IPV6_FLABEL);
    flag(request.tcp_src.is_masked(), MatchFields::TCP_SRC);
    flag(request.tcp_dst.is_masked(), MatchFields::TCP_DST);
    flag(request.udp_src.is_masked(), MatchFields::UDP_SRC);
    flag(request.udp_dst.is_masked(), MatchFields::UDP_DST);
    flag(request.sctp_src.is_masked(), MatchFields::SCTP_SRC);
    flag(request.sctp_dst.is_masked(), MatchFields::SCTP_DST);
    flag(request.icmpv4_type.is_masked(), MatchFields::ICMPV4_TYPE);
    flag(request.icmpv4_code.is_masked(), MatchFields::ICMPV4_CODE);
    flag(request.icmpv6_type.is_masked(), MatchFields::ICMPV6_TYPE);
    flag(request.icmpv6_code.is_masked(), MatchFields::ICMPV6_CODE);
    flag(request.mpls_label.is_masked(), MatchFields::MPLS_LABEL);
    flag(request.mpls_bos.is_masked(), MatchFields::MPLS_BOS);
    flag(request.mpls_tc.is_masked(), MatchFields::MPLS_TC);
    flag(request.tunnel_id.is_masked(), MatchFields::TUNNEL_ID);
    flag(request.vrf.is_masked(), MatchFields::VRF);
    flag(request.ovid.is_masked(), MatchFields::OVID);
    flag(request.mpls_l2_port.is_masked(), MatchFields::MPLS_L2_PORT);
    flag(
        request.actset_output.is_masked(),
        MatchFields::ACTSET_OUTPUT,
    );
    flag(
        request.allow_vlan_translation.is_masked(),
        MatchFields::ALLOW_VLAN_TRANSLATION,
    );
    flag(request.qos_index.is_masked(), MatchFields::QOS_INDEX);
    flag(request.lmep_id.is_masked(), MatchFields::LMEP_ID);
    flag(request.mpls_ttl.is_masked(), MatchFields::MPLS_TTL);
    flag(
        request.mpls_data_first_nibble.is_masked(),
        MatchFields::MPLS_DATA_FIRST_NIBBLE,
    );
    flag(
        request.mpls_ach_channel.is_masked(),
        MatchFields::MPLS_ACH_CHANNEL,
    );
    flag(
        request.next_label_is_gal.is_masked(),
        MatchFields::NEXT_LABEL_IS_GAL,
    );
    flag(
        request.oam_y1731_mdl.is_masked(),
        MatchFields::OAM_Y1731_MDL,
    );
    flag(
        request.oam_y1731_opcode.is_masked(),
        MatchFields::OAM_Y1731_OPCODE,
    );
    flag(request.color.is_masked(), MatchFields::COLOR);
    flag(
        request.traffic_class.is_masked(),
        MatchFields::TRAFFIC_CLASS,
    );

    present
}

#[cfg(test)]
mod tests {
    use super::*;
    use net::{Mac, Masked};
    use std::net::Ipv4Addr;

    #[test]
    fn empty_request() {
        assert_eq!(analyze(&Match::default()), MatchFields::empty());
    }

    #[test]
    fn mask_decides_presence() {
        let request = Match {
            in_port: Masked::exact(3),
            eth_dst: Masked::new(Mac([0, 1, 2, 3, 4, 5]), Mac::ZERO),
            tcp_dst: Masked::new(0, 0xffff),
            ..Match::default()
        };
        let expected = MatchFields::IN_PORT | MatchFields::TCP_DST;
        assert_eq!(analyze(&request), expected);
    }

    #[test]
    fn unmasked_address_is_present() {
        let request = Match {
            ipv4_dst: Masked::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::UNSPECIFIED),
            ..Match::default()
        };
        assert_eq!(analyze(&request), MatchFields::IPV4_DST);
    }

    #[test]
    fn analysis_is_deterministic() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|(vid, vmask, port, proto, v4): (u16, u16, u16, u8, u32)| {
                let request = Match {
                    vlan_vid: Masked::new(vid, vmask),
                    udp_dst: Masked::new(port, port),
                    ip_proto: Masked::exact(proto),
                    ipv4_src: Masked::new(Ipv4Addr::from(v4), Ipv4Addr::UNSPECIFIED),
                    ..Match::default()
                };
                let first = analyze(&request);
                assert_eq!(first, analyze(&request));
                assert!(first.contains(MatchFields::IP_PROTO));
                assert_eq!(first.contains(MatchFields::VLAN_VID), vmask != 0);
                assert_eq!(first.contains(MatchFields::UDP_DST), port != 0);
                assert_eq!(first.contains(MatchFields::IPV4_SRC), v4 != 0);
            });
    }
}
