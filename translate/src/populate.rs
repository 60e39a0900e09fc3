// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Population of the table-specific match record from a wire match.
//!
//! Each record field is filled with one of three policies:
//!
//! * direct copy: the pair is copied as is, or dropped to a wildcard if its mask is zero;
//! * default mask: an address carried with a zero mask becomes an exact match
//!   (policy ACL addresses only);
//! * VLAN tri-state: see [`VlanIntent`] (VLAN and VLAN 1 tables only).

use crate::capability::capability;
use crate::error::CompatError;
use crate::prereq::validate_prerequisites;
use crate::presence::MatchFields;
use config::Profile;
use net::vlan::{VID_EXACT_MASK, VID_FIELD_MASK, VID_PRESENT, vid_bits};
use net::{MaskValue, Masked};
use ofdpa::flow::{
    AclPolicyMatch, BridgingMatch, ColorBasedActionsMatch, EgressMaintenancePointMatch,
    EgressVlan1Match, EgressVlanMatch, IngressPortMatch, MaintenancePointMatch,
    MplsL2PortMatch, MplsMaintenancePointMatch, MplsMatch, MulticastRoutingMatch,
    QosTrustMatch, TerminationMacMatch, UnicastRoutingMatch, Vlan1Match, VlanMatch,
};
use ofdpa::{MatchCriteria, TableId};
use openflow::Match;
use tracing::debug;

/// What a VLAN id match asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VlanIntent {
    /// Tagged or not, any id
    Any,
    /// Untagged frames only
    Untagged,
    /// Frames tagged with this 12 bit id
    Tagged(u16),
}

impl VlanIntent {
    /// Classify a wire VLAN id match.
    ///
    /// # Errors
    ///
    /// [`CompatError::UnsupportedVlanEncoding`] for any pair outside the three recognized
    /// shapes (partial id masks, presence-only matches, untagged with a non-zero id).
    pub fn classify(vid: Masked<u16>) -> Result<VlanIntent, CompatError> {
        let Masked { value, mask } = vid;
        let present = value & VID_PRESENT != 0;
        if mask == 0 {
            Ok(VlanIntent::Any)
        } else if mask == VID_FIELD_MASK && present {
            Ok(VlanIntent::Tagged(vid_bits(value)))
        } else if vid_bits(value) == 0
            && (mask == VID_EXACT_MASK || (mask == VID_FIELD_MASK && !present))
        {
            Ok(VlanIntent::Untagged)
        } else {
            Err(CompatError::UnsupportedVlanEncoding { value, mask })
        }
    }

    /// The hardware encoding of this intent.
    #[must_use]
    pub fn encode(self) -> Masked<u16> {
        match self {
            VlanIntent::Any => Masked::ANY,
            VlanIntent::Untagged => Masked::new(0, VID_FIELD_MASK),
            VlanIntent::Tagged(vid) => Masked::new(vid | VID_PRESENT, VID_FIELD_MASK),
        }
    }
}

fn direct<T: MaskValue>(field: Masked<T>) -> Masked<T> {
    if field.is_masked() {
        field
    } else {
        Masked::ANY
    }
}

fn default_mask<T: MaskValue>(field: Masked<T>) -> Masked<T> {
    if field.is_masked() {
        field
    } else if field.has_value() {
        Masked::exact(field.value)
    } else {
        Masked::ANY
    }
}

fn vlan_tri_state(vid: Masked<u16>) -> Result<Masked<u16>, CompatError> {
    VlanIntent::classify(vid).map(VlanIntent::encode)
}

/// Build the match record of `table` from `request`.
///
/// `present` must be the result of [`crate::presence::analyze`] on `request`. The request
/// is admitted only if `present` fits the capability of `table` under `profile` and the
/// table's prerequisites hold.
///
/// # Errors
///
/// A [`CompatError`] describing the first reason the request cannot be expressed on `table`.
pub fn populate(
    request: &Match,
    present: MatchFields,
    table: TableId,
    profile: Profile,
) -> Result<MatchCriteria, CompatError> {
    let rejected = present - capability(profile, table);
    if !rejected.is_empty() {
        debug!("table {table} rejects fields {rejected:?}");
        return Err(CompatError::FieldsNotSupported {
            table,
            fields: rejected,
        });
    }
    validate_prerequisites(request, present, table)?;

    let r = request;
    let criteria = match table {
        TableId::IngressPort => MatchCriteria::IngressPort(IngressPortMatch {
            in_port: direct(r.in_port),
            tunnel_id: direct(r.tunnel_id),
            eth_type: direct(r.eth_type),
        }),
        TableId::PortDscpTrust
        | TableId::PortPcpTrust
        | TableId::TunnelDscpTrust
        | TableId::TunnelPcpTrust
        | TableId::MplsDscpTrust
        | TableId::MplsPcpTrust => MatchCriteria::QosTrust(QosTrustMatch {
            qos_index: direct(r.qos_index),
            dscp: direct(r.ip_dscp),
            pcp: direct(r.vlan_pcp),
            dei: direct(r.vlan_dei),
            mpls_tc: direct(r.mpls_tc),
        }),
        TableId::Vlan => MatchCriteria::Vlan(VlanMatch {
            in_port: direct(r.in_port),
            vlan_id: vlan_tri_state(r.vlan_vid)?,
        }),
        TableId::Vlan1 => MatchCriteria::Vlan1(Vlan1Match {
            in_port: direct(r.in_port),
            vlan_id: vlan_tri_state(r.vlan_vid)?,
            ovid: direct(r.ovid),
        }),
        TableId::MaintenancePoint => MatchCriteria::MaintenancePoint(MaintenancePointMatch {
            in_port: direct(r.in_port),
            eth_type: direct(r.eth_type),
            vlan_id: direct(r.vlan_vid),
            dst_mac: direct(r.eth_dst),
            oam_y1731_mdl: direct(r.oam_y1731_mdl),
            oam_y1731_opcode: direct(r.oam_y1731_opcode),
        }),
        TableId::MplsL2Port => MatchCriteria::MplsL2Port(MplsL2PortMatch {
            mpls_l2_port: direct(r.mpls_l2_port),
            tunnel_id: direct(r.tunnel_id),
            eth_type: direct(r.eth_type),
        }),
        TableId::TerminationMac => MatchCriteria::TerminationMac(TerminationMacMatch {
            in_port: direct(r.in_port),
            eth_type: direct(r.eth_type),
            dst_mac: direct(r.eth_dst),
            vlan_id: direct(r.vlan_vid),
        }),
        TableId::Mpls0 | TableId::Mpls1 | TableId::Mpls2 => MatchCriteria::Mpls(MplsMatch {
            in_port: direct(r.in_port),
            eth_type: direct(r.eth_type),
            mpls_label: direct(r.mpls_label),
            mpls_bos: direct(r.mpls_bos),
            mpls_ttl: direct(r.mpls_ttl),
            mpls_data_first_nibble: direct(r.mpls_data_first_nibble),
            mpls_ach_channel: direct(r.mpls_ach_channel),
            next_label_is_gal: direct(r.next_label_is_gal),
        }),
        TableId::MplsMaintenancePoint => {
            MatchCriteria::MplsMaintenancePoint(MplsMaintenancePointMatch {
                eth_type: direct(r.eth_type),
                lmep_id: direct(r.lmep_id),
                oam_y1731_opcode: direct(r.oam_y1731_opcode),
            })
        }
        TableId::UnicastRouting => MatchCriteria::UnicastRouting(UnicastRoutingMatch {
            eth_type: direct(r.eth_type),
            vrf: direct(r.vrf),
            dst_ip4: direct(r.ipv4_dst),
            dst_ip6: direct(r.ipv6_dst),
        }),
        TableId::MulticastRouting => MatchCriteria::MulticastRouting(MulticastRoutingMatch {
            eth_type: direct(r.eth_type),
            vlan_id: direct(r.vlan_vid),
            vrf: direct(r.vrf),
            src_ip4: direct(r.ipv4_src),
            dst_ip4: direct(r.ipv4_dst),
            src_ip6: direct(r.ipv6_src),
            dst_ip6: direct(r.ipv6_dst),
        }),
        TableId::Bridging => MatchCriteria::Bridging(BridgingMatch {
            vlan_id: direct(r.vlan_vid),
            tunnel_id: direct(r.tunnel_id),
            dst_mac: direct(r.eth_dst),
        }),
        TableId::AclPolicy => MatchCriteria::AclPolicy(acl_policy(r, present, table)?),
        TableId::ColorBasedActions => MatchCriteria::ColorBasedActions(ColorBasedActionsMatch {
            color: direct(r.color),
        }),
        TableId::EgressVlan => MatchCriteria::EgressVlan(EgressVlanMatch {
            out_port: direct(r.actset_output),
            vlan_id: direct(r.vlan_vid),
            allow_vlan_translation: direct(r.allow_vlan_translation),
        }),
        TableId::EgressVlan1 => MatchCriteria::EgressVlan1(EgressVlan1Match {
            out_port: direct(r.actset_output),
            vlan_id: direct(r.vlan_vid),
            ovid: direct(r.ovid),
        }),
        TableId::EgressMaintenancePoint => {
            MatchCriteria::EgressMaintenancePoint(EgressMaintenancePointMatch {
                out_port: direct(r.actset_output),
                vlan_id: direct(r.vlan_vid),
                eth_type: direct(r.eth_type),
                dst_mac: direct(r.eth_dst),
                oam_y1731_mdl: direct(r.oam_y1731_mdl),
                oam_y1731_opcode: direct(r.oam_y1731_opcode),
            })
        }
    };
    Ok(criteria)
}

fn acl_policy(
    r: &Match,
    present: MatchFields,
    table: TableId,
) -> Result<AclPolicyMatch, CompatError> {
    if present.contains(MatchFields::IPV4_SRC | MatchFields::ARP_SPA) {
        return Err(CompatError::ConflictingFields {
            table,
            fields: "ipv4_src and arp_spa",
        });
    }
    if present.intersects(MatchFields::ICMPV4) && present.intersects(MatchFields::ICMPV6) {
        return Err(CompatError::ConflictingFields {
            table,
            fields: "icmpv4 and icmpv6",
        });
    }

    let (src_l4_port, dst_l4_port) = if present.intersects(MatchFields::TCP_PORTS) {
        (r.tcp_src, r.tcp_dst)
    } else if present.intersects(MatchFields::UDP_PORTS) {
        (r.udp_src, r.udp_dst)
    } else {
        (r.sctp_src, r.sctp_dst)
    };
    let (icmp_type, icmp_code) = if present.intersects(MatchFields::ICMPV6) {
        (r.icmpv6_type, r.icmpv6_code)
    } else {
        (r.icmpv4_type, r.icmpv4_code)
    };
    let src_ip4 = if present.contains(MatchFields::ARP_SPA) {
        r.arp_spa
    } else {
        r.ipv4_src
    };

    Ok(AclPolicyMatch {
        in_port: direct(r.in_port),
        src_mac: direct(r.eth_src),
        dst_mac: direct(r.eth_dst),
        eth_type: direct(r.eth_type),
        vlan_id: direct(r.vlan_vid),
        vlan_pcp: direct(r.vlan_pcp),
        vlan_dei: direct(r.vlan_dei),
        tunnel_id: direct(r.tunnel_id),
        vrf: direct(r.vrf),
        mpls_l2_port: direct(r.mpls_l2_port),
        dscp: direct(r.ip_dscp),
        ecn: direct(r.ip_ecn),
        ip_proto: direct(r.ip_proto),
        src_ip4: default_mask(src_ip4),
        dst_ip4: default_mask(r.ipv4_dst),
        src_ip6: default_mask(r.ipv6_src),
        dst_ip6: default_mask(r.ipv6_dst),
        ipv6_flow_label: direct(r.ipv6_flabel),
        src_l4_port: direct(src_l4_port),
        dst_l4_port: direct(dst_l4_port),
        icmp_type: direct(icmp_type),
        icmp_code: direct(icmp_code),
    })
}
