// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The hardware flow descriptor and its table-specific match records.
//!
//! Every match field is a [`Masked`] pair in the encoding the hardware expects. In particular
//! the VLAN id of the VLAN tables carries [`net::vlan::VID_PRESENT`] to distinguish tagged
//! from untagged traffic.

use crate::table::TableId;
use net::{Mac, Masked};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Match record of the ingress port table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngressPortMatch {
    pub in_port: Masked<u32>,
    pub tunnel_id: Masked<u64>,
    pub eth_type: Masked<u16>,
}

/// Match record shared by the six `QoS` trust tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QosTrustMatch {
    pub qos_index: Masked<u8>,
    pub dscp: Masked<u8>,
    pub pcp: Masked<u8>,
    pub dei: Masked<u8>,
    pub mpls_tc: Masked<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VlanMatch {
    pub in_port: Masked<u32>,
    pub vlan_id: Masked<u16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vlan1Match {
    pub in_port: Masked<u32>,
    pub vlan_id: Masked<u16>,
    pub ovid: Masked<u16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaintenancePointMatch {
    pub in_port: Masked<u32>,
    pub eth_type: Masked<u16>,
    pub vlan_id: Masked<u16>,
    pub dst_mac: Masked<Mac>,
    pub oam_y1731_mdl: Masked<u8>,
    pub oam_y1731_opcode: Masked<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MplsL2PortMatch {
    pub mpls_l2_port: Masked<u32>,
    pub tunnel_id: Masked<u64>,
    pub eth_type: Masked<u16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminationMacMatch {
    pub in_port: Masked<u32>,
    pub eth_type: Masked<u16>,
    pub dst_mac: Masked<Mac>,
    pub vlan_id: Masked<u16>,
}

/// Match record shared by the three MPLS label tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MplsMatch {
    pub in_port: Masked<u32>,
    pub eth_type: Masked<u16>,
    pub mpls_label: Masked<u32>,
    pub mpls_bos: Masked<u8>,
    pub mpls_ttl: Masked<u8>,
    pub mpls_data_first_nibble: Masked<u8>,
    pub mpls_ach_channel: Masked<u16>,
    pub next_label_is_gal: Masked<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MplsMaintenancePointMatch {
    pub eth_type: Masked<u16>,
    pub lmep_id: Masked<u32>,
    pub oam_y1731_opcode: Masked<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnicastRoutingMatch {
    pub eth_type: Masked<u16>,
    pub vrf: Masked<u16>,
    pub dst_ip4: Masked<Ipv4Addr>,
    pub dst_ip6: Masked<Ipv6Addr>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MulticastRoutingMatch {
    pub eth_type: Masked<u16>,
    pub vlan_id: Masked<u16>,
    pub vrf: Masked<u16>,
    pub src_ip4: Masked<Ipv4Addr>,
    pub dst_ip4: Masked<Ipv4Addr>,
    pub src_ip6: Masked<Ipv6Addr>,
    pub dst_ip6: Masked<Ipv6Addr>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgingMatch {
    pub vlan_id: Masked<u16>,
    pub tunnel_id: Masked<u64>,
    pub dst_mac: Masked<Mac>,
}

/// Match record of the policy ACL table.
///
/// Transport ports and ICMP type/code are protocol-agnostic here: which protocol they
/// belong to is pinned by `ip_proto`. `src_ip4` also carries the ARP sender address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AclPolicyMatch {
    pub in_port: Masked<u32>,
    pub src_mac: Masked<Mac>,
    pub dst_mac: Masked<Mac>,
    pub eth_type: Masked<u16>,
    pub vlan_id: Masked<u16>,
    pub vlan_pcp: Masked<u8>,
    pub vlan_dei: Masked<u8>,
    pub tunnel_id: Masked<u64>,
    pub vrf: Masked<u16>,
    pub mpls_l2_port: Masked<u32>,
    pub dscp: Masked<u8>,
    pub ecn: Masked<u8>,
    pub ip_proto: Masked<u8>,
    pub src_ip4: Masked<Ipv4Addr>,
    pub dst_ip4: Masked<Ipv4Addr>,
    pub src_ip6: Masked<Ipv6Addr>,
    pub dst_ip6: Masked<Ipv6Addr>,
    pub ipv6_flow_label: Masked<u32>,
    pub src_l4_port: Masked<u16>,
    pub dst_l4_port: Masked<u16>,
    pub icmp_type: Masked<u8>,
    pub icmp_code: Masked<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorBasedActionsMatch {
    pub color: Masked<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EgressVlanMatch {
    pub out_port: Masked<u32>,
    pub vlan_id: Masked<u16>,
    pub allow_vlan_translation: Masked<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EgressVlan1Match {
    pub out_port: Masked<u32>,
    pub vlan_id: Masked<u16>,
    pub ovid: Masked<u16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EgressMaintenancePointMatch {
    pub out_port: Masked<u32>,
    pub vlan_id: Masked<u16>,
    pub eth_type: Masked<u16>,
    pub dst_mac: Masked<Mac>,
    pub oam_y1731_mdl: Masked<u8>,
    pub oam_y1731_opcode: Masked<u8>,
}

/// The table-specific part of a [`FlowEntry`]: exactly one record layout per table family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCriteria {
    IngressPort(IngressPortMatch),
    QosTrust(QosTrustMatch),
    Vlan(VlanMatch),
    Vlan1(Vlan1Match),
    MaintenancePoint(MaintenancePointMatch),
    MplsL2Port(MplsL2PortMatch),
    TerminationMac(TerminationMacMatch),
    Mpls(MplsMatch),
    MplsMaintenancePoint(MplsMaintenancePointMatch),
    UnicastRouting(UnicastRoutingMatch),
    MulticastRouting(MulticastRoutingMatch),
    Bridging(BridgingMatch),
    AclPolicy(AclPolicyMatch),
    ColorBasedActions(ColorBasedActionsMatch),
    EgressVlan(EgressVlanMatch),
    EgressVlan1(EgressVlan1Match),
    EgressMaintenancePoint(EgressMaintenancePointMatch),
}

impl MatchCriteria {
    /// The catch-all record for `table`, of the layout that table uses.
    #[must_use]
    pub fn catch_all(table: TableId) -> MatchCriteria {
        match table {
            TableId::IngressPort => MatchCriteria::IngressPort(IngressPortMatch::default()),
            TableId::PortDscpTrust
            | TableId::PortPcpTrust
            | TableId::TunnelDscpTrust
            | TableId::TunnelPcpTrust
            | TableId::MplsDscpTrust
            | TableId::MplsPcpTrust => MatchCriteria::QosTrust(QosTrustMatch::default()),
            TableId::Vlan => MatchCriteria::Vlan(VlanMatch::default()),
            TableId::Vlan1 => MatchCriteria::Vlan1(Vlan1Match::default()),
            TableId::MaintenancePoint => {
                MatchCriteria::MaintenancePoint(MaintenancePointMatch::default())
            }
            TableId::MplsL2Port => MatchCriteria::MplsL2Port(MplsL2PortMatch::default()),
            TableId::TerminationMac => {
                MatchCriteria::TerminationMac(TerminationMacMatch::default())
            }
            TableId::Mpls0 | TableId::Mpls1 | TableId::Mpls2 => {
                MatchCriteria::Mpls(MplsMatch::default())
            }
            TableId::MplsMaintenancePoint => {
                MatchCriteria::MplsMaintenancePoint(MplsMaintenancePointMatch::default())
            }
            TableId::UnicastRouting => {
                MatchCriteria::UnicastRouting(UnicastRoutingMatch::default())
            }
            TableId::MulticastRouting => {
                MatchCriteria::MulticastRouting(MulticastRoutingMatch::default())
            }
            TableId::Bridging => MatchCriteria::Bridging(BridgingMatch::default()),
            TableId::AclPolicy => MatchCriteria::AclPolicy(AclPolicyMatch::default()),
            TableId::ColorBasedActions => {
                MatchCriteria::ColorBasedActions(ColorBasedActionsMatch::default())
            }
            TableId::EgressVlan => MatchCriteria::EgressVlan(EgressVlanMatch::default()),
            TableId::EgressVlan1 => MatchCriteria::EgressVlan1(EgressVlan1Match::default()),
            TableId::EgressMaintenancePoint => {
                MatchCriteria::EgressMaintenancePoint(EgressMaintenancePointMatch::default())
            }
        }
    }

    /// True iff this record has the layout `table` expects.
    #[must_use]
    pub fn fits(&self, table: TableId) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(&MatchCriteria::catch_all(table))
    }
}

/// Destination of an output action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputPort {
    Controller,
    Local,
    /// A physical or logical (tunnel) port
    Port(u32),
}

/// The action and instruction section of a [`FlowEntry`].
///
/// `None` / `false` means the action is not requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowActions {
    pub goto_table: Option<TableId>,
    pub clear_actions: bool,
    pub output_port: Option<OutputPort>,
    pub group_id: Option<u32>,
    /// Id of the outer tag (or of the only tag)
    pub set_vlan_id: Option<u16>,
    /// Ethertype of a pushed tag
    pub push_vlan: Option<u16>,
    /// Id of the tag pushed by `push_vlan`
    pub set_vlan_id2: Option<u16>,
    pub pop_vlan: bool,
    /// Ethertype of the payload exposed by popping the outermost label
    pub pop_label: Option<u16>,
    pub decrement_ttl: bool,
    pub copy_ttl_in: bool,
    pub queue_id: Option<u8>,
    pub vrf: Option<u16>,
    pub tunnel_id: Option<u64>,
    pub mpls_l2_port: Option<u32>,
    pub ovid: Option<u16>,
    pub mpls_type: Option<u16>,
    pub vlan_pcp: Option<u8>,
    pub dscp: Option<u8>,
    pub ecn: Option<u8>,
    pub traffic_class: Option<u8>,
    pub color: Option<u8>,
    pub qos_index: Option<u8>,
    pub lmep_id: Option<u32>,
}

/// A hardware flow descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEntry {
    pub table_id: TableId,
    pub priority: u16,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub cookie: u64,
    pub criteria: MatchCriteria,
    pub actions: FlowActions,
}

impl FlowEntry {
    /// A catch-all entry with no actions for `table`.
    #[must_use]
    pub fn new(table_id: TableId, cookie: u64) -> FlowEntry {
        FlowEntry {
            table_id,
            priority: 0,
            idle_timeout: 0,
            hard_timeout: 0,
            cookie,
            criteria: MatchCriteria::catch_all(table_id),
            actions: FlowActions::default(),
        }
    }
}

/// Counters of one flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowStats {
    pub packet_count: u64,
    pub byte_count: u64,
    pub duration_sec: u32,
}

/// Occupancy of one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableInfo {
    pub max_entries: u32,
    pub num_entries: u32,
}
