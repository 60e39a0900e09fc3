// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Match dimensions each pipeline table accepts.
//!
//! Capabilities come in two layers: the base set every target implements
//! ([`capability_of`]) and an extension set ([`extension_of`]) only offered by targets
//! deployed with [`Profile::Extended`].

use crate::presence::MatchFields;
use config::Profile;
use ofdpa::TableId;

macro_rules! fields {
    ($($f:ident),* $(,)?) => {
        MatchFields::from_bits_retain(0 $(| MatchFields::$f.bits())*)
    };
}

const DSCP_TRUST: MatchFields = fields!(QOS_INDEX, IP_DSCP);
const PCP_TRUST: MatchFields = fields!(QOS_INDEX, VLAN_PCP, VLAN_DEI);
const OAM: MatchFields = fields!(OAM_Y1731_MDL, OAM_Y1731_OPCODE);
const MPLS_TP: MatchFields = fields!(
    MPLS_TTL,
    MPLS_DATA_FIRST_NIBBLE,
    MPLS_ACH_CHANNEL,
    NEXT_LABEL_IS_GAL,
);
const ACL_POLICY: MatchFields = fields!(
    IN_PORT,
    ETH_SRC,
    ETH_DST,
    ETH_TYPE,
    VLAN_VID,
    VLAN_PCP,
    VLAN_DEI,
    TUNNEL_ID,
    VRF,
    MPLS_L2_PORT,
    IP_DSCP,
    IP_ECN,
    IP_PROTO,
    IPV4_SRC,
    IPV4_DST,
    ARP_SPA,
    IPV6_SRC,
    IPV6_DST,
    IPV6_FLABEL,
    TCP_PORTS,
    UDP_PORTS,
    SCTP_PORTS,
    ICMPV4,
    ICMPV6,
);

/// Base capability of `table`.
#[must_use]
pub const fn capability_of(table: TableId) -> MatchFields {
    match table {
        TableId::IngressPort => fields!(IN_PORT, TUNNEL_ID, ETH_TYPE),
        TableId::PortDscpTrust | TableId::TunnelDscpTrust | TableId::MplsDscpTrust => DSCP_TRUST,
        TableId::PortPcpTrust | TableId::TunnelPcpTrust => PCP_TRUST,
        TableId::MplsPcpTrust => fields!(QOS_INDEX, MPLS_TC),
        TableId::Vlan => fields!(IN_PORT, VLAN_VID),
        TableId::Vlan1 => fields!(IN_PORT, VLAN_VID, OVID),
        TableId::MaintenancePoint => fields!(IN_PORT, ETH_TYPE, VLAN_VID, ETH_DST),
        TableId::MplsL2Port => fields!(MPLS_L2_PORT, TUNNEL_ID, ETH_TYPE),
        TableId::TerminationMac => fields!(IN_PORT, ETH_TYPE, ETH_DST, VLAN_VID),
        TableId::Mpls0 | TableId::Mpls1 | TableId::Mpls2 => {
            fields!(IN_PORT, ETH_TYPE, MPLS_LABEL, MPLS_BOS)
        }
        TableId::MplsMaintenancePoint => fields!(ETH_TYPE),
        TableId::UnicastRouting => fields!(ETH_TYPE, VRF, IPV4_DST, IPV6_DST),
        TableId::MulticastRouting => fields!(
            ETH_TYPE, VLAN_VID, VRF, IPV4_SRC, IPV4_DST, IPV6_SRC, IPV6_DST
        ),
        TableId::Bridging => fields!(VLAN_VID, TUNNEL_ID, ETH_DST),
        TableId::AclPolicy => ACL_POLICY,
        TableId::ColorBasedActions => MatchFields::empty(),
        TableId::EgressVlan => fields!(ACTSET_OUTPUT, VLAN_VID, ALLOW_VLAN_TRANSLATION),
        TableId::EgressVlan1 => fields!(ACTSET_OUTPUT, VLAN_VID, OVID),
        TableId::EgressMaintenancePoint => fields!(ACTSET_OUTPUT, VLAN_VID, ETH_TYPE, ETH_DST),
    }
}

/// Additional capability of `table` on extended targets.
#[must_use]
pub const fn extension_of(table: TableId) -> MatchFields {
    match table {
        TableId::MaintenancePoint | TableId::EgressMaintenancePoint => OAM,
        TableId::Mpls0 | TableId::Mpls1 | TableId::Mpls2 => MPLS_TP,
        TableId::MplsMaintenancePoint => fields!(LMEP_ID, OAM_Y1731_OPCODE),
        TableId::ColorBasedActions => fields!(COLOR),
        _ => MatchFields::empty(),
    }
}

/// Capability of `table` under the deployment `profile`.
#[must_use]
pub fn capability(profile: Profile, table: TableId) -> MatchFields {
    match profile {
        Profile::Base => capability_of(table),
        Profile::Extended => capability_of(table) | extension_of(table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn extension_is_disjoint_from_base() {
        for table in TableId::iter() {
            assert!(
                (capability_of(table) & extension_of(table)).is_empty(),
                "{table}"
            );
            assert!(capability(Profile::Extended, table).contains(capability_of(table)));
            assert_eq!(capability(Profile::Base, table), capability_of(table));
        }
    }

    #[test]
    fn acl_policy_ports() {
        let acl = capability_of(TableId::AclPolicy);
        assert!(acl.contains(MatchFields::TCP_DST | MatchFields::SCTP_SRC));
        assert!(!acl.contains(MatchFields::MPLS_LABEL));
        assert!(!capability_of(TableId::Vlan).contains(MatchFields::ETH_DST));
    }
}
