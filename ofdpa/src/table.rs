// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Identifiers of the tables of the hardware pipeline.

use crate::status::OfdpaError;

/// The tables of the pipeline, with their hardware numbers.
///
/// Tables numbered 200 and above belong to the egress half of the pipeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum TableId {
    IngressPort = 0,
    PortDscpTrust = 5,
    PortPcpTrust = 6,
    TunnelDscpTrust = 7,
    TunnelPcpTrust = 8,
    Vlan = 10,
    Vlan1 = 11,
    MaintenancePoint = 12,
    MplsL2Port = 13,
    MplsDscpTrust = 15,
    MplsPcpTrust = 16,
    TerminationMac = 20,
    Mpls0 = 23,
    Mpls1 = 24,
    Mpls2 = 25,
    MplsMaintenancePoint = 26,
    UnicastRouting = 30,
    MulticastRouting = 40,
    Bridging = 50,
    AclPolicy = 60,
    ColorBasedActions = 65,
    EgressVlan = 210,
    EgressVlan1 = 211,
    EgressMaintenancePoint = 226,
}

/// First table number of the egress half of the pipeline.
pub const EGRESS_TABLE_BASE: u8 = 200;

impl TableId {
    /// The hardware table number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// True for the tables of the egress half of the pipeline.
    #[must_use]
    pub const fn is_egress(self) -> bool {
        self.number() >= EGRESS_TABLE_BASE
    }

    /// True for the six `QoS` trust tables, which share one match layout.
    #[must_use]
    pub const fn is_trust(self) -> bool {
        matches!(
            self,
            TableId::PortDscpTrust
                | TableId::PortPcpTrust
                | TableId::TunnelDscpTrust
                | TableId::TunnelPcpTrust
                | TableId::MplsDscpTrust
                | TableId::MplsPcpTrust
        )
    }

    /// True for the three MPLS label tables.
    #[must_use]
    pub const fn is_mpls(self) -> bool {
        matches!(self, TableId::Mpls0 | TableId::Mpls1 | TableId::Mpls2)
    }

    /// True for the maintenance-point (OAM) tables, which may punt to the local agent.
    #[must_use]
    pub const fn is_maintenance_point(self) -> bool {
        matches!(
            self,
            TableId::MaintenancePoint
                | TableId::MplsMaintenancePoint
                | TableId::EgressMaintenancePoint
        )
    }
}

impl TryFrom<u8> for TableId {
    type Error = OfdpaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => TableId::IngressPort,
            5 => TableId::PortDscpTrust,
            6 => TableId::PortPcpTrust,
            7 => TableId::TunnelDscpTrust,
            8 => TableId::TunnelPcpTrust,
            10 => TableId::Vlan,
            11 => TableId::Vlan1,
            12 => TableId::MaintenancePoint,
            13 => TableId::MplsL2Port,
            15 => TableId::MplsDscpTrust,
            16 => TableId::MplsPcpTrust,
            20 => TableId::TerminationMac,
            23 => TableId::Mpls0,
            24 => TableId::Mpls1,
            25 => TableId::Mpls2,
            26 => TableId::MplsMaintenancePoint,
            30 => TableId::UnicastRouting,
            40 => TableId::MulticastRouting,
            50 => TableId::Bridging,
            60 => TableId::AclPolicy,
            65 => TableId::ColorBasedActions,
            210 => TableId::EgressVlan,
            211 => TableId::EgressVlan1,
            226 => TableId::EgressMaintenancePoint,
            _ => return Err(OfdpaError::Param),
        })
    }
}

impl From<TableId> for u8 {
    fn from(value: TableId) -> Self {
        value.number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn table_numbers_convert_both_ways() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|raw: u8| match TableId::try_from(raw) {
                Ok(table) => assert_eq!(table.number(), raw),
                Err(e) => {
                    assert_eq!(e, OfdpaError::Param);
                    assert!(TableId::iter().all(|t| t.number() != raw));
                }
            });
    }

    #[test]
    fn fixed_table_list() {
        assert_eq!(TableId::COUNT, 24);
        assert_eq!(TableId::iter().filter(|t| t.is_trust()).count(), 6);
        assert_eq!(TableId::iter().filter(|t| t.is_egress()).count(), 3);
        let oam: Vec<u8> = TableId::iter()
            .filter(|t| t.is_maintenance_point())
            .map(TableId::number)
            .collect();
        assert_eq!(oam, [12, 26, 226]);
        assert!(TableId::iter().is_sorted());
        assert_eq!(TableId::TerminationMac.to_string(), "termination_mac");
    }
}
