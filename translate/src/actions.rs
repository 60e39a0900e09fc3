// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Translation of action lists into the action section of a hardware flow.

use crate::error::{CompatError, Unsupported, XlateError};
use crate::presence::MatchFields;
use config::Profile;
use net::vlan::{Tpid, vid_bits};
use ofdpa::{FlowActions, OutputPort, TableId};
use openflow::{Action, ActionKind, InstructionKind, OxmTlv, PortNo, SetField};
use tracing::debug;

/// VLAN tags pushed so far by the action list being translated.
///
/// A VLAN id set-field applies to the outer tag before any push and to the pushed tag
/// after one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagState {
    #[default]
    NoTagPushed,
    OneTagPushed,
}

/// What action translation needs to know about the flow being built.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext {
    pub table: TableId,
    /// Match dimensions present in the request
    pub present: MatchFields,
    pub profile: Profile,
}

const fn can_output_to_controller(table: TableId) -> bool {
    table.is_maintenance_point()
        || matches!(
            table,
            TableId::TerminationMac | TableId::Bridging | TableId::AclPolicy
        )
}

const fn can_group(table: TableId) -> bool {
    table.is_mpls()
        || matches!(
            table,
            TableId::MplsL2Port
                | TableId::UnicastRouting
                | TableId::MulticastRouting
                | TableId::Bridging
                | TableId::AclPolicy
        )
}

const fn can_tag(table: TableId) -> bool {
    matches!(
        table,
        TableId::Vlan | TableId::Vlan1 | TableId::EgressVlan | TableId::EgressVlan1
    )
}

const fn is_vlan_ingress(table: TableId) -> bool {
    matches!(table, TableId::Vlan | TableId::Vlan1)
}

/// True iff a set-field of `value` may be programmed on `table`.
fn set_field_allowed(value: &SetField, table: TableId, profile: Profile) -> bool {
    match value {
        SetField::TunnelId(_) | SetField::MplsType(_) => {
            is_vlan_ingress(table) || table.is_mpls()
        }
        SetField::Vrf(_) => {
            table == TableId::IngressPort || is_vlan_ingress(table) || table.is_mpls()
        }
        SetField::VlanVid(_) => can_tag(table),
        SetField::VlanPcp(_) | SetField::IpDscp(_) | SetField::IpEcn(_) => {
            table == TableId::AclPolicy
        }
        SetField::MplsL2Port(_) => is_vlan_ingress(table),
        SetField::Ovid(_) => matches!(table, TableId::Vlan | TableId::EgressVlan),
        SetField::TrafficClass(_) => table.is_trust() || table == TableId::AclPolicy,
        SetField::Color(_) => {
            profile.is_extended() && (table.is_trust() || table == TableId::ColorBasedActions)
        }
        SetField::QosIndex(_) => {
            profile.is_extended() && (table == TableId::MplsL2Port || table.is_mpls())
        }
        SetField::LmepId(_) => {
            profile.is_extended() && (is_vlan_ingress(table) || table.is_mpls())
        }
        _ => false,
    }
}

impl ActionContext {
    #[must_use]
    pub fn new(table: TableId, present: MatchFields, profile: Profile) -> Self {
        Self {
            table,
            present,
            profile,
        }
    }

    fn not_allowed(&self, action: ActionKind, list: InstructionKind) -> XlateError {
        CompatError::ActionNotAllowed {
            action,
            list,
            table: self.table,
        }
        .into()
    }

    /// Translate the actions of one apply or write list into `out`, in wire order.
    ///
    /// # Errors
    ///
    /// Fails on the first action which the table cannot perform. `out` is then left
    /// partially filled and must be discarded.
    pub fn translate(
        &self,
        list: InstructionKind,
        actions: &[Action],
        out: &mut FlowActions,
    ) -> Result<(), XlateError> {
        let table = self.table;
        let mut tags = TagState::default();
        for action in actions {
            debug!("{list} on table {table}: {action:?}");
            match action {
                Action::Output { port, .. } => self.output(list, *port, out)?,
                Action::Group(group) => {
                    if list != InstructionKind::WriteActions || !can_group(table) {
                        return Err(self.not_allowed(ActionKind::Group, list));
                    }
                    out.group_id = Some(*group);
                }
                Action::PushVlan(ethertype) => {
                    if !can_tag(table) {
                        return Err(self.not_allowed(ActionKind::PushVlan, list));
                    }
                    Tpid::try_from(*ethertype)
                        .map_err(|_| CompatError::BadPushEthertype(*ethertype))?;
                    if tags == TagState::OneTagPushed {
                        return Err(CompatError::DoublePush(table).into());
                    }
                    out.push_vlan = Some(*ethertype);
                    tags = TagState::OneTagPushed;
                }
                Action::PopVlan => {
                    if !can_tag(table) {
                        return Err(self.not_allowed(ActionKind::PopVlan, list));
                    }
                    out.pop_vlan = true;
                }
                Action::PopMpls(ethertype) if table.is_mpls() => {
                    out.pop_label = Some(*ethertype);
                }
                Action::DecMplsTtl if table.is_mpls() => out.decrement_ttl = true,
                Action::CopyTtlIn if table.is_mpls() => out.copy_ttl_in = true,
                Action::SetQueue(queue) if table == TableId::AclPolicy => {
                    let queue = u8::try_from(*queue)
                        .ok()
                        .filter(|q| *q <= 7)
                        .ok_or(CompatError::BadQueue(*queue))?;
                    out.queue_id = Some(queue);
                }
                Action::SetField(tlv) => self.set_field(list, tlv, tags, out)?,
                other => return Err(self.not_allowed(other.kind(), list)),
            }
        }
        Ok(())
    }

    fn output(
        &self,
        list: InstructionKind,
        port: PortNo,
        out: &mut FlowActions,
    ) -> Result<(), XlateError> {
        let table = self.table;
        let denied = CompatError::OutputNotAllowed { port, table };
        match port {
            PortNo::Controller if can_output_to_controller(table) => {
                out.output_port = Some(OutputPort::Controller);
            }
            PortNo::Local if table.is_maintenance_point() => {
                out.output_port = Some(OutputPort::Local);
            }
            PortNo::Controller | PortNo::Local | PortNo::Any => return Err(denied.into()),
            PortNo::Flood | PortNo::All | PortNo::Normal | PortNo::InPort | PortNo::Table => {
                return Err(Unsupported::OutputPort(port).into());
            }
            PortNo::Physical(number) => {
                if list != InstructionKind::WriteActions {
                    return Err(self.not_allowed(ActionKind::Output, list));
                }
                match table {
                    TableId::Bridging if !self.present.contains(MatchFields::TUNNEL_ID) => {
                        return Err(CompatError::MissingTunnelId(number).into());
                    }
                    TableId::Bridging | TableId::AclPolicy => {
                        out.output_port = Some(OutputPort::Port(number));
                    }
                    _ => return Err(denied.into()),
                }
            }
        }
        Ok(())
    }

    fn set_field(
        &self,
        list: InstructionKind,
        tlv: &OxmTlv,
        tags: TagState,
        out: &mut FlowActions,
    ) -> Result<(), XlateError> {
        let value = SetField::decode(tlv).map_err(CompatError::from)?;
        if !set_field_allowed(&value, self.table, self.profile) {
            debug!("set-field {} refused in {list}", value.field());
            let refused = CompatError::SetFieldNotAllowed {
                field: value.field(),
                table: self.table,
            };
            return Err(refused.into());
        }
        match value {
            SetField::VlanVid(vid) => match tags {
                TagState::NoTagPushed => out.set_vlan_id = Some(vid_bits(vid)),
                TagState::OneTagPushed => out.set_vlan_id2 = Some(vid_bits(vid)),
            },
            SetField::TunnelId(id) => out.tunnel_id = Some(id),
            SetField::Vrf(vrf) => out.vrf = Some(vrf),
            SetField::VlanPcp(pcp) => out.vlan_pcp = Some(pcp),
            SetField::IpDscp(dscp) => out.dscp = Some(dscp),
            SetField::IpEcn(ecn) => out.ecn = Some(ecn),
            SetField::MplsL2Port(port) => out.mpls_l2_port = Some(port),
            SetField::Ovid(ovid) => out.ovid = Some(ovid),
            SetField::MplsType(kind) => out.mpls_type = Some(kind),
            SetField::TrafficClass(class) => out.traffic_class = Some(class),
            SetField::Color(color) => out.color = Some(color),
            SetField::QosIndex(index) => out.qos_index = Some(index),
            SetField::LmepId(id) => out.lmep_id = Some(id),
            // refused by set_field_allowed
            _ => {}
        }
        Ok(())
    }
}
