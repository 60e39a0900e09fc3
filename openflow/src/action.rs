// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Actions, as carried in apply/write-actions instructions and packet-out messages.

use crate::oxm::{OxmTlv, SetField};
use crate::port::PortNo;

/// An action. Order within a list matters and is preserved by every consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumDiscriminants)]
#[strum_discriminants(name(ActionKind), derive(Hash, strum::Display))]
pub enum Action {
    /// Output to a port. `max_len` bounds the bytes sent to the controller.
    Output { port: PortNo, max_len: u16 },
    CopyTtlOut,
    CopyTtlIn,
    SetMplsTtl(u8),
    DecMplsTtl,
    /// Push a VLAN tag with the given ethertype.
    PushVlan(u16),
    PopVlan,
    /// Push an MPLS shim with the given ethertype.
    PushMpls(u16),
    /// Pop the outermost MPLS shim; the payload is the ethertype of what follows.
    PopMpls(u16),
    SetQueue(u32),
    Group(u32),
    SetNwTtl(u8),
    DecNwTtl,
    SetField(OxmTlv),
    PushPbb(u16),
    PopPbb,
    /// Experimenter action, identified by its experimenter id.
    Experimenter(u32),
}

impl Action {
    /// The kind of this action, without its payload.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        ActionKind::from(self)
    }

    /// Output to `port` with no length limit towards the controller.
    #[must_use]
    pub fn output(port: PortNo) -> Action {
        Action::Output {
            port,
            max_len: u16::MAX,
        }
    }

    /// A set-field action built from a typed value.
    #[must_use]
    pub fn set_field(value: SetField) -> Action {
        Action::SetField(OxmTlv::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let punt = Action::output(PortNo::Controller);
        assert_eq!(punt.kind(), ActionKind::Output);
        assert_eq!(
            Action::set_field(SetField::VlanVid(3)).kind(),
            ActionKind::SetField
        );
        assert_eq!(ActionKind::PopVlan.to_string(), "PopVlan");
    }
}
