// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN id encodings and tag protocol identifiers.
//!
//! Match requests carry the VLAN id as a 13 bit quantity: the low 12 bits are the id itself
//! and bit 12 ([`VID_PRESENT`]) states that a tag is present at all.

use crate::ethtype::EthType;

/// "A VLAN tag is present" bit of the 13 bit match encoding.
pub const VID_PRESENT: u16 = 0x1000;
/// Mask selecting the 12 bit VLAN id.
pub const VID_EXACT_MASK: u16 = 0x0fff;
/// Mask selecting both the presence bit and the VLAN id.
pub const VID_FIELD_MASK: u16 = VID_PRESENT | VID_EXACT_MASK;

/// Extract the 12 bit VLAN id from a (possibly presence-flagged) value.
#[must_use]
pub const fn vid_bits(value: u16) -> u16 {
    value & VID_EXACT_MASK
}

/// Tag protocol identifier accepted when pushing a VLAN header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tpid {
    /// 802.1Q customer tag
    CTag,
    /// 802.1ad service tag
    STag,
}

/// Error returned when a raw ethertype is not a supported [`Tpid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ethertype {0:#06x} is not a VLAN tag protocol identifier")]
pub struct InvalidTpid(pub u16);

impl Tpid {
    /// The ethertype announcing this tag.
    #[must_use]
    pub const fn ethtype(self) -> EthType {
        match self {
            Tpid::CTag => EthType::VLAN,
            Tpid::STag => EthType::VLAN_QINQ,
        }
    }
}

impl TryFrom<u16> for Tpid {
    type Error = InvalidTpid;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match EthType::new(value) {
            EthType::VLAN => Ok(Tpid::CTag),
            EthType::VLAN_QINQ => Ok(Tpid::STag),
            _ => Err(InvalidTpid(value)),
        }
    }
}

impl From<Tpid> for u16 {
    fn from(value: Tpid) -> Self {
        value.ethtype().raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tpid_accepts_only_tag_ethertypes() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|raw: u16| match Tpid::try_from(raw) {
                Ok(tpid) => assert_eq!(u16::from(tpid), raw),
                Err(InvalidTpid(x)) => {
                    assert_eq!(x, raw);
                    assert!(raw != 0x8100 && raw != 0x88a8);
                }
            });
    }

    #[test]
    fn vid_bits_strip_presence() {
        assert_eq!(vid_bits(10 | VID_PRESENT), 10);
        assert_eq!(VID_FIELD_MASK, 0x1fff);
    }
}
