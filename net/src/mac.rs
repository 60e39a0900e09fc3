// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Mac address type and logic.

use arrayvec::ArrayVec;
use std::fmt::Display;

/// A [MAC Address] type.
///
/// `Mac` is a transparent wrapper around `[u8; 6]`. In match context the same type is used
/// both for addresses and for the bit masks that go with them.
///
/// [MAC Address]: https://en.wikipedia.org/wiki/MAC_address
#[repr(transparent)]
#[cfg_attr(any(test, feature = "bolero"), derive(bolero::TypeGenerator))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mac(pub [u8; 6]);

/// Errors which can occur while converting a string to a [`Mac`]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MacFromStringError {
    /// Invalid string representation of mac address
    #[error("invalid string representation of mac address: {0}")]
    Invalid(String),
}

impl TryFrom<&str> for Mac {
    type Error = MacFromStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        const OCTETS: usize = 6;
        let invalid = || MacFromStringError::Invalid(value.to_string());
        let parsed = value
            .split(':')
            .try_fold(ArrayVec::<u8, OCTETS>::new(), |mut acc, octet| {
                if octet.len() != 2 || !octet.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid());
                }
                let byte = u8::from_str_radix(octet, 16).map_err(|_| invalid())?;
                acc.try_push(byte).map_err(|_| invalid())?;
                Ok(acc)
            })?;
        parsed.into_inner().map(Mac).map_err(|_| invalid())
    }
}

impl std::str::FromStr for Mac {
    type Err = MacFromStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mac::try_from(s)
    }
}

impl Mac {
    /// The broadcast `Mac`, which doubles as the exact-match mask.
    pub const BROADCAST: Mac = Mac([u8::MAX; 6]);
    /// The zero `Mac`, which doubles as the wildcard mask.
    pub const ZERO: Mac = Mac([0; 6]);
}

impl Display for Mac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_agree() {
        bolero::check!().with_type().for_each(|mac: &Mac| {
            let printed = mac.to_string();
            assert_eq!(Mac::try_from(printed.as_str()), Ok(*mac));
        });
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in [
            "",
            "00:11:22:33:44",
            "00:11:22:33:44:55:66",
            "0:11:22:33:44:55",
            "zz:11:22:33:44:55",
        ] {
            assert!(Mac::try_from(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            "02:AB:cd:00:00:01".parse::<Mac>(),
            Ok(Mac([0x02, 0xab, 0xcd, 0, 0, 1]))
        );
    }
}
