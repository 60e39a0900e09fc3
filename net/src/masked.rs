// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Value/mask pairs as used by every match dimension.

use crate::mac::Mac;
use std::fmt::{Debug, Display};
use std::net::{Ipv4Addr, Ipv6Addr};

/// A type which can be used as the value (and the mask) of a match dimension.
pub trait MaskValue: Copy + Eq + Debug {
    /// The all-zeros value. As a mask it means "wildcard".
    const ZERO: Self;
    /// The all-ones value. As a mask it means "exact match".
    const ALL: Self;
}

macro_rules! mask_value_int {
    ($($t:ty),+) => {
        $(
            impl MaskValue for $t {
                const ZERO: Self = 0;
                const ALL: Self = <$t>::MAX;
            }
        )+
    };
}

mask_value_int!(u8, u16, u32, u64);

impl MaskValue for Mac {
    const ZERO: Self = Mac::ZERO;
    const ALL: Self = Mac::BROADCAST;
}

impl MaskValue for Ipv4Addr {
    const ZERO: Self = Ipv4Addr::UNSPECIFIED;
    const ALL: Self = Ipv4Addr::BROADCAST;
}

impl MaskValue for Ipv6Addr {
    const ZERO: Self = Ipv6Addr::UNSPECIFIED;
    const ALL: Self = Ipv6Addr::from_bits(u128::MAX);
}

/// A `(value, mask)` pair.
///
/// A zero mask means the dimension does not take part in the match. The pair is stored
/// verbatim: no normalization of the value against the mask happens here, because some
/// dimensions (IP addresses in particular) give meaning to a non-zero value carried with
/// a zero mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Masked<T> {
    /// The match value
    pub value: T,
    /// The bit mask applied to the value
    pub mask: T,
}

impl<T: MaskValue> Masked<T> {
    /// The wildcard pair: zero value, zero mask.
    pub const ANY: Self = Self {
        value: T::ZERO,
        mask: T::ZERO,
    };

    /// A pair with an explicit mask.
    #[must_use]
    pub const fn new(value: T, mask: T) -> Self {
        Self { value, mask }
    }

    /// An exact match on `value` (all-ones mask).
    #[must_use]
    pub const fn exact(value: T) -> Self {
        Self {
            value,
            mask: T::ALL,
        }
    }

    /// True iff the mask is not all zeros.
    #[must_use]
    pub fn is_masked(&self) -> bool {
        self.mask != T::ZERO
    }

    /// True iff the value is not all zeros.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value != T::ZERO
    }

    /// True iff the mask is all ones.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.mask == T::ALL
    }

    /// True iff neither value nor mask carry any bit.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        !self.is_masked() && !self.has_value()
    }
}

impl<T: MaskValue> Default for Masked<T> {
    fn default() -> Self {
        Self::ANY
    }
}

impl<T: MaskValue + Display> Display for Masked<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_exact() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{}/{}", self.value, self.mask)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_any() {
        let m = Masked::exact(80u16);
        assert!(m.is_exact() && m.is_masked());
        assert_eq!(m.mask, 0xffff);
        assert!(Masked::<u16>::default().is_wildcard());
        assert_eq!(Masked::<Mac>::ANY.mask, Mac::ZERO);
    }

    #[test]
    fn address_value_without_mask_is_not_wildcard() {
        let m = Masked::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::UNSPECIFIED);
        assert!(!m.is_masked());
        assert!(m.has_value());
        assert!(!m.is_wildcard());
    }

    #[test]
    fn display() {
        let host = Masked::exact(Ipv4Addr::new(10, 1, 2, 3));
        assert_eq!(host.to_string(), "10.1.2.3");
        let net = Masked::new(Ipv4Addr::new(10, 0, 0, 0), Ipv4Addr::new(255, 0, 0, 0));
        assert_eq!(net.to_string(), "10.0.0.0/255.0.0.0");
        assert_eq!(Masked::exact(Ipv6Addr::LOCALHOST).mask, Ipv6Addr::ALL);
    }
}
