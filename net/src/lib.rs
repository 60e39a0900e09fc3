// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![forbid(unsafe_code)] // Validation logic should always be strictly safe
#![deny(missing_docs, clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Value types shared by the wire-protocol model and the hardware flow model:
//! MAC addresses, masked match values, VLAN id encodings and protocol numbers.

pub mod ethtype;
pub mod ipproto;
pub mod mac;
pub mod masked;
pub mod vlan;

pub use ethtype::EthType;
pub use ipproto::IpProto;
pub use mac::Mac;
pub use masked::{MaskValue, Masked};
