// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! `OXM` type-length-value items carried by set-field actions.
//!
//! The payload of an [`OxmTlv`] is kept in network byte order exactly as received. It is
//! turned into a typed [`SetField`] with [`SetField::decode`], which checks the length the
//! field requires.

use net::Mac;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Fields a set-field action may name: the `OpenFlow` basic class plus the `OF-DPA`
/// experimenter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum OxmField {
    InPort,
    EthDst,
    EthSrc,
    EthType,
    VlanVid,
    VlanPcp,
    IpDscp,
    IpEcn,
    IpProto,
    Ipv4Src,
    Ipv4Dst,
    Ipv6Src,
    Ipv6Dst,
    TcpSrc,
    TcpDst,
    UdpSrc,
    UdpDst,
    MplsLabel,
    MplsTc,
    MplsBos,
    TunnelId,
    Vrf,
    TrafficClass,
    Color,
    QosIndex,
    LmepId,
    MplsL2Port,
    Ovid,
    MplsType,
}

impl OxmField {
    /// Payload length (in octets) of an unmasked item of this field.
    #[must_use]
    pub const fn payload_len(self) -> usize {
        match self {
            OxmField::VlanPcp
            | OxmField::IpDscp
            | OxmField::IpEcn
            | OxmField::IpProto
            | OxmField::MplsTc
            | OxmField::MplsBos
            | OxmField::TrafficClass
            | OxmField::Color
            | OxmField::QosIndex => 1,
            OxmField::EthType
            | OxmField::VlanVid
            | OxmField::TcpSrc
            | OxmField::TcpDst
            | OxmField::UdpSrc
            | OxmField::UdpDst
            | OxmField::Vrf
            | OxmField::Ovid
            | OxmField::MplsType => 2,
            OxmField::InPort
            | OxmField::Ipv4Src
            | OxmField::Ipv4Dst
            | OxmField::MplsLabel
            | OxmField::LmepId
            | OxmField::MplsL2Port => 4,
            OxmField::EthDst | OxmField::EthSrc => 6,
            OxmField::TunnelId => 8,
            OxmField::Ipv6Src | OxmField::Ipv6Dst => 16,
        }
    }
}

/// A raw `OXM` item: the field it names and its network-order payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OxmTlv {
    /// The field being set
    pub field: OxmField,
    /// The value, big endian
    pub payload: Vec<u8>,
}

/// Errors decoding an [`OxmTlv`] payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OxmDecodeError {
    #[error("empty payload for field {0}")]
    Empty(OxmField),
    #[error("payload of field {field} has length {got}, expected {expected}")]
    BadLength {
        field: OxmField,
        expected: usize,
        got: usize,
    },
}

/// A decoded set-field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetField {
    InPort(u32),
    EthDst(Mac),
    EthSrc(Mac),
    EthType(u16),
    VlanVid(u16),
    VlanPcp(u8),
    IpDscp(u8),
    IpEcn(u8),
    IpProto(u8),
    Ipv4Src(Ipv4Addr),
    Ipv4Dst(Ipv4Addr),
    Ipv6Src(Ipv6Addr),
    Ipv6Dst(Ipv6Addr),
    TcpSrc(u16),
    TcpDst(u16),
    UdpSrc(u16),
    UdpDst(u16),
    MplsLabel(u32),
    MplsTc(u8),
    MplsBos(u8),
    TunnelId(u64),
    Vrf(u16),
    TrafficClass(u8),
    Color(u8),
    QosIndex(u8),
    LmepId(u32),
    MplsL2Port(u32),
    Ovid(u16),
    MplsType(u16),
}

fn array<const N: usize>(payload: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&payload[..N]);
    out
}

impl SetField {
    /// Decode the payload of `tlv` according to its field.
    ///
    /// # Errors
    ///
    /// Fails if the payload is empty or its length does not match [`OxmField::payload_len`].
    pub fn decode(tlv: &OxmTlv) -> Result<SetField, OxmDecodeError> {
        let field = tlv.field;
        let p = tlv.payload.as_slice();
        if p.is_empty() {
            return Err(OxmDecodeError::Empty(field));
        }
        if p.len() != field.payload_len() {
            return Err(OxmDecodeError::BadLength {
                field,
                expected: field.payload_len(),
                got: p.len(),
            });
        }
        let u16_ = || u16::from_be_bytes(array(p));
        let u32_ = || u32::from_be_bytes(array(p));
        Ok(match field {
            OxmField::InPort => SetField::InPort(u32_()),
            OxmField::EthDst => SetField::EthDst(Mac(array(p))),
            OxmField::EthSrc => SetField::EthSrc(Mac(array(p))),
            OxmField::EthType => SetField::EthType(u16_()),
            OxmField::VlanVid => SetField::VlanVid(u16_()),
            OxmField::VlanPcp => SetField::VlanPcp(p[0]),
            OxmField::IpDscp => SetField::IpDscp(p[0]),
            OxmField::IpEcn => SetField::IpEcn(p[0]),
            OxmField::IpProto => SetField::IpProto(p[0]),
            OxmField::Ipv4Src => SetField::Ipv4Src(Ipv4Addr::from(u32_())),
            OxmField::Ipv4Dst => SetField::Ipv4Dst(Ipv4Addr::from(u32_())),
            OxmField::Ipv6Src => SetField::Ipv6Src(Ipv6Addr::from(array::<16>(p))),
            OxmField::Ipv6Dst => SetField::Ipv6Dst(Ipv6Addr::from(array::<16>(p))),
            OxmField::TcpSrc => SetField::TcpSrc(u16_()),
            OxmField::TcpDst => SetField::TcpDst(u16_()),
            OxmField::UdpSrc => SetField::UdpSrc(u16_()),
            OxmField::UdpDst => SetField::UdpDst(u16_()),
            OxmField::MplsLabel => SetField::MplsLabel(u32_()),
            OxmField::MplsTc => SetField::MplsTc(p[0]),
            OxmField::MplsBos => SetField::MplsBos(p[0]),
            OxmField::TunnelId => SetField::TunnelId(u64::from_be_bytes(array(p))),
            OxmField::Vrf => SetField::Vrf(u16_()),
            OxmField::TrafficClass => SetField::TrafficClass(p[0]),
            OxmField::Color => SetField::Color(p[0]),
            OxmField::QosIndex => SetField::QosIndex(p[0]),
            OxmField::LmepId => SetField::LmepId(u32_()),
            OxmField::MplsL2Port => SetField::MplsL2Port(u32_()),
            OxmField::Ovid => SetField::Ovid(u16_()),
            OxmField::MplsType => SetField::MplsType(u16_()),
        })
    }

    /// The field this value belongs to.
    #[must_use]
    pub fn field(&self) -> OxmField {
        match self {
            SetField::InPort(_) => OxmField::InPort,
            SetField::EthDst(_) => OxmField::EthDst,
            SetField::EthSrc(_) => OxmField::EthSrc,
            SetField::EthType(_) => OxmField::EthType,
            SetField::VlanVid(_) => OxmField::VlanVid,
            SetField::VlanPcp(_) => OxmField::VlanPcp,
            SetField::IpDscp(_) => OxmField::IpDscp,
            SetField::IpEcn(_) => OxmField::IpEcn,
            SetField::IpProto(_) => OxmField::IpProto,
            SetField::Ipv4Src(_) => OxmField::Ipv4Src,
            SetField::Ipv4Dst(_) => OxmField::Ipv4Dst,
            SetField::Ipv6Src(_) => OxmField::Ipv6Src,
            SetField::Ipv6Dst(_) => OxmField::Ipv6Dst,
            SetField::TcpSrc(_) => OxmField::TcpSrc,
            SetField::TcpDst(_) => OxmField::TcpDst,
            SetField::UdpSrc(_) => OxmField::UdpSrc,
            SetField::UdpDst(_) => OxmField::UdpDst,
            SetField::MplsLabel(_) => OxmField::MplsLabel,
            SetField::MplsTc(_) => OxmField::MplsTc,
            SetField::MplsBos(_) => OxmField::MplsBos,
            SetField::TunnelId(_) => OxmField::TunnelId,
            SetField::Vrf(_) => OxmField::Vrf,
            SetField::TrafficClass(_) => OxmField::TrafficClass,
            SetField::Color(_) => OxmField::Color,
            SetField::QosIndex(_) => OxmField::QosIndex,
            SetField::LmepId(_) => OxmField::LmepId,
            SetField::MplsL2Port(_) => OxmField::MplsL2Port,
            SetField::Ovid(_) => OxmField::Ovid,
            SetField::MplsType(_) => OxmField::MplsType,
        }
    }

    fn payload(&self) -> Vec<u8> {
        match *self {
            SetField::VlanPcp(v)
            | SetField::IpDscp(v)
            | SetField::IpEcn(v)
            | SetField::IpProto(v)
            | SetField::MplsTc(v)
            | SetField::MplsBos(v)
            | SetField::TrafficClass(v)
            | SetField::Color(v)
            | SetField::QosIndex(v) => vec![v],
            SetField::EthType(v)
            | SetField::VlanVid(v)
            | SetField::TcpSrc(v)
            | SetField::TcpDst(v)
            | SetField::UdpSrc(v)
            | SetField::UdpDst(v)
            | SetField::Vrf(v)
            | SetField::Ovid(v)
            | SetField::MplsType(v) => v.to_be_bytes().to_vec(),
            SetField::InPort(v)
            | SetField::MplsLabel(v)
            | SetField::LmepId(v)
            | SetField::MplsL2Port(v) => v.to_be_bytes().to_vec(),
            SetField::Ipv4Src(a) | SetField::Ipv4Dst(a) => a.octets().to_vec(),
            SetField::Ipv6Src(a) | SetField::Ipv6Dst(a) => a.octets().to_vec(),
            SetField::EthDst(m) | SetField::EthSrc(m) => m.0.to_vec(),
            SetField::TunnelId(v) => v.to_be_bytes().to_vec(),
        }
    }
}

impl From<SetField> for OxmTlv {
    fn from(value: SetField) -> Self {
        OxmTlv {
            field: value.field(),
            payload: value.payload(),
        }
    }
}
