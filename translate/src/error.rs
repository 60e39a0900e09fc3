// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Errors of the translator and their mapping to `OpenFlow` errors.
//!
//! SDK statuses are turned into [`XlateError`] in exactly one place, the
//! [`From<OfdpaError>`](XlateError#impl-From<OfdpaError>-for-XlateError) implementation.

use crate::presence::MatchFields;
use net::IpProto;
use ofdpa::{OfdpaError, TableId};
use openflow::errors::{
    BadActionCode, BadInstructionCode, BadMatchCode, BadRequestCode, FlowModFailedCode,
    TableModFailedCode,
};
use openflow::{ActionKind, InstructionKind, OfpError, OxmDecodeError, OxmField, PortNo, Version};

/// A request that is well formed but cannot be expressed on the target table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompatError {
    #[error("table {table} cannot match on {fields:?}")]
    FieldsNotSupported {
        table: TableId,
        fields: MatchFields,
    },
    #[error("matching on {field} requires ip_proto {expected} ({}), got {}", .expected.raw(), fmt_proto(.got))]
    Prerequisite {
        field: &'static str,
        expected: IpProto,
        got: Option<u8>,
    },
    #[error("table {table} cannot match on {fields} at the same time")]
    ConflictingFields {
        table: TableId,
        fields: &'static str,
    },
    #[error("unsupported VLAN id encoding {value:#06x}/{mask:#06x}")]
    UnsupportedVlanEncoding { value: u16, mask: u16 },
    #[error("instruction {instruction} not allowed on table {table}")]
    InstructionNotAllowed {
        instruction: InstructionKind,
        table: TableId,
    },
    #[error("instruction {0} given more than once")]
    DuplicateInstruction(InstructionKind),
    #[error("goto from table {from} to table {to} does not move forward")]
    InvalidGotoTarget { from: TableId, to: TableId },
    #[error("action {action} not allowed in {list} on table {table}")]
    ActionNotAllowed {
        action: ActionKind,
        list: InstructionKind,
        table: TableId,
    },
    #[error("output to {port} not allowed on table {table}")]
    OutputNotAllowed { port: PortNo, table: TableId },
    #[error("output to logical port {0} requires a tunnel id match")]
    MissingTunnelId(u32),
    #[error("cannot push a VLAN tag with ethertype {0:#06x}")]
    BadPushEthertype(u16),
    #[error("table {0} cannot push more than one VLAN tag")]
    DoublePush(TableId),
    #[error("malformed set-field: {0}")]
    MalformedSetField(#[from] OxmDecodeError),
    #[error("set-field of {field} not allowed on table {table}")]
    SetFieldNotAllowed { field: OxmField, table: TableId },
    #[error("queue {0} out of range")]
    BadQueue(u32),
    #[error("flow lives in table {stored}, request targets table {requested}")]
    TableMismatch { stored: TableId, requested: TableId },
    #[error("rejected by the hardware as incompatible")]
    Rejected,
}

#[allow(clippy::ref_option)]
fn fmt_proto(proto: &Option<u8>) -> String {
    proto.map_or_else(|| "none".to_string(), |p| IpProto::new(p).to_string())
}

/// An invalid identifier supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown table id {0}")]
    UnknownTable(u8),
    #[error("unknown goto target table {0}")]
    UnknownGotoTable(u8),
    #[error("submitting to the pipeline requires a concrete ingress port, got {0}")]
    InPortRequired(PortNo),
    #[error("invalid parameter reported by the hardware")]
    Rejected,
}

/// A recognized feature this translator does not implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Unsupported {
    #[error("table-mod")]
    TableMod,
    #[error("experimenter messages")]
    Experimenter,
    #[error("experimenter instructions")]
    ExperimenterInstruction,
    #[error("changing the pipeline")]
    PipelineSet,
    #[error("buffered packet-out (buffer {0:#x})")]
    BufferedPacketOut(u32),
    #[error("output to {0}")]
    OutputPort(PortNo),
    #[error("action {0} in packet-out")]
    PacketOutAction(ActionKind),
    #[error("{0}")]
    Hardware(OfdpaError),
}

/// Errors returned by the translator entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XlateError {
    #[error("protocol version {version} not supported, minimum is {minimum}")]
    VersionUnsupported { version: Version, minimum: Version },
    #[error("incompatible request: {0}")]
    Compat(#[from] CompatError),
    #[error("invalid parameter: {0}")]
    Param(#[from] ParamError),
    #[error("not supported: {0}")]
    NotSupported(#[from] Unsupported),
    #[error("flow not found")]
    NotFound,
    #[error("out of resources: {0}")]
    Resource(String),
    #[error("hardware error: {0}")]
    Unknown(OfdpaError),
}

impl From<OfdpaError> for XlateError {
    fn from(value: OfdpaError) -> Self {
        match value {
            OfdpaError::NotFound => XlateError::NotFound,
            OfdpaError::Compat => XlateError::Compat(CompatError::Rejected),
            OfdpaError::Param => XlateError::Param(ParamError::Rejected),
            OfdpaError::Unavail | OfdpaError::Disabled => {
                XlateError::NotSupported(Unsupported::Hardware(value))
            }
            OfdpaError::Full => XlateError::Resource(value.to_string()),
            OfdpaError::Rpc
            | OfdpaError::Internal
            | OfdpaError::Error
            | OfdpaError::Exists
            | OfdpaError::Timeout
            | OfdpaError::Fail
            | OfdpaError::Empty
            | OfdpaError::Other(_) => XlateError::Unknown(value),
        }
    }
}

impl CompatError {
    fn ofp_error(&self) -> OfpError {
        match self {
            CompatError::FieldsNotSupported { .. } | CompatError::ConflictingFields { .. } => {
                OfpError::BadMatch(BadMatchCode::BadField)
            }
            CompatError::Prerequisite { .. } => OfpError::BadMatch(BadMatchCode::BadPrereq),
            CompatError::UnsupportedVlanEncoding { .. } => {
                OfpError::BadMatch(BadMatchCode::BadValue)
            }
            CompatError::InstructionNotAllowed { .. } | CompatError::DuplicateInstruction(_) => {
                OfpError::BadInstruction(BadInstructionCode::UnsupInst)
            }
            CompatError::InvalidGotoTarget { .. } => {
                OfpError::BadInstruction(BadInstructionCode::BadTableId)
            }
            CompatError::ActionNotAllowed { .. } => OfpError::BadAction(BadActionCode::BadType),
            CompatError::OutputNotAllowed { .. } => OfpError::BadAction(BadActionCode::BadOutPort),
            CompatError::MissingTunnelId(_) => {
                OfpError::BadAction(BadActionCode::MatchInconsistent)
            }
            CompatError::BadPushEthertype(_) => OfpError::BadAction(BadActionCode::BadArgument),
            CompatError::DoublePush(_) => OfpError::BadAction(BadActionCode::TooMany),
            CompatError::MalformedSetField(_) => OfpError::BadAction(BadActionCode::BadSetLen),
            CompatError::SetFieldNotAllowed { .. } => {
                OfpError::BadAction(BadActionCode::BadSetType)
            }
            CompatError::BadQueue(_) => OfpError::BadAction(BadActionCode::BadQueue),
            CompatError::TableMismatch { .. } => {
                OfpError::FlowModFailed(FlowModFailedCode::BadTableId)
            }
            CompatError::Rejected => OfpError::FlowModFailed(FlowModFailedCode::Unknown),
        }
    }
}

impl XlateError {
    /// The `OpenFlow` error reported to the controller for this failure.
    #[must_use]
    pub fn ofp_error(&self) -> OfpError {
        match self {
            XlateError::VersionUnsupported { .. } => {
                OfpError::BadRequest(BadRequestCode::BadVersion)
            }
            XlateError::Compat(compat) => compat.ofp_error(),
            XlateError::Param(ParamError::UnknownTable(_)) => {
                OfpError::FlowModFailed(FlowModFailedCode::BadTableId)
            }
            XlateError::Param(ParamError::UnknownGotoTable(_)) => {
                OfpError::BadInstruction(BadInstructionCode::BadTableId)
            }
            XlateError::Param(ParamError::InPortRequired(_)) => {
                OfpError::BadRequest(BadRequestCode::BadPort)
            }
            XlateError::Param(ParamError::Rejected) => OfpError::BadRequest(BadRequestCode::Eperm),
            XlateError::NotSupported(what) => match what {
                Unsupported::TableMod => OfpError::TableModFailed(TableModFailedCode::Eperm),
                Unsupported::Experimenter => {
                    OfpError::BadRequest(BadRequestCode::BadExperimenter)
                }
                Unsupported::ExperimenterInstruction => {
                    OfpError::BadInstruction(BadInstructionCode::BadExperimenter)
                }
                Unsupported::BufferedPacketOut(_) => {
                    OfpError::BadRequest(BadRequestCode::BufferUnknown)
                }
                Unsupported::OutputPort(_) => OfpError::BadAction(BadActionCode::BadOutPort),
                Unsupported::PacketOutAction(_) => OfpError::BadAction(BadActionCode::BadType),
                Unsupported::PipelineSet | Unsupported::Hardware(_) => {
                    OfpError::BadRequest(BadRequestCode::Eperm)
                }
            },
            XlateError::NotFound | XlateError::Unknown(_) => {
                OfpError::FlowModFailed(FlowModFailedCode::Unknown)
            }
            XlateError::Resource(_) => OfpError::FlowModFailed(FlowModFailedCode::TableFull),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_is_total() {
        bolero::check!().with_type().cloned().for_each(|code: i32| {
            if let Err(status) = OfdpaError::from_code(code) {
                let mapped = XlateError::from(status);
                match status {
                    OfdpaError::NotFound => assert_eq!(mapped, XlateError::NotFound),
                    OfdpaError::Compat => {
                        assert_eq!(mapped, XlateError::Compat(CompatError::Rejected));
                    }
                    OfdpaError::Param => assert!(matches!(mapped, XlateError::Param(_))),
                    OfdpaError::Unavail | OfdpaError::Disabled => {
                        assert!(matches!(mapped, XlateError::NotSupported(_)));
                    }
                    OfdpaError::Full => assert!(matches!(mapped, XlateError::Resource(_))),
                    other => assert_eq!(mapped, XlateError::Unknown(other)),
                }
            }
        });
    }

    #[test]
    fn ofp_errors() {
        let e = XlateError::Compat(CompatError::Prerequisite {
            field: "tcp_dst",
            expected: IpProto::TCP,
            got: None,
        });
        assert_eq!(e.ofp_error(), OfpError::BadMatch(BadMatchCode::BadPrereq));
        assert_eq!(
            e.to_string(),
            "incompatible request: matching on tcp_dst requires ip_proto tcp (6), got none"
        );
        let e = XlateError::from(OfdpaError::Full);
        assert_eq!(
            e.ofp_error(),
            OfpError::FlowModFailed(FlowModFailedCode::TableFull)
        );
        let e = XlateError::NotSupported(Unsupported::OutputPort(PortNo::Flood));
        assert_eq!(e.to_string(), "not supported: output to FLOOD");
    }
}
