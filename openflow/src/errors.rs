// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! `OpenFlow` error messages (type and code) reported back to the controller.

use std::fmt::Display;

macro_rules! error_codes {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
        #[repr(u16)]
        pub enum $name {
            $($variant = $value),+
        }
    };
}

error_codes!(
    /// Codes of the `BAD_REQUEST` error type
    BadRequestCode {
        BadVersion = 0,
        BadType = 1,
        BadExperimenter = 3,
        Eperm = 5,
        BufferUnknown = 8,
        BadTableId = 9,
        BadPort = 11,
    }
);

error_codes!(
    /// Codes of the `BAD_ACTION` error type
    BadActionCode {
        BadType = 0,
        BadExperimenter = 2,
        BadOutPort = 4,
        BadArgument = 5,
        Eperm = 6,
        TooMany = 7,
        BadQueue = 8,
        BadOutGroup = 9,
        MatchInconsistent = 10,
        UnsupportedOrder = 11,
        BadTag = 12,
        BadSetType = 13,
        BadSetLen = 14,
        BadSetArgument = 15,
    }
);

error_codes!(
    /// Codes of the `BAD_INSTRUCTION` error type
    BadInstructionCode {
        UnknownInst = 0,
        UnsupInst = 1,
        BadTableId = 2,
        UnsupMetadata = 3,
        BadExperimenter = 5,
        Eperm = 8,
    }
);

error_codes!(
    /// Codes of the `BAD_MATCH` error type
    BadMatchCode {
        BadType = 0,
        BadTag = 2,
        BadWildcards = 5,
        BadField = 6,
        BadValue = 7,
        BadMask = 8,
        BadPrereq = 9,
        DupField = 10,
        Eperm = 11,
    }
);

error_codes!(
    /// Codes of the `FLOW_MOD_FAILED` error type
    FlowModFailedCode {
        Unknown = 0,
        TableFull = 1,
        BadTableId = 2,
        Overlap = 3,
        Eperm = 4,
        BadTimeout = 5,
        BadCommand = 6,
    }
);

error_codes!(
    /// Codes of the `TABLE_MOD_FAILED` error type
    TableModFailedCode {
        BadTable = 0,
        BadConfig = 1,
        Eperm = 2,
    }
);

/// An `OpenFlow` error, as the pair (type, code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfpError {
    BadRequest(BadRequestCode),
    BadAction(BadActionCode),
    BadInstruction(BadInstructionCode),
    BadMatch(BadMatchCode),
    FlowModFailed(FlowModFailedCode),
    TableModFailed(TableModFailedCode),
}

impl OfpError {
    /// The numeric error type
    #[must_use]
    pub fn error_type(&self) -> u16 {
        match self {
            OfpError::BadRequest(_) => 1,
            OfpError::BadAction(_) => 2,
            OfpError::BadInstruction(_) => 3,
            OfpError::BadMatch(_) => 4,
            OfpError::FlowModFailed(_) => 5,
            OfpError::TableModFailed(_) => 8,
        }
    }

    /// The numeric error code, meaningful within [`OfpError::error_type`]
    #[must_use]
    pub fn code(&self) -> u16 {
        match *self {
            OfpError::BadRequest(c) => c as u16,
            OfpError::BadAction(c) => c as u16,
            OfpError::BadInstruction(c) => c as u16,
            OfpError::BadMatch(c) => c as u16,
            OfpError::FlowModFailed(c) => c as u16,
            OfpError::TableModFailed(c) => c as u16,
        }
    }
}

impl Display for OfpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfpError::BadRequest(c) => write!(f, "BAD_REQUEST/{c}"),
            OfpError::BadAction(c) => write!(f, "BAD_ACTION/{c}"),
            OfpError::BadInstruction(c) => write!(f, "BAD_INSTRUCTION/{c}"),
            OfpError::BadMatch(c) => write!(f, "BAD_MATCH/{c}"),
            OfpError::FlowModFailed(c) => write!(f, "FLOW_MOD_FAILED/{c}"),
            OfpError::TableModFailed(c) => write!(f, "TABLE_MOD_FAILED/{c}"),
        }
    }
}
