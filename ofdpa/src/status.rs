// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Status codes returned by the hardware SDK.

/// A failed SDK call. Success is `Ok(_)`; the numeric codes are the SDK's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum OfdpaError {
    #[error("RPC failure talking to the SDK")]
    Rpc,
    #[error("internal SDK error")]
    Internal,
    #[error("invalid parameter")]
    Param,
    #[error("generic SDK error")]
    Error,
    #[error("table full")]
    Full,
    #[error("entry already exists")]
    Exists,
    #[error("operation timed out")]
    Timeout,
    #[error("operation failed")]
    Fail,
    #[error("feature disabled")]
    Disabled,
    #[error("feature unavailable")]
    Unavail,
    #[error("entry not found")]
    NotFound,
    #[error("no more entries")]
    Empty,
    #[error("request incompatible with the table")]
    Compat,
    #[error("unrecognized SDK status {0}")]
    Other(i32),
}

impl OfdpaError {
    /// Successful completion
    pub const E_NONE: i32 = 0;
    pub const E_RPC: i32 = -20;
    pub const E_INTERNAL: i32 = -21;
    pub const E_PARAM: i32 = -22;
    pub const E_ERROR: i32 = -23;
    pub const E_FULL: i32 = -24;
    pub const E_EXISTS: i32 = -25;
    pub const E_TIMEOUT: i32 = -26;
    pub const E_FAIL: i32 = -27;
    pub const E_DISABLED: i32 = -28;
    pub const E_UNAVAIL: i32 = -29;
    pub const E_NOT_FOUND: i32 = -30;
    pub const E_EMPTY: i32 = -31;
    /// Not part of the SDK's own range: used by the agent to report compat rejections.
    pub const E_COMPAT: i32 = -32;

    /// Interpret a raw SDK status.
    ///
    /// # Errors
    ///
    /// Every code except [`OfdpaError::E_NONE`] is an error.
    pub fn from_code(code: i32) -> Result<(), OfdpaError> {
        Err(match code {
            OfdpaError::E_NONE => return Ok(()),
            OfdpaError::E_RPC => OfdpaError::Rpc,
            OfdpaError::E_INTERNAL => OfdpaError::Internal,
            OfdpaError::E_PARAM => OfdpaError::Param,
            OfdpaError::E_ERROR => OfdpaError::Error,
            OfdpaError::E_FULL => OfdpaError::Full,
            OfdpaError::E_EXISTS => OfdpaError::Exists,
            OfdpaError::E_TIMEOUT => OfdpaError::Timeout,
            OfdpaError::E_FAIL => OfdpaError::Fail,
            OfdpaError::E_DISABLED => OfdpaError::Disabled,
            OfdpaError::E_UNAVAIL => OfdpaError::Unavail,
            OfdpaError::E_NOT_FOUND => OfdpaError::NotFound,
            OfdpaError::E_EMPTY => OfdpaError::Empty,
            OfdpaError::E_COMPAT => OfdpaError::Compat,
            other => OfdpaError::Other(other),
        })
    }

    /// The raw SDK status of this error.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            OfdpaError::Rpc => OfdpaError::E_RPC,
            OfdpaError::Internal => OfdpaError::E_INTERNAL,
            OfdpaError::Param => OfdpaError::E_PARAM,
            OfdpaError::Error => OfdpaError::E_ERROR,
            OfdpaError::Full => OfdpaError::E_FULL,
            OfdpaError::Exists => OfdpaError::E_EXISTS,
            OfdpaError::Timeout => OfdpaError::E_TIMEOUT,
            OfdpaError::Fail => OfdpaError::E_FAIL,
            OfdpaError::Disabled => OfdpaError::E_DISABLED,
            OfdpaError::Unavail => OfdpaError::E_UNAVAIL,
            OfdpaError::NotFound => OfdpaError::E_NOT_FOUND,
            OfdpaError::Empty => OfdpaError::E_EMPTY,
            OfdpaError::Compat => OfdpaError::E_COMPAT,
            OfdpaError::Other(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OfdpaError;

    #[test]
    fn codes_convert_both_ways() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|code: i32| match OfdpaError::from_code(code) {
                Ok(()) => assert_eq!(code, OfdpaError::E_NONE),
                Err(e) => assert_eq!(e.code(), code),
            });
    }

    #[test]
    fn named_codes() {
        assert_eq!(OfdpaError::from_code(-30), Err(OfdpaError::NotFound));
        assert_eq!(OfdpaError::from_code(-29), Err(OfdpaError::Unavail));
        assert_eq!(OfdpaError::from_code(-99), Err(OfdpaError::Other(-99)));
    }
}
