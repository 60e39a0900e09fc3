// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Deployment profiles

use serde::{Deserialize, Serialize};

/// Which match and set-field coverage the target hardware offers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Profile {
    /// The standard table capabilities
    #[default]
    Base,
    /// Standard capabilities plus the OAM, color, LMEP, QoS-index and MPLS-TP fields
    Extended,
}

impl Profile {
    #[must_use]
    pub fn is_extended(self) -> bool {
        self == Profile::Extended
    }
}
