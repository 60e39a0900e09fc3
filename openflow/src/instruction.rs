// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Flow instructions.

use crate::action::Action;

/// An instruction of a flow-mod.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumDiscriminants)]
#[strum_discriminants(name(InstructionKind), derive(Hash, strum::Display))]
pub enum Instruction {
    /// Continue processing in the given table.
    GotoTable(u8),
    WriteMetadata { metadata: u64, mask: u64 },
    /// Merge the actions into the action set.
    WriteActions(Vec<Action>),
    /// Execute the actions immediately, in order.
    ApplyActions(Vec<Action>),
    ClearActions,
    Meter(u32),
    /// Experimenter instruction, identified by its experimenter id.
    Experimenter(u32),
}

impl Instruction {
    /// The kind of this instruction, without its payload.
    #[must_use]
    pub fn kind(&self) -> InstructionKind {
        InstructionKind::from(self)
    }
}
