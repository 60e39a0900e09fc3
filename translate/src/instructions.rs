// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Translation of a flow's instruction list.

use crate::actions::ActionContext;
use crate::error::{CompatError, ParamError, Unsupported, XlateError};
use ofdpa::{FlowActions, TableId};
use openflow::{Instruction, InstructionKind};
use std::collections::HashSet;
use tracing::{debug, warn};

/// True iff `table` accepts instructions of kind `kind`.
#[must_use]
pub const fn instruction_allowed(kind: InstructionKind, table: TableId) -> bool {
    match kind {
        InstructionKind::ApplyActions => {
            !matches!(table, TableId::UnicastRouting | TableId::MulticastRouting)
        }
        InstructionKind::WriteActions => {
            table.is_mpls()
                || matches!(
                    table,
                    TableId::Vlan
                        | TableId::Vlan1
                        | TableId::MplsL2Port
                        | TableId::UnicastRouting
                        | TableId::MulticastRouting
                        | TableId::Bridging
                        | TableId::AclPolicy
                        | TableId::EgressMaintenancePoint
                )
        }
        InstructionKind::ClearActions => matches!(table, TableId::AclPolicy),
        InstructionKind::GotoTable => !matches!(table, TableId::AclPolicy),
        InstructionKind::WriteMetadata
        | InstructionKind::Meter
        | InstructionKind::Experimenter => false,
    }
}

/// Resolve the target of a goto-table from `from`.
///
/// The target must follow `from` in the same half (ingress or egress) of the pipeline.
///
/// # Errors
///
/// [`ParamError::UnknownGotoTable`] for an unknown table number,
/// [`CompatError::InvalidGotoTarget`] for a backward or cross-half jump.
pub fn goto_target(from: TableId, to: u8) -> Result<TableId, XlateError> {
    let target = TableId::try_from(to).map_err(|_| ParamError::UnknownGotoTable(to))?;
    if target.number() <= from.number() || target.is_egress() != from.is_egress() {
        return Err(CompatError::InvalidGotoTarget { from, to: target }.into());
    }
    Ok(target)
}

/// Translate `instructions` into `out`, in order.
///
/// # Errors
///
/// Fails on the first instruction, or action within one, which the table cannot perform.
pub fn translate_instructions(
    ctx: &ActionContext,
    instructions: &[Instruction],
    out: &mut FlowActions,
) -> Result<(), XlateError> {
    let table = ctx.table;
    let mut seen = HashSet::new();
    for instruction in instructions {
        let kind = instruction.kind();
        if let Instruction::Experimenter(id) = instruction {
            debug!("experimenter instruction {id:#x} on table {table}");
            return Err(Unsupported::ExperimenterInstruction.into());
        }
        if !seen.insert(kind) {
            return Err(CompatError::DuplicateInstruction(kind).into());
        }
        if let Instruction::Meter(meter) = instruction {
            warn!("Ignoring meter {meter} on table {table}: meters are not supported");
            continue;
        }
        if !instruction_allowed(kind, table) {
            let refused = CompatError::InstructionNotAllowed {
                instruction: kind,
                table,
            };
            return Err(refused.into());
        }
        match instruction {
            Instruction::GotoTable(to) => out.goto_table = Some(goto_target(table, *to)?),
            Instruction::ClearActions => out.clear_actions = true,
            Instruction::ApplyActions(actions) | Instruction::WriteActions(actions) => {
                ctx.translate(kind, actions, out)?;
            }
            // rejected by instruction_allowed
            Instruction::WriteMetadata { .. }
            | Instruction::Meter(_)
            | Instruction::Experimenter(_) => {}
        }
    }
    Ok(())
}
