// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Flow lifecycle: the entry points turning flow-mods into hardware flow operations.

use crate::actions::ActionContext;
use crate::error::{CompatError, ParamError, Unsupported, XlateError};
use crate::instructions::translate_instructions;
use crate::populate::populate;
use crate::presence::analyze;
use config::XlateConfig;
use ofdpa::{FlowActions, FlowEntry, FlowStats, Ofdpa, OfdpaError, TableId};
use openflow::{FlowMod, Version};
use std::fmt::Display;
use strum::IntoEnumIterator;
use tracing::{debug, error, instrument};

/// Occupancy of one hardware table, as reported to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    pub table_id: TableId,
    pub active_entries: u32,
    pub max_entries: u32,
    /// Always zero: the hardware does not count lookups per table
    pub lookup_count: u64,
    /// Always zero: the hardware does not count matches per table
    pub matched_count: u64,
}

impl Display for TableStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>3} {:<26} {:>6}/{}",
            self.table_id.number(), self.table_id, self.active_entries, self.max_entries
        )
    }
}

/// The flow translator, bound to one hardware SDK.
///
/// Translation keeps no state between calls: a `Translator` can be shared between threads
/// (in an `Arc`) whenever its SDK can.
pub struct Translator<S> {
    sdk: S,
    config: XlateConfig,
}

impl<S: Ofdpa> Translator<S> {
    #[must_use]
    pub fn new(sdk: S, config: XlateConfig) -> Self {
        Self { sdk, config }
    }

    #[must_use]
    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    #[must_use]
    pub fn config(&self) -> &XlateConfig {
        &self.config
    }

    pub(crate) fn check_version(&self, version: Version) -> Result<(), XlateError> {
        let minimum = Version(self.config.min_version);
        if version < minimum {
            return Err(XlateError::VersionUnsupported { version, minimum });
        }
        Ok(())
    }

    /// Translate the match and instructions of `request` for `table`.
    fn translate_into(
        &self,
        request: &FlowMod,
        table: TableId,
        entry: &mut FlowEntry,
    ) -> Result<(), XlateError> {
        let profile = self.config.profile;
        let present = analyze(&request.pattern);
        debug!("present fields {present:?}");
        entry.criteria = populate(&request.pattern, present, table, profile)?;
        entry.actions = FlowActions::default();
        let ctx = ActionContext::new(table, present, profile);
        translate_instructions(&ctx, &request.instructions, &mut entry.actions)
    }

    /// Build the hardware flow for `request` without programming it.
    ///
    /// # Errors
    ///
    /// Fails if the request uses an unsupported version or table, or anything the target
    /// table cannot express.
    pub fn translate_flow(&self, cookie: u64, request: &FlowMod) -> Result<FlowEntry, XlateError> {
        self.check_version(request.version)?;
        let table = TableId::try_from(request.table_id)
            .map_err(|_| ParamError::UnknownTable(request.table_id))?;
        let mut entry = FlowEntry::new(table, cookie);
        entry.priority = request.priority;
        entry.idle_timeout = request.idle_timeout;
        entry.hard_timeout = request.hard_timeout;
        self.translate_into(request, table, &mut entry)?;
        Ok(entry)
    }

    /// Translate `request` and install it as a new flow identified by `cookie`.
    ///
    /// # Errors
    ///
    /// Translation errors, or the SDK failure mapped to an [`XlateError`]. Nothing is
    /// programmed when translation fails.
    #[instrument(level = "debug", skip(self, request), fields(table = request.table_id))]
    pub fn flow_create(&self, cookie: u64, request: &FlowMod) -> Result<(), XlateError> {
        let entry = self.translate_flow(cookie, request)?;
        self.sdk.flow_add(&entry).map_err(|e| {
            error!(
                "Failed to add flow {cookie:#x} to table {}: {e}",
                entry.table_id
            );
            XlateError::from(e)
        })?;
        debug!("Added flow {cookie:#x} to table {}", entry.table_id);
        Ok(())
    }

    /// Replace the match and actions of the flow identified by `cookie`.
    ///
    /// Priority and timeouts of the installed flow are kept.
    ///
    /// # Errors
    ///
    /// [`XlateError::NotFound`] if there is no such flow, [`CompatError::TableMismatch`]
    /// if `request` targets another table, plus the errors of [`Translator::flow_create`].
    #[instrument(level = "debug", skip(self, request), fields(table = request.table_id))]
    pub fn flow_modify(&self, cookie: u64, request: &FlowMod) -> Result<(), XlateError> {
        self.check_version(request.version)?;
        let (mut entry, _) = self.sdk.flow_by_cookie_get(cookie)?;
        let requested = TableId::try_from(request.table_id)
            .map_err(|_| ParamError::UnknownTable(request.table_id))?;
        if requested != entry.table_id {
            return Err(CompatError::TableMismatch {
                stored: entry.table_id,
                requested,
            }
            .into());
        }
        self.translate_into(request, requested, &mut entry)?;
        self.sdk.flow_modify(&entry).map_err(|e| {
            error!("Failed to modify flow {cookie:#x}: {e}");
            XlateError::from(e)
        })?;
        debug!("Modified flow {cookie:#x} in table {requested}");
        Ok(())
    }

    /// Remove the flow identified by `cookie`, returning its last counters.
    ///
    /// # Errors
    ///
    /// [`XlateError::NotFound`] if there is no such flow, or the mapped SDK failure.
    #[instrument(level = "debug", skip(self))]
    pub fn flow_delete(&self, cookie: u64) -> Result<FlowStats, XlateError> {
        let (entry, stats) = self.sdk.flow_by_cookie_get(cookie)?;
        self.sdk.flow_delete(cookie).map_err(|e| {
            error!("Failed to delete flow {cookie:#x}: {e}");
            XlateError::from(e)
        })?;
        debug!("Deleted flow {cookie:#x} from table {}", entry.table_id);
        Ok(stats)
    }

    /// Counters of the flow identified by `cookie`.
    ///
    /// # Errors
    ///
    /// [`XlateError::NotFound`] if there is no such flow, or the mapped SDK failure.
    pub fn flow_stats(&self, cookie: u64) -> Result<FlowStats, XlateError> {
        Ok(self.sdk.flow_stats_get(cookie)?)
    }

    /// Occupancy of every table the hardware implements.
    ///
    /// # Errors
    ///
    /// Any SDK failure other than a table being absent.
    pub fn table_stats(&self) -> Result<Vec<TableStats>, XlateError> {
        let mut stats = Vec::with_capacity(TableId::iter().len());
        for table_id in TableId::iter() {
            match self.sdk.table_info(table_id) {
                Ok(info) => stats.push(TableStats {
                    table_id,
                    active_entries: info.num_entries,
                    max_entries: info.max_entries,
                    lookup_count: 0,
                    matched_count: 0,
                }),
                Err(OfdpaError::NotFound | OfdpaError::Unavail) => {
                    debug!("Table {table_id} not available, skipping");
                }
                Err(e) => {
                    error!("Failed to get info of table {table_id}: {e}");
                    return Err(e.into());
                }
            }
        }
        Ok(stats)
    }

    /// Name of the (only) pipeline.
    #[must_use]
    pub fn pipeline_get(&self) -> &str {
        &self.config.pipeline
    }

    /// Changing pipelines is not supported.
    ///
    /// # Errors
    ///
    /// Always [`Unsupported::PipelineSet`].
    pub fn pipeline_set(&self, name: &str) -> Result<(), XlateError> {
        let current = &self.config.pipeline;
        debug!("Refusing to switch pipeline from {current} to {name}");
        Err(Unsupported::PipelineSet.into())
    }

    /// The pipelines this translator can run.
    #[must_use]
    pub fn pipeline_stats_get(&self) -> Vec<String> {
        vec![self.config.pipeline.clone()]
    }

    /// Table-mod requests are not supported.
    ///
    /// # Errors
    ///
    /// Always [`Unsupported::TableMod`].
    pub fn table_mod(&self, table_id: u8) -> Result<(), XlateError> {
        debug!("Refusing table-mod on table {table_id}");
        Err(Unsupported::TableMod.into())
    }

    /// Experimenter messages are not supported.
    ///
    /// # Errors
    ///
    /// Always [`Unsupported::Experimenter`].
    pub fn experimenter(&self, experimenter: u32) -> Result<(), XlateError> {
        debug!("Refusing experimenter message {experimenter:#x}");
        Err(Unsupported::Experimenter.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use net::Masked;
    use ofdpa::MatchCriteria;
    use ofdpa::sim::SimOfdpa;
    use openflow::{Instruction, Match};

    fn translator() -> Translator<SimOfdpa> {
        Translator::new(SimOfdpa::new(), XlateConfig::default())
    }

    #[test]
    fn version_floor() {
        let xlate = translator();
        let mut request = FlowMod::new(50, 10);
        request.version = Version::OF_1_0;
        assert_eq!(
            xlate.flow_create(1, &request),
            Err(XlateError::VersionUnsupported {
                version: Version::OF_1_0,
                minimum: Version::OF_1_3,
            })
        );
        assert_eq!(xlate.sdk().submissions(), 0);
    }

    #[test]
    fn unknown_table() {
        let xlate = translator();
        assert_eq!(
            xlate.flow_create(1, &FlowMod::new(99, 10)),
            Err(XlateError::Param(ParamError::UnknownTable(99)))
        );
    }

    #[test]
    fn translate_keeps_common_fields() {
        let xlate = translator();
        let request = FlowMod::new(10, 7)
            .with_timeouts(30, 60)
            .with_match(Match::in_port(1))
            .with_instruction(Instruction::GotoTable(20));
        let entry = xlate.translate_flow(0xabc, &request).unwrap();
        assert_eq!(entry.table_id, TableId::Vlan);
        assert_eq!(entry.cookie, 0xabc);
        assert_eq!(
            (entry.priority, entry.idle_timeout, entry.hard_timeout),
            (7, 30, 60)
        );
        let MatchCriteria::Vlan(record) = entry.criteria else {
            unreachable!("vlan table uses the vlan layout");
        };
        assert_eq!(record.in_port, Masked::exact(1));
        assert_eq!(entry.actions.goto_table, Some(TableId::TerminationMac));
    }

    #[test]
    fn unsupported_requests() {
        let xlate = translator();
        assert_eq!(xlate.pipeline_get(), "ofdpa-2.0");
        assert_eq!(xlate.pipeline_stats_get(), vec!["ofdpa-2.0".to_string()]);
        assert_eq!(
            xlate.pipeline_set("other"),
            Err(XlateError::NotSupported(Unsupported::PipelineSet))
        );
        assert_eq!(
            xlate.table_mod(50),
            Err(XlateError::NotSupported(Unsupported::TableMod))
        );
        assert_eq!(
            xlate.experimenter(0x4f4e_4600),
            Err(XlateError::NotSupported(Unsupported::Experimenter))
        );
    }
}
