// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The hardware SDK interface.

use crate::flow::{FlowEntry, FlowStats, TableInfo};
use crate::packet::{FlowEvent, ReceivedPacket, SendMode};
use crate::status::OfdpaError;
use crate::table::TableId;
use std::time::Duration;

/// Calls into the hardware SDK.
///
/// Implementations may block. They must serialize accesses to a given cookie; callers
/// issue create / modify / delete for one cookie from any thread.
pub trait Ofdpa: Send + Sync {
    /// Install a new flow, keyed by its cookie.
    ///
    /// # Errors
    ///
    /// The SDK status of the failed call.
    fn flow_add(&self, entry: &FlowEntry) -> Result<(), OfdpaError>;

    /// Replace the match and actions of the flow with the same cookie.
    ///
    /// # Errors
    ///
    /// [`OfdpaError::NotFound`] if no such flow exists, otherwise the SDK status.
    fn flow_modify(&self, entry: &FlowEntry) -> Result<(), OfdpaError>;

    /// Remove a flow.
    ///
    /// # Errors
    ///
    /// [`OfdpaError::NotFound`] if no such flow exists, otherwise the SDK status.
    fn flow_delete(&self, cookie: u64) -> Result<(), OfdpaError>;

    /// Look a flow up by cookie, along with its counters at lookup time.
    ///
    /// # Errors
    ///
    /// [`OfdpaError::NotFound`] if no such flow exists, otherwise the SDK status.
    fn flow_by_cookie_get(&self, cookie: u64) -> Result<(FlowEntry, FlowStats), OfdpaError>;

    /// Counters of a flow.
    ///
    /// # Errors
    ///
    /// [`OfdpaError::NotFound`] if no such flow exists, otherwise the SDK status.
    fn flow_stats_get(&self, cookie: u64) -> Result<FlowStats, OfdpaError>;

    /// Occupancy of a table.
    ///
    /// # Errors
    ///
    /// [`OfdpaError::Unavail`] or [`OfdpaError::NotFound`] for tables the target does not
    /// implement.
    fn table_info(&self, table: TableId) -> Result<TableInfo, OfdpaError>;

    /// Transmit a frame. `out_port` is used in [`SendMode::Direct`], `in_port` in
    /// [`SendMode::Pipeline`].
    ///
    /// # Errors
    ///
    /// The SDK status of the failed call.
    fn packet_send(
        &self,
        frame: &[u8],
        mode: SendMode,
        out_port: u32,
        in_port: u32,
    ) -> Result<(), OfdpaError>;

    /// Wait up to `timeout` for a punted frame. `Ok(None)` on timeout.
    ///
    /// # Errors
    ///
    /// The SDK status of the failed call.
    fn packet_receive(&self, timeout: Duration) -> Result<Option<ReceivedPacket>, OfdpaError>;

    /// Next pending flow event, if any. Never blocks.
    ///
    /// # Errors
    ///
    /// The SDK status of the failed call.
    fn flow_event_next(&self) -> Result<Option<FlowEvent>, OfdpaError>;
}
