// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! An in-memory [`Ofdpa`] for tests.
//!
//! Flows live in a map keyed by cookie. Tests feed punted frames with
//! [`SimOfdpa::inject_packet`], age flows out with [`SimOfdpa::expire`], and inspect what
//! was programmed or sent.

use crate::flow::{FlowEntry, FlowStats, TableInfo};
use crate::packet::{FlowEvent, FlowEventKind, ReceivedPacket, SendMode};
use crate::sdk::Ofdpa;
use crate::status::OfdpaError;
use crate::table::TableId;
use ordermap::OrderMap;
use parking_lot::{Condvar, Mutex};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tracing::debug;

/// Default capacity of every simulated table.
pub const SIM_TABLE_SIZE: u32 = 1024;

/// A frame handed to [`Ofdpa::packet_send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPacket {
    pub frame: Vec<u8>,
    pub mode: SendMode,
    pub out_port: u32,
    pub in_port: u32,
}

#[derive(Debug, Default)]
struct SimState {
    flows: OrderMap<u64, (FlowEntry, FlowStats)>,
    capacity: OrderMap<TableId, u32>,
    unavailable: HashSet<TableId>,
    rx: VecDeque<ReceivedPacket>,
    events: VecDeque<FlowEvent>,
    sent: Vec<SentPacket>,
    submissions: usize,
    receive_calls: usize,
    fail_next: Option<OfdpaError>,
    fail_receive: Option<OfdpaError>,
}

impl SimState {
    fn take_failure(&mut self) -> Result<(), OfdpaError> {
        match self.fail_next.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
    fn entries_in(&self, table: TableId) -> u32 {
        let n = self
            .flows
            .values()
            .filter(|(entry, _)| entry.table_id == table)
            .count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }
    fn capacity_of(&self, table: TableId) -> u32 {
        self.capacity.get(&table).copied().unwrap_or(SIM_TABLE_SIZE)
    }
}

/// The in-memory SDK. All calls are serialized behind one lock.
#[derive(Debug, Default)]
pub struct SimOfdpa {
    state: Mutex<SimState>,
    rx_ready: Condvar,
}

impl SimOfdpa {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of entries `table` accepts.
    pub fn set_capacity(&self, table: TableId, max_entries: u32) {
        self.state.lock().capacity.insert(table, max_entries);
    }

    /// Make `table` report [`OfdpaError::Unavail`] on [`Ofdpa::table_info`].
    pub fn set_unavailable(&self, table: TableId) {
        self.state.lock().unavailable.insert(table);
    }

    /// Make the next flow call fail with `error`.
    pub fn fail_next(&self, error: OfdpaError) {
        self.state.lock().fail_next = Some(error);
    }

    /// Make every [`Ofdpa::packet_receive`] fail with `error` until called with `None`.
    pub fn fail_receive(&self, error: Option<OfdpaError>) {
        self.state.lock().fail_receive = error;
    }

    /// Queue a frame for [`Ofdpa::packet_receive`].
    pub fn inject_packet(&self, packet: ReceivedPacket) {
        self.state.lock().rx.push_back(packet);
        self.rx_ready.notify_one();
    }

    /// Account traffic to a flow.
    pub fn hit(&self, cookie: u64, packets: u64, bytes: u64) {
        if let Some((_, stats)) = self.state.lock().flows.get_mut(&cookie) {
            stats.packet_count += packets;
            stats.byte_count += bytes;
        }
    }

    /// Remove a flow as if it timed out, queueing the matching event.
    /// Returns false if the flow does not exist.
    pub fn expire(&self, cookie: u64, kind: FlowEventKind) -> bool {
        let mut state = self.state.lock();
        match state.flows.remove(&cookie) {
            Some((entry, stats)) => {
                state.events.push_back(FlowEvent { kind, entry, stats });
                true
            }
            None => false,
        }
    }

    /// The programmed flow with `cookie`.
    #[must_use]
    pub fn flow(&self, cookie: u64) -> Option<FlowEntry> {
        let state = self.state.lock();
        state.flows.get(&cookie).map(|(entry, _)| *entry)
    }

    /// Number of programmed flows.
    #[must_use]
    pub fn flow_count(&self) -> usize {
        self.state.lock().flows.len()
    }

    /// Number of add and modify calls received, successful or not.
    #[must_use]
    pub fn submissions(&self) -> usize {
        self.state.lock().submissions
    }

    /// Number of [`Ofdpa::packet_receive`] calls, successful or not.
    #[must_use]
    pub fn receive_calls(&self) -> usize {
        self.state.lock().receive_calls
    }

    /// Frames sent so far, oldest first.
    #[must_use]
    pub fn sent_packets(&self) -> Vec<SentPacket> {
        self.state.lock().sent.clone()
    }
}

impl Ofdpa for SimOfdpa {
    fn flow_add(&self, entry: &FlowEntry) -> Result<(), OfdpaError> {
        let mut state = self.state.lock();
        state.submissions += 1;
        state.take_failure()?;
        if !entry.criteria.fits(entry.table_id) {
            return Err(OfdpaError::Param);
        }
        if state.flows.contains_key(&entry.cookie) {
            return Err(OfdpaError::Exists);
        }
        if state.entries_in(entry.table_id) >= state.capacity_of(entry.table_id) {
            return Err(OfdpaError::Full);
        }
        debug!("sim: adding flow {:#x} to {}", entry.cookie, entry.table_id);
        state
            .flows
            .insert(entry.cookie, (*entry, FlowStats::default()));
        Ok(())
    }

    fn flow_modify(&self, entry: &FlowEntry) -> Result<(), OfdpaError> {
        let mut state = self.state.lock();
        state.submissions += 1;
        state.take_failure()?;
        let Some((stored, _)) = state.flows.get_mut(&entry.cookie) else {
            return Err(OfdpaError::NotFound);
        };
        if stored.table_id != entry.table_id || !entry.criteria.fits(entry.table_id) {
            return Err(OfdpaError::Param);
        }
        debug!("sim: modifying flow {:#x}", entry.cookie);
        *stored = *entry;
        Ok(())
    }

    fn flow_delete(&self, cookie: u64) -> Result<(), OfdpaError> {
        let mut state = self.state.lock();
        state.take_failure()?;
        match state.flows.remove(&cookie) {
            Some(_) => Ok(()),
            None => Err(OfdpaError::NotFound),
        }
    }

    fn flow_by_cookie_get(&self, cookie: u64) -> Result<(FlowEntry, FlowStats), OfdpaError> {
        let mut state = self.state.lock();
        state.take_failure()?;
        let found = state.flows.get(&cookie).copied();
        found.ok_or(OfdpaError::NotFound)
    }

    fn flow_stats_get(&self, cookie: u64) -> Result<FlowStats, OfdpaError> {
        self.flow_by_cookie_get(cookie).map(|(_, stats)| stats)
    }

    fn table_info(&self, table: TableId) -> Result<TableInfo, OfdpaError> {
        let state = self.state.lock();
        if state.unavailable.contains(&table) {
            return Err(OfdpaError::Unavail);
        }
        Ok(TableInfo {
            max_entries: state.capacity_of(table),
            num_entries: state.entries_in(table),
        })
    }

    fn packet_send(
        &self,
        frame: &[u8],
        mode: SendMode,
        out_port: u32,
        in_port: u32,
    ) -> Result<(), OfdpaError> {
        self.state.lock().sent.push(SentPacket {
            frame: frame.to_vec(),
            mode,
            out_port,
            in_port,
        });
        Ok(())
    }

    fn packet_receive(&self, timeout: Duration) -> Result<Option<ReceivedPacket>, OfdpaError> {
        let mut state = self.state.lock();
        state.receive_calls += 1;
        if let Some(e) = state.fail_receive {
            return Err(e);
        }
        if state.rx.is_empty() {
            let _ = self.rx_ready.wait_for(&mut state, timeout);
        }
        Ok(state.rx.pop_front())
    }

    fn flow_event_next(&self) -> Result<Option<FlowEvent>, OfdpaError> {
        Ok(self.state.lock().events.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::MatchCriteria;
    use crate::packet::RxReason;

    #[test]
    fn add_lookup_delete() {
        let sim = SimOfdpa::new();
        let entry = FlowEntry::new(TableId::Bridging, 7);
        sim.flow_add(&entry).unwrap();
        assert_eq!(sim.flow_add(&entry), Err(OfdpaError::Exists));
        sim.hit(7, 3, 300);
        let (found, stats) = sim.flow_by_cookie_get(7).unwrap();
        assert_eq!(found, entry);
        assert_eq!(stats.packet_count, 3);
        sim.flow_delete(7).unwrap();
        assert_eq!(sim.flow_delete(7), Err(OfdpaError::NotFound));
        assert_eq!(sim.submissions(), 2);
    }

    #[test]
    fn layout_must_fit_table() {
        let sim = SimOfdpa::new();
        let mut entry = FlowEntry::new(TableId::Vlan, 1);
        entry.criteria = MatchCriteria::catch_all(TableId::Bridging);
        assert_eq!(sim.flow_add(&entry), Err(OfdpaError::Param));
    }

    #[test]
    fn capacity() {
        let sim = SimOfdpa::new();
        sim.set_capacity(TableId::AclPolicy, 1);
        let first = FlowEntry::new(TableId::AclPolicy, 1);
        sim.flow_add(&first).unwrap();
        assert_eq!(
            sim.flow_add(&FlowEntry::new(TableId::AclPolicy, 2)),
            Err(OfdpaError::Full)
        );
        let info = sim.table_info(TableId::AclPolicy).unwrap();
        assert_eq!((info.max_entries, info.num_entries), (1, 1));
    }

    #[test]
    fn receive_times_out_then_delivers() {
        let sim = SimOfdpa::new();
        assert_eq!(sim.packet_receive(Duration::from_millis(1)), Ok(None));
        let pkt = ReceivedPacket {
            frame: vec![1, 2, 3],
            in_port: 4,
            table_id: TableId::AclPolicy,
            reason: RxReason::Action,
        };
        sim.inject_packet(pkt.clone());
        assert_eq!(sim.packet_receive(Duration::from_millis(1)), Ok(Some(pkt)));
    }

    #[test]
    fn receive_failure_persists() {
        let sim = SimOfdpa::new();
        sim.fail_receive(Some(OfdpaError::Rpc));
        for _ in 0..3 {
            assert_eq!(
                sim.packet_receive(Duration::from_millis(1)),
                Err(OfdpaError::Rpc)
            );
        }
        sim.fail_receive(None);
        assert_eq!(sim.packet_receive(Duration::from_millis(1)), Ok(None));
        assert_eq!(sim.receive_calls(), 4);
    }

    #[test]
    fn expiry_queues_event() {
        let sim = SimOfdpa::new();
        sim.flow_add(&FlowEntry::new(TableId::Bridging, 9)).unwrap();
        assert!(sim.expire(9, FlowEventKind::IdleTimeout));
        assert!(!sim.expire(9, FlowEventKind::IdleTimeout));
        let event = sim.flow_event_next().unwrap().unwrap();
        assert_eq!(event.kind, FlowEventKind::IdleTimeout);
        assert_eq!(event.entry.cookie, 9);
        assert_eq!(sim.flow_event_next(), Ok(None));
    }
}
