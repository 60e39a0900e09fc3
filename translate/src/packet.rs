// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packet-out, packet-in and flow expiry.

use crate::error::{ParamError, Unsupported, XlateError};
use crate::flow::Translator;
use ofdpa::{FlowEvent, FlowEventKind, Ofdpa, ReceivedPacket, RxReason, SendMode};
use openflow::{
    Action, COOKIE_NONE, FlowRemoved, FlowRemovedReason, Match, NO_BUFFER, PacketIn,
    PacketInReason, PacketOut, PortNo, Version,
};
use tracing::{debug, error, instrument, warn};

/// What to do with the frame of a packet-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketOutPlan {
    /// No output action: nothing is sent
    Drop,
    /// Send out of a port as is
    Port { out_port: u32 },
    /// Run through the whole pipeline as if received on `in_port`
    Pipeline { in_port: u32 },
}

/// Decide how to send the frame of `request`.
///
/// The first output action decides; later ones are ignored.
///
/// # Errors
///
/// Buffered packet-outs, actions other than output, outputs to reserved ports other
/// than `TABLE`, and `TABLE` without a concrete ingress port are refused.
pub fn translate_packet_out(request: &PacketOut) -> Result<PacketOutPlan, XlateError> {
    if request.buffer_id != NO_BUFFER {
        return Err(Unsupported::BufferedPacketOut(request.buffer_id).into());
    }
    let mut plan = None;
    for action in &request.actions {
        let Action::Output { port, .. } = action else {
            return Err(Unsupported::PacketOutAction(action.kind()).into());
        };
        if plan.is_some() {
            warn!("Ignoring extra packet-out output to {port}");
            continue;
        }
        plan = Some(match *port {
            PortNo::Physical(out_port) => PacketOutPlan::Port { out_port },
            PortNo::Table => match request.in_port {
                PortNo::Physical(in_port) => PacketOutPlan::Pipeline { in_port },
                other => return Err(ParamError::InPortRequired(other).into()),
            },
            other => return Err(Unsupported::OutputPort(other).into()),
        });
    }
    Ok(plan.unwrap_or(PacketOutPlan::Drop))
}

/// Build the packet-in reporting `packet`, keeping at most `max_len` bytes of the frame.
///
/// # Errors
///
/// [`XlateError::Resource`] if the frame is too long to be reported.
pub fn translate_packet_in(packet: &ReceivedPacket, max_len: u16) -> Result<PacketIn, XlateError> {
    let Ok(total_len) = u16::try_from(packet.frame.len()) else {
        let len = packet.frame.len();
        return Err(XlateError::Resource(format!("frame of {len} bytes")));
    };
    let reason = match packet.reason {
        RxReason::NoMatch => PacketInReason::NoMatch,
        RxReason::Action => PacketInReason::Action,
        RxReason::InvalidTtl => PacketInReason::InvalidTtl,
    };
    let keep = usize::from(total_len.min(max_len));
    Ok(PacketIn {
        version: Version::OF_1_3,
        buffer_id: NO_BUFFER,
        total_len,
        reason,
        table_id: packet.table_id.number(),
        cookie: COOKIE_NONE,
        pattern: Match::in_port(packet.in_port),
        data: packet.frame[..keep].to_vec(),
    })
}

/// The flow-removed notification for a hardware flow event.
#[must_use]
pub fn flow_removed(event: &FlowEvent) -> FlowRemoved {
    let FlowEvent { kind, entry, stats } = event;
    FlowRemoved {
        cookie: entry.cookie,
        priority: entry.priority,
        reason: match kind {
            FlowEventKind::IdleTimeout => FlowRemovedReason::IdleTimeout,
            FlowEventKind::HardTimeout => FlowRemovedReason::HardTimeout,
        },
        table_id: entry.table_id.number(),
        duration_sec: stats.duration_sec,
        idle_timeout: entry.idle_timeout,
        hard_timeout: entry.hard_timeout,
        packet_count: stats.packet_count,
        byte_count: stats.byte_count,
    }
}

impl<S: Ofdpa> Translator<S> {
    /// Send the frame of a packet-out request.
    ///
    /// # Errors
    ///
    /// The errors of [`translate_packet_out`], or the mapped SDK failure.
    #[instrument(level = "debug", skip_all, fields(in_port = %request.in_port))]
    pub fn packet_out(&self, request: &PacketOut) -> Result<(), XlateError> {
        self.check_version(request.version)?;
        let plan = translate_packet_out(request)?;
        let frame = request.data.as_slice();
        let sdk = self.sdk();
        let sent = match plan {
            PacketOutPlan::Drop => {
                debug!("Packet-out without output, dropping {} bytes", frame.len());
                return Ok(());
            }
            PacketOutPlan::Port { out_port } => {
                sdk.packet_send(frame, SendMode::Direct, out_port, 0)
            }
            PacketOutPlan::Pipeline { in_port } => {
                sdk.packet_send(frame, SendMode::Pipeline, 0, in_port)
            }
        };
        sent.map_err(|e| {
            error!("Failed to send packet ({plan:?}): {e}");
            XlateError::from(e)
        })
    }

    /// Wait for the next punted frame, up to the configured receive timeout.
    ///
    /// # Errors
    ///
    /// The mapped SDK failure, or [`XlateError::Resource`] for an oversized frame.
    pub fn packet_receive(&self) -> Result<Option<PacketIn>, XlateError> {
        let config = self.config();
        match self.sdk().packet_receive(config.rx_timeout())? {
            Some(packet) => translate_packet_in(&packet, config.packet_in_max_len).map(Some),
            None => Ok(None),
        }
    }

    /// Report every pending flow expiry to `notify`. Returns how many were reported.
    ///
    /// # Errors
    ///
    /// The mapped SDK failure. Expiries reported before the failure stay reported.
    pub fn drain_flow_events(
        &self,
        mut notify: impl FnMut(FlowRemoved),
    ) -> Result<usize, XlateError> {
        let mut count = 0;
        while let Some(event) = self.sdk().flow_event_next()? {
            debug!(
                "Flow {:#x} expired ({}) in table {}",
                event.entry.cookie, event.kind, event.entry.table_id
            );
            notify(flow_removed(&event));
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofdpa::TableId;
    use pretty_assertions::assert_eq;

    fn packet_out(in_port: PortNo, actions: Vec<Action>) -> PacketOut {
        PacketOut {
            version: Version::OF_1_3,
            buffer_id: NO_BUFFER,
            in_port,
            actions,
            data: vec![0xaa; 64],
        }
    }

    #[test]
    fn packet_out_plans() {
        let to_port = vec![Action::output(PortNo::Physical(4))];
        let request = packet_out(PortNo::Controller, to_port);
        assert_eq!(
            translate_packet_out(&request),
            Ok(PacketOutPlan::Port { out_port: 4 })
        );
        let request = packet_out(PortNo::Physical(2), vec![Action::output(PortNo::Table)]);
        assert_eq!(
            translate_packet_out(&request),
            Ok(PacketOutPlan::Pipeline { in_port: 2 })
        );
        let request = packet_out(PortNo::Controller, vec![]);
        assert_eq!(translate_packet_out(&request), Ok(PacketOutPlan::Drop));
    }

    #[test]
    fn packet_out_refusals() {
        let request = packet_out(PortNo::Controller, vec![Action::output(PortNo::Flood)]);
        assert_eq!(
            translate_packet_out(&request),
            Err(XlateError::NotSupported(Unsupported::OutputPort(
                PortNo::Flood
            )))
        );
        let request = packet_out(PortNo::Controller, vec![Action::output(PortNo::Table)]);
        assert_eq!(
            translate_packet_out(&request),
            Err(XlateError::Param(ParamError::InPortRequired(
                PortNo::Controller
            )))
        );
        let request = packet_out(
            PortNo::Physical(1),
            vec![Action::PopVlan, Action::output(PortNo::Physical(2))],
        );
        assert!(matches!(
            translate_packet_out(&request),
            Err(XlateError::NotSupported(Unsupported::PacketOutAction(_)))
        ));
        let mut request = packet_out(PortNo::Physical(1), vec![]);
        request.buffer_id = 7;
        assert_eq!(
            translate_packet_out(&request),
            Err(XlateError::NotSupported(Unsupported::BufferedPacketOut(7)))
        );
    }

    #[test]
    fn first_output_wins() {
        let request = packet_out(
            PortNo::Physical(1),
            vec![
                Action::output(PortNo::Physical(2)),
                Action::output(PortNo::Physical(3)),
            ],
        );
        assert_eq!(
            translate_packet_out(&request),
            Ok(PacketOutPlan::Port { out_port: 2 })
        );
    }

    #[test]
    fn packet_in_truncation() {
        let packet = ReceivedPacket {
            frame: (0..=255).collect(),
            in_port: 3,
            table_id: TableId::AclPolicy,
            reason: RxReason::Action,
        };
        let pin = translate_packet_in(&packet, 128).unwrap();
        assert_eq!(pin.total_len, 256);
        assert_eq!(pin.data.len(), 128);
        assert_eq!(&pin.data[..], &packet.frame[..128]);
        assert_eq!(pin.reason, PacketInReason::Action);
        assert_eq!(pin.table_id, 60);
        assert_eq!(pin.cookie, COOKIE_NONE);
        assert_eq!(pin.buffer_id, NO_BUFFER);
        assert_eq!(pin.pattern, Match::in_port(3));

        let pin = translate_packet_in(&packet, u16::MAX).unwrap();
        assert_eq!(pin.data, packet.frame);
    }

    #[test]
    fn oversized_frame() {
        let packet = ReceivedPacket {
            frame: vec![0; usize::from(u16::MAX) + 1],
            in_port: 3,
            table_id: TableId::Bridging,
            reason: RxReason::NoMatch,
        };
        assert!(matches!(
            translate_packet_in(&packet, 128),
            Err(XlateError::Resource(_))
        ));
    }
}
