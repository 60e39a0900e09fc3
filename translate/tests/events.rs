// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packet I/O and the event loop against the in-memory SDK.

use config::{XlateConfig, XlateConfigBuilder};
use ofdpa::sim::{SentPacket, SimOfdpa};
use ofdpa::{FlowEventKind, OfdpaError, ReceivedPacket, RxReason, SendMode, TableId};
use ofxlate_translate::{EventLoop, Notifier, Translator, Unsupported, XlateError};
use openflow::{
    Action, FlowMod, FlowRemoved, FlowRemovedReason, Instruction, Match, NO_BUFFER, PacketIn,
    PacketInReason, PacketOut, PortNo, Version,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

fn packet_out(in_port: PortNo, port: PortNo) -> PacketOut {
    PacketOut {
        version: Version::OF_1_3,
        buffer_id: NO_BUFFER,
        in_port,
        actions: vec![Action::output(port)],
        data: vec![0x55; 60],
    }
}

fn expiring_flow(idle: u16) -> FlowMod {
    FlowMod::new(TableId::Vlan.number(), 3)
        .with_timeouts(idle, 0)
        .with_match(Match::in_port(9))
        .with_instruction(Instruction::GotoTable(TableId::TerminationMac.number()))
}

#[test]
fn packet_out_to_port_and_pipeline() {
    let xlate = Translator::new(SimOfdpa::new(), XlateConfig::default());
    xlate
        .packet_out(&packet_out(PortNo::Controller, PortNo::Physical(4)))
        .unwrap();
    xlate
        .packet_out(&packet_out(PortNo::Physical(2), PortNo::Table))
        .unwrap();
    assert_eq!(
        xlate.sdk().sent_packets(),
        vec![
            SentPacket {
                frame: vec![0x55; 60],
                mode: SendMode::Direct,
                out_port: 4,
                in_port: 0,
            },
            SentPacket {
                frame: vec![0x55; 60],
                mode: SendMode::Pipeline,
                out_port: 0,
                in_port: 2,
            },
        ]
    );
}

#[test]
fn packet_out_flood_sends_nothing() {
    let xlate = Translator::new(SimOfdpa::new(), XlateConfig::default());
    assert_eq!(
        xlate.packet_out(&packet_out(PortNo::Physical(1), PortNo::Flood)),
        Err(XlateError::NotSupported(Unsupported::OutputPort(
            PortNo::Flood
        )))
    );
    let mut request = packet_out(PortNo::Physical(1), PortNo::Physical(2));
    request.actions.clear();
    xlate.packet_out(&request).unwrap();
    assert!(xlate.sdk().sent_packets().is_empty());
}

#[test]
fn drain_expiries() {
    let xlate = Translator::new(SimOfdpa::new(), XlateConfig::default());
    xlate.flow_create(0x77, &expiring_flow(30)).unwrap();
    xlate.sdk().hit(0x77, 2, 128);
    assert!(xlate.sdk().expire(0x77, FlowEventKind::IdleTimeout));

    let mut removed = vec![];
    assert_eq!(xlate.drain_flow_events(|r| removed.push(r)), Ok(1));
    assert_eq!(
        removed,
        vec![FlowRemoved {
            cookie: 0x77,
            priority: 3,
            reason: FlowRemovedReason::IdleTimeout,
            table_id: TableId::Vlan.number(),
            duration_sec: 0,
            idle_timeout: 30,
            hard_timeout: 0,
            packet_count: 2,
            byte_count: 128,
        }]
    );
    assert_eq!(xlate.drain_flow_events(|_| unreachable!()), Ok(0));
}

enum Notification {
    PacketIn(PacketIn),
    Expired(FlowRemoved),
}

struct ChannelNotifier(Sender<Notification>);

impl Notifier for ChannelNotifier {
    fn packet_in(&mut self, packet: PacketIn) {
        let _ = self.0.send(Notification::PacketIn(packet));
    }
    fn flow_expired(&mut self, removed: FlowRemoved) {
        let _ = self.0.send(Notification::Expired(removed));
    }
}

fn next(rx: &Receiver<Notification>) -> Notification {
    rx.recv_timeout(Duration::from_secs(5)).unwrap()
}

#[test]
fn event_loop_delivers_notifications() {
    let config = XlateConfigBuilder::default()
        .rx_timeout_ms(10)
        .event_poll_interval_ms(10)
        .packet_in_max_len(16)
        .build()
        .unwrap();
    let xlate = Arc::new(Translator::new(SimOfdpa::new(), config));
    let (tx, rx) = mpsc::channel();
    let events = EventLoop::spawn(xlate.clone(), ChannelNotifier(tx)).unwrap();

    xlate.sdk().inject_packet(ReceivedPacket {
        frame: vec![0xee; 100],
        in_port: 5,
        table_id: TableId::Bridging,
        reason: RxReason::NoMatch,
    });
    let Notification::PacketIn(packet) = next(&rx) else {
        unreachable!("only a packet was injected");
    };
    assert_eq!(packet.total_len, 100);
    assert_eq!(packet.data, vec![0xee; 16]);
    assert_eq!(packet.reason, PacketInReason::NoMatch);
    assert_eq!(packet.pattern, Match::in_port(5));

    xlate.flow_create(0x99, &expiring_flow(0)).unwrap();
    assert!(xlate.sdk().expire(0x99, FlowEventKind::HardTimeout));
    let Notification::Expired(removed) = next(&rx) else {
        unreachable!("only a flow expired");
    };
    assert_eq!(removed.cookie, 0x99);
    assert_eq!(removed.reason, FlowRemovedReason::HardTimeout);

    events.stop();
    assert!(rx.try_recv().is_err());
}

#[test]
fn event_loop_pauses_after_receive_failures() {
    let config = XlateConfigBuilder::default()
        .rx_timeout_ms(20)
        .build()
        .unwrap();
    let xlate = Arc::new(Translator::new(SimOfdpa::new(), config));
    xlate.sdk().fail_receive(Some(OfdpaError::Rpc));
    let (tx, rx) = mpsc::channel();
    let events = EventLoop::spawn(xlate.clone(), ChannelNotifier(tx)).unwrap();

    thread::sleep(Duration::from_millis(200));
    let calls = xlate.sdk().receive_calls();
    assert!(calls >= 1, "receive was never attempted");
    assert!(calls <= 15, "{calls} receive calls in 200ms");

    xlate.sdk().fail_receive(None);
    xlate.sdk().inject_packet(ReceivedPacket {
        frame: vec![0x11; 64],
        in_port: 2,
        table_id: TableId::AclPolicy,
        reason: RxReason::Action,
    });
    let Notification::PacketIn(packet) = next(&rx) else {
        unreachable!("no flow was installed");
    };
    assert_eq!(packet.total_len, 64);
    events.stop();
}
