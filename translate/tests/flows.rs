// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Flow lifecycle against the in-memory SDK.

use config::{Profile, XlateConfig, XlateConfigBuilder};
use net::Masked;
use net::vlan::{VID_FIELD_MASK, VID_PRESENT};
use ofdpa::flow::{AclPolicyMatch, VlanMatch};
use ofdpa::sim::{SIM_TABLE_SIZE, SimOfdpa};
use ofdpa::{FlowActions, FlowEntry, MatchCriteria, OfdpaError, OutputPort, TableId};
use ofxlate_translate::{CompatError, ParamError, TableStats, Translator, XlateError};
use openflow::{Action, FlowMod, Instruction, InstructionKind, Match, PortNo, SetField};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;

fn translator() -> Translator<SimOfdpa> {
    Translator::new(SimOfdpa::new(), XlateConfig::default())
}

fn tagged_vlan_flow(in_port: u32, vid: u16) -> FlowMod {
    let retag = vec![Action::set_field(SetField::VlanVid(20))];
    FlowMod::new(TableId::Vlan.number(), 100)
        .with_match(Match {
            in_port: Masked::exact(in_port),
            vlan_vid: Masked::new(vid | VID_PRESENT, VID_FIELD_MASK),
            ..Match::default()
        })
        .with_instruction(Instruction::ApplyActions(retag))
        .with_instruction(Instruction::GotoTable(TableId::TerminationMac.number()))
}

fn bridging_to_controller(mac_last: u8) -> FlowMod {
    let punt = vec![Action::output(PortNo::Controller)];
    FlowMod::new(TableId::Bridging.number(), 10)
        .with_match(Match {
            eth_dst: Masked::exact(net::Mac([0x02, 0, 0, 0, 0, mac_last])),
            ..Match::default()
        })
        .with_instruction(Instruction::ApplyActions(punt))
}

#[test]
fn vlan_flow_end_to_end() {
    let xlate = translator();
    xlate.flow_create(0x10, &tagged_vlan_flow(3, 10)).unwrap();

    let mut expected = FlowEntry::new(TableId::Vlan, 0x10);
    expected.priority = 100;
    expected.criteria = MatchCriteria::Vlan(VlanMatch {
        in_port: Masked::exact(3),
        vlan_id: Masked::new(10 | VID_PRESENT, VID_PRESENT | 0x0fff),
    });
    expected.actions = FlowActions {
        set_vlan_id: Some(20),
        goto_table: Some(TableId::TerminationMac),
        ..FlowActions::default()
    };
    assert_eq!(xlate.sdk().flow(0x10), Some(expected));
}

#[test]
fn acl_port_without_protocol_is_never_submitted() {
    let xlate = translator();
    let request = FlowMod::new(TableId::AclPolicy.number(), 10).with_match(Match {
        tcp_dst: Masked::exact(80),
        ..Match::default()
    });
    let result = xlate.flow_create(1, &request);
    assert!(matches!(
        result,
        Err(XlateError::Compat(CompatError::Prerequisite { .. }))
    ));
    assert_eq!(xlate.sdk().submissions(), 0);
    assert_eq!(xlate.sdk().flow_count(), 0);
}

#[test]
fn acl_flow_with_protocol() {
    let xlate = translator();
    let to_port = vec![Action::output(PortNo::Physical(7))];
    let request = FlowMod::new(TableId::AclPolicy.number(), 10)
        .with_match(Match {
            ip_proto: Masked::exact(6),
            tcp_dst: Masked::exact(80),
            ..Match::default()
        })
        .with_instruction(Instruction::WriteActions(to_port));
    xlate.flow_create(2, &request).unwrap();
    let entry = xlate.sdk().flow(2).unwrap();
    assert_eq!(
        entry.criteria,
        MatchCriteria::AclPolicy(AclPolicyMatch {
            ip_proto: Masked::exact(6),
            dst_l4_port: Masked::exact(80),
            ..AclPolicyMatch::default()
        })
    );
    assert_eq!(entry.actions.output_port, Some(OutputPort::Port(7)));
}

#[test]
fn clear_actions_only_on_acl() {
    let xlate = translator();
    let request = tagged_vlan_flow(1, 10).with_instruction(Instruction::ClearActions);
    let denied = CompatError::InstructionNotAllowed {
        instruction: InstructionKind::ClearActions,
        table: TableId::Vlan,
    };
    assert_eq!(
        xlate.flow_create(1, &request),
        Err(XlateError::Compat(denied))
    );
    assert_eq!(xlate.sdk().submissions(), 0);
}

#[test]
fn controller_output_allow_list() {
    let xlate = translator();
    xlate.flow_create(1, &bridging_to_controller(1)).unwrap();
    let punt = vec![Action::output(PortNo::Controller)];
    let request = FlowMod::new(TableId::Vlan.number(), 10)
        .with_match(Match::in_port(1))
        .with_instruction(Instruction::ApplyActions(punt));
    assert!(matches!(
        xlate.flow_create(2, &request),
        Err(XlateError::Compat(CompatError::OutputNotAllowed { .. }))
    ));
}

#[test]
fn modify_keeps_priority_and_replaces_actions() {
    let xlate = translator();
    xlate.flow_create(5, &tagged_vlan_flow(3, 10)).unwrap();

    let mut update = tagged_vlan_flow(4, 11).with_timeouts(9, 9);
    update.priority = 1;
    update.instructions = vec![Instruction::GotoTable(TableId::Bridging.number())];
    xlate.flow_modify(5, &update).unwrap();

    let entry = xlate.sdk().flow(5).unwrap();
    assert_eq!(entry.priority, 100);
    assert_eq!((entry.idle_timeout, entry.hard_timeout), (0, 0));
    assert_eq!(entry.actions.set_vlan_id, None);
    assert_eq!(entry.actions.goto_table, Some(TableId::Bridging));
    let MatchCriteria::Vlan(record) = entry.criteria else {
        unreachable!("flow stays in the vlan table");
    };
    assert_eq!(record.in_port, Masked::exact(4));
}

#[test]
fn modify_refuses_table_change() {
    let xlate = translator();
    xlate.flow_create(5, &tagged_vlan_flow(3, 10)).unwrap();
    assert_eq!(
        xlate.flow_modify(5, &bridging_to_controller(1)),
        Err(XlateError::Compat(CompatError::TableMismatch {
            stored: TableId::Vlan,
            requested: TableId::Bridging,
        }))
    );
}

#[test]
fn unknown_cookie() {
    let xlate = translator();
    assert_eq!(xlate.flow_delete(42), Err(XlateError::NotFound));
    assert_eq!(xlate.flow_stats(42), Err(XlateError::NotFound));
    assert_eq!(
        xlate.flow_modify(42, &tagged_vlan_flow(3, 10)),
        Err(XlateError::NotFound)
    );
}

#[test]
fn delete_reports_last_counters() {
    let xlate = translator();
    xlate.flow_create(7, &bridging_to_controller(7)).unwrap();
    xlate.sdk().hit(7, 4, 400);
    let stats = xlate.flow_stats(7).unwrap();
    assert_eq!((stats.packet_count, stats.byte_count), (4, 400));
    let stats = xlate.flow_delete(7).unwrap();
    assert_eq!((stats.packet_count, stats.byte_count), (4, 400));
    assert_eq!(xlate.flow_stats(7), Err(XlateError::NotFound));
}

#[test]
fn sdk_statuses_are_mapped() {
    let xlate = translator();
    xlate.sdk().fail_next(OfdpaError::Timeout);
    assert_eq!(
        xlate.flow_create(1, &bridging_to_controller(1)),
        Err(XlateError::Unknown(OfdpaError::Timeout))
    );
    xlate.sdk().set_capacity(TableId::Bridging, 1);
    xlate.flow_create(1, &bridging_to_controller(1)).unwrap();
    assert!(matches!(
        xlate.flow_create(2, &bridging_to_controller(2)),
        Err(XlateError::Resource(_))
    ));
    xlate.sdk().fail_next(OfdpaError::Param);
    assert_eq!(
        xlate.flow_delete(1),
        Err(XlateError::Param(ParamError::Rejected))
    );
}

#[test]
fn table_stats_skip_missing_tables() {
    let xlate = translator();
    xlate.sdk().set_unavailable(TableId::MplsMaintenancePoint);
    xlate.sdk().set_unavailable(TableId::EgressVlan1);
    xlate.flow_create(1, &bridging_to_controller(1)).unwrap();

    let stats = xlate.table_stats().unwrap();
    assert_eq!(stats.len(), 22);
    let ids: Vec<_> = stats.iter().map(|s| s.table_id).collect();
    assert!(!ids.contains(&TableId::MplsMaintenancePoint));
    assert!(!ids.contains(&TableId::EgressVlan1));
    let bridging = stats
        .iter()
        .find(|s| s.table_id == TableId::Bridging)
        .copied()
        .unwrap();
    assert_eq!(
        bridging,
        TableStats {
            table_id: TableId::Bridging,
            active_entries: 1,
            max_entries: SIM_TABLE_SIZE,
            lookup_count: 0,
            matched_count: 0,
        }
    );
}

#[test]
fn extended_profile_unlocks_oam_matches() {
    let to_agent = vec![Action::output(PortNo::Local)];
    let request = FlowMod::new(TableId::MaintenancePoint.number(), 10)
        .with_match(Match {
            eth_type: Masked::exact(0x8902),
            oam_y1731_mdl: Masked::exact(3),
            ..Match::default()
        })
        .with_instruction(Instruction::ApplyActions(to_agent));

    assert!(matches!(
        translator().flow_create(1, &request),
        Err(XlateError::Compat(CompatError::FieldsNotSupported { .. }))
    ));

    let config = XlateConfigBuilder::default()
        .profile(Profile::Extended)
        .build()
        .unwrap();
    let xlate = Translator::new(SimOfdpa::new(), config);
    xlate.flow_create(1, &request).unwrap();
    assert_eq!(
        xlate.sdk().flow(1).unwrap().actions.output_port,
        Some(OutputPort::Local)
    );
}

#[test]
fn concurrent_creates() {
    let xlate = Arc::new(translator());
    let workers: Vec<_> = (0..4u8)
        .map(|worker| {
            let xlate = xlate.clone();
            thread::spawn(move || {
                for i in 0..25u8 {
                    let cookie = (u64::from(worker) << 8) | u64::from(i);
                    let request = bridging_to_controller(i);
                    xlate.flow_create(cookie, &request).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(xlate.sdk().flow_count(), 100);
    assert_eq!(xlate.sdk().submissions(), 100);
}
