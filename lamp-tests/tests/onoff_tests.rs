//! Integration Tests für den Generic OnOff Server
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen Mock-Kollaborateure

mod common;

use common::*;
use lamp_core::{
    LightState, ModelInstance, OnOffMessage, OnOffServer, OutputChannel, opcode,
};

type TestServer = OnOffServer<MockHardware, MockTransport, MockStore>;

fn server_with(initial: LightState) -> TestServer {
    init_logging();
    OnOffServer::new(
        ModelInstance::new(initial),
        MockHardware::new().with_level(OutputChannel::Lamp, initial),
        MockTransport::new(),
        MockStore::new(),
    )
}

fn published_server(initial: LightState) -> TestServer {
    let mut server = server_with(initial);
    server.instance_mut().set_publish_address(GROUP);
    server
}

// ============================================================================
// Tests: End-to-End Szenarien
// ============================================================================

#[test]
fn test_scenario_a_get_reports_off_without_publish() {
    let mut server = server_with(LightState::Off);

    server.dispatch(&ctx_from(CLIENT), opcode::GET, &[]);

    assert_eq!(server.transport().replies, vec![(CLIENT, 0x00)]);
    assert!(server.transport().publishes.is_empty());
    assert_eq!(server.state(), LightState::Off);
}

#[test]
fn test_scenario_b_set_unack_turns_lamp_on_and_publishes() {
    let mut server = published_server(LightState::Off);

    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);

    assert_eq!(server.state(), LightState::On);
    assert_eq!(server.hardware().level(OutputChannel::Lamp), Some(LightState::On));
    assert_eq!(server.transport().publishes, vec![(GROUP, 0x01)]);
    assert!(server.transport().replies.is_empty());
}

#[test]
fn test_scenario_c_repeated_set_unack_does_not_publish_again() {
    let mut server = published_server(LightState::Off);

    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);
    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);

    assert_eq!(server.transport().publishes.len(), 1);
    assert_eq!(server.instance().transaction().repeats(), 1);
}

#[test]
fn test_scenario_d_acknowledged_set_replies_and_publishes() {
    let mut server = published_server(LightState::Off);
    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);
    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);

    server.dispatch(&ctx_from(CLIENT), opcode::SET, &[0x00]);

    assert_eq!(server.transport().replies, vec![(CLIENT, 0x00)]);
    assert_eq!(server.transport().publishes, vec![(GROUP, 0x01), (GROUP, 0x00)]);
    assert_eq!(server.hardware().level(OutputChannel::Lamp), Some(LightState::Off));
}

// ============================================================================
// Tests: Eigenschaften
// ============================================================================

#[test]
fn test_redundant_set_is_idempotent() {
    for state in [LightState::On, LightState::Off] {
        let mut server = published_server(state);

        let transition = server.set_unacknowledged(&ctx_from(CLIENT), state);

        assert!(!transition.changed());
        assert!(!transition.published);
        assert!(server.transport().publishes.is_empty());
        assert_eq!(server.store().save_count, 0);
        // Nur der bereits vorhandene Wert wird geschrieben
        assert!(
            server
                .hardware()
                .writes
                .iter()
                .all(|&(ch, s)| ch == OutputChannel::Lamp && s == state)
        );
    }
}

#[test]
fn test_set_reply_reports_latest_target() {
    let states = [LightState::On, LightState::Off];
    for first in states {
        for second in states {
            let mut server = server_with(LightState::Off);
            server.handle(&ctx_from(CLIENT), OnOffMessage::Set(first));
            server.handle(&ctx_from(CLIENT), OnOffMessage::Set(second));

            let last = server.transport().replies.last().copied();
            assert_eq!(last, Some((CLIENT, second.to_wire())));
        }
    }
}

#[test]
fn test_publish_only_on_transition() {
    let mut server = published_server(LightState::Off);

    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);
    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);
    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x00]);

    assert_eq!(server.transport().publishes, vec![(GROUP, 0x01), (GROUP, 0x00)]);
}

#[test]
fn test_malformed_payloads_are_discarded() {
    let bad_payloads: [&[u8]; 5] = [&[], &[0x02], &[0xFF], &[0x01, 0x00], &[0x00, 0x00, 0x00]];

    for payload in bad_payloads {
        for op in [opcode::SET, opcode::SET_UNACK] {
            let mut server = published_server(LightState::Off);

            server.dispatch(&ctx_from(CLIENT), op, payload);

            assert_eq!(server.state(), LightState::Off);
            assert!(server.transport().replies.is_empty());
            assert!(server.transport().publishes.is_empty());
            assert!(server.hardware().writes.is_empty());
            assert_eq!(server.instance().transaction().last_source(), None);
        }
    }
}

#[test]
fn test_unknown_opcode_is_discarded() {
    let mut server = published_server(LightState::Off);

    server.dispatch(&ctx_from(CLIENT), opcode::STATUS, &[0x01]);
    server.dispatch(&ctx_from(CLIENT), 0x8240, &[]);

    assert!(server.transport().replies.is_empty());
    assert_eq!(server.state(), LightState::Off);
}

#[test]
fn test_hardware_fault_does_not_block_transition_or_publish() {
    let mut server = published_server(LightState::Off);
    server.hardware_mut().fail_writes = true;

    server.dispatch(&ctx_from(CLIENT), opcode::SET, &[0x01]);

    assert_eq!(server.state(), LightState::On);
    assert_eq!(server.transport().publishes, vec![(GROUP, 0x01)]);
    assert_eq!(server.transport().replies, vec![(CLIENT, 0x01)]);
    assert_eq!(server.store().saved, Some(LightState::On));
}

#[test]
fn test_redundant_set_resyncs_lamp_after_failed_write() {
    let mut server = published_server(LightState::Off);
    server.hardware_mut().fail_next_write = true;

    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);
    assert_eq!(server.hardware().level(OutputChannel::Lamp), Some(LightState::Off));

    // Wiederholung: kein Publish, aber Lampe folgt dem logischen Zustand
    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);
    assert_eq!(server.hardware().level(OutputChannel::Lamp), Some(LightState::On));
    assert_eq!(server.transport().publishes.len(), 1);
}

// ============================================================================
// Tests: Transport und Persistenz
// ============================================================================

#[test]
fn test_no_publish_without_publish_address() {
    let mut server = server_with(LightState::Off);

    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);

    assert!(server.transport().publishes.is_empty());
    assert_eq!(server.state(), LightState::On);
}

#[test]
fn test_set_always_replies_even_without_publish_address() {
    let mut server = server_with(LightState::On);

    server.dispatch(&ctx_from(OTHER_CLIENT), opcode::SET, &[0x01]);

    assert_eq!(server.transport().replies, vec![(OTHER_CLIENT, 0x01)]);
    assert!(server.transport().publishes.is_empty());
}

#[test]
fn test_reply_failure_is_not_fatal() {
    let mut server = published_server(LightState::Off);
    server.transport_mut().fail_replies = true;

    server.dispatch(&ctx_from(CLIENT), opcode::SET, &[0x01]);
    server.dispatch(&ctx_from(CLIENT), opcode::GET, &[]);

    assert_eq!(server.state(), LightState::On);
    assert_eq!(server.transport().publishes, vec![(GROUP, 0x01)]);
}

#[test]
fn test_publish_failure_keeps_state() {
    let mut server = published_server(LightState::Off);
    server.transport_mut().fail_publishes = true;

    let transition = server.set_unacknowledged(&ctx_from(CLIENT), LightState::On);

    assert!(transition.changed());
    assert!(!transition.published);
    assert_eq!(server.state(), LightState::On);
}

#[test]
fn test_state_is_saved_only_on_change() {
    let mut server = server_with(LightState::Off);

    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);
    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x01]);
    server.dispatch(&ctx_from(CLIENT), opcode::SET_UNACK, &[0x00]);

    assert_eq!(server.store().save_count, 2);
    assert_eq!(server.store().saved, Some(LightState::Off));
}

#[test]
fn test_get_does_not_touch_hardware() {
    let mut server = published_server(LightState::On);

    server.dispatch(&ctx_from(CLIENT), opcode::GET, &[]);

    assert!(server.hardware().writes.is_empty());
    assert!(server.transport().publishes.is_empty());
    assert_eq!(server.transport().replies, vec![(CLIENT, 0x01)]);
}
