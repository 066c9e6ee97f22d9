//! Integration tests for the BridgeService → read queue / router pipeline.
//!
//! Configuration arrives as JSON, exactly as the telemetry client hands it
//! over, and every bus side effect is observed on the mock transport.

use knxmonitor::app::commands::{AppCommand, decode_command, decode_configure};
use knxmonitor::app::service::BridgeService;
use knxmonitor::config::{READ_TIMEOUT_MS, STATE_EXPIRY_MS};
use knxmonitor::input::{EventCode, EventName, InputType, RawInputEvent};
use knxmonitor::knx::{BusWrite, DimDirection, DimStep, GroupAddress, IndividualAddress, Telegram};
use knxmonitor::sync::ReadStep;

use crate::mock_hw::{BusCall, InputCall, MockBus, MockInputs, MockTelemetry};

fn ga(s: &str) -> GroupAddress {
    s.parse().unwrap()
}

fn peer() -> IndividualAddress {
    IndividualAddress::new(1, 1, 30).unwrap()
}

fn make_service(json: &str) -> (BridgeService, MockBus, MockInputs) {
    let mut svc = BridgeService::new(16);
    let mut bus = MockBus::new();
    let mut inputs = MockInputs::new();
    svc.handle_command(decode_configure(json).unwrap(), &mut inputs, &mut bus);
    (svc, bus, inputs)
}

fn event(index: usize, input_type: InputType, code: EventCode) -> RawInputEvent {
    RawInputEvent {
        index,
        input_type,
        code,
    }
}

// ── Scenario 1: state address configured → read queued ───────

#[test]
fn state_address_is_read_immediately() {
    let (mut svc, mut bus, _) =
        make_service(r#"{ "inputs": [ { "index": 1, "knxStateAddress": "1/1/1" } ] }"#);

    assert_eq!(svc.reads().iter().collect::<Vec<_>>(), [ga("1/1/1")]);
    assert_eq!(svc.tick(&mut bus, 0), ReadStep::Sent(ga("1/1/1")));
    assert_eq!(bus.reads(), [ga("1/1/1")]);
}

// ── Scenario 2: expiry re-reads a silent address ──────────────

#[test]
fn stale_state_is_re_read_after_expiry_window() {
    let (mut svc, mut bus, _) =
        make_service(r#"{ "inputs": [ { "index": 1, "knxStateAddress": "1/1/1" } ] }"#);
    svc.tick(&mut bus, 0);
    bus.deliver(Telegram::group_answer_bool(peer(), ga("1/1/1"), false));
    svc.poll_bus(&mut bus, 100);

    // Fresh for the whole window.
    assert_eq!(svc.tick(&mut bus, 100), ReadStep::Idle);
    assert_eq!(svc.tick(&mut bus, 100 + STATE_EXPIRY_MS), ReadStep::Idle);
    assert!(svc.reads().is_idle());

    // One millisecond past: queued by the scanner, sent on the next tick.
    assert_eq!(svc.tick(&mut bus, 101 + STATE_EXPIRY_MS), ReadStep::Idle);
    assert_eq!(svc.reads().iter().collect::<Vec<_>>(), [ga("1/1/1")]);
    assert_eq!(svc.tick(&mut bus, 102 + STATE_EXPIRY_MS), ReadStep::Sent(ga("1/1/1")));
    assert_eq!(bus.reads(), [ga("1/1/1"), ga("1/1/1")]);
}

// ── Scenario 3: inbound write resolves the in-flight read ────

#[test]
fn inbound_write_updates_cache_and_cancels_retry() {
    let (mut svc, mut bus, _) =
        make_service(r#"{ "inputs": [ { "index": 1, "knxStateAddress": "1/1/1" } ] }"#);
    svc.tick(&mut bus, 0);
    assert!(svc.reads().in_flight().is_some());

    bus.deliver(Telegram::group_write_bool(peer(), ga("1/1/1"), true));
    svc.poll_bus(&mut bus, 10);

    assert_eq!(bus.acked, [true]);
    let input = svc.inputs().get(1).unwrap();
    assert!(input.cached_state);
    assert_eq!(input.last_update_ms, 10);
    assert!(svc.reads().in_flight().is_none());

    // Well past the timeout: nothing to retry.
    assert_eq!(svc.tick(&mut bus, READ_TIMEOUT_MS + 100), ReadStep::Idle);
    assert_eq!(bus.reads(), [ga("1/1/1")]);
}

#[test]
fn unanswered_read_is_retried_at_the_tail() {
    let (mut svc, mut bus, _) = make_service(
        r#"{ "inputs": [ { "index": 1, "knxStateAddress": "1/1/1" },
                         { "index": 2, "knxStateAddress": "1/1/2" } ] }"#,
    );
    assert_eq!(svc.tick(&mut bus, 0), ReadStep::Sent(ga("1/1/1")));
    assert_eq!(svc.tick(&mut bus, READ_TIMEOUT_MS), ReadStep::Waiting(ga("1/1/1")));
    assert_eq!(svc.tick(&mut bus, READ_TIMEOUT_MS + 1), ReadStep::Retried(ga("1/1/1")));
    assert_eq!(svc.tick(&mut bus, READ_TIMEOUT_MS + 2), ReadStep::Sent(ga("1/1/2")));

    // A late answer for 1/1/1 still lands in the cache but does not
    // resolve the read for 1/1/2.
    bus.deliver(Telegram::group_answer_bool(peer(), ga("1/1/1"), true));
    svc.poll_bus(&mut bus, READ_TIMEOUT_MS + 3);
    assert!(svc.inputs().get(1).unwrap().cached_state);
    assert_eq!(svc.reads().in_flight().map(|r| r.address), Some(ga("1/1/2")));
    assert_eq!(svc.reads().iter().collect::<Vec<_>>(), [ga("1/1/1")]);
}

#[test]
fn uninteresting_telegrams_are_not_acked() {
    let (mut svc, mut bus, _) =
        make_service(r#"{ "inputs": [ { "index": 1, "knxStateAddress": "1/1/1" } ] }"#);
    bus.deliver(Telegram::group_write_bool(peer(), ga("4/4/4"), true));
    svc.poll_bus(&mut bus, 5);
    assert_eq!(bus.acked, [false]);
    assert!(!svc.inputs().get(1).unwrap().cached_state);
}

// ── Scenario 4: button toggles from cached state ──────────────

#[test]
fn button_single_press_toggles_cached_state() {
    let (mut svc, mut bus, _) = make_service(
        r#"{ "inputs": [ { "index": 2, "type": "button",
                           "knxCommandAddress": "1/1/2", "knxStateAddress": "1/1/12" } ] }"#,
    );
    let mut telemetry = MockTelemetry::connected();
    let press = event(2, InputType::Button, EventCode::Presses(1));

    svc.handle_input_event(&press, &mut telemetry, &mut bus);
    assert_eq!(bus.writes(), [(ga("1/1/2"), BusWrite::Bool(true))]);

    // The actuator reports back; the next press switches it off.
    bus.deliver(Telegram::group_write_bool(peer(), ga("1/1/12"), true));
    svc.poll_bus(&mut bus, 50);
    svc.handle_input_event(&press, &mut telemetry, &mut bus);
    assert_eq!(
        bus.writes(),
        [(ga("1/1/2"), BusWrite::Bool(true)), (ga("1/1/2"), BusWrite::Bool(false))]
    );

    assert_eq!(telemetry.published.len(), 2);
    assert_eq!(telemetry.published[0].event, EventName::Single);
    assert_eq!((telemetry.published[0].port, telemetry.published[0].channel), (1, 2));
}

// ── Scenario 5: rotary dims ───────────────────────────────────

#[test]
fn rotary_low_dims_up_by_five() {
    let (mut svc, mut bus, _) = make_service(
        r#"{ "inputs": [ { "index": 3, "type": "rotary", "knxCommandAddress": "1/1/3" } ] }"#,
    );
    let mut telemetry = MockTelemetry::connected();

    svc.handle_input_event(&event(3, InputType::Rotary, EventCode::Low), &mut telemetry, &mut bus);

    assert_eq!(
        bus.writes(),
        [(ga("1/1/3"), BusWrite::Dim(DimStep::new(DimDirection::Increase, 5)))]
    );
    assert_eq!(telemetry.published[0].event, EventName::Up);
}

// ── Failover routing ──────────────────────────────────────────

#[test]
fn failover_only_input_uses_bus_only_when_telemetry_is_down() {
    let (mut svc, mut bus, _) = make_service(
        r#"{ "inputs": [ { "index": 1, "type": "switch",
                           "knxCommandAddress": "2/0/1", "knxFailoverOnly": true } ] }"#,
    );
    let on = event(1, InputType::Switch, EventCode::Low);

    let mut up = MockTelemetry::connected();
    let delivery = svc.handle_input_event(&on, &mut up, &mut bus).unwrap();
    assert!(delivery.telemetry);
    assert!(bus.writes().is_empty());

    let mut down = MockTelemetry::disconnected();
    let delivery = svc.handle_input_event(&on, &mut down, &mut bus).unwrap();
    assert!(!delivery.telemetry);
    assert_eq!(bus.writes(), [(ga("2/0/1"), BusWrite::Bool(true))]);
}

#[test]
fn forced_failover_sends_everything_to_the_bus() {
    let (mut svc, mut bus, mut inputs) = make_service(
        r#"{ "inputs": [ { "index": 1, "type": "contact",
                           "knxCommandAddress": "2/0/1", "knxFailoverOnly": true } ] }"#,
    );
    for cmd in decode_command(r#"{ "forceFailover": true }"#).unwrap() {
        svc.handle_command(cmd, &mut inputs, &mut bus);
    }
    let mut telemetry = MockTelemetry::connected();

    svc.handle_input_event(&event(1, InputType::Contact, EventCode::High), &mut telemetry, &mut bus);

    assert!(telemetry.published.is_empty());
    assert_eq!(bus.writes(), [(ga("2/0/1"), BusWrite::Bool(false))]);
}

#[test]
fn events_for_undiscovered_inputs_are_dropped() {
    let (mut svc, mut bus, _) = make_service("{}");
    let mut telemetry = MockTelemetry::connected();
    assert!(
        svc.handle_input_event(&event(17, InputType::Switch, EventCode::Low), &mut telemetry, &mut bus)
            .is_none()
    );
    assert!(telemetry.published.is_empty());
}

// ── Reconfiguration ───────────────────────────────────────────

#[test]
fn reconfiguration_flushes_pending_and_in_flight_reads() {
    let (mut svc, mut bus, mut inputs) = make_service(
        r#"{ "inputs": [ { "index": 1, "knxStateAddress": "1/1/1" },
                         { "index": 2, "knxStateAddress": "1/1/2" } ] }"#,
    );
    svc.tick(&mut bus, 0);
    assert_eq!(svc.reads().in_flight().map(|r| r.address), Some(ga("1/1/1")));

    let reload = decode_configure(r#"{ "inputs": [ { "index": 1, "knxStateAddress": "1/1/1" } ] }"#).unwrap();
    svc.handle_command(reload, &mut inputs, &mut bus);

    // 1/1/2 is gone, 1/1/1 is queued afresh rather than resumed.
    assert!(svc.reads().in_flight().is_none());
    assert_eq!(svc.reads().iter().collect::<Vec<_>>(), [ga("1/1/1")]);
    assert_eq!(svc.tick(&mut bus, 1_000), ReadStep::Sent(ga("1/1/1")));
    assert_eq!(svc.reads().in_flight().map(|r| r.requested_at_ms), Some(1_000));
}

#[test]
fn reconfiguration_keeps_cached_state() {
    let (mut svc, mut bus, mut inputs) =
        make_service(r#"{ "inputs": [ { "index": 1, "knxStateAddress": "1/1/1" } ] }"#);
    bus.deliver(Telegram::group_write_bool(peer(), ga("1/1/1"), true));
    svc.poll_bus(&mut bus, 20);

    let reload = decode_configure(r#"{ "inputs": [ { "index": 1, "type": "toggle" } ] }"#).unwrap();
    svc.handle_command(reload, &mut inputs, &mut bus);

    let input = svc.inputs().get(1).unwrap();
    assert!(input.cached_state);
    assert_eq!(input.last_update_ms, 20);
    assert_eq!(input.input_type, InputType::Toggle);
}

#[test]
fn bad_fields_are_skipped_and_good_ones_applied() {
    let (svc, _, inputs) = make_service(
        r#"{ "inputs": [ { "index": 1, "type": "lever", "invert": true,
                           "knxCommandAddress": "32/0/0", "knxStateAddress": "3/1/9" },
                         { "type": "button" },
                         { "index": 99, "type": "button" } ] }"#,
    );
    let input = svc.inputs().get(1).unwrap();
    assert_eq!(input.input_type, InputType::Switch);
    assert!(input.invert);
    assert_eq!(input.command_address, None);
    assert_eq!(input.state_address, Some(ga("3/1/9")));
    assert_eq!(inputs.calls, [InputCall::SetInvert(1, true)]);
}

#[test]
fn classifier_settings_are_forwarded() {
    let (_, bus, inputs) = make_service(
        r#"{ "knxDeviceAddress": "1.1.50", "defaultInputType": "contact",
             "inputs": [ { "index": 4, "type": "security", "disabled": true } ] }"#,
    );
    assert_eq!(bus.calls, [BusCall::SetAddress(IndividualAddress::new(1, 1, 50).unwrap())]);
    assert_eq!(inputs.calls.len(), 16 + 2);
    assert_eq!(inputs.calls[0], InputCall::SetType(1, InputType::Contact));
    assert_eq!(
        inputs.calls[16..],
        [InputCall::SetType(4, InputType::Security), InputCall::SetDisabled(4, true)]
    );
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn direct_commands_bypass_the_event_pipeline() {
    let (mut svc, mut bus, mut inputs) = make_service("{}");
    let cmds = decode_command(
        r#"{ "queryInputs": true,
             "knxCommands": [ { "knxGroupAddress": "5/1/1", "knxValue": "off" },
                              { "knxGroupAddress": "5/1/2", "knxValue": "up" } ] }"#,
    )
    .unwrap();
    for cmd in cmds {
        svc.handle_command(cmd, &mut inputs, &mut bus);
    }

    assert_eq!(inputs.calls, [InputCall::Query]);
    assert_eq!(
        bus.writes(),
        [
            (ga("5/1/1"), BusWrite::Bool(false)),
            (ga("5/1/2"), BusWrite::Dim(DimStep::new(DimDirection::Increase, 5))),
        ]
    );
    assert!(matches!(decode_configure("{}").unwrap(), AppCommand::Configure(_)));
}
