//! Integration tests for the ControllerService → FSM → heater pipeline.
//!
//! These run on the host (x86_64) and drive whole control cycles through
//! mock adapters: command bytes in on a `MemoryLink`, scripted probe
//! readings, recorded heater writes and status lines out.

use crate::mock_hw::{MockHardware, RecordingSink};

use ezbake::adapters::hardware::HardwareAdapter;
use ezbake::adapters::serial::MemoryLink;
use ezbake::app::events::ControllerEvent;
use ezbake::app::service::ControllerService;
use ezbake::config::ControllerConfig;
use ezbake::drivers::heater::HeaterDriver;
use ezbake::error::{ParseError, ProbeFault};
use ezbake::fsm::SafetyMode;
use ezbake::fsm::context::ProbeReading::{Celsius, Disconnected};
use ezbake::sensors::sim::{SimProbes, sim_set_all, sim_set_probe};

struct Bench {
    svc: ControllerService,
    hw: MockHardware,
    link: MemoryLink,
    sink: RecordingSink,
}

impl Bench {
    fn new(values: &[f32]) -> Self {
        let mut svc = ControllerService::new(ControllerConfig::default());
        let mut hw = MockHardware::steady(values);
        let mut sink = RecordingSink::new();
        svc.start(&mut hw, &mut sink);
        Self {
            svc,
            hw,
            link: MemoryLink::new(),
            sink,
        }
    }

    fn cycle(&mut self) -> String {
        self.svc.tick(&mut self.hw, &mut self.link, &mut self.sink);
        let mut lines = self.link.take_lines();
        assert_eq!(lines.len(), 1, "exactly one status line per cycle");
        lines.remove(0)
    }

    fn send(&mut self, bytes: &[u8]) -> String {
        self.link.push_input(bytes);
        self.cycle()
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_drives_heater_off_and_reports_normal() {
    let mut b = Bench::new(&[20.0, 22.0]);
    assert_eq!(b.hw.heater_writes, vec![false]);
    assert_eq!(b.sink.events[0], ControllerEvent::Started(SafetyMode::Normal));

    // Setpoint 0: mean 21 is not below it, heater stays off.
    let line = b.cycle();
    assert_eq!(line, "20.00 22.00 0 0.00 0");
    assert_eq!(b.hw.heater_writes, vec![false]);
}

// ── Bang-bang + debounce ──────────────────────────────────────

#[test]
fn heater_switches_on_first_cycle_then_holds() {
    let mut b = Bench::new(&[20.0, 22.0]);

    let line = b.send(b"<25.0>");
    assert_eq!(line, "20.00 22.00 1 25.00 0");
    assert!(b.hw.heater());
    assert_eq!(b.svc.debounce_counter(), 0);

    // Intent unchanged, counter 1: output holds, no extra write.
    let line = b.cycle();
    assert_eq!(line, "20.00 22.00 1 25.00 0");
    assert_eq!(b.svc.debounce_counter(), 1);
    assert_eq!(b.hw.heater_writes, vec![false, true]);
}

#[test]
fn switch_off_waits_for_dwell() {
    let mut b = Bench::new(&[20.0, 22.0]);
    b.send(b"<25>");
    assert!(b.hw.heater());

    // Chamber overshoots right away; the next cycle may not switch.
    b.hw.set_readings(&[Celsius(30.0), Celsius(30.0)]);
    b.svc.tick(&mut b.hw, &mut b.link, &mut b.sink);
    assert!(b.hw.heater(), "switch within the dwell window");

    b.svc.tick(&mut b.hw, &mut b.link, &mut b.sink);
    assert!(!b.hw.heater());
    assert_eq!(b.hw.heater_writes, vec![false, true, false]);
}

#[test]
fn oscillating_chamber_never_chatters() {
    let mut b = Bench::new(&[20.0]);
    b.send(b"<25>");

    let mut last_toggle: Option<usize> = None;
    let mut prev = b.hw.heater();
    for i in 0..40 {
        let t = if i % 2 == 0 { 30.0 } else { 20.0 };
        b.hw.set_readings(&[Celsius(t)]);
        b.cycle();
        if b.hw.heater() != prev {
            if let Some(last) = last_toggle {
                assert!(i - last >= 2, "toggles at cycles {last} and {i}");
            }
            last_toggle = Some(i);
            prev = b.hw.heater();
        }
    }
    assert!(last_toggle.is_some());
}

#[test]
fn nan_probe_is_excluded_from_mean() {
    let mut b = Bench::new(&[]);
    b.hw.set_readings(&[Celsius(f32::NAN), Celsius(30.0)]);

    let line = b.send(b"<25>");
    assert_eq!(line, "nan 30.00 0 25.00 0");
    assert_eq!(b.svc.mode(), SafetyMode::Normal);
    assert!(!b.hw.heater());
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn frame_split_across_cycles_applies_once() {
    let mut b = Bench::new(&[20.0]);
    for &byte in b"<42.5>" {
        b.send(&[byte]);
    }
    assert!(approx(b.svc.setpoint(), 42.5));
    assert_eq!(
        b.sink.count(|e| matches!(e, ControllerEvent::SetpointChanged { .. })),
        1
    );
}

#[test]
fn one_frame_per_cycle() {
    let mut b = Bench::new(&[20.0]);
    b.send(b"<10><20>");
    assert!(approx(b.svc.setpoint(), 10.0));
    b.cycle();
    assert!(approx(b.svc.setpoint(), 20.0));
}

#[test]
fn malformed_frame_sets_zero() {
    let mut b = Bench::new(&[20.0]);
    b.send(b"<50>");
    assert!(b.hw.heater());

    let line = b.send(b"<abc>");
    assert!(approx(b.svc.setpoint(), 0.0));
    assert!(line.ends_with("0.00 0"));
    assert_eq!(
        b.sink.count(|e| *e == ControllerEvent::MalformedCommand(ParseError::NoNumber)),
        1
    );
}

#[test]
fn value_in_gap_is_ignored() {
    let mut b = Bench::new(&[20.0]);
    b.send(b"<30>");
    b.send(b"<500>");
    assert!(approx(b.svc.setpoint(), 30.0));
    assert_eq!(b.svc.mode(), SafetyMode::Normal);
    assert!(b
        .sink
        .events
        .iter()
        .any(|e| matches!(e, ControllerEvent::CommandIgnored(v) if approx(*v, 500.0))));
}

#[test]
fn overflowed_frame_still_parses_prefix() {
    let mut b = Bench::new(&[20.0]);
    let mut frame = b"<2.5".to_vec();
    frame.extend(std::iter::repeat_n(b'0', 40));
    frame.push(b'>');

    b.send(&frame);
    assert!(approx(b.svc.setpoint(), 2.5));
    assert_eq!(b.sink.count(|e| *e == ControllerEvent::FrameOverflow), 1);
}

// ── Operator stop ─────────────────────────────────────────────

#[test]
fn estop_latches_and_forces_heater_off() {
    let mut b = Bench::new(&[20.0, 22.0]);
    b.send(b"<25>");
    assert!(b.hw.heater());

    // Debounce would hold the heater on; the stop bypasses it.
    let line = b.send(b"<1500>");
    assert_eq!(line, "20.00 22.00 0 0.00 1");
    assert_eq!(b.svc.mode(), SafetyMode::OperatorStop);
    assert!(!b.hw.heater());

    // Later setpoints and healthy readings change nothing.
    for _ in 0..5 {
        let line = b.send(b"<40>");
        assert_eq!(line, "20.00 22.00 0 0.00 1");
    }
    assert!(!b.hw.heater());
    assert_eq!(b.hw.heater_writes, vec![false, true, false]);
}

#[test]
fn estop_threshold_is_inclusive() {
    let mut b = Bench::new(&[20.0]);
    b.send(b"<1000>");
    assert_eq!(b.svc.mode(), SafetyMode::OperatorStop);
}

#[test]
fn fault_during_operator_stop_escalates() {
    let mut b = Bench::new(&[20.0]);
    b.send(b"<9999>");
    b.hw.set_readings(&[Disconnected]);
    let line = b.cycle();
    assert_eq!(line, "-127.00 0 0.00 2");
    assert_eq!(b.svc.mode(), SafetyMode::FaultStop);
}

// ── Fault stop ────────────────────────────────────────────────

#[test]
fn out_of_range_probe_faults_immediately() {
    let mut b = Bench::new(&[20.0, 22.0]);
    b.send(b"<25>");

    b.hw.set_readings(&[Celsius(20.0), Celsius(150.5)]);
    let line = b.cycle();
    assert_eq!(line, "20.00 150.50 0 0.00 2");
    assert_eq!(b.svc.mode(), SafetyMode::FaultStop);
    assert!(!b.hw.heater());
    assert_eq!(
        b.svc.last_fault(),
        Some(ProbeFault::OutOfRange { probe: 1, celsius: 150.5 })
    );
}

#[test]
fn legal_bounds_are_inclusive() {
    let mut b = Bench::new(&[-20.0, 150.0]);
    b.cycle();
    assert_eq!(b.svc.mode(), SafetyMode::Normal);
}

#[test]
fn fault_stop_is_terminal() {
    let mut b = Bench::new(&[20.0]);
    b.hw.push_cycle(&[Celsius(-25.0)]);
    b.hw.push_cycle(&[Celsius(20.0)]);
    b.cycle();
    assert_eq!(b.svc.mode(), SafetyMode::FaultStop);

    // Readings recover, commands arrive, estop arrives: still FaultStop.
    b.send(b"<30>");
    b.send(b"<2000>");
    let line = b.cycle();
    assert_eq!(line, "20.00 0 0.00 2");
    assert_eq!(b.svc.mode(), SafetyMode::FaultStop);
    assert!(approx(b.svc.setpoint(), 0.0));
    assert_eq!(
        b.svc.last_fault(),
        Some(ProbeFault::OutOfRange { probe: 0, celsius: -25.0 })
    );
}

#[test]
fn all_nan_readings_fault() {
    let mut b = Bench::new(&[]);
    b.hw.set_readings(&[Celsius(f32::NAN), Celsius(f32::NAN)]);
    b.send(b"<25>");
    assert_eq!(b.svc.mode(), SafetyMode::FaultStop);
    assert_eq!(b.svc.last_fault(), Some(ProbeFault::NoValidReadings));
    assert!(!b.hw.heater());
}

#[test]
fn runaway_readings_still_report() {
    let mut b = Bench::new(&[20.0; 6]);
    b.hw.set_readings(&[Celsius(1.0e30); 6]);

    let line = b.cycle();
    assert_eq!(b.svc.mode(), SafetyMode::FaultStop);
    assert!(line.ends_with(" 0 0.00 2"));
    assert_eq!(line.split(' ').count(), 6 + 3);
    assert_eq!(b.sink.count(|e| *e == ControllerEvent::StatusDropped), 0);
}

#[test]
fn fault_event_emitted_once() {
    let mut b = Bench::new(&[20.0]);
    b.hw.set_readings(&[Disconnected]);
    for _ in 0..3 {
        b.cycle();
    }
    assert_eq!(
        b.sink.count(|e| matches!(e, ControllerEvent::FaultDetected(_))),
        1
    );
    assert_eq!(
        b.sink.count(|e| matches!(
            e,
            ControllerEvent::ModeChanged { from: SafetyMode::Normal, to: SafetyMode::FaultStop }
        )),
        1
    );
}

// ── Reporting ─────────────────────────────────────────────────

#[test]
fn failed_status_write_does_not_stop_control() {
    let mut b = Bench::new(&[20.0]);
    b.link.set_write_failure(true);
    b.link.push_input(b"<25>");
    b.svc.tick(&mut b.hw, &mut b.link, &mut b.sink);

    assert!(b.hw.heater());
    assert!(b.link.output().is_empty());
    assert_eq!(b.sink.count(|e| *e == ControllerEvent::StatusDropped), 1);
    assert_eq!(b.svc.last_status().map(|s| s.heater_on), Some(true));
}

#[test]
fn status_event_matches_wire_line() {
    let mut b = Bench::new(&[21.0]);
    let line = b.send(b"<22.5>");
    let report = b.svc.last_status().cloned().unwrap();
    assert_eq!(report.render().unwrap().trim_end(), line);
    assert!(b
        .sink
        .events
        .iter()
        .any(|e| *e == ControllerEvent::Status(report.clone())));
}

// ── Simulated probes behind the hardware adapter ──────────────

#[test]
fn sim_probes_drive_the_service() {
    sim_set_all(20.0);
    let mut hw = HardwareAdapter::new(SimProbes::new(3), HeaterDriver::new());
    let mut link = MemoryLink::new();
    let mut sink = RecordingSink::new();
    let mut svc = ControllerService::new(ControllerConfig::default());
    svc.start(&mut hw, &mut sink);

    link.push_input(b"<25>");
    svc.tick(&mut hw, &mut link, &mut sink);
    assert!(svc.heater_on());
    assert_eq!(hw.heater_switch_count(), 1);

    sim_set_probe(2, Disconnected);
    svc.tick(&mut hw, &mut link, &mut sink);
    assert_eq!(svc.mode(), SafetyMode::FaultStop);
    assert!(!svc.heater_on());
    assert_eq!(
        link.take_lines().last().map(String::as_str),
        Some("20.00 20.00 -127.00 0 0.00 2")
    );
    sim_set_all(21.0);
}
