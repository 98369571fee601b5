//! End-to-end poll cycles through `PollEngine` with scripted hardware.

mod common;

use common::*;
use evdev::Key;
use wiiclassic_keyboard::engine::{CycleOutcome, EngineState};

// ==================== Warmup ====================

#[test]
fn test_first_twenty_cycles_never_emit() {
    // Every read alternates between "everything but ZL and Select pressed"
    // and "all released".
    let packets: Vec<[u8; 6]> = (0..21)
        .map(|i| if i % 2 == 0 { packet(0x10, 0x10, 0x80) } else { IDLE })
        .collect();
    let mut engine = engine_with_warmup(20, packets);

    for _ in 0..20 {
        assert!(matches!(engine.poll_once().unwrap(), CycleOutcome::WarmingUp { .. }));
    }
    assert!(engine.sink().log.is_empty());
    assert!(engine.system().volume_steps.is_empty());
    assert_eq!(engine.source().reads, 20);

    // Cycle 21 is the first one compared, against an all-released baseline.
    assert_eq!(engine.poll_once().unwrap(), CycleOutcome::Processed { edges: 13 });
    assert_eq!(engine.sink().keys().len(), 13);
    assert_eq!(engine.system().halts, 0);
}

#[test]
fn test_warmup_still_reads_the_bus() {
    let mut engine = engine_with_warmup(2, [IDLE]);
    engine.poll_once().unwrap();
    // Second read hits the end of the script and fails even during warmup.
    assert!(engine.poll_once().is_err());
    assert_eq!(engine.state(), EngineState::Warmup);
}

// ==================== Decode + Diff ====================

#[test]
fn test_scenario_packet_presses_only_up() {
    let mut engine = engine([[0x20, 0x10, 0x00, 0x00, 0xFF, 0xFE]]);

    assert_eq!(engine.poll_once().unwrap(), CycleOutcome::Processed { edges: 1 });
    assert_eq!(engine.sink().log, vec![Output::Key(Key::KEY_UP, true), Output::Sync]);
    // Stick at 0x20 is far from the initial step 0.
    assert_eq!(engine.system().volume_steps, vec![0x20]);
}

#[test]
fn test_batch_is_ordered_and_synced_once_per_cycle() {
    // Press A (b5 bit4), Start (b4 bit2), ZR (b5 bit2) in one read.
    let pressed = packet(0x20, !0b0000_0100, !0b0001_0100);
    let mut engine = engine([IDLE, pressed, IDLE]);

    for _ in 0..3 {
        engine.poll_once().unwrap();
    }

    assert_eq!(
        engine.sink().log,
        vec![
            Output::Sync,
            Output::Key(Key::KEY_X, true),
            Output::Key(Key::KEY_J, true),
            Output::Key(Key::KEY_O, true),
            Output::Sync,
            Output::Key(Key::KEY_X, false),
            Output::Key(Key::KEY_J, false),
            Output::Key(Key::KEY_O, false),
            Output::Sync,
        ]
    );
}

#[test]
fn test_held_button_emits_once() {
    let held = packet(0x20, 0xFF, !0b0100_0000); // B
    let mut engine = engine([held, held, held, held]);

    for _ in 0..4 {
        engine.poll_once().unwrap();
    }
    assert_eq!(engine.sink().keys(), vec![(Key::KEY_Z, true)]);
    assert_eq!(engine.sink().syncs(), 4);
}

// ==================== Glitch Filter ====================

#[test]
fn test_glitch_read_emits_nothing() {
    let glitch = [0x3F, 0xFF, 0xFF, 0x00, 0x00, 0x00];
    let mut engine = engine([IDLE, glitch, IDLE]);

    engine.poll_once().unwrap();
    assert_eq!(engine.poll_once().unwrap(), CycleOutcome::Glitched);
    assert_eq!(engine.poll_once().unwrap(), CycleOutcome::Processed { edges: 0 });

    assert!(engine.sink().keys().is_empty());
    assert_eq!(engine.sink().syncs(), 2);
    assert_eq!(engine.system().volume_steps, vec![0x20]);
    assert_eq!(engine.system().halts, 0);
}

#[test]
fn test_glitch_does_not_trigger_shutdown() {
    // Buttons bytes all low would decode ZL + Select.
    let glitch = [0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00];
    let mut engine = engine([glitch, IDLE]);

    assert_eq!(engine.poll_once().unwrap(), CycleOutcome::Glitched);
    assert_eq!(engine.state(), EngineState::Active);
    assert_eq!(engine.system().halts, 0);
}

// ==================== Volume ====================

#[test]
fn test_volume_hysteresis_sequence() {
    let stick = |x| packet(x, 0xFF, 0xFF);
    let mut engine = engine([stick(10), stick(11), stick(9), stick(12), stick(11), stick(8)]);

    for _ in 0..6 {
        engine.poll_once().unwrap();
    }
    // 10 (from 0), 11 and 9 suppressed, 12, 11 suppressed, 8 is more than one below 12.
    assert_eq!(engine.system().volume_steps, vec![10, 12, 8]);
    assert_eq!(engine.volume_step(), 8);
}

#[test]
fn test_resting_stick_at_zero_never_changes_volume() {
    let mut engine = engine([packet(0, 0xFF, 0xFF), packet(1, 0xFF, 0xFF), packet(0, 0xFF, 0xFF)]);
    for _ in 0..3 {
        engine.poll_once().unwrap();
    }
    assert!(engine.system().volume_steps.is_empty());
}

// ==================== Shutdown ====================

#[test]
fn test_shutdown_combo_halts_once_and_stops_reading() {
    let combo = packet(0x00, !0b0001_0000, !0b1000_0000); // Select + ZL
    let mut engine = engine([IDLE, combo, IDLE, IDLE]);

    engine.poll_once().unwrap();
    assert_eq!(engine.poll_once().unwrap(), CycleOutcome::Terminated);

    for _ in 0..3 {
        assert_eq!(engine.poll_once().unwrap(), CycleOutcome::Terminated);
    }
    assert_eq!(engine.system().halts, 1);
    assert_eq!(engine.source().reads, 2);
    assert_eq!(engine.sink().log.last(), Some(&Output::Close));
}

#[test]
fn test_shutdown_runs_after_volume() {
    let combo = packet(0x30, !0b0001_0000, !0b1000_0000);
    let mut engine = engine([combo]);

    assert_eq!(engine.poll_once().unwrap(), CycleOutcome::Terminated);
    assert_eq!(engine.system().volume_steps, vec![0x30]);
    assert_eq!(engine.system().halts, 1);
}

#[test]
fn test_partial_combo_does_not_halt() {
    let zl_only = packet(0x20, 0xFF, !0b1000_0000);
    let select_only = packet(0x20, !0b0001_0000, 0xFF);
    let mut engine = engine([zl_only, select_only, IDLE]);

    for _ in 0..3 {
        assert!(matches!(engine.poll_once().unwrap(), CycleOutcome::Processed { .. }));
    }
    assert_eq!(engine.system().halts, 0);
}

// ==================== Errors ====================

#[test]
fn test_read_failure_surfaces_as_error() {
    let mut engine = engine([IDLE]);
    engine.poll_once().unwrap();

    let err = engine.poll_once().unwrap_err();
    assert!(err.to_string().contains("I2C"));
}
