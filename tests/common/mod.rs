//! Shared fakes for driving `PollEngine` from integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use evdev::Key;
use wiiclassic_keyboard::bus::PacketSource;
use wiiclassic_keyboard::controller::packet::RawPacket;
use wiiclassic_keyboard::engine::{EngineOptions, PollEngine};
use wiiclassic_keyboard::error::{BridgeError, Result};
use wiiclassic_keyboard::output::{EventSink, SystemControl};

/// Every button released, stick at 0x20.
pub const IDLE: [u8; 6] = [0x20, 0x20, 0x00, 0x00, 0xFF, 0xFF];

/// Builds a packet with the given stick value and button bytes.
pub fn packet(stick: u8, byte4: u8, byte5: u8) -> [u8; 6] {
    [stick, 0x20, 0x00, 0x00, byte4, byte5]
}

/// Replays packets in order, then fails like a dead bus.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pub packets: VecDeque<RawPacket>,
    pub reads: usize,
}

impl ScriptedSource {
    pub fn new<I: IntoIterator<Item = [u8; 6]>>(packets: I) -> Self {
        Self {
            packets: packets.into_iter().map(RawPacket::new).collect(),
            reads: 0,
        }
    }
}

impl PacketSource for ScriptedSource {
    fn read_packet(&mut self) -> Result<RawPacket> {
        self.reads += 1;
        self.packets
            .pop_front()
            .ok_or_else(|| BridgeError::I2c("script exhausted".to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Key(Key, bool),
    Sync,
    ReleaseAll,
    Close,
}

#[derive(Debug, Default)]
pub struct CapturingSink {
    pub log: Vec<Output>,
}

impl CapturingSink {
    pub fn keys(&self) -> Vec<(Key, bool)> {
        self.log
            .iter()
            .filter_map(|o| match o {
                Output::Key(key, pressed) => Some((*key, *pressed)),
                _ => None,
            })
            .collect()
    }

    pub fn syncs(&self) -> usize {
        self.log.iter().filter(|o| **o == Output::Sync).count()
    }
}

impl EventSink for CapturingSink {
    fn emit(&mut self, key: Key, pressed: bool) -> Result<()> {
        self.log.push(Output::Key(key, pressed));
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.log.push(Output::Sync);
        Ok(())
    }

    fn release_all(&mut self) -> Result<()> {
        self.log.push(Output::ReleaseAll);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.log.push(Output::Close);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CapturingSystem {
    pub volume_steps: Vec<u8>,
    pub halts: usize,
}

impl SystemControl for CapturingSystem {
    fn set_volume_step(&mut self, step: u8) -> Result<()> {
        self.volume_steps.push(step);
        Ok(())
    }

    fn halt_machine(&mut self) -> Result<()> {
        self.halts += 1;
        Ok(())
    }
}

pub type TestEngine = PollEngine<ScriptedSource, CapturingSink, CapturingSystem>;

pub fn engine_with_warmup<I: IntoIterator<Item = [u8; 6]>>(warmup_cycles: u32, packets: I) -> TestEngine {
    PollEngine::new(
        ScriptedSource::new(packets),
        CapturingSink::default(),
        CapturingSystem::default(),
        EngineOptions {
            warmup_cycles,
            verbose: true,
        },
    )
}

pub fn engine<I: IntoIterator<Item = [u8; 6]>>(packets: I) -> TestEngine {
    engine_with_warmup(0, packets)
}
