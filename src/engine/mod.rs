//! # Poll Engine
//!
//! Drives one poll cycle at a time:
//!
//! ```text
//! read -> warmup gate -> glitch filter -> decode -> diff -> emit + sync
//!      -> volume policy -> shutdown combo -> retain state
//! ```
//!
//! The engine is a small state machine:
//!
//! - **Warmup**: reads are performed and thrown away.
//! - **Active**: the full pipeline runs on every read.
//! - **Terminated**: the shutdown combo fired; no further reads happen.
//!
//! The engine never sleeps. The caller decides when the next cycle runs.
//! A failed packet read is returned as an error; failures of the event sink
//! or system commands are logged and do not change the state machine.

pub mod shutdown;
pub mod volume;
pub mod warmup;

use tracing::{debug, info, trace, warn};

use crate::bus::PacketSource;
use crate::controller::diff::diff;
use crate::controller::keymap::key_for;
use crate::controller::packet::RawPacket;
use crate::controller::state::ControllerState;
use crate::error::Result;
use crate::output::{EventSink, SystemControl};

use shutdown::is_shutdown_combo;
use volume::VolumePolicy;
use warmup::{WarmupGate, DEFAULT_WARMUP_CYCLES};

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Warmup,
    Active,
    Terminated,
}

/// What a single call to [`PollEngine::poll_once`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Read discarded during startup.
    WarmingUp { remaining: u32 },
    /// Read carried the glitch pattern and was dropped.
    Glitched,
    /// Read went through the pipeline, producing `edges` key events.
    Processed { edges: usize },
    /// Shutdown combo handled; the loop should stop.
    Terminated,
}

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub warmup_cycles: u32,
    /// Log every raw packet and decoded state at `info`.
    pub verbose: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            warmup_cycles: DEFAULT_WARMUP_CYCLES,
            verbose: false,
        }
    }
}

/// Packet-to-keyboard pipeline.
///
/// # Examples
///
/// ```no_run
/// use wiiclassic_keyboard::bus::WiiClassicI2c;
/// use wiiclassic_keyboard::config::Config;
/// use wiiclassic_keyboard::engine::{CycleOutcome, EngineOptions, PollEngine};
/// use wiiclassic_keyboard::output::{ShellSystemControl, VirtualKeyboard};
///
/// let config = Config::default();
/// let source = WiiClassicI2c::open(&config.i2c)?;
/// let sink = VirtualKeyboard::create(&config.input.device_name)?;
/// let system = ShellSystemControl::new(config.volume.clone(), config.shutdown.clone());
///
/// let mut engine = PollEngine::new(source, sink, system, EngineOptions::default());
/// while engine.poll_once()? != CycleOutcome::Terminated {
///     std::thread::sleep(std::time::Duration::from_millis(5));
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct PollEngine<S, E, C> {
    source: S,
    sink: E,
    system: C,
    warmup: WarmupGate,
    volume: VolumePolicy,
    previous: ControllerState,
    state: EngineState,
    verbose: bool,
}

impl<S, E, C> PollEngine<S, E, C>
where
    S: PacketSource,
    E: EventSink,
    C: SystemControl,
{
    pub fn new(source: S, sink: E, system: C, options: EngineOptions) -> Self {
        Self {
            source,
            sink,
            system,
            warmup: WarmupGate::new(options.warmup_cycles),
            volume: VolumePolicy::new(),
            previous: ControllerState::default(),
            state: EngineState::Warmup,
            verbose: options.verbose,
        }
    }

    /// Runs one poll cycle.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the packet read fails. The caller
    /// should treat this as fatal.
    pub fn poll_once(&mut self) -> Result<CycleOutcome> {
        if self.state == EngineState::Terminated {
            return Ok(CycleOutcome::Terminated);
        }

        let packet = self.source.read_packet()?;

        if self.state == EngineState::Warmup {
            if !self.warmup.admit() {
                trace!("Discarding warmup read: {}", packet);
                if self.warmup.is_complete() {
                    info!("Warmup complete, controller active");
                    self.state = EngineState::Active;
                }
                return Ok(CycleOutcome::WarmingUp {
                    remaining: self.warmup.remaining(),
                });
            }
            self.state = EngineState::Active;
        }

        Ok(self.process(&packet))
    }

    fn process(&mut self, packet: &RawPacket) -> CycleOutcome {
        if self.verbose {
            info!("{}", packet);
        } else {
            trace!("Packet: {}", packet);
        }

        if packet.is_glitch() {
            debug!("Dropping glitched read: {}", packet);
            return CycleOutcome::Glitched;
        }

        let current = ControllerState::decode(packet);
        if self.verbose {
            info!("{}", current);
        } else {
            trace!("State: {}", current);
        }

        let edges = diff(&self.previous, &current);
        // Fields whose edge was not delivered keep their previous value and
        // are diffed again next cycle.
        let mut retained = current;
        for edge in &edges {
            let key = key_for(edge.button);
            if let Err(e) = self.sink.emit(key, edge.pressed) {
                warn!("Failed to emit {:?} for {:?}: {}", key, edge.button, e);
                retained.set_pressed(edge.button, !edge.pressed);
                debug!("{:?} left at its previous value, retrying next cycle", edge.button);
            }
        }
        if let Err(e) = self.sink.sync() {
            warn!("Failed to sync key events: {}", e);
        }

        if let Some(step) = self.volume.update(current.left_stick_x()) {
            debug!("Volume step -> {}", step);
            if let Err(e) = self.system.set_volume_step(step) {
                warn!("Failed to set volume step {}: {}", step, e);
            }
        }

        if is_shutdown_combo(&current) {
            self.shutdown();
            return CycleOutcome::Terminated;
        }

        self.previous = retained;
        CycleOutcome::Processed { edges: edges.len() }
    }

    fn shutdown(&mut self) {
        info!("Shutdown combo (ZL + Select) detected");

        if let Err(e) = self.sink.close() {
            warn!("Failed to close virtual keyboard cleanly: {}", e);
        }
        if let Err(e) = self.system.halt_machine() {
            warn!("Failed to halt machine: {}", e);
        }
        self.state = EngineState::Terminated;
    }

    /// Releases every held key. Used when the process is stopped from outside.
    pub fn release_all(&mut self) -> Result<()> {
        self.sink.release_all()?;
        self.previous = ControllerState::default();
        Ok(())
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Last state that went through the pipeline.
    pub fn previous(&self) -> &ControllerState {
        &self.previous
    }

    /// Last volume step issued.
    pub fn volume_step(&self) -> u8 {
        self.volume.step()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn system(&self) -> &C {
        &self.system
    }
}
