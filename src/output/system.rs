//! # System Control
//!
//! Side effects outside the input subsystem: setting the mixer volume and
//! halting the machine. Both are fire-and-forget shell commands in
//! production; the engine only sees the [`SystemControl`] trait.
//!
//! ## Volume Steps
//!
//! The stick axis selects one of 64 steps. Step 0 is full volume (`0db`)
//! and each further step lowers the mixer by `attenuation_per_step` amixer
//! units, so with the default of 50 step 63 is `-3150db`.

use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::{ShutdownConfig, VolumeConfig};
use crate::controller::state::AXIS_MAX;
use crate::error::{BridgeError, Result};

/// Number of discrete volume steps.
pub const VOLUME_STEPS: usize = AXIS_MAX as usize + 1;

/// Mixer binary used for volume changes.
const AMIXER: &str = "amixer";

/// External actions triggered by the controller.
#[cfg_attr(test, mockall::automock)]
pub trait SystemControl {
    /// Set the output volume to `step` (0 = loudest, 63 = quietest).
    fn set_volume_step(&mut self, step: u8) -> Result<()>;

    /// Halt the machine.
    fn halt_machine(&mut self) -> Result<()>;
}

impl<T: SystemControl + ?Sized> SystemControl for Box<T> {
    fn set_volume_step(&mut self, step: u8) -> Result<()> {
        (**self).set_volume_step(step)
    }

    fn halt_machine(&mut self) -> Result<()> {
        (**self).halt_machine()
    }
}

/// Attenuation in amixer units for `step`.
///
/// # Examples
///
/// ```
/// use wiiclassic_keyboard::output::system::attenuation_for_step;
///
/// assert_eq!(attenuation_for_step(0, 50), 0);
/// assert_eq!(attenuation_for_step(63, 50), -3150);
/// ```
#[must_use]
pub fn attenuation_for_step(step: u8, per_step: u32) -> i64 {
    -(i64::from(step.min(AXIS_MAX)) * i64::from(per_step))
}

/// Arguments passed to `amixer` for one volume change.
#[must_use]
pub fn amixer_args(control: &str, step: u8, per_step: u32) -> Vec<String> {
    vec![
        "--".to_string(),
        "sset".to_string(),
        control.to_string(),
        format!("{}db", attenuation_for_step(step, per_step)),
    ]
}

/// Runs volume and halt actions as shell commands.
#[derive(Debug, Clone)]
pub struct ShellSystemControl {
    volume: VolumeConfig,
    shutdown: ShutdownConfig,
}

impl ShellSystemControl {
    #[must_use]
    pub fn new(volume: VolumeConfig, shutdown: ShutdownConfig) -> Self {
        Self { volume, shutdown }
    }

    fn run(program: &str, args: &[String]) -> Result<()> {
        debug!("Running: {} {}", program, args.join(" "));

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| BridgeError::SystemCommand(format!("Failed to run {}: {}", program, e)))?;

        if !status.success() {
            return Err(BridgeError::SystemCommand(format!(
                "{} exited with {}",
                program, status
            )));
        }
        Ok(())
    }
}

impl SystemControl for ShellSystemControl {
    fn set_volume_step(&mut self, step: u8) -> Result<()> {
        if !self.volume.enabled {
            debug!("Volume control disabled, ignoring step {}", step);
            return Ok(());
        }

        let args = amixer_args(&self.volume.mixer_control, step, self.volume.attenuation_per_step);
        Self::run(AMIXER, &args)
    }

    fn halt_machine(&mut self) -> Result<()> {
        if !self.shutdown.enabled {
            info!("Shutdown disabled, not halting");
            return Ok(());
        }

        let (program, args) = self
            .shutdown
            .command
            .split_first()
            .ok_or_else(|| BridgeError::SystemCommand("Shutdown command is empty".to_string()))?;

        info!("Halting machine: {}", self.shutdown.command.join(" "));
        Self::run(program, args)
    }
}
