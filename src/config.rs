//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working setup for a controller on I2C bus 1 of a Raspberry Pi.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::bus::EXTENSION_ADDRESS;
use crate::engine::warmup::DEFAULT_WARMUP_CYCLES;
use crate::error::{BridgeError, Result};

/// Longest device name uinput accepts (UINPUT_MAX_NAME_SIZE minus the NUL).
const MAX_DEVICE_NAME_LEN: usize = 79;

/// Log levels accepted in `[logging]`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub i2c: I2cConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub volume: VolumeConfig,
    #[serde(default)]
    pub shutdown: ShutdownConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// I2C bus configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct I2cConfig {
    #[serde(default = "default_bus")]
    pub bus: u8,

    #[serde(default = "default_address")]
    pub address: u16,

    #[serde(default = "default_write_delay_us")]
    pub write_delay_us: u64,

    #[serde(default = "default_read_delay_us")]
    pub read_delay_us: u64,

    #[serde(default = "default_poll_interval_us")]
    pub poll_interval_us: u64,
}

/// Virtual keyboard and pipeline configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputConfig {
    #[serde(default = "default_device_name")]
    pub device_name: String,

    #[serde(default = "default_warmup_cycles")]
    pub warmup_cycles: u32,

    #[serde(default)]
    pub verbose: bool,
}

/// Stick-driven volume configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VolumeConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_mixer_control")]
    pub mixer_control: String,

    #[serde(default = "default_attenuation_per_step")]
    pub attenuation_per_step: u32,
}

/// Shutdown combo configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ShutdownConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_shutdown_command")]
    pub command: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub log_dir: Option<String>,
}

// Default value functions
fn default_bus() -> u8 { 1 }
fn default_address() -> u16 { EXTENSION_ADDRESS }
fn default_write_delay_us() -> u64 { 500 }
fn default_read_delay_us() -> u64 { 500 }
fn default_poll_interval_us() -> u64 { 5000 }

fn default_device_name() -> String { "wiiclassic-virtual-keyboard".to_string() }
fn default_warmup_cycles() -> u32 { DEFAULT_WARMUP_CYCLES }

fn default_enabled() -> bool { true }
fn default_mixer_control() -> String { "PCM".to_string() }
fn default_attenuation_per_step() -> u32 { 50 }

fn default_shutdown_command() -> Vec<String> { vec!["sudo".to_string(), "halt".to_string()] }

fn default_log_level() -> String { "info".to_string() }

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            bus: default_bus(),
            address: default_address(),
            write_delay_us: default_write_delay_us(),
            read_delay_us: default_read_delay_us(),
            poll_interval_us: default_poll_interval_us(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            warmup_cycles: default_warmup_cycles(),
            verbose: false,
        }
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            mixer_control: default_mixer_control(),
            attenuation_per_step: default_attenuation_per_step(),
        }
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            command: default_shutdown_command(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

fn invalid(message: impl std::fmt::Display) -> BridgeError {
    BridgeError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wiiclassic_keyboard::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a TOML string
    ///
    /// # Examples
    ///
    /// ```
    /// use wiiclassic_keyboard::config::Config;
    ///
    /// let config = Config::parse("[input]\nverbose = true\n")?;
    /// assert!(config.input.verbose);
    /// assert_eq!(config.i2c.address, 0x52);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // 7-bit addresses outside the reserved ranges
        if !(0x03..=0x77).contains(&self.i2c.address) {
            return Err(invalid(format!(
                "i2c address 0x{:02x} must be between 0x03 and 0x77",
                self.i2c.address
            )));
        }

        if self.i2c.poll_interval_us == 0 || self.i2c.poll_interval_us > 1_000_000 {
            return Err(invalid("poll_interval_us must be between 1 and 1000000"));
        }

        for (name, value) in [
            ("write_delay_us", self.i2c.write_delay_us),
            ("read_delay_us", self.i2c.read_delay_us),
        ] {
            if value > 100_000 {
                return Err(invalid(format!("{} must be at most 100000", name)));
            }
        }

        if self.input.device_name.is_empty() {
            return Err(invalid("device_name cannot be empty"));
        }

        if self.input.device_name.len() > MAX_DEVICE_NAME_LEN {
            return Err(invalid(format!(
                "device_name must be at most {} bytes",
                MAX_DEVICE_NAME_LEN
            )));
        }

        if self.volume.mixer_control.is_empty() {
            return Err(invalid("mixer_control cannot be empty"));
        }

        if self.volume.attenuation_per_step == 0 || self.volume.attenuation_per_step > 1000 {
            return Err(invalid("attenuation_per_step must be between 1 and 1000"));
        }

        if self.shutdown.enabled && self.shutdown.command.is_empty() {
            return Err(invalid("shutdown command cannot be empty when enabled"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid(format!(
                "log level must be one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }

        if self.logging.log_dir.as_deref() == Some("") {
            return Err(invalid("log_dir cannot be empty when set"));
        }

        Ok(())
    }
}
