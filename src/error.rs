//! # Error Types
//!
//! Custom error types for the WiiClassic keyboard bridge using `thiserror`.

use thiserror::Error;

/// Main error type for the bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// I2C bus errors (open, register write, packet read)
    #[error("I2C error: {0}")]
    I2c(String),

    /// uinput virtual keyboard errors
    #[error("Virtual device error: {0}")]
    VirtualDevice(String),

    /// External volume/halt command failures
    #[error("System command error: {0}")]
    SystemCommand(String),

    /// Configuration parse errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the bridge
pub type Result<T> = std::result::Result<T, BridgeError>;
