//! # I2C Bus Module
//!
//! Handles communication with the Wii Classic Controller over I2C.
//!
//! This module handles:
//! - Opening the I2C bus and addressing the extension (0x52)
//! - Switching the extension to unencrypted mode ("the new way")
//! - Reading one 6-byte status packet per poll
//!
//! The extension is slow to respond, so every transaction is followed by a
//! short blocking delay.

pub mod source_trait;

pub use source_trait::PacketSource;

use std::thread;
use std::time::Duration;

use rppal::i2c::I2c;
use tracing::{debug, info, trace};

use crate::config::I2cConfig;
use crate::controller::packet::{RawPacket, PACKET_LEN};
use crate::error::{BridgeError, Result};

/// Default I2C address of Wii extension controllers
pub const EXTENSION_ADDRESS: u16 = 0x52;

/// Extension init sequence: (register, value), written in order.
///
/// Writing 0x55 to 0xF0 and then 0x00 to 0xFB disables the encryption
/// that older Wiimote code had to undo byte by byte.
const INIT_SEQUENCE: [(u8, u8); 2] = [(0xF0, 0x55), (0xFB, 0x00)];

/// Register the status packet starts at
const DATA_REGISTER: u8 = 0x00;

/// Wii Classic Controller on an I2C bus
pub struct WiiClassicI2c {
    i2c: I2c,
    bus: u8,
    address: u16,
    write_delay: Duration,
    read_delay: Duration,
}

impl std::fmt::Debug for WiiClassicI2c {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WiiClassicI2c")
            .field("bus", &self.bus)
            .field("address", &format_args!("0x{:02x}", self.address))
            .finish_non_exhaustive()
    }
}

impl WiiClassicI2c {
    /// Open the bus and initialize the extension
    ///
    /// # Errors
    ///
    /// Returns `I2c` error if the bus cannot be opened, the address cannot be
    /// set, or the init sequence is not acknowledged.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wiiclassic_keyboard::bus::{PacketSource, WiiClassicI2c};
    /// use wiiclassic_keyboard::config::I2cConfig;
    ///
    /// let mut controller = WiiClassicI2c::open(&I2cConfig::default())?;
    /// let packet = controller.read_packet()?;
    /// println!("{}", packet);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(config: &I2cConfig) -> Result<Self> {
        debug!("Opening I2C bus {} at address 0x{:02x}", config.bus, config.address);

        let mut i2c = I2c::with_bus(config.bus)
            .map_err(|e| BridgeError::I2c(format!("Failed to open bus {}: {}", config.bus, e)))?;

        i2c.set_slave_address(config.address).map_err(|e| {
            BridgeError::I2c(format!("Failed to set address 0x{:02x}: {}", config.address, e))
        })?;

        let mut controller = Self {
            i2c,
            bus: config.bus,
            address: config.address,
            write_delay: Duration::from_micros(config.write_delay_us),
            read_delay: Duration::from_micros(config.read_delay_us),
        };
        controller.initialize()?;

        info!(
            "Wii Classic Controller initialized on bus {} (0x{:02x})",
            controller.bus, controller.address
        );
        Ok(controller)
    }

    fn initialize(&mut self) -> Result<()> {
        for (register, value) in INIT_SEQUENCE {
            self.i2c.smbus_write_byte(register, value).map_err(|e| {
                BridgeError::I2c(format!(
                    "Failed to write 0x{:02x} to register 0x{:02x}: {}",
                    value, register, e
                ))
            })?;
            thread::sleep(self.write_delay);
        }
        Ok(())
    }
}

impl PacketSource for WiiClassicI2c {
    /// Rewind to register 0x00, then read the packet one byte at a time.
    fn read_packet(&mut self) -> Result<RawPacket> {
        self.i2c
            .write(&[DATA_REGISTER])
            .map_err(|e| BridgeError::I2c(format!("Failed to select data register: {}", e)))?;
        thread::sleep(self.write_delay);

        let mut bytes = [0u8; PACKET_LEN];
        for (index, byte) in bytes.iter_mut().enumerate() {
            let mut buffer = [0u8; 1];
            let read = self
                .i2c
                .read(&mut buffer)
                .map_err(|e| BridgeError::I2c(format!("Failed to read byte {}: {}", index, e)))?;
            if read != 1 {
                return Err(BridgeError::I2c(format!("Short read at byte {}", index)));
            }
            *byte = buffer[0];
            thread::sleep(self.read_delay);
        }

        let packet = RawPacket::new(bytes);
        trace!("Read packet: {}", packet);
        Ok(packet)
    }
}
