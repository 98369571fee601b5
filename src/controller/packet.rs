//! # Raw Packet Module
//!
//! The Wii Classic Controller reports its full state as a 6-byte block read
//! from register 0x00 of the extension (I2C address 0x52, unencrypted mode).
//!
//! ## Byte Layout
//!
//! | Byte | Bits 7-6 | Bits 5-0 |
//! |------|----------|----------|
//! | 0 | RX<4:3> | LX<5:0> |
//! | 1 | RX<2:1> | LY<5:0> |
//! | 2 | RX<0>, LT<4:3> | RY<4:0> (bits 4-0) |
//! | 3 | LT<2:0> (bits 7-5) | RT<4:0> (bits 4-0) |
//!
//! | Byte | 7 | 6 | 5 | 4 | 3 | 2 | 1 | 0 |
//! |------|---|---|---|---|---|---|---|---|
//! | 4 | Right | Down | L | Select | Home | Start | R | - |
//! | 5 | ZL | B | Y | A | X | ZR | Left | Up |
//!
//! Buttons in bytes 4 and 5 are active-low: a set bit means "released".
//!
//! Only LX is decoded into [`ControllerState`](super::state::ControllerState).
//! The remaining axes are exposed here as raw accessors so they can be wired
//! up later without touching the decoder.

use std::fmt;

/// Size of one controller status packet in bytes.
pub const PACKET_LEN: usize = 6;

/// Byte value the extension returns on a glitched bus read.
pub const GLITCH_SENTINEL: u8 = 0xFF;

/// One raw status packet as read from the bus.
///
/// # Examples
///
/// ```
/// use wiiclassic_keyboard::controller::packet::RawPacket;
///
/// let packet = RawPacket::new([0x20, 0x10, 0x00, 0x00, 0xFF, 0xFE]);
/// assert_eq!(packet.byte(5), 0xFE);
/// assert!(!packet.is_glitch());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawPacket([u8; PACKET_LEN]);

impl RawPacket {
    /// Wraps six raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; PACKET_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the byte at `index` (0..=5).
    ///
    /// # Panics
    ///
    /// Panics if `index >= PACKET_LEN`.
    #[must_use]
    pub const fn byte(&self, index: usize) -> u8 {
        self.0[index]
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PACKET_LEN] {
        &self.0
    }

    /// Returns `true` if this read carries the all-high glitch pattern.
    ///
    /// The extension occasionally answers with 0xFF in both byte 1 and
    /// byte 2. Such a packet would decode to every button pressed at once,
    /// so the whole cycle is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use wiiclassic_keyboard::controller::packet::RawPacket;
    ///
    /// assert!(RawPacket::new([0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00]).is_glitch());
    /// assert!(!RawPacket::new([0x00, 0xFF, 0x00, 0x00, 0x00, 0x00]).is_glitch());
    /// ```
    #[must_use]
    pub const fn is_glitch(&self) -> bool {
        self.0[1] == GLITCH_SENTINEL && self.0[2] == GLITCH_SENTINEL
    }

    /// Left stick Y (6 bits). Not decoded into the controller state.
    #[must_use]
    pub const fn left_stick_y(&self) -> u8 {
        self.0[1] & 0b0011_1111
    }

    /// Right stick X (5 bits, spread over bytes 0-2). Not decoded into the controller state.
    #[must_use]
    pub const fn right_stick_x(&self) -> u8 {
        ((self.0[0] >> 3) & 0b0001_1000)
            | ((self.0[1] >> 5) & 0b0000_0110)
            | ((self.0[2] >> 7) & 0b0000_0001)
    }

    /// Right stick Y (5 bits). Not decoded into the controller state.
    #[must_use]
    pub const fn right_stick_y(&self) -> u8 {
        self.0[2] & 0b0001_1111
    }

    /// Left analog trigger (5 bits, spread over bytes 2-3). Not decoded into the controller state.
    #[must_use]
    pub const fn left_trigger(&self) -> u8 {
        ((self.0[2] >> 2) & 0b0001_1000) | ((self.0[3] >> 5) & 0b0000_0111)
    }

    /// Right analog trigger (5 bits). Not decoded into the controller state.
    #[must_use]
    pub const fn right_trigger(&self) -> u8 {
        self.0[3] & 0b0001_1111
    }
}

impl From<[u8; PACKET_LEN]> for RawPacket {
    fn from(bytes: [u8; PACKET_LEN]) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Display for RawPacket {
    /// Formats as six space-separated hex bytes, e.g. `20 10 0 0 ff fe`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [b0, b1, b2, b3, b4, b5] = self.0;
        write!(f, "{:x} {:x} {:x} {:x} {:x} {:x}", b0, b1, b2, b3, b4, b5)
    }
}
