//! # Controller State Module
//!
//! Decodes a [`RawPacket`] into a typed [`ControllerState`].
//!
//! ## Digital Fields
//!
//! All 15 buttons live in bytes 4 and 5 and are active-low on the wire. The
//! decoder reads them through [`BUTTON_LAYOUT`], a declarative table of
//! `(button, byte, bit)` entries, so the protocol mapping can be audited in
//! one place.
//!
//! | Index | Button | Source |
//! |-------|--------|--------|
//! | 0 | Up | byte 5, bit 0 |
//! | 1 | Down | byte 4, bit 6 |
//! | 2 | Left | byte 5, bit 1 |
//! | 3 | Right | byte 4, bit 7 |
//! | 4 | A | byte 5, bit 4 |
//! | 5 | B | byte 5, bit 6 |
//! | 6 | X | byte 5, bit 3 |
//! | 7 | Y | byte 5, bit 5 |
//! | 8 | Start | byte 4, bit 2 |
//! | 9 | Select | byte 4, bit 4 |
//! | 10 | Home | byte 4, bit 3 |
//! | 11 | L | byte 4, bit 5 |
//! | 12 | R | byte 4, bit 1 |
//! | 13 | ZL | byte 5, bit 7 |
//! | 14 | ZR | byte 5, bit 2 |
//!
//! ## Analog Field
//!
//! Only the left stick X axis is decoded: the low 6 bits of byte 0, not
//! inverted. It drives the volume policy rather than key events.

use std::fmt;

use super::packet::RawPacket;

/// Number of digital fields decoded from each packet.
pub const BUTTON_COUNT: usize = 15;

/// Largest value a 6-bit analog axis can take.
pub const AXIS_MAX: u8 = 0b0011_1111;

/// Digital controls, in field-index order.
///
/// The discriminant is the field index used for diffing and key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Button {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    A = 4,
    B = 5,
    X = 6,
    Y = 7,
    Start = 8,
    Select = 9,
    Home = 10,
    L = 11,
    R = 12,
    ZL = 13,
    ZR = 14,
}

impl Button {
    /// All buttons in ascending field-index order.
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::Start,
        Button::Select,
        Button::Home,
        Button::L,
        Button::R,
        Button::ZL,
        Button::ZR,
    ];

    /// Field index (0..=14).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up a button by field index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Short label used in the verbose trace.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Button::Up => "U",
            Button::Down => "D",
            Button::Left => "L",
            Button::Right => "R",
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
            Button::Start => "start",
            Button::Select => "sel",
            Button::Home => "home",
            Button::L => "LT",
            Button::R => "RT",
            Button::ZL => "ZL",
            Button::ZR => "ZR",
        }
    }
}

/// Location of one active-low button bit inside a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub button: Button,
    pub byte: usize,
    pub bit: u8,
}

impl BitField {
    const fn new(button: Button, byte: usize, bit: u8) -> Self {
        Self { button, byte, bit }
    }

    /// Reads the field from `packet`. A cleared bit means pressed.
    #[must_use]
    pub const fn read(&self, packet: &RawPacket) -> bool {
        (packet.byte(self.byte) >> self.bit) & 1 == 0
    }
}

/// Wire layout of the digital fields, indexed by [`Button::index`].
pub const BUTTON_LAYOUT: [BitField; BUTTON_COUNT] = [
    BitField::new(Button::Up, 5, 0),
    BitField::new(Button::Down, 4, 6),
    BitField::new(Button::Left, 5, 1),
    BitField::new(Button::Right, 4, 7),
    BitField::new(Button::A, 5, 4),
    BitField::new(Button::B, 5, 6),
    BitField::new(Button::X, 5, 3),
    BitField::new(Button::Y, 5, 5),
    BitField::new(Button::Start, 4, 2),
    BitField::new(Button::Select, 4, 4),
    BitField::new(Button::Home, 4, 3),
    BitField::new(Button::L, 4, 5),
    BitField::new(Button::R, 4, 1),
    BitField::new(Button::ZL, 5, 7),
    BitField::new(Button::ZR, 5, 2),
];

/// A 6-bit analog axis reading, always in `0..=63`.
///
/// # Examples
///
/// ```
/// use wiiclassic_keyboard::controller::state::AxisValue;
///
/// assert_eq!(AxisValue::from_raw(0xE5).get(), 0x25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AxisValue(u8);

impl AxisValue {
    /// Keeps the low 6 bits of `raw`.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw & AXIS_MAX)
    }

    /// Returns the axis value (0..=63).
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decoded state of the controller for one poll cycle.
///
/// # Examples
///
/// ```
/// use wiiclassic_keyboard::controller::packet::RawPacket;
/// use wiiclassic_keyboard::controller::state::{Button, ControllerState};
///
/// let state = ControllerState::decode(&RawPacket::new([0x20, 0x10, 0x00, 0x00, 0xFF, 0xFE]));
/// assert!(state.is_pressed(Button::Up));
/// assert!(!state.is_pressed(Button::Down));
/// assert_eq!(state.left_stick_x().get(), 0x20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerState {
    buttons: [bool; BUTTON_COUNT],
    left_stick_x: AxisValue,
}

impl ControllerState {
    /// Creates a state with every button released and the axis at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a raw packet. Total over all inputs.
    #[must_use]
    pub fn decode(packet: &RawPacket) -> Self {
        let mut buttons = [false; BUTTON_COUNT];
        for field in &BUTTON_LAYOUT {
            buttons[field.button.index()] = field.read(packet);
        }

        Self {
            buttons,
            left_stick_x: AxisValue::from_raw(packet.byte(0)),
        }
    }

    /// Returns `true` if `button` is held.
    #[must_use]
    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons[button.index()]
    }

    /// Sets a button. Mostly useful for building states in tests.
    pub fn set_pressed(&mut self, button: Button, pressed: bool) {
        self.buttons[button.index()] = pressed;
    }

    /// Builder form of [`set_pressed`](Self::set_pressed).
    #[must_use]
    pub fn with_pressed(mut self, button: Button) -> Self {
        self.set_pressed(button, true);
        self
    }

    /// Builder for the analog axis.
    #[must_use]
    pub fn with_left_stick_x(mut self, value: AxisValue) -> Self {
        self.left_stick_x = value;
        self
    }

    /// Left stick X axis.
    #[must_use]
    pub fn left_stick_x(&self) -> AxisValue {
        self.left_stick_x
    }

    /// Buttons currently held, in field-index order.
    pub fn pressed_buttons(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL.into_iter().filter(|b| self.is_pressed(*b))
    }
}

impl fmt::Display for ControllerState {
    /// Formats like `U=1 D=0 ... ZR=0 LX=20`, with the axis in hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for button in Button::ALL {
            write!(f, "{}={} ", button.label(), u8::from(self.is_pressed(button)))?;
        }
        write!(f, "LX={:x}", self.left_stick_x.get())
    }
}
