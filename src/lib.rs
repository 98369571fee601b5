//! # WiiClassic Keyboard Library
//!
//! Use a Wii Classic Controller wired to an I2C bus as a virtual keyboard.
//!
//! This library reads the controller's 6-byte status packet, decodes it into
//! a typed state, turns button changes into uinput key events, maps the left
//! stick to a volume level, and halts the machine on the ZL + Select combo.

pub mod bus;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod output;
