//! # Controller Module
//!
//! Wii Classic Controller packet handling.
//!
//! This module handles:
//! - The raw 6-byte status packet and its glitch pattern
//! - Decoding buttons (active-low) and the left stick X axis
//! - Diffing consecutive states into key edges
//! - The fixed button-to-key bindings

pub mod diff;
pub mod keymap;
pub mod packet;
pub mod state;
