//! Shutdown combo: ZL and Select held together halts the machine.

use crate::controller::state::{Button, ControllerState};

/// Buttons that must all be held to trigger the shutdown.
pub const SHUTDOWN_COMBO: [Button; 2] = [Button::ZL, Button::Select];

/// Returns `true` if the shutdown combo is held in `state`.
///
/// There is no hold time or confirmation; one decoded state with both
/// buttons down is enough.
///
/// # Examples
///
/// ```
/// use wiiclassic_keyboard::controller::state::{Button, ControllerState};
/// use wiiclassic_keyboard::engine::shutdown::is_shutdown_combo;
///
/// let state = ControllerState::new().with_pressed(Button::ZL).with_pressed(Button::Select);
/// assert!(is_shutdown_combo(&state));
/// ```
#[must_use]
pub fn is_shutdown_combo(state: &ControllerState) -> bool {
    SHUTDOWN_COMBO.iter().all(|&button| state.is_pressed(button))
}
