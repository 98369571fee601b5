//! # State Diff Module
//!
//! Compares consecutive [`ControllerState`] snapshots and produces the button
//! edges that must be forwarded as key events. The analog axis is not part of
//! the diff; the volume policy applies its own dead-band to it.

use super::state::{Button, ControllerState};

/// A single button transition between two polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    pub button: Button,
    /// New value: `true` on press, `false` on release.
    pub pressed: bool,
}

impl EdgeEvent {
    #[must_use]
    pub const fn new(button: Button, pressed: bool) -> Self {
        Self { button, pressed }
    }
}

/// Returns the edges from `previous` to `current` in ascending field-index order.
///
/// # Examples
///
/// ```
/// use wiiclassic_keyboard::controller::diff::{diff, EdgeEvent};
/// use wiiclassic_keyboard::controller::state::{Button, ControllerState};
///
/// let previous = ControllerState::new().with_pressed(Button::A);
/// let current = ControllerState::new().with_pressed(Button::Up);
///
/// assert_eq!(
///     diff(&previous, &current),
///     vec![EdgeEvent::new(Button::Up, true), EdgeEvent::new(Button::A, false)]
/// );
/// ```
#[must_use]
pub fn diff(previous: &ControllerState, current: &ControllerState) -> Vec<EdgeEvent> {
    Button::ALL
        .into_iter()
        .filter(|&button| previous.is_pressed(button) != current.is_pressed(button))
        .map(|button| EdgeEvent::new(button, current.is_pressed(button)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::AxisValue;

    #[test]
    fn test_identical_states_produce_no_edges() {
        let state = ControllerState::new().with_pressed(Button::B).with_pressed(Button::L);
        assert!(diff(&state, &state).is_empty());
    }

    #[test]
    fn test_press_and_release() {
        let released = ControllerState::new();
        let pressed = ControllerState::new().with_pressed(Button::Start);

        assert_eq!(diff(&released, &pressed), vec![EdgeEvent::new(Button::Start, true)]);
        assert_eq!(diff(&pressed, &released), vec![EdgeEvent::new(Button::Start, false)]);
    }

    #[test]
    fn test_edges_are_in_ascending_index_order() {
        let previous = ControllerState::new();
        let current = ControllerState::new()
            .with_pressed(Button::ZR)
            .with_pressed(Button::Up)
            .with_pressed(Button::Select);

        let edges = diff(&previous, &current);
        let buttons: Vec<Button> = edges.iter().map(|e| e.button).collect();
        assert_eq!(buttons, vec![Button::Up, Button::Select, Button::ZR]);
        assert!(edges.iter().all(|e| e.pressed));
    }

    #[test]
    fn test_every_button_changed() {
        let mut all = ControllerState::new();
        for button in Button::ALL {
            all.set_pressed(button, true);
        }

        let edges = diff(&ControllerState::new(), &all);
        assert_eq!(edges.len(), Button::ALL.len());
    }

    #[test]
    fn test_axis_change_is_not_an_edge() {
        let previous = ControllerState::new().with_left_stick_x(AxisValue::from_raw(0));
        let current = ControllerState::new().with_left_stick_x(AxisValue::from_raw(63));
        assert!(diff(&previous, &current).is_empty());
    }
}
