//! # Key Map
//!
//! Fixed mapping from controller buttons to the keyboard keys emitted on the
//! virtual device. The bindings match what existing emulator front-end
//! configurations for this controller expect, so they are not configurable.
//!
//! | Button | Key |
//! |--------|-----|
//! | Up / Down / Left / Right | arrow keys |
//! | A / B / X / Y | X / Z / S / A |
//! | Start / Select | J / G |
//! | Home | Esc |
//! | L / R / ZL / ZR | Q / P / W / O |

use evdev::Key;

use super::state::{Button, BUTTON_COUNT};

/// Keys in field-index order.
pub const KEY_MAP: [Key; BUTTON_COUNT] = [
    Key::KEY_UP,
    Key::KEY_DOWN,
    Key::KEY_LEFT,
    Key::KEY_RIGHT,
    Key::KEY_X,
    Key::KEY_Z,
    Key::KEY_S,
    Key::KEY_A,
    Key::KEY_J,
    Key::KEY_G,
    Key::KEY_ESC,
    Key::KEY_Q,
    Key::KEY_P,
    Key::KEY_W,
    Key::KEY_O,
];

/// Returns the key bound to `button`.
#[must_use]
pub const fn key_for(button: Button) -> Key {
    KEY_MAP[button.index()]
}
