//! # Volume Policy
//!
//! Maps the left stick X axis to a volume step. The axis jitters by one unit
//! at rest, so a new step is only issued when the reading moves more than
//! one unit away from the last step set:
//!
//! ```text
//! issue(v)  <=>  v > s + 1  ||  v < s - 1
//! ```
//!
//! The last step starts at 0.

use crate::controller::state::AxisValue;

/// Dead-band half-width around the last step.
pub const DEAD_BAND: u8 = 1;

/// Tracks the last volume step issued.
///
/// # Examples
///
/// ```
/// use wiiclassic_keyboard::controller::state::AxisValue;
/// use wiiclassic_keyboard::engine::volume::VolumePolicy;
///
/// let mut policy = VolumePolicy::with_step(10);
/// assert_eq!(policy.update(AxisValue::from_raw(11)), None);
/// assert_eq!(policy.update(AxisValue::from_raw(12)), Some(12));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumePolicy {
    step: u8,
}

impl VolumePolicy {
    #[must_use]
    pub const fn new() -> Self {
        Self { step: 0 }
    }

    /// Starts from a known step instead of 0.
    #[must_use]
    pub fn with_step(step: u8) -> Self {
        Self {
            step: AxisValue::from_raw(step).get(),
        }
    }

    /// Last step issued.
    #[must_use]
    pub const fn step(&self) -> u8 {
        self.step
    }

    /// Feeds one axis reading. Returns the step to issue, if any.
    pub fn update(&mut self, value: AxisValue) -> Option<u8> {
        let value = value.get();
        if value.abs_diff(self.step) > DEAD_BAND {
            self.step = value;
            Some(value)
        } else {
            None
        }
    }
}
