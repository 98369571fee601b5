//! Startup read discard.
//!
//! Right after the extension is initialized its output is garbage for a
//! while. The gate swallows the first `N` reads so they never become the diff
//! baseline.

/// Default number of discarded reads.
pub const DEFAULT_WARMUP_CYCLES: u32 = 20;

/// Counts down the reads to discard after startup.
///
/// # Examples
///
/// ```
/// use wiiclassic_keyboard::engine::warmup::WarmupGate;
///
/// let mut gate = WarmupGate::new(2);
/// assert!(!gate.admit());
/// assert!(!gate.admit());
/// assert!(gate.admit());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupGate {
    remaining: u32,
}

impl Default for WarmupGate {
    fn default() -> Self {
        Self::new(DEFAULT_WARMUP_CYCLES)
    }
}

impl WarmupGate {
    #[must_use]
    pub const fn new(cycles: u32) -> Self {
        Self { remaining: cycles }
    }

    /// Records one read. Returns `true` once the read may enter the pipeline.
    pub fn admit(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }

    /// Reads still to be discarded.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_discards_twenty_reads() {
        let mut gate = WarmupGate::default();
        for cycle in 0..DEFAULT_WARMUP_CYCLES {
            assert!(!gate.admit(), "cycle {} should be discarded", cycle);
        }
        assert!(gate.is_complete());
        assert!(gate.admit());
        assert!(gate.admit());
    }

    #[test]
    fn test_zero_cycles_admits_immediately() {
        let mut gate = WarmupGate::new(0);
        assert!(gate.is_complete());
        assert!(gate.admit());
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut gate = WarmupGate::new(3);
        gate.admit();
        assert_eq!(gate.remaining(), 2);
    }
}
