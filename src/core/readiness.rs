//! Readiness tracking across all limb sensors
//!
//! Joint angles are only meaningful once every limb has reported at least once;
//! a single silent sensor would otherwise leave its subtree relative to a stale
//! default orientation.

/// Number of tracked limbs
pub const LIMB_COUNT: usize = 15;

/// Mask value with every limb seen
pub const FULL_MASK: u16 = (1 << LIMB_COUNT) - 1;

/// 15-bit mask of limbs that have delivered a frame since the last reset
///
/// Topology index `n` (1-based) maps to bit `n - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadinessTracker {
    mask: u16,
}

impl ReadinessTracker {
    pub const fn new() -> Self {
        Self { mask: 0 }
    }

    /// Record a frame for the limb with the given topology index
    ///
    /// Indices outside `1..=15` are ignored.
    #[inline]
    pub fn mark_seen(&mut self, index: u8) {
        if let Some(bit) = Self::bit(index) {
            self.mask |= bit;
        }
    }

    /// Whether the limb with the given topology index has reported
    #[inline]
    pub fn is_seen(&self, index: u8) -> bool {
        Self::bit(index).is_some_and(|bit| self.mask & bit != 0)
    }

    /// True once every limb has reported
    #[inline]
    pub fn is_full(&self) -> bool {
        self.mask == FULL_MASK
    }

    /// Forget every limb (used on stop/restart)
    #[inline]
    pub fn reset(&mut self) {
        self.mask = 0;
    }

    /// Raw mask value
    #[inline]
    pub fn mask(&self) -> u16 {
        self.mask
    }

    /// Number of limbs that have reported
    #[inline]
    pub fn seen_count(&self) -> u32 {
        self.mask.count_ones()
    }

    /// Topology indices that have not reported yet
    pub fn missing(&self) -> Vec<u8> {
        (1..=LIMB_COUNT as u8)
            .filter(|&index| !self.is_seen(index))
            .collect()
    }

    #[inline]
    fn bit(index: u8) -> Option<u16> {
        (1..=LIMB_COUNT as u8)
            .contains(&index)
            .then(|| 1 << (index - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker() {
        let tracker = ReadinessTracker::new();
        assert!(!tracker.is_full());
        assert_eq!(tracker.seen_count(), 0);
        assert_eq!(tracker.missing().len(), LIMB_COUNT);
    }

    #[test]
    fn test_full_after_all_indices() {
        let mut tracker = ReadinessTracker::new();
        for index in 1..=15 {
            assert!(!tracker.is_full());
            tracker.mark_seen(index);
        }
        assert!(tracker.is_full());
        assert_eq!(tracker.mask(), 0x7FFF);
        assert!(tracker.missing().is_empty());
    }

    #[test]
    fn test_repeated_marks_do_not_fill() {
        let mut tracker = ReadinessTracker::new();
        for _ in 0..100 {
            tracker.mark_seen(1);
        }
        assert_eq!(tracker.seen_count(), 1);
        assert!(!tracker.is_full());
        assert_eq!(tracker.missing(), (2..=15).collect::<Vec<u8>>());
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut tracker = ReadinessTracker::new();
        tracker.mark_seen(0);
        tracker.mark_seen(16);
        tracker.mark_seen(255);
        assert_eq!(tracker.mask(), 0);
        assert!(!tracker.is_seen(0));
    }

    #[test]
    fn test_reset() {
        let mut tracker = ReadinessTracker::new();
        for index in 1..=15 {
            tracker.mark_seen(index);
        }
        tracker.reset();
        assert!(!tracker.is_full());
        assert_eq!(tracker.mask(), 0);
    }
}
