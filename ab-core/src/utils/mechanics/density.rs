//! Pulse-density encoding for the sigma-delta speed channel.
//!
//! The SDM peripheral consumes a signed 8-bit density, not a duty percentage.
//! The usable density band is asymmetric per rotation direction: the bounds
//! were calibrated against the stall/start thresholds of the blind motor, and
//! the two directions are *not* mirror images of each other. `DensityMap`
//! carries those bounds and performs the duty-to-density interpolation.
//!
//! Two calibration sets have been measured on real hardware and neither has
//! been confirmed authoritative, so the bounds are data, not constants:
//! construct an [`SdmMotor`](super::sdm::SdmMotor) with whichever set matches
//! the board revision.
//!
//! # Example
//! ```rust
//! use ab_core::utils::mechanics::density::DensityMap;
//! let map = DensityMap::GENERIC;
//! assert_eq!(map.density(false, 0), 80);
//! assert_eq!(map.density(false, 100), i8::MAX);
//! ```

/// Per-direction density bounds for the sigma-delta speed channel.
///
/// The direction key is the *electrical level* of the direction pin, not the
/// logical rotation sense; the motor driver picks the level from its
/// configured clockwise logic level. Each `(min, max)` pair maps duty 0 and
/// duty 100 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityMap {
    /// `(min, max)` density when the direction pin is driven high.
    when_high: (i8, i8),
    /// `(min, max)` density when the direction pin is driven low.
    when_low: (i8, i8),
}

impl DensityMap {
    /// Calibration of the original variable-speed driver board.
    pub const GENERIC: Self = Self {
        when_high: (-76, i8::MIN),
        when_low: (80, i8::MAX),
    };

    /// Calibration measured on the later board revision.
    pub const REV_B: Self = Self {
        when_high: (-110, i8::MIN),
        when_low: (87, i8::MAX),
    };

    /// Build a map from explicit per-level `(min, max)` bounds.
    pub const fn new(when_high: (i8, i8), when_low: (i8, i8)) -> Self {
        Self { when_high, when_low }
    }

    /// `(min, max)` density bounds for the given direction-pin level.
    pub const fn bounds(&self, level: bool) -> (i8, i8) {
        if level {
            self.when_high
        } else {
            self.when_low
        }
    }

    /// Interpolate a duty percentage into the signed hardware density.
    ///
    /// `duty` must already be clamped to `0..=100` by the caller; this
    /// function does not re-validate it. Duty 0 maps exactly to the level's
    /// `min` bound and duty 100 exactly to its `max` bound, with integer
    /// arithmetic truncated toward zero in between. No side effects.
    pub fn density(&self, level: bool, duty: u8) -> i8 {
        let (min, max) = self.bounds(level);
        let span = max as i32 - min as i32;
        (min as i32 + span * duty as i32 / 100) as i8
    }

    /// Density that produces no drive current for the given pin level.
    ///
    /// This is the representable extreme on the opposite side of the level's
    /// drive band, independent of the calibrated bounds.
    pub const fn off(&self, level: bool) -> i8 {
        if level {
            i8::MAX
        } else {
            i8::MIN
        }
    }
}

impl Default for DensityMap {
    fn default() -> Self {
        Self::GENERIC
    }
}
