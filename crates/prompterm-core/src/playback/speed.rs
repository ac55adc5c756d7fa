//! Speed levels and the speed curve
//!
//! The curve is exponential so the low end (1-3) stays fine-grained for
//! precise reading pace while the high end (8-10) throws fast.

use serde::{Deserialize, Serialize};

/// Slowest speed level
pub const MIN_SPEED: u8 = 1;
/// Fastest speed level
pub const MAX_SPEED: u8 = 10;
/// Speed level a fresh session starts at
pub const DEFAULT_SPEED: u8 = 5;

/// Map a speed level to a scroll rate in pixels per second
///
/// `rate = level^1.8 * 8 + 20`. Callers clamp the level to
/// [`MIN_SPEED`]..=[`MAX_SPEED`] first; [`Speed`] does this on construction.
#[inline]
pub fn rate(level: u8) -> f64 {
    f64::from(level).powf(1.8) * 8.0 + 20.0
}

/// Operator speed control, always within `1..=10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(MIN_SPEED);
    pub const MAX: Speed = Speed(MAX_SPEED);

    /// Create a speed, clamping to `1..=10`
    pub fn new(level: i64) -> Self {
        Self(level.clamp(i64::from(MIN_SPEED), i64::from(MAX_SPEED)) as u8)
    }

    #[inline]
    pub fn level(self) -> u8 {
        self.0
    }

    /// One level faster, saturating at the maximum
    pub fn faster(self) -> Self {
        Self::new(i64::from(self.0) + 1)
    }

    /// One level slower, saturating at the minimum
    pub fn slower(self) -> Self {
        Self::new(i64::from(self.0) - 1)
    }

    /// Scroll rate in pixels per second
    #[inline]
    pub fn pixels_per_second(self) -> f64 {
        rate(self.0)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(DEFAULT_SPEED)
    }
}

impl From<i64> for Speed {
    fn from(level: i64) -> Self {
        Self::new(level)
    }
}

impl From<Speed> for i64 {
    fn from(speed: Speed) -> Self {
        i64::from(speed.0)
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
