use crate::config::defaults;
use crate::error::{Error, Result};
use derive_more::{Add, AddAssign, Sub};
use std::fmt::{Display, Formatter};

/// `ConnectionHash` newtype.
///
/// The hash bucket a logical connection maps to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct ConnectionHash(pub u16);

/// `TimeToLive` (ttl) newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash, Add, Sub, AddAssign)]
pub struct TimeToLive(pub u8);

/// `ProbeSize` newtype.
///
/// The size of the application payload before any wrapping overhead is added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Add, Sub)]
pub struct ProbeSize(pub u32);

impl Display for ConnectionHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for TimeToLive {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ProbeSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The inclusive bounds on the number of bytes the wrapping layer may add.
///
/// The wrapping layer (i.e. encryption, authentication tags and padding)
/// adds a non-deterministic number of bytes to every probe.  Only the bounds
/// are known and every guarantee made by this crate is conditional on the
/// wrapping layer staying within them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverheadBounds {
    min: u32,
    max: u32,
}

impl OverheadBounds {
    /// Create `OverheadBounds`.
    ///
    /// # Errors
    ///
    /// Returns `Error::BadConfig` if `min` is greater than `max`.
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            Err(Error::BadConfig(format!(
                "overhead_min {min} > overhead_max {max}"
            )))
        } else {
            Ok(Self { min, max })
        }
    }

    /// The minimum overhead in bytes.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// The maximum overhead in bytes.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// The width of the overhead blur (`max - min`).
    #[must_use]
    pub const fn jitter(&self) -> u32 {
        self.max - self.min
    }
}

impl Default for OverheadBounds {
    fn default() -> Self {
        Self {
            min: defaults::DEFAULT_OVERHEAD_MIN,
            max: defaults::DEFAULT_OVERHEAD_MAX,
        }
    }
}

/// A closed interval of possible on-wire UDP lengths for a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireLengthRange {
    low: u32,
    high: u32,
}

impl WireLengthRange {
    pub(crate) const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// The lowest possible wire length.
    #[must_use]
    pub const fn low(&self) -> u32 {
        self.low
    }

    /// The highest possible wire length.
    #[must_use]
    pub const fn high(&self) -> u32 {
        self.high
    }

    /// Whether an observed wire length falls within this range.
    #[must_use]
    pub const fn contains(&self, len: u32) -> bool {
        self.low <= len && len <= self.high
    }

    /// Whether this range, produced by a lower ttl, reaches into the range of
    /// a higher ttl produced by the same monotonic encoder.
    #[must_use]
    pub const fn collides_with(&self, upper: &Self) -> bool {
        self.high >= upper.low
    }

    /// Whether the two ranges share at least one length, regardless of order.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.low <= other.high && other.low <= self.high
    }

    /// The distance between the top of this range and the bottom of `upper`.
    ///
    /// A value of zero or less means the ranges collide.
    #[must_use]
    pub fn gap_to(&self, upper: &Self) -> i64 {
        i64::from(upper.low) - i64::from(self.high)
    }
}

impl Display for WireLengthRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_overhead_bounds() {
        let bounds = OverheadBounds::new(80, 110).unwrap();
        assert_eq!(80, bounds.min());
        assert_eq!(110, bounds.max());
        assert_eq!(30, bounds.jitter());
    }

    #[test]
    fn test_overhead_bounds_fixed() {
        let bounds = OverheadBounds::new(16, 16).unwrap();
        assert_eq!(0, bounds.jitter());
    }

    #[test]
    fn test_overhead_bounds_inverted() {
        let err = OverheadBounds::new(111, 110).unwrap_err();
        assert_eq!(
            Error::BadConfig(String::from("overhead_min 111 > overhead_max 110")),
            err
        );
    }

    #[test_case(WireLengthRange::new(238, 268), WireLengthRange::new(288, 318), false, 20; "spaced")]
    #[test_case(WireLengthRange::new(191, 221), WireLengthRange::new(194, 224), true, -27; "overlapping")]
    #[test_case(WireLengthRange::new(100, 130), WireLengthRange::new(130, 160), true, 0; "touching")]
    #[test_case(WireLengthRange::new(100, 130), WireLengthRange::new(131, 161), false, 1; "adjacent")]
    fn test_collides_with(
        lower: WireLengthRange,
        upper: WireLengthRange,
        collides: bool,
        gap: i64,
    ) {
        assert_eq!(collides, lower.collides_with(&upper));
        assert_eq!(collides, lower.overlaps(&upper));
        assert_eq!(collides, upper.overlaps(&lower));
        assert_eq!(gap, lower.gap_to(&upper));
    }

    #[test]
    fn test_contains() {
        let range = WireLengthRange::new(238, 268);
        assert!(!range.contains(237));
        assert!(range.contains(238));
        assert!(range.contains(268));
        assert!(!range.contains(269));
        assert_eq!("238-268", range.to_string());
    }
}
