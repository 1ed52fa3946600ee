//! Miscellaneous utility structs and functions.

use std::fmt::Debug;
use std::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A closed interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Copy> Interval<T> {
    /// Returns true if the intersection of this interval and the other
    /// has a strictly positive length. Intervals that merely touch do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        let lo = if self.min > other.min { self.min } else { other.min };
        let hi = if self.max < other.max { self.max } else { other.max };
        hi > lo
    }
}

impl<T: Add<T, Output = T> + Sub<T, Output = T> + Copy> Interval<T> {
    /// Widens the interval by `margin` on both ends.
    pub fn expand(&self, margin: T) -> Self {
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}
