use crate::SimError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The attributes of the straight, multi-lane road being simulated.
///
/// Lane 0 is the leftmost lane; lane indices increase to the right.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoadAttributes {
    /// The number of lanes.
    pub lane_count: usize,
    /// The length of the road in m. Vehicles past this point are removed.
    pub road_length: f64,
    /// The lateral distance between adjacent lanes in m.
    pub lane_width: f64,
}

impl Default for RoadAttributes {
    fn default() -> Self {
        Self {
            lane_count: 2,
            road_length: 1000.0,
            lane_width: 3.5,
        }
    }
}

impl RoadAttributes {
    /// Checks whether `lane` is a valid lane index on this road.
    /// Accepts signed indices so that "the lane left of lane 0" is simply out of range.
    pub fn has_lane(&self, lane: isize) -> bool {
        lane >= 0 && (lane as usize) < self.lane_count
    }

    /// Checks whether a vehicle at `pos` has driven off the end of the road.
    pub fn has_exited(&self, pos: f64) -> bool {
        pos > self.road_length
    }

    pub(crate) fn validate(&self) -> Result<(), SimError> {
        if self.lane_count == 0 {
            return Err(SimError::params("road must have at least one lane"));
        }
        if !self.road_length.is_finite() {
            return Err(SimError::params("road length must be finite"));
        }
        if !self.lane_width.is_finite() || self.lane_width < 0.0 {
            return Err(SimError::params("lane width must be finite and non-negative"));
        }
        Ok(())
    }
}
