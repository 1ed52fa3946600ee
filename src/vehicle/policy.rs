use crate::SimError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The parameters of the headway-based driving policy shared by all vehicles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrivingPolicy {
    /// The look-ahead time headway in s. The look-ahead distance is `speed * time_headway`.
    pub time_headway: f64,
    /// Multiple of the look-ahead distance beyond which the road ahead is clear.
    pub caution_factor: f64,
    /// The acceleration applied when the gap ahead is too small, a negative number in m/s<sup>2</sup>.
    pub hard_brake_decel: f64,
    /// The acceleration applied when the road ahead is clear in m/s<sup>2</sup>.
    pub cruise_accel: f64,
    /// A vehicle only moves right to overtake if it is more than this far below its max speed, in m/s.
    pub speed_headroom: f64,
}

/// How the gap to the vehicle ahead compares to the look-ahead distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GapZone {
    /// The gap is within the look-ahead distance.
    Close,
    /// The gap is beyond the look-ahead distance, but not clear.
    Caution,
    /// Nothing ahead for `caution_factor` look-ahead distances.
    Clear,
}

impl Default for DrivingPolicy {
    fn default() -> Self {
        Self {
            time_headway: 1.8,
            caution_factor: 2.0,
            hard_brake_decel: -8.0,
            cruise_accel: 3.0,
            speed_headroom: 3.0,
        }
    }
}

impl DrivingPolicy {
    /// Calculates the look-ahead distance of a vehicle travelling at `speed`.
    pub fn look_ahead(&self, speed: f64) -> f64 {
        speed * self.time_headway
    }

    /// Classifies a `gap` to the vehicle ahead against a `look_ahead` distance.
    /// An infinite gap is always clear.
    pub fn classify(&self, gap: f64, look_ahead: f64) -> GapZone {
        if gap < look_ahead {
            GapZone::Close
        } else if gap < self.caution_factor * look_ahead {
            GapZone::Caution
        } else {
            GapZone::Clear
        }
    }

    /// Whether a vehicle has enough speed headroom to be worth overtaking.
    pub fn wants_to_overtake(&self, speed: f64, max_speed: f64) -> bool {
        max_speed - speed > self.speed_headroom
    }

    pub(crate) fn validate(&self) -> Result<(), SimError> {
        let finite = [
            self.time_headway,
            self.caution_factor,
            self.hard_brake_decel,
            self.cruise_accel,
            self.speed_headroom,
        ]
        .iter()
        .all(|x| x.is_finite());
        if !finite {
            return Err(SimError::params("driving policy values must be finite"));
        }
        if self.time_headway < 0.0 {
            return Err(SimError::params("time headway must be non-negative"));
        }
        if self.caution_factor < 1.0 {
            return Err(SimError::params("caution factor must be at least 1"));
        }
        Ok(())
    }
}
