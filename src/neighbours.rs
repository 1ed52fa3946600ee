use crate::util::Interval;
use crate::{RoadAttributes, Vehicle};

/// A read-only view of the vehicles surrounding one vehicle.
///
/// The view is made of the snapshot entries before and after the
/// observing vehicle, so the observer is never part of its own view.
#[derive(Clone, Copy, Debug, Default)]
pub struct Neighbours<'a> {
    before: &'a [Vehicle],
    after: &'a [Vehicle],
}

impl<'a> Neighbours<'a> {
    /// Creates a view over all of the given vehicles.
    pub fn new(vehicles: &'a [Vehicle]) -> Self {
        Self {
            before: vehicles,
            after: &[],
        }
    }

    /// Creates a view over every vehicle in `snapshot` except the one at `idx`.
    pub(crate) fn excluding(snapshot: &'a [Vehicle], idx: usize) -> Self {
        Self {
            before: &snapshot[..idx],
            after: &snapshot[idx + 1..],
        }
    }

    /// The number of vehicles in view.
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    /// Whether there are no vehicles in view.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the vehicles in view.
    pub fn iter(&self) -> impl Iterator<Item = &'a Vehicle> + 'a {
        let (before, after) = (self.before, self.after);
        before.iter().chain(after)
    }

    /// Checks whether `lane` is free of vehicles over the longitudinal `interval`.
    ///
    /// Lanes that don't exist on the road are never free.
    pub fn is_lane_free(
        &self,
        road: &RoadAttributes,
        lane: isize,
        interval: Interval<f64>,
    ) -> bool {
        if !road.has_lane(lane) {
            return false;
        }
        self.iter()
            .filter(|veh| veh.lane() as isize == lane)
            .all(|veh| !veh.span().overlaps(&interval))
    }

    /// Finds the nearest vehicle strictly ahead of `vehicle` in its lane,
    /// returning it along with the gap from `vehicle`'s front edge to its rear.
    ///
    /// Returns `None` if the lane ahead is clear, which callers treat as an infinite gap.
    pub fn find_next_vehicle(&self, vehicle: &Vehicle) -> Option<(&'a Vehicle, f64)> {
        let front = vehicle.front_position();
        self.iter()
            .filter(|other| vehicle.same_lane(other))
            .map(|other| (other, other.position() - front))
            .filter(|(_, gap)| *gap > 0.0)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    /// Gets the gap to the nearest vehicle ahead of `vehicle` in its lane,
    /// or infinity if there is none.
    pub fn gap_ahead(&self, vehicle: &Vehicle) -> f64 {
        self.find_next_vehicle(vehicle)
            .map_or(f64::INFINITY, |(_, gap)| gap)
    }
}
