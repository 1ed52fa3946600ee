use crate::debug::{debug_brake, debug_lane_change};
use crate::math::Point2d;
use crate::util::Interval;
use crate::{Neighbours, RoadAttributes, SimError, SimulationParams, VehicleId};
use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use policy::{DrivingPolicy, GapZone};

mod dynamics;
mod policy;

/// The default vehicle length in m.
const DEFAULT_LENGTH: f64 = 4.5;

/// The default vehicle width in m.
const DEFAULT_WIDTH: f64 = 1.5;

/// A simulated vehicle.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID
    pub(crate) id: VehicleId,
    /// The longitudinal position of the rear of the vehicle in m.
    pos: f64,
    /// The lateral display offset in m. Only changes along with `lane`.
    lateral_slot: f64,
    /// The vehicle's length in m.
    length: f64,
    /// The vehicle's width in m.
    width: f64,
    /// The velocity in m/s.
    speed: f64,
    /// The acceleration chosen by the driving policy in m/s<sup>2</sup>.
    acc: f64,
    /// The maximum velocity in m/s.
    max_speed: f64,
    /// The index of the lane the vehicle is in, 0 being the leftmost lane.
    lane: usize,
}

/// The attributes of a simulated vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleAttributes {
    /// The initial longitudinal position of the rear of the vehicle in m.
    pub position: f64,
    /// The initial lateral display offset in m.
    pub lateral_slot: f64,
    /// The initial velocity in m/s.
    pub speed: f64,
    /// The initial lane.
    pub lane: usize,
    /// The maximum velocity in m/s.
    pub max_speed: f64,
    /// The vehicle length in m.
    pub length: f64,
    /// The vehicle width in m.
    pub width: f64,
}

/// A read-only snapshot of a vehicle's state, for display.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleState {
    pub position: f64,
    pub lateral_slot: f64,
    pub speed: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    pub lane: usize,
}

/// The direction of a lane change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaneDirection {
    /// Towards lane 0.
    Left,
    /// Away from lane 0.
    Right,
}

impl LaneDirection {
    /// The change in lane index.
    pub fn offset(self) -> isize {
        match self {
            LaneDirection::Left => -1,
            LaneDirection::Right => 1,
        }
    }
}

impl VehicleAttributes {
    /// Creates the attributes of a vehicle with the default dimensions.
    pub fn new(position: f64, lateral_slot: f64, speed: f64, lane: usize, max_speed: f64) -> Self {
        Self {
            position,
            lateral_slot,
            speed,
            lane,
            max_speed,
            length: DEFAULT_LENGTH,
            width: DEFAULT_WIDTH,
        }
    }

    /// Checks that a vehicle with these attributes can be placed on the given road.
    pub fn validate(&self, road: &RoadAttributes) -> Result<(), SimError> {
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(SimError::vehicle("max speed must be positive and finite"));
        }
        if !(self.length.is_finite() && self.length >= 0.0) {
            return Err(SimError::vehicle("length must be non-negative and finite"));
        }
        if !(self.width.is_finite() && self.width >= 0.0) {
            return Err(SimError::vehicle("width must be non-negative and finite"));
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(SimError::vehicle("speed must be non-negative and finite"));
        }
        if self.speed > self.max_speed {
            return Err(SimError::vehicle("speed must not exceed max speed"));
        }
        if !self.position.is_finite() || !self.lateral_slot.is_finite() {
            return Err(SimError::vehicle("position must be finite"));
        }
        if self.lane >= road.lane_count {
            return Err(SimError::vehicle("lane is not on the road"));
        }
        Ok(())
    }
}

impl Vehicle {
    /// Creates a new vehicle. The attributes are assumed to be valid.
    pub(crate) fn new(id: VehicleId, attributes: &VehicleAttributes) -> Self {
        Self {
            id,
            pos: attributes.position,
            lateral_slot: attributes.lateral_slot,
            length: attributes.length,
            width: attributes.width,
            speed: attributes.speed,
            acc: 0.0,
            max_speed: attributes.max_speed,
            lane: attributes.lane,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The vehicle's width in m.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The vehicle's length in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The longitudinal position of the rear of the vehicle in m.
    pub fn position(&self) -> f64 {
        self.pos
    }

    /// The longitudinal position of the front of the vehicle in m.
    pub fn front_position(&self) -> f64 {
        self.pos + self.length
    }

    /// The longitudinal extent of the vehicle.
    pub fn span(&self) -> Interval<f64> {
        Interval::new(self.pos, self.front_position())
    }

    /// The lateral display offset in m.
    pub fn lateral_slot(&self) -> f64 {
        self.lateral_slot
    }

    /// The vehicle's velocity in m/s.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The vehicle's maximum velocity in m/s.
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// The acceleration applied during the last update in m/s<sup>2</sup>.
    pub fn acceleration(&self) -> f64 {
        self.acc
    }

    /// The index of the lane the vehicle is in.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// The rear corner of the vehicle nearest lane 0, in road space.
    pub fn world_pos(&self) -> Point2d {
        Point2d::new(self.pos, self.lateral_slot)
    }

    /// Opposite corners of the rectangle the vehicle occupies in road space.
    pub fn bounds(&self) -> [Point2d; 2] {
        [
            self.world_pos(),
            Point2d::new(self.front_position(), self.lateral_slot + self.width),
        ]
    }

    /// Takes a snapshot of the vehicle's state.
    pub fn state(&self) -> VehicleState {
        VehicleState {
            position: self.pos,
            lateral_slot: self.lateral_slot,
            speed: self.speed,
            max_speed: self.max_speed,
            acceleration: self.acc,
            lane: self.lane,
        }
    }

    /// Whether the two vehicles are in the same lane.
    pub fn same_lane(&self, other: &Vehicle) -> bool {
        self.lane == other.lane
    }

    /// The smaller of the distances from either vehicle's front to the other's rear,
    /// regardless of which one is ahead.
    pub fn gap_to(&self, other: &Vehicle) -> f64 {
        f64::min(
            (self.front_position() - other.pos).abs(),
            (other.front_position() - self.pos).abs(),
        )
    }

    /// Whether `other` is ahead of this vehicle in the same lane and
    /// within its look-ahead distance.
    pub fn is_close_behind(&self, other: &Vehicle, policy: &DrivingPolicy) -> bool {
        let gap = other.pos - self.front_position();
        self.same_lane(other) && gap > 0.0 && gap <= policy.look_ahead(self.speed)
    }

    /// Moves the vehicle one lane in the given direction, shifting its display offset to match.
    ///
    /// The destination lane is not checked; callers must make sure it exists.
    pub fn change_lane(&mut self, direction: LaneDirection, lane_width: f64) {
        let from = self.lane;
        self.lane = self.lane.wrapping_add_signed(direction.offset());
        self.lateral_slot += direction.offset() as f64 * lane_width;
        debug!(
            "vehicle {:?} changed lane {} -> {} at {:.1} m",
            self.id, from, self.lane, self.pos
        );
        debug_lane_change(self.id, from, self.lane, self.pos);
    }

    /// Chooses the vehicle's acceleration and performs any lane changes,
    /// given a view of the other vehicles on the road.
    pub fn check_road(
        &mut self,
        neighbours: &Neighbours,
        road: &RoadAttributes,
        policy: &DrivingPolicy,
    ) {
        let look_ahead = policy.look_ahead(self.speed);
        let corridor = self.span().expand(look_ahead);

        // Keep left whenever possible
        if neighbours.is_lane_free(road, self.lane as isize - 1, corridor) {
            self.change_lane(LaneDirection::Left, road.lane_width);
        }

        let gap = neighbours.gap_ahead(self);
        let zone = policy.classify(gap, look_ahead);
        trace!("vehicle {:?}: gap {:.2} m, {:?}", self.id, gap, zone);

        let can_overtake = || {
            neighbours.is_lane_free(road, self.lane as isize + 1, corridor)
                && policy.wants_to_overtake(self.speed, self.max_speed)
        };

        match zone {
            GapZone::Close => {
                if can_overtake() {
                    self.change_lane(LaneDirection::Right, road.lane_width);
                } else {
                    self.acc = policy.hard_brake_decel;
                    debug_brake(self.id, gap);
                }
            }
            GapZone::Caution => {
                if can_overtake() {
                    self.change_lane(LaneDirection::Right, road.lane_width);
                } else {
                    self.acc = 0.0;
                }
            }
            GapZone::Clear => {
                self.acc = policy.cruise_accel;
            }
        }
    }

    /// Runs the driving policy, then integrates the vehicle's velocity and position.
    pub fn update(&mut self, neighbours: &Neighbours, params: &SimulationParams) {
        self.check_road(neighbours, &params.road, &params.policy);
        let (speed, pos) =
            dynamics::integrate(self.pos, self.speed, self.acc, self.max_speed, params.dt);
        self.speed = speed;
        self.pos = pos;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn car(pos: f64, speed: f64, lane: usize, max_speed: f64) -> Vehicle {
        let lateral_slot = 0.5 + 3.5 * lane as f64;
        Vehicle::new(
            VehicleId::default(),
            &VehicleAttributes::new(pos, lateral_slot, speed, lane, max_speed),
        )
    }

    fn road(lane_count: usize) -> RoadAttributes {
        RoadAttributes {
            lane_count,
            ..Default::default()
        }
    }

    #[test]
    fn geometry() {
        let a = car(0.0, 0.0, 0, 30.0);
        let b = car(30.0, 0.0, 0, 30.0);
        assert_approx_eq!(a.front_position(), 4.5);
        assert_approx_eq!(a.gap_to(&b), 25.5);
        assert_approx_eq!(b.gap_to(&a), 25.5);

        let [rear, front] = a.bounds();
        assert_approx_eq!(rear.x, 0.0);
        assert_approx_eq!(rear.y, 0.5);
        assert_approx_eq!(front.x, 4.5);
        assert_approx_eq!(front.y, 2.0);
    }

    #[test]
    fn close_behind() {
        let policy = DrivingPolicy::default();
        let me = car(0.0, 10.0, 0, 30.0); // 18 m look-ahead
        assert!(me.is_close_behind(&car(20.0, 0.0, 0, 30.0), &policy));
        assert!(!me.is_close_behind(&car(30.0, 0.0, 0, 30.0), &policy));
        assert!(!me.is_close_behind(&car(20.0, 0.0, 1, 30.0), &policy));
        assert!(!me.is_close_behind(&car(-20.0, 0.0, 0, 30.0), &policy));
    }

    #[test]
    fn change_lane_moves_display_offset() {
        let mut veh = car(0.0, 0.0, 0, 30.0);
        veh.change_lane(LaneDirection::Right, 3.5);
        assert_eq!(veh.lane(), 1);
        assert_approx_eq!(veh.lateral_slot(), 4.0);
        veh.change_lane(LaneDirection::Left, 3.5);
        assert_eq!(veh.lane(), 0);
        assert_approx_eq!(veh.lateral_slot(), 0.5);
    }

    #[test]
    fn accelerates_on_empty_road() {
        let policy = DrivingPolicy::default();
        let mut veh = car(0.0, 10.0, 0, 30.0);
        veh.check_road(&Neighbours::default(), &road(2), &policy);
        assert_eq!(veh.lane(), 0);
        assert_approx_eq!(veh.acceleration(), 3.0);
    }

    #[test]
    fn merges_left_when_free() {
        let policy = DrivingPolicy::default();
        let mut veh = car(100.0, 10.0, 1, 30.0);
        veh.check_road(&Neighbours::default(), &road(2), &policy);
        assert_eq!(veh.lane(), 0);
        assert_approx_eq!(veh.lateral_slot(), 0.5);
        assert_approx_eq!(veh.acceleration(), 3.0);
    }

    #[test]
    fn stays_right_when_left_lane_occupied() {
        let policy = DrivingPolicy::default();
        // Corridor is [82, 122.5]
        let others = [car(110.0, 10.0, 0, 30.0)];
        let mut veh = car(100.0, 10.0, 1, 30.0);
        veh.check_road(&Neighbours::new(&others), &road(2), &policy);
        assert_eq!(veh.lane(), 1);
        assert_approx_eq!(veh.acceleration(), 3.0);
    }

    #[test]
    fn overtakes_on_the_right_when_close() {
        let policy = DrivingPolicy::default();
        // 18 m look-ahead, 10 m gap
        let others = [car(14.5, 0.0, 0, 30.0)];
        let mut veh = car(0.0, 10.0, 0, 30.0);
        veh.acc = 3.0;
        veh.check_road(&Neighbours::new(&others), &road(2), &policy);
        assert_eq!(veh.lane(), 1);
        assert_approx_eq!(veh.lateral_slot(), 4.0);
        // Lane changes leave the acceleration as it was
        assert_approx_eq!(veh.acceleration(), 3.0);
    }

    #[test]
    fn brakes_when_close_and_boxed_in() {
        let policy = DrivingPolicy::default();
        let others = [car(14.5, 0.0, 0, 30.0)];
        let mut veh = car(0.0, 10.0, 0, 30.0);
        veh.check_road(&Neighbours::new(&others), &road(1), &policy);
        assert_eq!(veh.lane(), 0);
        assert_approx_eq!(veh.acceleration(), -8.0);
    }

    #[test]
    fn brakes_when_close_without_headroom() {
        let policy = DrivingPolicy::default();
        let others = [car(14.5, 0.0, 0, 30.0)];
        let mut veh = car(0.0, 28.0, 0, 30.0);
        veh.check_road(&Neighbours::new(&others), &road(2), &policy);
        assert_eq!(veh.lane(), 0);
        assert_approx_eq!(veh.acceleration(), -8.0);
    }

    #[test]
    fn holds_speed_in_caution_zone() {
        let policy = DrivingPolicy::default();
        // 18 m look-ahead, 25 m gap, right lane occupied
        let others = [car(29.5, 10.0, 0, 30.0), car(5.0, 10.0, 1, 30.0)];
        let mut veh = car(0.0, 10.0, 0, 30.0);
        veh.acc = 3.0;
        veh.check_road(&Neighbours::new(&others), &road(2), &policy);
        assert_eq!(veh.lane(), 0);
        assert_approx_eq!(veh.acceleration(), 0.0);
    }

    #[test]
    fn overtakes_in_caution_zone() {
        let policy = DrivingPolicy::default();
        let others = [car(29.5, 10.0, 0, 30.0)];
        let mut veh = car(0.0, 10.0, 0, 30.0);
        veh.check_road(&Neighbours::new(&others), &road(2), &policy);
        assert_eq!(veh.lane(), 1);
    }

    #[test]
    fn left_merge_then_right_merge_in_one_check() {
        let policy = DrivingPolicy::default();
        // Lane 0 is free around us, but a slow vehicle sits 10 m ahead in it
        let others = [car(34.5, 0.0, 0, 30.0)];
        let mut veh = car(20.0, 10.0, 1, 30.0);
        // Corridor [2, 42.5] overlaps the vehicle in lane 0, so no left merge
        veh.check_road(&Neighbours::new(&others), &road(2), &policy);
        assert_eq!(veh.lane(), 1);

        // Further back the corridor is clear of it, so merge left, then
        // find it inside the caution band and move straight back right.
        let others = [car(40.0, 0.0, 0, 30.0)];
        let mut veh = car(0.0, 10.0, 1, 30.0);
        veh.check_road(&Neighbours::new(&others), &road(2), &policy);
        assert_eq!(veh.lane(), 1);
        assert_approx_eq!(veh.lateral_slot(), 4.0);
    }

    #[test]
    fn update_integrates_after_deciding() {
        let params = SimulationParams::default();
        let mut veh = car(0.0, 0.0, 0, 30.0);
        veh.update(&Neighbours::default(), &params);
        assert_approx_eq!(veh.acceleration(), 3.0);
        assert_approx_eq!(veh.speed(), 0.1);
        assert_approx_eq!(veh.position(), 0.1 / 30.0);
    }

    #[test]
    fn update_never_exceeds_max_speed() {
        let params = SimulationParams::default();
        let mut veh = car(0.0, 20.0, 0, 20.0);
        for _ in 0..100 {
            veh.update(&Neighbours::default(), &params);
            assert!(veh.speed() <= veh.max_speed());
        }
        assert_approx_eq!(veh.speed(), 20.0);
    }

    #[test]
    fn rejects_bad_attributes() {
        let road = RoadAttributes::default();
        let ok = VehicleAttributes::new(0.0, 0.5, 0.0, 0, 30.0);
        assert!(ok.validate(&road).is_ok());

        let bad = [
            VehicleAttributes { max_speed: 0.0, ..ok },
            VehicleAttributes { max_speed: -1.0, ..ok },
            VehicleAttributes { length: -4.5, ..ok },
            VehicleAttributes { speed: -1.0, ..ok },
            VehicleAttributes { speed: 31.0, ..ok },
            VehicleAttributes { lane: 2, ..ok },
            VehicleAttributes { position: f64::NAN, ..ok },
        ];
        for attribs in bad {
            assert!(matches!(
                attribs.validate(&road),
                Err(SimError::InvalidVehicle { .. })
            ));
        }
    }
}
