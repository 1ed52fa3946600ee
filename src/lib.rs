pub use cgmath;
pub use error::SimError;
pub use neighbours::Neighbours;
pub use road::RoadAttributes;
pub use simulation::{Simulation, SimulationParams};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::Key;
pub use util::Interval;
pub use vehicle::{DrivingPolicy, GapZone, LaneDirection, Vehicle, VehicleAttributes, VehicleState};

mod debug;
mod error;
pub mod math;
mod neighbours;
mod road;
mod simulation;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

/// The vehicles in a simulation, keyed by ID.
pub type VehicleSet = SlotMap<VehicleId, Vehicle>;
