#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::debug::debug_exit;
use crate::vehicle::{DrivingPolicy, Vehicle, VehicleAttributes, VehicleState};
use crate::{Neighbours, RoadAttributes, SimError, VehicleId, VehicleSet};
use log::debug;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The default time step, in s.
const DEFAULT_DT: f64 = 1.0 / 30.0;

/// The parameters of a simulation, fixed when it is created.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationParams {
    /// The duration of one simulation step in s.
    pub dt: f64,
    /// The road the vehicles drive on.
    pub road: RoadAttributes,
    /// The driving policy followed by every vehicle.
    pub policy: DrivingPolicy,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            road: Default::default(),
            policy: Default::default(),
        }
    }
}

impl SimulationParams {
    /// Checks that the parameters describe a simulation that can be run.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::params("time step must be positive and finite"));
        }
        self.road.validate()?;
        self.policy.validate()
    }
}

/// A traffic simulation on a straight, multi-lane road.
#[derive(Default)]
pub struct Simulation {
    /// The simulation parameters.
    params: SimulationParams,
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The current frame of simulation.
    frame: usize,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl Simulation {
    /// Creates a new simulation with the given parameters.
    pub fn new(params: SimulationParams) -> Result<Self, SimError> {
        params.validate()?;
        Ok(Self {
            params,
            ..Default::default()
        })
    }

    /// Gets the simulation parameters.
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Adds a vehicle to the simulation.
    pub fn add_vehicle(&mut self, attributes: &VehicleAttributes) -> Result<VehicleId, SimError> {
        attributes.validate(&self.params.road)?;
        let vehicle_id = self
            .vehicles
            .insert_with_key(|id| Vehicle::new(id, attributes));
        debug!(
            "added vehicle {:?} in lane {} at {:.1} m",
            vehicle_id, attributes.lane, attributes.position
        );
        Ok(vehicle_id)
    }

    /// Removes a vehicle from the simulation, returning it if it was present.
    pub fn remove_vehicle(&mut self, id: VehicleId) -> Option<Vehicle> {
        self.vehicles.remove(id)
    }

    /// Advances the simulation by one time step, then removes the vehicles
    /// that have driven off the end of the road.
    ///
    /// Returns the vehicles remaining on the road.
    pub fn step(&mut self) -> &VehicleSet {
        self.update_vehicles();
        self.remove_exited_vehicles();
        self.frame += 1;

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }

        &self.vehicles
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Gets the simulated time elapsed in s.
    pub fn time(&self) -> f64 {
        self.frame as f64 * self.params.dt
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// The number of vehicles in the simulation.
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Gets a reference to the vehicle with the given ID,
    /// or `None` if it has left the simulation.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(vehicle_id)
    }

    /// Gets a snapshot of the state of the vehicle with the given ID,
    /// or `None` if it has left the simulation.
    pub fn vehicle_state(&self, vehicle_id: VehicleId) -> Option<VehicleState> {
        self.vehicles.get(vehicle_id).map(Vehicle::state)
    }

    /// Gets the debugging information for the previously simulated frame as JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }

    /// Updates every vehicle against a snapshot of the others taken at the start of the step.
    fn update_vehicles(&mut self) {
        let snapshot: Vec<Vehicle> = self.vehicles.values().cloned().collect();
        for (idx, vehicle) in self.vehicles.values_mut().enumerate() {
            let neighbours = Neighbours::excluding(&snapshot, idx);
            vehicle.update(&neighbours, &self.params);
        }
    }

    /// Removes the vehicles past the end of the road.
    fn remove_exited_vehicles(&mut self) {
        let road = &self.params.road;
        let exited: SmallVec<[VehicleId; 4]> = self
            .vehicles
            .iter()
            .filter(|(_, vehicle)| road.has_exited(vehicle.position()))
            .map(|(vehicle_id, _)| vehicle_id)
            .collect();

        for vehicle_id in exited {
            if let Some(vehicle) = self.vehicles.remove(vehicle_id) {
                debug!(
                    "vehicle {:?} exited at {:.1} m",
                    vehicle_id,
                    vehicle.position()
                );
                debug_exit(vehicle_id, vehicle.position());
            }
        }
    }
}
