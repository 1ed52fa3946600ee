use anyhow::Result;
use clap::Parser;
use highway_sim::{
    Key, RoadAttributes, Simulation, SimulationParams, VehicleAttributes, VehicleId,
};
use log::info;

#[derive(Parser)]
#[command(name = "highway-sim")]
#[command(about = "Runs the three car highway scenario headless and prints vehicle states")]
struct Cli {
    /// Number of simulation steps to run
    #[arg(long, default_value = "900")]
    ticks: usize,

    /// Print the vehicle table every this many steps
    #[arg(long, default_value = "30")]
    report_every: usize,

    /// Number of lanes on the road
    #[arg(long, default_value = "2")]
    lanes: usize,

    /// Length of the road in metres
    #[arg(long, default_value = "1000")]
    road_length: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut sim = Simulation::new(SimulationParams {
        road: RoadAttributes {
            lane_count: cli.lanes,
            road_length: cli.road_length,
            ..Default::default()
        },
        ..Default::default()
    })?;

    sim.add_vehicle(&VehicleAttributes::new(60.0, 0.5, 0.0, 0, 20.0))?;
    sim.add_vehicle(&VehicleAttributes::new(0.0, 0.5, 0.0, 0, 30.0))?;
    sim.add_vehicle(&VehicleAttributes::new(30.0, 0.5, 0.0, 0, 25.0))?;

    info!(
        "simulating {} steps on a {} lane, {} m road",
        cli.ticks, cli.lanes, cli.road_length
    );

    let report_every = cli.report_every.max(1);
    for _ in 0..cli.ticks {
        let vehicles = sim.step();
        if vehicles.is_empty() {
            info!("all vehicles have left the road");
            break;
        }
        if sim.frame() % report_every == 0 {
            print_report(&sim);
        }
    }

    info!(
        "finished at {:.2} s with {} vehicles on the road",
        sim.time(),
        sim.vehicle_count()
    );
    Ok(())
}

fn print_report(sim: &Simulation) {
    println!("--- t = {:.2} s (frame {}) ---", sim.time(), sim.frame());
    println!(
        "{:>4} {:>9} {:>5} {:>8} {:>6} {:>6}",
        "id", "pos", "lane", "speed", "max", "acc"
    );
    for vehicle in sim.iter_vehicles() {
        println!(
            "{:>4} {:>9.2} {:>5} {:>8.3} {:>6.1} {:>6.1}",
            short_id(vehicle.id()),
            vehicle.position(),
            vehicle.lane(),
            vehicle.speed(),
            vehicle.max_speed(),
            vehicle.acceleration(),
        );
    }
}

/// The slot index part of a vehicle ID.
fn short_id(id: VehicleId) -> u32 {
    id.data().as_ffi() as u32
}
