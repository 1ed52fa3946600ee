/// Advances a vehicle's speed and position by one time step with semi-implicit Euler,
/// clamping the new speed to `[0, max_speed]` before it is used to move the vehicle.
///
/// Returns the new `(speed, position)`.
pub fn integrate(pos: f64, speed: f64, acc: f64, max_speed: f64, dt: f64) -> (f64, f64) {
    let speed = (speed + acc * dt).clamp(0.0, max_speed);
    let pos = pos + speed * dt;
    (speed, pos)
}
