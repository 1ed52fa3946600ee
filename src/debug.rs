use crate::VehicleId;
#[cfg(feature = "debug")]
use serde_json::json;
#[cfg(feature = "debug")]
use slotmap::Key;

#[cfg(feature = "debug")]
thread_local!(
    static DEBUG_FRAME: std::cell::RefCell<Vec<serde_json::Value>> = Default::default();
);

#[allow(unused)]
pub fn debug_lane_change(vehicle_id: VehicleId, from: usize, to: usize, pos: f64) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "lane_change",
            "vehicle": vehicle_id.data().as_ffi(),
            "from": from,
            "to": to,
            "pos": pos,
        }))
    })
}

#[allow(unused)]
pub fn debug_brake(vehicle_id: VehicleId, gap: f64) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "brake",
            "vehicle": vehicle_id.data().as_ffi(),
            "gap": gap,
        }))
    })
}

#[allow(unused)]
pub fn debug_exit(vehicle_id: VehicleId, pos: f64) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "exit",
            "vehicle": vehicle_id.data().as_ffi(),
            "pos": pos,
        }))
    })
}

#[cfg(feature = "debug")]
pub fn take_debug_frame() -> serde_json::Value {
    json!(DEBUG_FRAME.with(|frame| frame.take()))
}
