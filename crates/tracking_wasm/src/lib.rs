//! WASM bindings for the trajectory engine.
//!
//! Counts arrive as signed integers from JavaScript and are validated by the
//! core; every failure is reported as a string `JsValue`.

use js_sys::Float64Array;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use tracking_core::{
    iteration_count, run_sweep, track_pendulum, track_standard_map, PendulumParams, PhaseState,
    StandardMap, SweepSettings, TrackingError, Trajectory, TrajectoryBatch,
};
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct TrackingOutput {
    theta: Vec<f64>,
    p: Vec<f64>,
}

impl From<Trajectory> for TrackingOutput {
    fn from(trajectory: Trajectory) -> Self {
        let (theta, p) = trajectory.into_parts();
        Self { theta, p }
    }
}

fn tracking_error(context: &str, err: TrackingError) -> JsValue {
    JsValue::from_str(&format!("{context} failed: {err}"))
}

fn serialize(output: &TrackingOutput) -> Result<JsValue, JsValue> {
    to_value(output).map_err(|e| JsValue::from_str(&format!("Failed to serialize trajectory: {e}")))
}

/// Standard map orbit as `{ theta, p }`, each of length `n + 1`.
#[wasm_bindgen]
pub fn standard_map_tracking(theta: f64, p: f64, k: f64, n: i32) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let steps = iteration_count(n.into())
        .map_err(|e| tracking_error("Standard map tracking", e))?;
    let trajectory = track_standard_map(PhaseState::new(theta, p), &StandardMap::new(k), steps)
        .map_err(|e| tracking_error("Standard map tracking", e))?;
    serialize(&trajectory.into())
}

/// Undriven pendulum trajectory as `{ theta, p }`, each of length `n + 1`.
#[wasm_bindgen]
pub fn pendulum_tracking(
    theta: f64,
    theta_dot: f64,
    omega: f64,
    dt: f64,
    n: i32,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let steps = iteration_count(n.into()).map_err(|e| tracking_error("Pendulum tracking", e))?;
    let params = PendulumParams::new(omega, dt);
    let trajectory = track_pendulum(PhaseState::new(theta, theta_dot), &params, steps)
        .map_err(|e| tracking_error("Pendulum tracking", e))?;
    serialize(&trajectory.into())
}

/// Handle on a finished initial-angle sweep.
#[wasm_bindgen]
pub struct WasmTrajectoryBatch {
    batch: TrajectoryBatch,
}

#[wasm_bindgen]
impl WasmTrajectoryBatch {
    pub fn conditions(&self) -> usize {
        self.batch.conditions()
    }

    pub fn samples(&self) -> usize {
        self.batch.samples()
    }

    pub fn initial_angles(&self) -> Float64Array {
        Float64Array::from(self.batch.initial_angles())
    }

    /// Flat `(condition, step, coordinate)` buffer.
    pub fn data(&self) -> Float64Array {
        Float64Array::from(self.batch.as_slice())
    }

    pub fn theta(&self, condition: usize) -> Result<Float64Array, JsValue> {
        let view = self
            .batch
            .condition(condition)
            .ok_or_else(|| JsValue::from_str("Condition index out of range."))?;
        Ok(Float64Array::from(view.theta().collect::<Vec<_>>().as_slice()))
    }

    pub fn p(&self, condition: usize) -> Result<Float64Array, JsValue> {
        let view = self
            .batch
            .condition(condition)
            .ok_or_else(|| JsValue::from_str("Condition index out of range."))?;
        Ok(Float64Array::from(view.p().collect::<Vec<_>>().as_slice()))
    }
}

/// Sweeps `conditions` initial angles evenly over `[0, max_amplitude]`.
#[wasm_bindgen]
pub fn standard_map_sweep(
    conditions: u32,
    max_amplitude: f64,
    p0: f64,
    k: f64,
    n: i32,
) -> Result<WasmTrajectoryBatch, JsValue> {
    console_error_panic_hook::set_once();

    let settings = SweepSettings {
        conditions: conditions as usize,
        max_amplitude,
        p0,
        k,
        steps: iteration_count(n.into()).map_err(|e| tracking_error("Standard map sweep", e))?,
        parallel: false,
    };
    let batch = run_sweep(&settings).map_err(|e| tracking_error("Standard map sweep", e))?;
    Ok(WasmTrajectoryBatch { batch })
}
