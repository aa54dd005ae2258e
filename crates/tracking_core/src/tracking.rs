//! Trajectory generation for the standard map and the pendulum.
//!
//! Every entry point validates its arguments before stepping, so a failed
//! call never hands back a partial trajectory. Non-finite initial states and
//! parameters are not rejected; they propagate through the recurrence.

use crate::cancel::CancelToken;
use crate::error::{Result, TrackingError};
use crate::solvers::{DiscreteMap, SymplecticEuler, Yoshida4};
use crate::systems::{Drive, Pendulum, StandardMap};
use crate::trajectory::{PhaseState, Trajectory};
use crate::traits::{Steppable, SymplecticSteppable};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Steps between two polls of a cancellation token.
pub(crate) const CANCEL_POLL_INTERVAL: u64 = 4096;

/// Symplectic scheme used to integrate the pendulum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendulumScheme {
    SymplecticEuler,
    #[default]
    Yoshida4,
}

impl PendulumScheme {
    fn build(self, dof: usize) -> PendulumStepper {
        match self {
            PendulumScheme::SymplecticEuler => PendulumStepper::Euler(SymplecticEuler::new(dof)),
            PendulumScheme::Yoshida4 => PendulumStepper::Yoshida(Yoshida4::new(dof)),
        }
    }
}

enum PendulumStepper {
    Euler(SymplecticEuler<f64>),
    Yoshida(Yoshida4<f64>),
}

impl PendulumStepper {
    fn step(&mut self, system: &Pendulum, t: &mut f64, state: &mut [f64], dt: f64) {
        match self {
            PendulumStepper::Euler(s) => s.step(system, t, state, dt),
            PendulumStepper::Yoshida(s) => s.step(system, t, state, dt),
        }
    }
}

/// Pendulum integration settings: frequency, time step, forcing and scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendulumParams {
    pub omega: f64,
    pub dt: f64,
    #[serde(default)]
    pub drive: Option<Drive>,
    #[serde(default)]
    pub scheme: PendulumScheme,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            omega: PI,
            dt: 1e-2,
            drive: None,
            scheme: PendulumScheme::default(),
        }
    }
}

impl PendulumParams {
    pub fn new(omega: f64, dt: f64) -> Self {
        Self {
            omega,
            dt,
            ..Self::default()
        }
    }

    pub fn system(&self) -> Pendulum {
        Pendulum {
            omega: self.omega,
            drive: self.drive,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(TrackingError::invalid(format!(
                "time step dt must be positive and finite, got {}",
                self.dt
            )));
        }
        Ok(())
    }
}

/// Converts a signed iteration count coming from a loosely typed caller.
pub fn iteration_count(n: i64) -> Result<u64> {
    u64::try_from(n).map_err(|_| {
        TrackingError::invalid(format!("iteration count must be non-negative, got {n}"))
    })
}

/// Number of samples (`n + 1`) for `n` steps, checked against the address space.
pub(crate) fn sample_count(n: u64) -> Result<usize> {
    usize::try_from(n)
        .ok()
        .and_then(|steps| steps.checked_add(1))
        .ok_or_else(|| {
            TrackingError::invalid(format!("iteration count {n} exceeds addressable length"))
        })
}

fn poll(cancel: Option<&CancelToken>, step: u64) -> Result<()> {
    match cancel {
        Some(token) if step % CANCEL_POLL_INTERVAL == 0 && token.is_cancelled() => {
            Err(TrackingError::Cancelled)
        }
        _ => Ok(()),
    }
}

/// Iterates the map `n` times, handing every sample (initial state included)
/// to `emit` together with its index.
pub(crate) fn run_standard_map(
    initial: PhaseState,
    map: &StandardMap,
    n: u64,
    cancel: Option<&CancelToken>,
    mut emit: impl FnMut(usize, f64, f64),
) -> Result<()> {
    let mut stepper = DiscreteMap::new(2);
    let mut t = 0.0;
    let mut state = [initial.theta, initial.p];
    emit(0, state[0], state[1]);

    for i in 0..n {
        poll(cancel, i)?;
        stepper.step(map, &mut t, &mut state, 1.0);
        emit(i as usize + 1, state[0], state[1]);
    }
    Ok(())
}

fn run_pendulum(
    initial: PhaseState,
    params: &PendulumParams,
    n: u64,
    cancel: Option<&CancelToken>,
    mut emit: impl FnMut(f64, f64),
) -> Result<()> {
    let system = params.system();
    let mut stepper = params.scheme.build(1);
    let mut t = 0.0;
    let mut state = [initial.theta, initial.p];
    emit(state[0], state[1]);

    for i in 0..n {
        poll(cancel, i)?;
        stepper.step(&system, &mut t, &mut state, params.dt);
        emit(state[0], state[1]);
    }
    Ok(())
}

/// Orbit of the standard map: `n + 1` samples starting at `initial`.
///
/// Sample 0 is `initial` as given; every later sample lies in `[0, 2π)²`.
pub fn track_standard_map(initial: PhaseState, map: &StandardMap, n: u64) -> Result<Trajectory> {
    track_standard_map_inner(initial, map, n, None)
}

/// [`track_standard_map`] that gives up with [`TrackingError::Cancelled`]
/// once `cancel` is set.
pub fn track_standard_map_cancellable(
    initial: PhaseState,
    map: &StandardMap,
    n: u64,
    cancel: &CancelToken,
) -> Result<Trajectory> {
    track_standard_map_inner(initial, map, n, Some(cancel))
}

fn track_standard_map_inner(
    initial: PhaseState,
    map: &StandardMap,
    n: u64,
    cancel: Option<&CancelToken>,
) -> Result<Trajectory> {
    let mut trajectory = Trajectory::with_capacity(sample_count(n)?);
    run_standard_map(initial, map, n, cancel, |_, theta, p| trajectory.push(theta, p))?;
    Ok(trajectory)
}

/// Pendulum trajectory sampled every `params.dt` seconds, `n + 1` samples.
pub fn track_pendulum(initial: PhaseState, params: &PendulumParams, n: u64) -> Result<Trajectory> {
    track_pendulum_inner(initial, params, n, None)
}

/// [`track_pendulum`] that gives up with [`TrackingError::Cancelled`] once
/// `cancel` is set.
pub fn track_pendulum_cancellable(
    initial: PhaseState,
    params: &PendulumParams,
    n: u64,
    cancel: &CancelToken,
) -> Result<Trajectory> {
    track_pendulum_inner(initial, params, n, Some(cancel))
}

fn track_pendulum_inner(
    initial: PhaseState,
    params: &PendulumParams,
    n: u64,
    cancel: Option<&CancelToken>,
) -> Result<Trajectory> {
    params.validate()?;
    let mut trajectory = Trajectory::with_capacity(sample_count(n)?);
    run_pendulum(initial, params, n, cancel, |theta, p| trajectory.push(theta, p))?;
    Ok(trajectory)
}

/// Calculates the angle and momentum of a particle in the standard map.
///
/// # Arguments
///
/// * `theta0` - The initial angle in radians.
/// * `p0` - The initial momentum.
/// * `k` - The strength of the perturbation.
/// * `n` - The number of iterations to perform.
///
/// # Returns
///
/// The `(θ, p)` sequences, each of length `n + 1`.
///
/// # Example
///
/// ```
/// let (theta, p) = tracking_core::standard_map_tracking(0.1, 0.0, -1.0, 1000).unwrap();
/// assert_eq!(theta.len(), 1001);
/// assert_eq!((theta[0], p[0]), (0.1, 0.0));
/// ```
pub fn standard_map_tracking(theta0: f64, p0: f64, k: f64, n: u64) -> Result<(Vec<f64>, Vec<f64>)> {
    track_standard_map(PhaseState::new(theta0, p0), &StandardMap::new(k), n)
        .map(Trajectory::into_parts)
}

/// Calculates the angle and angular velocity of an undriven pendulum over time.
///
/// # Arguments
///
/// * `theta0` - The initial angle in radians.
/// * `p0` - The initial angular velocity in radians per second.
/// * `omega` - The natural frequency in radians per second.
/// * `dt` - The time step between samples; must be positive.
/// * `n` - The number of steps to perform.
///
/// # Returns
///
/// The `(θ, θ')` sequences, each of length `n + 1`, integrated with the
/// fourth-order Yoshida scheme.
///
/// # Example
///
/// ```
/// use std::f64::consts::PI;
/// let (theta, p) = tracking_core::pendulum_tracking(PI / 4.0, 0.0, PI, 1e-2, 1000).unwrap();
/// assert_eq!(p.len(), 1001);
/// assert_eq!(theta[0], PI / 4.0);
/// ```
pub fn pendulum_tracking(
    theta0: f64,
    p0: f64,
    omega: f64,
    dt: f64,
    n: u64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    track_pendulum(PhaseState::new(theta0, p0), &PendulumParams::new(omega, dt), n)
        .map(Trajectory::into_parts)
}
