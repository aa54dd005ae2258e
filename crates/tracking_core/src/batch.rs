//! Initial-angle sweeps of the standard map.
//!
//! A sweep runs one orbit per initial angle and stores all of them in a
//! single [`TrajectoryBatch`] arena with axes `(condition, step, coordinate)`.
//! Each condition owns a contiguous slab of the arena, so conditions can be
//! filled independently (and, with the `parallel` feature, concurrently)
//! while the layout stays in input order.

use crate::cancel::CancelToken;
use crate::error::{Result, TrackingError};
use crate::systems::StandardMap;
use crate::tracking::{run_standard_map, sample_count};
use crate::trajectory::{PhaseState, Trajectory};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_3;

/// Size of the coordinate axis: `θ` and `p`.
pub const COORDINATES: usize = 2;

/// Index along the last axis of a [`TrajectoryBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coordinate {
    Theta = 0,
    Momentum = 1,
}

/// `count` evenly spaced values from `start` to `end`, both included.
/// A single value is `start`; zero values is an empty vector.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i + 1 == count { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Orbits of several initial conditions in one flat, row-major buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryBatch {
    data: Vec<f64>,
    initial_angles: Vec<f64>,
    samples: usize,
}

impl TrajectoryBatch {
    /// `(conditions, samples per condition, coordinates)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.initial_angles.len(), self.samples, COORDINATES)
    }

    /// Element strides matching [`TrajectoryBatch::shape`].
    pub fn strides(&self) -> (usize, usize, usize) {
        (self.samples * COORDINATES, COORDINATES, 1)
    }

    pub fn conditions(&self) -> usize {
        self.initial_angles.len()
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn initial_angles(&self) -> &[f64] {
        &self.initial_angles
    }

    pub fn get(&self, condition: usize, step: usize, coordinate: Coordinate) -> Option<f64> {
        if condition >= self.conditions() || step >= self.samples {
            return None;
        }
        let (cs, ss, _) = self.strides();
        self.data.get(condition * cs + step * ss + coordinate as usize).copied()
    }

    pub fn condition(&self, index: usize) -> Option<TrajectoryView<'_>> {
        if index >= self.conditions() {
            return None;
        }
        let stride = self.samples * COORDINATES;
        let start = index.checked_mul(stride)?;
        let data = self.data.get(start..start.checked_add(stride)?)?;
        Some(TrajectoryView {
            initial_angle: self.initial_angles[index],
            data,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = TrajectoryView<'_>> + '_ {
        (0..self.conditions()).filter_map(move |i| self.condition(i))
    }

    /// The whole arena, condition-major, with `θ, p` interleaved per step.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

/// Borrowed view of one condition inside a [`TrajectoryBatch`].
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryView<'a> {
    initial_angle: f64,
    data: &'a [f64],
}

impl<'a> TrajectoryView<'a> {
    pub fn initial_angle(&self) -> f64 {
        self.initial_angle
    }

    pub fn len(&self) -> usize {
        self.data.len() / COORDINATES
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn state(&self, step: usize) -> Option<PhaseState> {
        let pair = self.data.get(step * COORDINATES..(step + 1) * COORDINATES)?;
        Some(PhaseState::new(pair[0], pair[1]))
    }

    pub fn theta(&self) -> impl Iterator<Item = f64> + 'a {
        self.data.iter().step_by(COORDINATES).copied()
    }

    pub fn p(&self) -> impl Iterator<Item = f64> + 'a {
        self.data.iter().skip(1).step_by(COORDINATES).copied()
    }

    pub fn to_trajectory(&self) -> Trajectory {
        let mut trajectory = Trajectory::with_capacity(self.len());
        for pair in self.data.chunks_exact(COORDINATES) {
            trajectory.push(pair[0], pair[1]);
        }
        trajectory
    }
}

/// Settings of an evenly spaced initial-angle sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    pub conditions: usize,
    pub max_amplitude: f64,
    pub p0: f64,
    pub k: f64,
    pub steps: u64,
    pub parallel: bool,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            conditions: 20,
            max_amplitude: FRAC_PI_3,
            p0: 0.0,
            k: -0.5,
            steps: 10_000,
            parallel: false,
        }
    }
}

impl SweepSettings {
    pub fn initial_angles(&self) -> Vec<f64> {
        linspace(0.0, self.max_amplitude, self.conditions)
    }

    pub fn runner(&self) -> BatchRunner {
        BatchRunner::new(StandardMap::new(self.k), self.p0, self.steps).parallel(self.parallel)
    }
}

/// Runs the standard map once per initial angle with a shared `p0`, `k` and
/// step count.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    map: StandardMap,
    p0: f64,
    steps: u64,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
    cancel: Option<CancelToken>,
}

impl BatchRunner {
    pub fn new(map: StandardMap, p0: f64, steps: u64) -> Self {
        Self {
            map,
            p0,
            steps,
            parallel: false,
            cancel: None,
        }
    }

    /// Requests parallel execution. Only honoured with the `parallel`
    /// feature; the result is identical either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn run(&self, initial_angles: &[f64]) -> Result<TrajectoryBatch> {
        let samples = sample_count(self.steps)?;
        let too_long = || {
            TrackingError::invalid(format!(
                "{} conditions of {samples} samples exceed addressable length",
                initial_angles.len()
            ))
        };
        let stride = samples.checked_mul(COORDINATES).ok_or_else(too_long)?;
        let len = initial_angles.len().checked_mul(stride).ok_or_else(too_long)?;
        let mut data = vec![0.0; len];

        self.fill(&mut data, stride, initial_angles)?;

        Ok(TrajectoryBatch {
            data,
            initial_angles: initial_angles.to_vec(),
            samples,
        })
    }

    fn fill_condition(&self, slab: &mut [f64], theta0: f64) -> Result<()> {
        run_standard_map(
            PhaseState::new(theta0, self.p0),
            &self.map,
            self.steps,
            self.cancel.as_ref(),
            |i, theta, p| {
                slab[i * COORDINATES] = theta;
                slab[i * COORDINATES + 1] = p;
            },
        )
    }

    #[cfg(feature = "parallel")]
    fn fill(&self, data: &mut [f64], stride: usize, initial_angles: &[f64]) -> Result<()> {
        use rayon::prelude::*;

        if self.parallel {
            return data
                .par_chunks_mut(stride)
                .zip(initial_angles.par_iter())
                .try_for_each(|(slab, &theta0)| self.fill_condition(slab, theta0));
        }
        self.fill_sequential(data, stride, initial_angles)
    }

    #[cfg(not(feature = "parallel"))]
    fn fill(&self, data: &mut [f64], stride: usize, initial_angles: &[f64]) -> Result<()> {
        self.fill_sequential(data, stride, initial_angles)
    }

    fn fill_sequential(&self, data: &mut [f64], stride: usize, initial_angles: &[f64]) -> Result<()> {
        data.chunks_mut(stride)
            .zip(initial_angles)
            .try_for_each(|(slab, &theta0)| self.fill_condition(slab, theta0))
    }
}

/// Sweeps `settings.conditions` angles evenly over `[0, max_amplitude]`.
pub fn run_sweep(settings: &SweepSettings) -> Result<TrajectoryBatch> {
    settings.runner().run(&settings.initial_angles())
}

/// [`run_sweep`] that gives up with [`TrackingError::Cancelled`] once
/// `cancel` is set. No partial batch is returned.
pub fn run_sweep_cancellable(settings: &SweepSettings, cancel: &CancelToken) -> Result<TrajectoryBatch> {
    settings
        .runner()
        .with_cancel(cancel.clone())
        .run(&settings.initial_angles())
}
