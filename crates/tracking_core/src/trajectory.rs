use serde::{Deserialize, Serialize};

/// A single point `(θ, p)` in phase space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    pub theta: f64,
    pub p: f64,
}

impl PhaseState {
    pub fn new(theta: f64, p: f64) -> Self {
        Self { theta, p }
    }
}

/// Phase-space samples of one run, index `i` being the state after `i` steps.
///
/// Angle and momentum are kept as two parallel columns that always have the
/// same length, and there is always at least the initial sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    theta: Vec<f64>,
    p: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn with_capacity(samples: usize) -> Self {
        Self {
            theta: Vec::with_capacity(samples),
            p: Vec::with_capacity(samples),
        }
    }

    pub(crate) fn push(&mut self, theta: f64, p: f64) {
        self.theta.push(theta);
        self.p.push(p);
    }

    pub fn len(&self) -> usize {
        self.theta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }

    /// Number of steps taken, one less than the number of samples.
    pub fn steps(&self) -> usize {
        self.len().saturating_sub(1)
    }

    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    pub fn p(&self) -> &[f64] {
        &self.p
    }

    pub fn state(&self, index: usize) -> Option<PhaseState> {
        Some(PhaseState::new(*self.theta.get(index)?, *self.p.get(index)?))
    }

    pub fn initial(&self) -> Option<PhaseState> {
        self.state(0)
    }

    pub fn last(&self) -> Option<PhaseState> {
        self.state(self.steps())
    }

    pub fn iter(&self) -> impl Iterator<Item = PhaseState> + '_ {
        self.theta
            .iter()
            .zip(&self.p)
            .map(|(&theta, &p)| PhaseState::new(theta, p))
    }

    /// Splits into the `(θ, p)` column pair handed to plotting/export consumers.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.theta, self.p)
    }
}
