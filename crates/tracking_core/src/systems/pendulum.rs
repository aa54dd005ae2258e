use crate::traits::{constant, DynamicalSystem, Scalar, SecondOrderSystem};
use serde::{Deserialize, Serialize};

/// Periodic forcing `amplitude * cos(frequency * t + phase)` added to the
/// pendulum acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    pub amplitude: f64,
    pub frequency: f64,
    #[serde(default)]
    pub phase: f64,
}

impl Drive {
    fn force<T: Scalar>(&self, t: T) -> T {
        let amplitude: T = constant(self.amplitude);
        let frequency: T = constant(self.frequency);
        let phase: T = constant(self.phase);
        amplitude * (frequency * t + phase).cos()
    }
}

/// Nonlinear pendulum `θ'' = -ω² sin θ (+ drive)` with state `[θ, θ']`.
///
/// The angle is never wrapped; a rotating pendulum keeps accumulating angle,
/// which is what separates rotation from libration in phase space.
///
/// The trackers step it as a [`SecondOrderSystem`] with the symplectic
/// schemes. The [`DynamicalSystem`] impl is the first-order vector field
/// `(θ', -ω² sin θ + drive)`, for generic steppers such as an explicit Euler
/// reference integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pendulum {
    pub omega: f64,
    #[serde(default)]
    pub drive: Option<Drive>,
}

impl Pendulum {
    pub fn new(omega: f64) -> Self {
        Self { omega, drive: None }
    }

    pub fn with_drive(mut self, drive: Drive) -> Self {
        self.drive = Some(drive);
        self
    }

    /// Energy per unit inertia, `½p² - ω² cos θ`. Conserved when undriven.
    pub fn energy(&self, theta: f64, p: f64) -> f64 {
        0.5 * p * p - self.omega * self.omega * theta.cos()
    }

    fn accel<T: Scalar>(&self, t: T, theta: T) -> T {
        let omega: T = constant(self.omega);
        let restoring = -(omega * omega) * theta.sin();
        match &self.drive {
            Some(drive) => restoring + drive.force(t),
            None => restoring,
        }
    }
}

impl<T: Scalar> SecondOrderSystem<T> for Pendulum {
    fn degrees_of_freedom(&self) -> usize {
        1
    }

    fn acceleration(&self, t: T, q: &[T], out: &mut [T]) {
        out[0] = self.accel(t, q[0]);
    }
}

impl<T: Scalar> DynamicalSystem<T> for Pendulum {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, t: T, x: &[T], out: &mut [T]) {
        out[0] = x[1];
        out[1] = self.accel(t, x[0]);
    }
}
