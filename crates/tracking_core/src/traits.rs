use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in our dynamical systems.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Converts an `f64` constant into `T`. Every float type can represent an
/// `f64` approximately, so the NaN fallback is never taken for `f32`/`f64`.
pub(crate) fn constant<T: Scalar>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// Represents a dynamical system (Flow or Map).
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field (flow) or map function.
    /// x: current state
    /// t: current time
    /// out: buffer to write the result (dx/dt or x_{n+1})
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// A separable second-order system `q'' = a(t, q)`.
///
/// The phase state of such a system is laid out as `[q_0, .., q_{n-1}, p_0, .., p_{n-1}]`
/// where `n` is the number of degrees of freedom and `p = q'`.
pub trait SecondOrderSystem<T: Scalar> {
    /// Number of generalized coordinates.
    fn degrees_of_freedom(&self) -> usize;

    /// Writes the acceleration `a(t, q)` into `out`.
    fn acceleration(&self, t: T, q: &[T], out: &mut [T]);
}

/// A trait for solvers that can step a system forward.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size dt.
    /// t: current time (updated after step)
    /// state: current state (updated after step)
    /// dt: step size
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T);
}

/// A trait for structure-preserving solvers of separable second-order systems.
///
/// Implementations alternate position updates (drifts) with momentum updates
/// (kicks) so that each step is a composition of shear maps.
pub trait SymplecticSteppable<T: Scalar> {
    /// Performs one step of size dt on a `[q, p]` state.
    fn step(&mut self, system: &impl SecondOrderSystem<T>, t: &mut T, state: &mut [T], dt: T);
}
