pub mod batch;
pub mod cancel;
pub mod error;
pub mod export;
pub mod solvers;
pub mod systems;
pub mod tracking;
pub mod trajectory;
/// The `tracking_core` crate generates phase-space trajectories of the
/// Chirikov-Taylor standard map and of the (optionally driven) pendulum.
///
/// Key components:
/// - **Traits**: `Scalar`, `DynamicalSystem` (maps and flows), `SecondOrderSystem`,
///   `Steppable` / `SymplecticSteppable` (solvers).
/// - **Solvers**: `DiscreteMap` iteration and the symplectic `SymplecticEuler` and
///   `Yoshida4` integrators.
/// - **Tracking**: `standard_map_tracking` / `pendulum_tracking` and their typed,
///   cancellable counterparts.
/// - **Batch**: initial-angle sweeps collected into a flat `TrajectoryBatch` arena.
/// - **Export**: CSV writers for trajectories and sweeps.
pub mod traits;

pub use batch::{run_sweep, BatchRunner, Coordinate, SweepSettings, TrajectoryBatch};
pub use cancel::CancelToken;
pub use error::{ErrorKind, TrackingError};
pub use systems::{Drive, Pendulum, StandardMap};
pub use tracking::{
    iteration_count, pendulum_tracking, standard_map_tracking, track_pendulum,
    track_standard_map, PendulumParams, PendulumScheme,
};
pub use trajectory::{PhaseState, Trajectory};
