//! The two systems the engine tracks.
//!
//! - **Standard map**: the Chirikov-Taylor map on the 2-torus.
//! - **Pendulum**: the nonlinear pendulum `θ'' = -ω² sin θ`, optionally driven.

mod pendulum;
mod standard_map;

pub use pendulum::{Drive, Pendulum};
pub use standard_map::{wrap_angle, StandardMap};
