use crate::traits::{constant, DynamicalSystem, Scalar};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Reduces `x` into `[0, 2π)`.
///
/// Negative inputs are lifted by the Euclidean remainder. A tiny negative
/// input whose lift rounds to exactly `2π` is mapped to `0`, so the upper
/// bound is strict. NaN and infinities come back as NaN.
pub fn wrap_angle<T: Scalar>(x: T) -> T {
    let tau: T = constant(TAU);
    let mut r = x % tau;
    if r < T::zero() {
        r = r + tau;
    }
    if r >= tau {
        r = T::zero();
    }
    r
}

/// Chirikov-Taylor standard map with coupling `k`:
///
/// ```text
/// p_{n+1} = p_n + k sin θ_n      (mod 2π)
/// θ_{n+1} = θ_n + p_{n+1}        (mod 2π)
/// ```
///
/// State layout is `[θ, p]`. Both coordinates are wrapped into `[0, 2π)` after
/// every application. `k` is not range-checked: `-4 < k < 0` keeps orbits near
/// the origin regular, larger `|k|` gives the chaotic sea.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardMap {
    pub k: f64,
}

impl StandardMap {
    pub fn new(k: f64) -> Self {
        Self { k }
    }
}

impl<T: Scalar> DynamicalSystem<T> for StandardMap {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let k: T = constant(self.k);
        let p = wrap_angle(x[1] + k * x[0].sin());
        out[0] = wrap_angle(x[0] + p);
        out[1] = p;
    }
}

#[cfg(test)]
mod tests {
    use super::{wrap_angle, StandardMap};
    use crate::traits::DynamicalSystem;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn wrap_angle_keeps_values_in_half_open_interval() {
        for &x in &[0.0, 1.0, TAU, -TAU, 3.0 * TAU + 0.5, -0.25, -1e-20, 1e6, -1e6] {
            let r = wrap_angle(x);
            assert!((0.0..TAU).contains(&r), "wrap_angle({x}) = {r}");
        }
    }

    #[test]
    fn wrap_angle_lifts_negative_values() {
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-15);
        assert!((wrap_angle(7.0) - (7.0 - TAU)).abs() < 1e-15);
        assert_eq!(wrap_angle(TAU), 0.0);
        assert_eq!(wrap_angle(-1e-20), 0.0);
    }

    #[test]
    fn wrap_angle_passes_nan_through() {
        assert!(wrap_angle(f64::NAN).is_nan());
        assert!(wrap_angle(f64::INFINITY).is_nan());
    }

    #[test]
    fn apply_updates_momentum_before_angle() {
        let map = StandardMap::new(-1.0);
        let mut out = [0.0; 2];
        map.apply(0.0, &[PI / 2.0, 0.5], &mut out);
        // p = 0.5 - 1 wraps to 2π - 0.5, θ = π/2 + p wraps past 2π.
        let p = TAU - 0.5;
        assert!((out[1] - p).abs() < 1e-12);
        assert!((out[0] - (PI / 2.0 + p - TAU)).abs() < 1e-12);
    }

    #[test]
    fn origin_is_a_fixed_point() {
        let map = StandardMap::new(-0.5);
        let mut out = [1.0; 2];
        map.apply(0.0, &[0.0, 0.0], &mut out);
        assert_eq!(out, [0.0, 0.0]);
    }
}
