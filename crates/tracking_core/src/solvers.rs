use crate::traits::{constant, DynamicalSystem, Scalar, SecondOrderSystem, Steppable, SymplecticSteppable};

/// Discrete Map Stepper
/// Just evaluates x_{n+1} = f(x_n).
/// dt is treated as 1 iteration regardless of value, but we track t as t + dt.
pub struct DiscreteMap<T: Scalar> {
    tmp: Vec<T>,
}

impl<T: Scalar> DiscreteMap<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            tmp: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for DiscreteMap<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        // x_{n+1} = f(x_n)
        system.apply(*t, state, &mut self.tmp);
        state.copy_from_slice(&self.tmp);

        // For maps, dt usually = 1.
        *t = *t + dt;
    }
}

/// Semi-implicit (symplectic) Euler, kick then drift:
///
/// ```text
/// p_{n+1} = p_n + a(t_n, q_n) * dt
/// q_{n+1} = q_n + p_{n+1} * dt
/// ```
///
/// First order, but the energy error stays bounded instead of drifting.
pub struct SymplecticEuler<T: Scalar> {
    accel: Vec<T>,
}

impl<T: Scalar> SymplecticEuler<T> {
    pub fn new(dof: usize) -> Self {
        Self {
            accel: vec![T::zero(); dof],
        }
    }
}

impl<T: Scalar> SymplecticSteppable<T> for SymplecticEuler<T> {
    fn step(&mut self, system: &impl SecondOrderSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let (q, p) = state.split_at_mut(self.accel.len());

        system.acceleration(*t, q, &mut self.accel);
        for i in 0..p.len() {
            p[i] = p[i] + self.accel[i] * dt;
        }
        for i in 0..q.len() {
            q[i] = q[i] + p[i] * dt;
        }

        *t = *t + dt;
    }
}

/// Fourth-order Yoshida composition of four drift/kick pairs.
///
/// Drift coefficients `c` sum to one, kick coefficients `d` sum to one and the
/// final kick weight is zero, so a step costs three acceleration evaluations.
/// The drifts carry the clock, which keeps time-dependent forcing consistent
/// with the extended phase space splitting.
pub struct Yoshida4<T: Scalar> {
    accel: Vec<T>,
    c: [T; 4],
    d: [T; 4],
}

impl<T: Scalar> Yoshida4<T> {
    pub fn new(dof: usize) -> Self {
        let cbrt2 = 2.0_f64.powf(1.0 / 3.0);
        let w0 = -cbrt2 / (2.0 - cbrt2);
        let w1 = 1.0 / (2.0 - cbrt2);
        let c1 = w1 / 2.0;
        let c2 = (w0 + w1) / 2.0;

        Self {
            accel: vec![T::zero(); dof],
            c: [constant(c1), constant(c2), constant(c2), constant(c1)],
            d: [constant(w1), constant(w0), constant(w1), T::zero()],
        }
    }
}

impl<T: Scalar> SymplecticSteppable<T> for Yoshida4<T> {
    fn step(&mut self, system: &impl SecondOrderSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let t0 = *t;
        let mut tau = t0;
        let (q, p) = state.split_at_mut(self.accel.len());

        for stage in 0..4 {
            let c = self.c[stage];
            for i in 0..q.len() {
                q[i] = q[i] + c * p[i] * dt;
            }
            tau = tau + c * dt;

            let d = self.d[stage];
            if d.is_zero() {
                continue;
            }
            system.acceleration(tau, q, &mut self.accel);
            for i in 0..p.len() {
                p[i] = p[i] + d * self.accel[i] * dt;
            }
        }

        *t = t0 + dt;
    }
}

#[cfg(test)]
mod tests {
    use super::{DiscreteMap, SymplecticEuler, Yoshida4};
    use crate::traits::{
        DynamicalSystem, SecondOrderSystem, Steppable, SymplecticSteppable,
    };

    struct Doubling;

    impl DynamicalSystem<f64> for Doubling {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
            out[0] = 2.0 * x[0];
        }
    }

    /// q'' = -q, exact solution q = cos t for q(0) = 1, p(0) = 0.
    struct Harmonic;

    impl SecondOrderSystem<f64> for Harmonic {
        fn degrees_of_freedom(&self) -> usize {
            1
        }

        fn acceleration(&self, _t: f64, q: &[f64], out: &mut [f64]) {
            out[0] = -q[0];
        }
    }

    /// q'' = t, so a drive that only sees the clock.
    struct Ramp;

    impl SecondOrderSystem<f64> for Ramp {
        fn degrees_of_freedom(&self) -> usize {
            1
        }

        fn acceleration(&self, t: f64, _q: &[f64], out: &mut [f64]) {
            out[0] = t;
        }
    }

    #[test]
    fn discrete_map_applies_map_and_advances_iteration_counter() {
        let mut stepper = DiscreteMap::new(1);
        let mut t = 0.0;
        let mut state = [1.5];
        for _ in 0..3 {
            stepper.step(&Doubling, &mut t, &mut state, 1.0);
        }
        assert_eq!(state[0], 12.0);
        assert_eq!(t, 3.0);
    }

    #[test]
    fn yoshida_coefficients_are_consistent() {
        let stepper = Yoshida4::<f64>::new(1);
        let c_sum: f64 = stepper.c.iter().sum();
        let d_sum: f64 = stepper.d.iter().sum();
        assert!((c_sum - 1.0).abs() < 1e-14);
        assert!((d_sum - 1.0).abs() < 1e-14);
        assert_eq!(stepper.d[3], 0.0);
    }

    #[test]
    fn symplectic_euler_matches_hand_computed_step() {
        let mut stepper = SymplecticEuler::new(1);
        let mut t = 0.0;
        let mut state = [1.0, 0.0];
        stepper.step(&Harmonic, &mut t, &mut state, 0.1);
        // p = 0 - 1 * 0.1, q = 1 + p * 0.1
        assert!((state[1] + 0.1).abs() < 1e-15);
        assert!((state[0] - 0.99).abs() < 1e-15);
        assert!((t - 0.1).abs() < 1e-15);
    }

    #[test]
    fn yoshida_is_fourth_order_on_harmonic_oscillator() {
        let error_at = |dt: f64| {
            let steps = (1.0 / dt).round() as usize;
            let mut stepper = Yoshida4::new(1);
            let mut t = 0.0;
            let mut state = [1.0, 0.0];
            for _ in 0..steps {
                stepper.step(&Harmonic, &mut t, &mut state, dt);
            }
            (state[0] - 1.0_f64.cos()).abs()
        };

        let coarse = error_at(0.1);
        let fine = error_at(0.05);
        let ratio = coarse / fine;
        assert!(ratio > 12.0 && ratio < 20.0, "unexpected convergence ratio {ratio}");
    }

    #[test]
    fn yoshida_is_more_accurate_than_symplectic_euler() {
        let dt = 0.01;
        let mut euler = SymplecticEuler::new(1);
        let mut yoshida = Yoshida4::new(1);
        let (mut t_e, mut t_y) = (0.0, 0.0);
        let mut s_e = [1.0, 0.0];
        let mut s_y = [1.0, 0.0];
        for _ in 0..100 {
            euler.step(&Harmonic, &mut t_e, &mut s_e, dt);
            yoshida.step(&Harmonic, &mut t_y, &mut s_y, dt);
        }
        let exact = 1.0_f64.cos();
        assert!((s_y[0] - exact).abs() < (s_e[0] - exact).abs());
        assert!((t_y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn yoshida_kicks_see_the_drifting_clock() {
        // q'' = t from rest: p(1) = 1/2 exactly for any consistent quadrature of t.
        let mut stepper = Yoshida4::new(1);
        let mut t = 0.0;
        let mut state = [0.0, 0.0];
        for _ in 0..10 {
            stepper.step(&Ramp, &mut t, &mut state, 0.1);
        }
        assert!((state[1] - 0.5).abs() < 1e-12);
        assert!((state[0] - 1.0 / 6.0).abs() < 1e-10);
    }
}
