//! Fourier sine coefficients of a boundary profile.
//!
//! For mode `n` on a domain with half-extents `a`, `b`:
//!
//! ```text
//! C_n = 2 / (a sinh(nπb/a)) · ∫_{-a}^{a} f(y) sin(nπ(y+a)/(2a)) dy
//! ```

use std::f64::consts::PI;

use crate::constants::DENOMINATOR_EPSILON;
use crate::math::{clamped_sinh, sinh_ratio, Scalar};

use super::grid::Domain;
use super::quadrature::{AdaptiveQuadrature, QuadratureEstimate};

/// Coefficient `C_n` kept in factored form so that `C_n · sinh(u)` can be
/// evaluated without overflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineCoefficient {
    /// Mode number, starting at 1.
    pub n: usize,
    /// `(2/a) ∫ f(y) sin(nπ(y+a)/(2a)) dy`.
    pub scaled_projection: Scalar,
    /// Argument of the denominator, `nπb/a`.
    pub denominator_arg: Scalar,
    /// Quadrature diagnostics for the projection integral.
    pub quadrature: QuadratureEstimate,
}

impl SineCoefficient {
    /// `C_n` itself. A denominator below epsilon gives zero.
    #[must_use]
    pub fn value(&self) -> Scalar {
        let denom = clamped_sinh(self.denominator_arg);
        if denom < DENOMINATOR_EPSILON {
            return 0.0;
        }
        self.scaled_projection / denom
    }

    /// `C_n · sinh(u)`, evaluated as a ratio of hyperbolic sines.
    #[must_use]
    pub fn times_sinh(&self, u: Scalar) -> Scalar {
        self.scaled_projection * sinh_ratio(u, self.denominator_arg)
    }
}

/// Computes sine coefficients of edge profiles by adaptive quadrature.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FourierIntegrator {
    /// Quadrature settings used for every projection.
    pub quadrature: AdaptiveQuadrature,
}

impl FourierIntegrator {
    /// Creates an integrator with custom quadrature settings.
    #[must_use]
    pub const fn new(quadrature: AdaptiveQuadrature) -> Self {
        Self { quadrature }
    }

    /// Coefficient of mode `n` (`n >= 1`) for the profile `f(y)` on `[-a, a]`.
    pub fn coefficient<F>(&self, n: usize, domain: &Domain, profile: F) -> SineCoefficient
    where
        F: Fn(Scalar) -> Scalar,
    {
        let a = domain.a;
        let k = n as Scalar * PI / (2.0 * a);
        // one panel per half-period of the basis function
        let estimate = self
            .quadrature
            .integrate(|y| profile(y) * (k * (y + a)).sin(), -a, a, n.max(1));
        SineCoefficient {
            n,
            scaled_projection: 2.0 / a * estimate.value,
            denominator_arg: n as Scalar * PI * domain.b / a,
            quadrature: estimate,
        }
    }

    /// Coefficients for modes `1..=terms`.
    pub fn coefficients<F>(&self, terms: usize, domain: &Domain, profile: F) -> Vec<SineCoefficient>
    where
        F: Fn(Scalar) -> Scalar,
    {
        (1..=terms).map(|n| self.coefficient(n, domain, &profile)).collect()
    }
}

/// `C_n` for `profile` with the default quadrature settings.
pub fn fourier_coefficient<F>(n: usize, domain: &Domain, profile: F) -> Scalar
where
    F: Fn(Scalar) -> Scalar,
{
    FourierIntegrator::default().coefficient(n, domain, profile).value()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn constant_profile_matches_closed_form() {
        let domain = Domain::new(1.0, 1.5).expect("valid");
        let v0 = 5.0;
        for n in 1..=7 {
            let c = fourier_coefficient(n, &domain, |_| v0);
            let nf = n as Scalar;
            let expected = if n % 2 == 1 {
                8.0 * v0 / (nf * PI * (nf * PI * domain.b / domain.a).sinh())
            } else {
                0.0
            };
            assert_relative_eq!(c, expected, epsilon = 1.0e-10, max_relative = 1.0e-8);
        }
    }

    #[test]
    fn centered_step_has_vanishing_even_modes() {
        let domain = Domain::new(2.0, 1.0).expect("valid");
        let step = |y: Scalar| if y > -1.0 && y < 1.0 { 5.0 } else { 0.0 };
        let integrator = FourierIntegrator::default();
        let c1 = integrator.coefficient(1, &domain, step);
        let expected = 2.0 / domain.a * 5.0 * (2.0 * domain.a / PI) * 2.0_f64.sqrt();
        assert_relative_eq!(c1.scaled_projection, expected, max_relative = 1.0e-6);
        for n in [2, 4, 6] {
            let c = integrator.coefficient(n, &domain, step).value();
            assert!(c.abs() < 1.0e-7, "mode {n} gave {c}");
        }
    }

    #[test]
    fn high_modes_underflow_to_finite_values() {
        let domain = Domain::new(1.0, 1.0).expect("valid");
        let c = FourierIntegrator::default().coefficient(399, &domain, |_| 1.0);
        assert!(c.value().is_finite());
        assert!(c.value().abs() < 1.0e-300);
        assert_relative_eq!(c.times_sinh(c.denominator_arg), c.scaled_projection, max_relative = 1.0e-12);
    }
}
