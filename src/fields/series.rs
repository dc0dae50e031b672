//! Closed-form series families and the rules that select them.
//!
//! Selection order, first match wins:
//!
//! 1. [`SolutionFamily::SideInjected`]: `x=-b` varies along `y`.
//! 2. [`SolutionFamily::CenterlineInjected`]: `x=0` varies along `y`.
//! 3. [`SolutionFamily::SymmetricConstant`]: `x=±b` carry the same constant and
//!    `y=±a` are zero or unspecified.
//! 4. [`SolutionFamily::Unsupported`]: anything else.

use std::f64::consts::PI;

use crate::boundary::{BoundarySet, Edge, EdgeProfile};
use crate::constants::CONSTANT_MATCH_TOLERANCE;
use crate::math::{accumulate, clamped_exp, cosh_ratio, Scalar};

use super::fourier::{FourierIntegrator, SineCoefficient};
use super::grid::Domain;

/// Identifier of the closed form used for a solution.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionFamily {
    /// `Σ C_n sinh(nπ(x+b)/2a) sin(nπ(y+a)/2a)`.
    SideInjected,
    /// `Σ C_n sin(nπy/a) e^{-nπ|x|/a}`.
    CenterlineInjected,
    /// `(4V0/π) Σ_{odd n} (1/n) cosh(nπx/a)/cosh(nπb/a) sin(nπy/a)`.
    SymmetricConstant,
    /// No closed form matches; the field is zero.
    Unsupported,
}

impl SolutionFamily {
    /// LaTeX rendering of the closed form.
    #[must_use]
    pub const fn latex(self) -> &'static str {
        match self {
            Self::SideInjected => {
                r"V(x,y) = \sum_{n=1}^{\infty} C_n \sinh\left(\frac{n\pi(x+b)}{2a}\right)\sin\left(\frac{n\pi(y+a)}{2a}\right)"
            }
            Self::CenterlineInjected => r"V(x,y) = \sum_{n=1}^{\infty} C_n \sin(n\pi y/a)e^{-n\pi|x|/a}",
            Self::SymmetricConstant => {
                r"V(x,y) = \frac{4V_0}{\pi} \sum_{n=1,3,5,...} \frac{1}{n} \frac{\cosh(n\pi x/a)}{\cosh(n\pi b/a)} \sin(n\pi y/a)"
            }
            Self::Unsupported => "No specific solution implemented for this combination of boundary conditions.",
        }
    }

    /// Edges whose conditions enter the closed form.
    #[must_use]
    pub const fn participating_edges(self) -> &'static [Edge] {
        match self {
            Self::SideInjected => &[Edge::XMinus],
            Self::CenterlineInjected => &[Edge::XCenter],
            Self::SymmetricConstant => &[Edge::XMinus, Edge::XPlus, Edge::YMinus, Edge::YPlus],
            Self::Unsupported => &[],
        }
    }
}

/// Boundary pattern matched against the known closed forms.
#[derive(Debug, Clone, Copy)]
pub enum BoundarySpec<'a> {
    /// Profile on `x=-b` that varies along `y`.
    SideInjected(EdgeProfile<'a>),
    /// Profile on `x=0` that varies along `y`.
    CenterlineInjected(EdgeProfile<'a>),
    /// Common constant on `x=±b`.
    SymmetricConstant {
        /// Edge potential.
        v0: Scalar,
    },
    /// No recognized pattern.
    Unsupported,
}

impl<'a> BoundarySpec<'a> {
    /// Classifies a boundary set in priority order.
    #[must_use]
    pub fn classify(set: &'a BoundarySet) -> Self {
        let side = set.profile(Edge::XMinus);
        if side.varies() {
            return Self::SideInjected(side);
        }
        let center = set.profile(Edge::XCenter);
        if center.varies() {
            return Self::CenterlineInjected(center);
        }
        if let Some(v0) = symmetric_constant(set) {
            return Self::SymmetricConstant { v0 };
        }
        Self::Unsupported
    }

    /// Family this pattern selects.
    #[must_use]
    pub const fn family(&self) -> SolutionFamily {
        match self {
            Self::SideInjected(_) => SolutionFamily::SideInjected,
            Self::CenterlineInjected(_) => SolutionFamily::CenterlineInjected,
            Self::SymmetricConstant { .. } => SolutionFamily::SymmetricConstant,
            Self::Unsupported => SolutionFamily::Unsupported,
        }
    }
}

fn symmetric_constant(set: &BoundarySet) -> Option<Scalar> {
    let left = set.profile(Edge::XMinus).uniform_value()?;
    let right = set.profile(Edge::XPlus).uniform_value()?;
    if !left.is_finite() || (left - right).abs() >= CONSTANT_MATCH_TOLERANCE {
        return None;
    }
    // unspecified y-edges read as zero
    let grounded = |edge: Edge| {
        let profile = set.profile(edge);
        !profile.is_specified() || profile.uniform_value().is_some_and(|v| v.abs() < CONSTANT_MATCH_TOLERANCE)
    };
    (grounded(Edge::YMinus) && grounded(Edge::YPlus)).then_some(left)
}

/// A selected closed form with its coefficients precomputed.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesSolution {
    /// Sinh series driven by the `x=-b` profile.
    SideInjected {
        /// Domain the coefficients belong to.
        domain: Domain,
        /// `C_1 ..= C_N`.
        coefficients: Vec<SineCoefficient>,
    },
    /// Decaying-exponential series driven by the `x=0` profile.
    CenterlineInjected {
        /// Domain the coefficients belong to.
        domain: Domain,
        /// `C_1 ..= C_N`.
        coefficients: Vec<Scalar>,
    },
    /// Odd-mode cosh series for equal constant side walls.
    SymmetricConstant {
        /// Domain of the solution.
        domain: Domain,
        /// Side-wall potential.
        v0: Scalar,
        /// Number of odd modes summed.
        terms: usize,
    },
    /// Zero field.
    Unsupported,
}

impl SeriesSolution {
    /// Precomputes the coefficients needed by `spec`, truncated at `terms` modes.
    pub fn prepare(spec: &BoundarySpec<'_>, domain: Domain, terms: usize, integrator: &FourierIntegrator) -> Self {
        match spec {
            BoundarySpec::SideInjected(profile) => Self::SideInjected {
                domain,
                coefficients: integrator.coefficients(terms, &domain, |y| profile.at(y)),
            },
            BoundarySpec::CenterlineInjected(profile) => Self::CenterlineInjected {
                domain,
                coefficients: integrator
                    .coefficients(terms, &domain, |y| profile.at(y))
                    .iter()
                    .map(SineCoefficient::value)
                    .collect(),
            },
            BoundarySpec::SymmetricConstant { v0 } => Self::SymmetricConstant { domain, v0: *v0, terms },
            BoundarySpec::Unsupported => Self::Unsupported,
        }
    }

    /// Family of this solution.
    #[must_use]
    pub const fn family(&self) -> SolutionFamily {
        match self {
            Self::SideInjected { .. } => SolutionFamily::SideInjected,
            Self::CenterlineInjected { .. } => SolutionFamily::CenterlineInjected,
            Self::SymmetricConstant { .. } => SolutionFamily::SymmetricConstant,
            Self::Unsupported => SolutionFamily::Unsupported,
        }
    }

    /// Human-readable description of the parameters behind the closed form.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::SideInjected { .. } => {
                r"where $C_n = \frac{2}{a\sinh(n\pi b/a)}\int_{-a}^a V_0(y)\sin\left(\frac{n\pi(y+a)}{2a}\right)dy$".to_string()
            }
            Self::CenterlineInjected { .. } => "Solution for potential on center line".to_string(),
            Self::SymmetricConstant { v0, .. } => {
                format!(r"Solution for $V(x, y=\pm a)=0$ and $V(\pm b, y)=V_0$, with $V_0 = {v0:.2}$")
            }
            Self::Unsupported => "The plot may be empty or show a trivial solution.".to_string(),
        }
    }

    /// Potential at `(x, y)`. The partial sum is clamped after every term.
    #[must_use]
    pub fn potential_at(&self, x: Scalar, y: Scalar) -> Scalar {
        match self {
            Self::SideInjected { domain, coefficients } => {
                let Domain { a, b } = *domain;
                coefficients.iter().fold(0.0, |acc, c| {
                    let k = c.n as Scalar * PI / (2.0 * a);
                    accumulate(acc, c.times_sinh(k * (x + b)) * (k * (y + a)).sin())
                })
            }
            Self::CenterlineInjected { domain, coefficients } => {
                let a = domain.a;
                coefficients.iter().enumerate().fold(0.0, |acc, (i, c)| {
                    let k = (i + 1) as Scalar * PI / a;
                    accumulate(acc, c * (k * y).sin() * clamped_exp(-k * x.abs()))
                })
            }
            Self::SymmetricConstant { domain, v0, terms } => {
                let Domain { a, b } = *domain;
                let scale = 4.0 * v0 / PI;
                (0..*terms).fold(0.0, |acc, j| {
                    let n = (2 * j + 1) as Scalar;
                    let k = n * PI / a;
                    accumulate(acc, scale / n * cosh_ratio(k * x, k * b) * (k * y).sin())
                })
            }
            Self::Unsupported => 0.0,
        }
    }
}
