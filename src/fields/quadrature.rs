//! Globally adaptive Gauss–Kronrod (7/15) quadrature.
//!
//! The interval is split into an initial set of panels; the panel with the
//! largest error estimate is bisected until the summed estimate meets the
//! tolerance or the panel budget runs out. Running out of budget is not an
//! error: the best estimate is returned with `converged = false`.
//!
//! # References
//!
//! - Piessens, de Doncker-Kapenga, Überhuber & Kahaner (1983). "QUADPACK: A
//!   Subroutine Package for Automatic Integration". Springer.

use log::debug;

use crate::constants::{QUAD_ABS_TOLERANCE, QUAD_PANEL_LIMIT, QUAD_REL_TOLERANCE};
use crate::math::{finite_or_zero, Scalar};

/// Kronrod abscissae on [0, 1]; odd indices are the Gauss points.
const XGK: [Scalar; 8] = [
    0.991_455_371_120_812_639,
    0.949_107_912_342_758_525,
    0.864_864_423_359_769_073,
    0.741_531_185_599_394_440,
    0.586_087_235_467_691_130,
    0.405_845_151_377_397_167,
    0.207_784_955_007_898_468,
    0.0,
];
/// Kronrod weights matching [`XGK`].
const WGK: [Scalar; 8] = [
    0.022_935_322_010_529_225,
    0.063_092_092_629_978_553,
    0.104_790_010_322_250_184,
    0.140_653_259_715_525_919,
    0.169_004_726_639_267_903,
    0.190_350_578_064_785_410,
    0.204_432_940_075_298_892,
    0.209_482_141_084_727_828,
];
/// Gauss weights for `XGK[1], XGK[3], XGK[5], XGK[7]`.
const WG: [Scalar; 4] = [
    0.129_484_966_168_869_693,
    0.279_705_391_489_276_668,
    0.381_830_050_505_118_945,
    0.417_959_183_673_469_388,
];

/// Result of an adaptive integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureEstimate {
    /// Integral estimate.
    pub value: Scalar,
    /// Summed absolute error estimate over all panels.
    pub abs_error: Scalar,
    /// Number of panels in the final partition.
    pub panels: usize,
    /// Whether the tolerance was met.
    pub converged: bool,
}

#[derive(Debug, Clone, Copy)]
struct Panel {
    lo: Scalar,
    hi: Scalar,
    value: Scalar,
    error: Scalar,
}

/// Adaptive Gauss–Kronrod integrator settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveQuadrature {
    /// Absolute error target.
    pub abs_tolerance: Scalar,
    /// Relative error target.
    pub rel_tolerance: Scalar,
    /// Maximum number of bisections.
    pub panel_limit: usize,
}

impl Default for AdaptiveQuadrature {
    fn default() -> Self {
        Self {
            abs_tolerance: QUAD_ABS_TOLERANCE,
            rel_tolerance: QUAD_REL_TOLERANCE,
            panel_limit: QUAD_PANEL_LIMIT,
        }
    }
}

impl AdaptiveQuadrature {
    /// Integrates `f` over `[lo, hi]`, starting from `initial_panels` equal panels.
    ///
    /// Non-finite samples of `f` count as zero.
    pub fn integrate<F>(&self, f: F, lo: Scalar, hi: Scalar, initial_panels: usize) -> QuadratureEstimate
    where
        F: Fn(Scalar) -> Scalar,
    {
        let f = |t: Scalar| finite_or_zero(f(t));
        let count = initial_panels.max(1);
        let width = (hi - lo) / count as Scalar;
        let mut panels: Vec<Panel> = (0..count)
            .map(|k| {
                let p_lo = lo + width * k as Scalar;
                let p_hi = if k + 1 == count { hi } else { lo + width * (k + 1) as Scalar };
                kronrod_panel(&f, p_lo, p_hi)
            })
            .collect();

        let mut bisections = 0;
        loop {
            let (value, error) = totals(&panels);
            let target = self.abs_tolerance.max(self.rel_tolerance * value.abs());
            if error <= target {
                return QuadratureEstimate { value, abs_error: error, panels: panels.len(), converged: true };
            }
            if bisections >= self.panel_limit {
                debug!(
                    "quadrature on [{lo}, {hi}] stopped after {bisections} bisections (err {error:.3e} > {target:.3e})"
                );
                return QuadratureEstimate { value, abs_error: error, panels: panels.len(), converged: false };
            }
            let worst = worst_panel(&panels);
            let Panel { lo: p_lo, hi: p_hi, .. } = panels[worst];
            let mid = 0.5 * (p_lo + p_hi);
            if mid <= p_lo || mid >= p_hi {
                // panel can no longer be split in floating point
                return QuadratureEstimate { value, abs_error: error, panels: panels.len(), converged: false };
            }
            panels[worst] = kronrod_panel(&f, p_lo, mid);
            panels.push(kronrod_panel(&f, mid, p_hi));
            bisections += 1;
        }
    }
}

fn totals(panels: &[Panel]) -> (Scalar, Scalar) {
    panels
        .iter()
        .fold((0.0, 0.0), |(v, e), p| (v + p.value, e + p.error))
}

fn worst_panel(panels: &[Panel]) -> usize {
    let mut worst = 0;
    for (i, p) in panels.iter().enumerate() {
        if p.error > panels[worst].error {
            worst = i;
        }
    }
    worst
}

fn kronrod_panel<F: Fn(Scalar) -> Scalar>(f: &F, lo: Scalar, hi: Scalar) -> Panel {
    let center = 0.5 * (lo + hi);
    let half = 0.5 * (hi - lo);
    let fc = f(center);
    let mut res_k = fc * WGK[7];
    let mut res_g = fc * WG[3];
    for j in 0..3 {
        let k = 2 * j + 1;
        let dx = half * XGK[k];
        let pair = f(center - dx) + f(center + dx);
        res_g += WG[j] * pair;
        res_k += WGK[k] * pair;
    }
    for j in 0..4 {
        let k = 2 * j;
        let dx = half * XGK[k];
        res_k += WGK[k] * (f(center - dx) + f(center + dx));
    }
    Panel { lo, hi, value: res_k * half, error: ((res_k - res_g) * half).abs() }
}
