//! Shared numerical primitives for the series solutions.
//!
//! The hyperbolic ratios are evaluated in exponential form so that a clamped
//! numerator is never divided by a clamped denominator.

use crate::constants::{DENOMINATOR_EPSILON, HYPERBOLIC_ARG_LIMIT, PARTIAL_SUM_LIMIT};

/// Primary scalar type used across the crate.
pub type Scalar = f64;

/// Clamps a hyperbolic or exponential argument into the overflow-safe range.
#[inline]
#[must_use]
pub fn clamp_arg(arg: Scalar) -> Scalar {
    arg.clamp(-HYPERBOLIC_ARG_LIMIT, HYPERBOLIC_ARG_LIMIT)
}

/// `sinh` with its argument clamped to the overflow-safe range.
#[inline]
#[must_use]
pub fn clamped_sinh(arg: Scalar) -> Scalar {
    clamp_arg(arg).sinh()
}

/// `cosh` with its argument clamped to the overflow-safe range.
#[inline]
#[must_use]
pub fn clamped_cosh(arg: Scalar) -> Scalar {
    clamp_arg(arg).cosh()
}

/// `exp` with its argument clamped to the overflow-safe range.
#[inline]
#[must_use]
pub fn clamped_exp(arg: Scalar) -> Scalar {
    clamp_arg(arg).exp()
}

/// Evaluates `sinh(u) / sinh(v)` for `v > 0`.
///
/// Returns zero when `sinh(v)` is below [`DENOMINATOR_EPSILON`].
#[must_use]
pub fn sinh_ratio(u: Scalar, v: Scalar) -> Scalar {
    if !(v > 0.0) || clamped_sinh(v) < DENOMINATOR_EPSILON {
        return 0.0;
    }
    let au = u.abs();
    // sinh(u)/sinh(v) = e^(u-v) * (1 - e^(-2u)) / (1 - e^(-2v))
    let shape = (-(-2.0 * au).exp_m1()) / (-(-2.0 * v).exp_m1());
    u.signum() * clamped_exp(au - v) * shape
}

/// Evaluates `cosh(u) / cosh(v)` for `v >= 0`.
#[must_use]
pub fn cosh_ratio(u: Scalar, v: Scalar) -> Scalar {
    let au = u.abs();
    let v = v.abs();
    // cosh(u)/cosh(v) = e^(|u|-v) * (1 + e^(-2|u|)) / (1 + e^(-2v))
    let shape = (1.0 + (-2.0 * au).exp()) / (1.0 + (-2.0 * v).exp());
    clamped_exp(au - v) * shape
}

/// Adds `term` to a running partial sum under the clamping policy.
///
/// Non-finite terms are dropped; both the term and the new sum are bounded by
/// [`PARTIAL_SUM_LIMIT`].
#[inline]
#[must_use]
pub fn accumulate(partial: Scalar, term: Scalar) -> Scalar {
    if !term.is_finite() {
        return partial;
    }
    let term = term.clamp(-PARTIAL_SUM_LIMIT, PARTIAL_SUM_LIMIT);
    (partial + term).clamp(-PARTIAL_SUM_LIMIT, PARTIAL_SUM_LIMIT)
}

/// Replaces `NaN`/`inf` with zero.
#[inline]
#[must_use]
pub fn finite_or_zero(value: Scalar) -> Scalar {
    if value.is_finite() { value } else { 0.0 }
}
