//! Numerical policy constants for the series solver.
//!
//! ## Overflow
//!
//! `cosh(710.5)` is the first value that overflows an IEEE-754 double, so every
//! hyperbolic argument is clamped to [`HYPERBOLIC_ARG_LIMIT`] before evaluation.
//! Individual series terms and running partial sums are then clamped to
//! [`PARTIAL_SUM_LIMIT`] so a single bad mode cannot poison the field.
//!
//! ## Quadrature
//!
//! The tolerances mirror the QUADPACK defaults (`epsabs = epsrel = 1.49e-8`).

/// Largest magnitude passed to `sinh`/`cosh`/`exp`.
pub const HYPERBOLIC_ARG_LIMIT: f64 = 700.0;
/// Bound applied to every series term and partial sum.
pub const PARTIAL_SUM_LIMIT: f64 = 1.0e15;
/// Denominators below this value make the term contribute zero.
pub const DENOMINATOR_EPSILON: f64 = 1.0e-9;
/// Tolerance for deciding that two boundary constants are equal, or that one is zero.
pub const CONSTANT_MATCH_TOLERANCE: f64 = 1.0e-10;
/// Absolute error target for the adaptive quadrature.
pub const QUAD_ABS_TOLERANCE: f64 = 1.49e-8;
/// Relative error target for the adaptive quadrature.
pub const QUAD_REL_TOLERANCE: f64 = 1.49e-8;
/// Maximum number of panels the adaptive quadrature may refine into, beyond the initial split.
pub const QUAD_PANEL_LIMIT: usize = 200;

/// Smallest grid resolution along either axis.
pub const MIN_GRID_POINTS: usize = 2;

/// Deepest expression tree (and parser recursion) accepted in a boundary string.
pub const MAX_EXPR_DEPTH: usize = 256;
