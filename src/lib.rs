#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Numerical policy constants (clamp bounds, tolerances).
pub mod constants;
/// Shared mathematical utilities (scalar alias, guarded hyperbolics).
pub mod math;
/// Boundary-condition strings, expressions and constant binding.
pub mod boundary;
/// Grids, quadrature and closed-form series solutions.
pub mod fields;
/// Request-level orchestration and TOML configuration.
pub mod simulation;
/// Field export (CSV, VTK).
pub mod io;
/// Error types shared between modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
