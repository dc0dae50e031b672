//! Convenience re-exports for setting up and solving boundary-value problems.

pub use crate::boundary::{
    required_constants, BoundaryBinder, BoundaryCondition, BoundaryInputs, BoundarySet, ConstantBinding, Coordinate,
    Edge, EdgeProfile, ParseError, ParsePolicy, UnboundConstantError,
};
pub use crate::constants::*;
pub use crate::errors::LaplaceError;
pub use crate::fields::{
    fourier_coefficient, solve, AdaptiveQuadrature, Domain, FourierIntegrator, Grid, LaplaceSolver, PotentialField,
    SolutionFamily,
};
pub use crate::io::{write_field_csv, write_field_vtk};
pub use crate::math::Scalar;
pub use crate::simulation::SolveRequest;
#[cfg(feature = "config")]
pub use crate::simulation::ConfigError;
