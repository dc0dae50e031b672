//! Grids, quadrature and the closed-form Laplace solutions.

mod fourier;
mod grid;
mod quadrature;
mod series;
mod solver;

pub use fourier::{fourier_coefficient, FourierIntegrator, SineCoefficient};
pub use grid::{centered_linspace, Domain, Grid};
pub use quadrature::{AdaptiveQuadrature, QuadratureEstimate};
pub use series::{BoundarySpec, SeriesSolution, SolutionFamily};
pub use solver::{solve, LaplaceSolver, PotentialField};
