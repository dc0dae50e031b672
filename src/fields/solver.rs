use log::{debug, warn};
use nalgebra::DMatrix;

use crate::boundary::{BoundarySet, Edge};
use crate::errors::LaplaceError;
use crate::math::{finite_or_zero, Scalar};

use super::fourier::FourierIntegrator;
use super::grid::Grid;
use super::series::{BoundarySpec, SeriesSolution, SolutionFamily};

/// Potential sampled on a grid, with the closed form that produced it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialField {
    /// X coordinates, `ny × nx`.
    pub x: DMatrix<Scalar>,
    /// Y coordinates, `ny × nx`.
    pub y: DMatrix<Scalar>,
    /// Potential values, `ny × nx`. Always finite.
    pub potential: DMatrix<Scalar>,
    /// Closed form used.
    pub family: SolutionFamily,
    /// LaTeX label of the closed form.
    pub label: String,
    /// Parameters of the closed form.
    pub description: String,
    /// Specified edges that the selected closed form does not use.
    pub unused_edges: Vec<Edge>,
}

impl PotentialField {
    /// True if every sample is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.potential.iter().all(|v| v.is_finite())
    }

    /// Largest absolute potential on the grid.
    #[must_use]
    pub fn max_abs(&self) -> Scalar {
        self.potential.iter().fold(0.0, |m, v| m.max(v.abs()))
    }
}

/// Series solver with configurable coefficient quadrature.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaplaceSolver {
    integrator: FourierIntegrator,
}

impl LaplaceSolver {
    /// Solver using the default quadrature settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Solver using `integrator` for Fourier coefficients.
    #[must_use]
    pub const fn with_integrator(integrator: FourierIntegrator) -> Self {
        Self { integrator }
    }

    /// Selects a closed form for `boundaries` and precomputes its coefficients.
    pub fn prepare(&self, terms: usize, boundaries: &BoundarySet) -> Result<SeriesSolution, LaplaceError> {
        if terms == 0 {
            return Err(LaplaceError::InvalidTerms);
        }
        let domain = *boundaries.domain();
        domain.validate()?;
        let spec = BoundarySpec::classify(boundaries);
        debug!("boundary pattern selects {:?} ({terms} terms)", spec.family());
        Ok(SeriesSolution::prepare(&spec, domain, terms, &self.integrator))
    }

    /// Evaluates the selected closed form on every grid point.
    pub fn solve(&self, grid: &Grid, terms: usize, boundaries: &BoundarySet) -> Result<PotentialField, LaplaceError> {
        if grid.domain() != boundaries.domain() {
            return Err(LaplaceError::InvalidDomain(
                "grid and boundary conditions were built for different domains".into(),
            ));
        }
        let solution = self.prepare(terms, boundaries)?;
        let family = solution.family();

        let unused_edges: Vec<Edge> = boundaries
            .specified_edges()
            .filter(|edge| !family.participating_edges().contains(edge))
            .collect();
        for edge in &unused_edges {
            warn!("boundary condition on {edge} is not used by the {family:?} solution");
        }

        let (x, y) = grid.meshgrid();
        let (xs, ys) = (grid.x(), grid.y());
        let potential = DMatrix::from_fn(grid.ny(), grid.nx(), |i, j| {
            finite_or_zero(solution.potential_at(xs[j], ys[i]))
        });
        debug!("evaluated {family:?} on {}x{} grid", grid.nx(), grid.ny());

        Ok(PotentialField {
            x,
            y,
            potential,
            family,
            label: family.latex().to_string(),
            description: solution.description(),
            unused_edges,
        })
    }
}

/// Solves with the default solver settings.
pub fn solve(grid: &Grid, terms: usize, boundaries: &BoundarySet) -> Result<PotentialField, LaplaceError> {
    LaplaceSolver::new().solve(grid, terms, boundaries)
}
