//! Request-level orchestration: one description in, one [`PotentialField`] out.
//!
//! A [`SolveRequest`] bundles the domain, grid, truncation order, the six
//! boundary strings and any constant values. With the `config` feature it can
//! be loaded from TOML:
//!
//! ```toml
//! a = 1.0
//! b = 1.5
//! nx = 50
//! ny = 50
//! terms = 50
//! on_parse_error = "abort"
//!
//! [boundary]
//! x_minus = "V0"
//! x_plus = "V0"
//! y_minus = "0"
//! y_plus = "0"
//!
//! [constants]
//! V0 = 5.0
//! ```

use std::collections::BTreeSet;

use crate::boundary::{BoundaryBinder, BoundaryInputs, BoundarySet, ConstantBinding, ParsePolicy};
use crate::errors::LaplaceError;
use crate::fields::{Domain, Grid, LaplaceSolver, PotentialField};
use crate::math::Scalar;

/// Everything needed for one solve.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolveRequest {
    /// Half-height along `y`.
    pub a: Scalar,
    /// Half-width along `x`.
    pub b: Scalar,
    /// Grid points along `x`.
    pub nx: usize,
    /// Grid points along `y`.
    pub ny: usize,
    /// Number of series terms.
    pub terms: usize,
    /// Raw boundary strings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub boundary: BoundaryInputs,
    /// Values for constants referenced by the boundary strings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub constants: ConstantBinding,
    /// What to do with unparsable boundary strings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_parse_error: ParsePolicy,
}

impl SolveRequest {
    /// Creates a request with every edge unspecified and no constants.
    #[must_use]
    pub fn new(a: Scalar, b: Scalar, nx: usize, ny: usize, terms: usize) -> Self {
        Self {
            a,
            b,
            nx,
            ny,
            terms,
            boundary: BoundaryInputs::default(),
            constants: ConstantBinding::new(),
            on_parse_error: ParsePolicy::default(),
        }
    }

    /// Returns the request with the given boundary strings.
    #[must_use]
    pub fn with_boundary(mut self, boundary: BoundaryInputs) -> Self {
        self.boundary = boundary;
        self
    }

    /// Returns the request with `name` bound to `value`.
    #[must_use]
    pub fn with_constant(mut self, name: impl Into<String>, value: Scalar) -> Self {
        self.constants.insert(name, value);
        self
    }

    /// Returns the request with a different parse-failure policy.
    #[must_use]
    pub const fn with_parse_policy(mut self, policy: ParsePolicy) -> Self {
        self.on_parse_error = policy;
        self
    }

    /// Validated domain.
    pub fn domain(&self) -> Result<Domain, LaplaceError> {
        Domain::new(self.a, self.b)
    }

    fn binder(&self) -> Result<BoundaryBinder, LaplaceError> {
        Ok(BoundaryBinder::new(self.domain()?).with_policy(self.on_parse_error))
    }

    /// Names of all constants the boundary strings reference.
    pub fn required_constants(&self) -> Result<BTreeSet<String>, LaplaceError> {
        Ok(self.binder()?.required_constants(&self.boundary)?)
    }

    /// Required constants that have no value in [`SolveRequest::constants`].
    pub fn missing_constants(&self) -> Result<Vec<String>, LaplaceError> {
        let required = self.required_constants()?;
        Ok(self.constants.missing(&required).into_iter().map(str::to_string).collect())
    }

    /// Binds the boundary strings against the request's constants.
    pub fn bind(&self) -> Result<BoundarySet, LaplaceError> {
        self.binder()?.bind(&self.boundary, &self.constants)
    }

    /// Runs the full pipeline: bind, build the grid, solve.
    pub fn run(&self) -> Result<PotentialField, LaplaceError> {
        self.run_with(&LaplaceSolver::new())
    }

    /// Like [`SolveRequest::run`] with a caller-configured solver.
    pub fn run_with(&self, solver: &LaplaceSolver) -> Result<PotentialField, LaplaceError> {
        let boundaries = self.bind()?;
        let grid = Grid::new(*boundaries.domain(), self.nx, self.ny)?;
        solver.solve(&grid, self.terms, &boundaries)
    }
}

/// Errors that can occur while loading a request.
#[cfg(feature = "config")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The request file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The request is not valid TOML for [`SolveRequest`].
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(feature = "config")]
impl SolveRequest {
    /// Parses a request from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, LaplaceError> {
        toml::from_str(text).map_err(|e| LaplaceError::Config(ConfigError::Toml(e)))
    }

    /// Reads and parses a TOML request file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, LaplaceError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Edge;
    use crate::fields::SolutionFamily;

    #[test]
    fn builder_request_runs_end_to_end() {
        let request = SolveRequest::new(1.0, 1.5, 10, 12, 20)
            .with_boundary(BoundaryInputs::from_array(["V0", "V0", "0", "0", "NaN", "NaN"]))
            .with_constant("V0", 5.0);
        assert_eq!(request.missing_constants().expect("parses"), Vec::<String>::new());
        let field = request.run().expect("solves");
        assert_eq!(field.family, SolutionFamily::SymmetricConstant);
        assert_eq!(field.potential.shape(), (12, 10));
    }

    #[test]
    fn missing_constants_are_reported_before_binding() {
        let request = SolveRequest::new(1.0, 1.0, 5, 5, 5)
            .with_boundary(BoundaryInputs::from_array(["k*y", "V_nought(y)", "NaN", "NaN", "NaN", "NaN"]))
            .with_constant("k", 1.0);
        assert_eq!(request.missing_constants().expect("parses"), vec!["V0".to_string()]);
        assert!(matches!(request.run(), Err(LaplaceError::UnboundConstant(e)) if e.edge == Edge::XPlus));
    }

    #[test]
    fn invalid_domain_is_rejected() {
        let request = SolveRequest::new(-1.0, 1.0, 5, 5, 5);
        assert!(matches!(request.run(), Err(LaplaceError::InvalidDomain(_))));
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_request_round_trips_through_the_pipeline() {
        let text = r#"
            a = 1.0
            b = 1.5
            nx = 8
            ny = 8
            terms = 10
            on_parse_error = "unspecified"

            [boundary]
            x_minus = "V_nought(y)"
            x_plus = "@@@"

            [constants]
            V0 = 5.0
        "#;
        let request = SolveRequest::from_toml_str(text).expect("valid toml");
        assert_eq!(request.on_parse_error, ParsePolicy::TreatAsUnspecified);
        assert_eq!(request.boundary.y_plus, "");
        let field = request.run().expect("solves");
        assert_eq!(field.family, SolutionFamily::SideInjected);
    }

    #[cfg(feature = "config")]
    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = SolveRequest::from_toml_str("a = ").expect_err("bad toml");
        assert!(matches!(err, LaplaceError::Config(ConfigError::Toml(_))));
    }
}
