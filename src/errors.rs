//! Shared error types used across submodules.

use thiserror::Error;

use crate::boundary::{ParseError, UnboundConstantError};
#[cfg(feature = "config")]
use crate::simulation::ConfigError;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum LaplaceError {
    /// A boundary-condition string could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// An expression references a constant with no bound value.
    #[error(transparent)]
    UnboundConstant(#[from] UnboundConstantError),
    /// Raised when the rectangle half-extents are not positive and finite.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    /// Raised when the grid resolution cannot form a mesh.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    /// Raised when the series truncation order is zero.
    #[error("series must have at least one term")]
    InvalidTerms,
    /// Wraps request loading errors.
    #[cfg(feature = "config")]
    #[error(transparent)]
    Config(#[from] ConfigError),
}
