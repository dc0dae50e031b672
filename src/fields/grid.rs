use nalgebra::DMatrix;

use crate::constants::MIN_GRID_POINTS;
use crate::errors::LaplaceError;
use crate::math::Scalar;

/// Rectangle `[-b, b] × [-a, a]` centered at the origin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// Half-height along `y`.
    pub a: Scalar,
    /// Half-width along `x`.
    pub b: Scalar,
}

impl Domain {
    /// Creates a domain, rejecting non-positive or non-finite extents.
    pub fn new(a: Scalar, b: Scalar) -> Result<Self, LaplaceError> {
        let domain = Self { a, b };
        domain.validate()?;
        Ok(domain)
    }

    /// Checks `a > 0` and `b > 0`.
    pub fn validate(&self) -> Result<(), LaplaceError> {
        for (name, value) in [("a", self.a), ("b", self.b)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LaplaceError::InvalidDomain(format!("{name} must be positive and finite, got {value}")));
            }
        }
        Ok(())
    }
}

/// Generates `n` samples evenly spaced over `[-half, half]`.
///
/// Samples mirrored about the center are exact negatives of each other.
#[must_use]
pub fn centered_linspace(half: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let span = (n - 1) as Scalar;
            (0..n)
                .map(|i| half * (((2 * i) as Scalar - span) / span))
                .collect()
        }
    }
}

/// Regular sampling of a [`Domain`].
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    domain: Domain,
    x: Vec<Scalar>,
    y: Vec<Scalar>,
}

impl Grid {
    /// Builds an `nx × ny` grid spanning the full domain.
    pub fn new(domain: Domain, nx: usize, ny: usize) -> Result<Self, LaplaceError> {
        domain.validate()?;
        if nx < MIN_GRID_POINTS || ny < MIN_GRID_POINTS {
            return Err(LaplaceError::InvalidGrid(format!(
                "need at least {MIN_GRID_POINTS} points per axis, got {nx} x {ny}"
            )));
        }
        Ok(Self {
            domain,
            x: centered_linspace(domain.b, nx),
            y: centered_linspace(domain.a, ny),
        })
    }

    /// Sampled domain.
    #[must_use]
    pub const fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Number of samples along `x`.
    #[must_use]
    pub fn nx(&self) -> usize {
        self.x.len()
    }

    /// Number of samples along `y`.
    #[must_use]
    pub fn ny(&self) -> usize {
        self.y.len()
    }

    /// Sample positions along `x`.
    #[must_use]
    pub fn x(&self) -> &[Scalar] {
        &self.x
    }

    /// Sample positions along `y`.
    #[must_use]
    pub fn y(&self) -> &[Scalar] {
        &self.y
    }

    /// Coordinate matrices `(X, Y)`, each `ny × nx` with rows indexed by `y`.
    #[must_use]
    pub fn meshgrid(&self) -> (DMatrix<Scalar>, DMatrix<Scalar>) {
        let (nx, ny) = (self.nx(), self.ny());
        let xs = DMatrix::from_fn(ny, nx, |_, j| self.x[j]);
        let ys = DMatrix::from_fn(ny, nx, |i, _| self.y[i]);
        (xs, ys)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn centered_linspace_is_mirror_symmetric() {
        let v = centered_linspace(1.0, 5);
        assert_eq!(v, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        let w = centered_linspace(1.7, 50);
        for i in 0..50 {
            assert_eq!(w[i], -w[49 - i]);
        }
        assert_eq!(w[49], 1.7);
        assert!(centered_linspace(1.0, 0).is_empty());
    }

    #[test]
    fn grid_spans_domain_and_meshgrid_is_row_major_in_y() {
        let domain = Domain::new(1.0, 2.0).expect("valid");
        let grid = Grid::new(domain, 5, 3).expect("valid");
        assert_eq!(grid.x()[0], -2.0);
        assert_eq!(grid.x()[4], 2.0);
        assert_eq!(grid.y(), &[-1.0, 0.0, 1.0]);

        let (xs, ys) = grid.meshgrid();
        assert_eq!(xs.shape(), (3, 5));
        assert_relative_eq!(xs[(2, 1)], -1.0);
        assert_relative_eq!(ys[(2, 1)], 1.0);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert!(matches!(Domain::new(0.0, 1.0), Err(LaplaceError::InvalidDomain(_))));
        assert!(matches!(Domain::new(1.0, Scalar::NAN), Err(LaplaceError::InvalidDomain(_))));
        let domain = Domain::new(1.0, 1.0).expect("valid");
        assert!(matches!(Grid::new(domain, 1, 10), Err(LaplaceError::InvalidGrid(_))));
    }
}
