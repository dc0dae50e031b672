use std::fmt;

use crate::fields::Domain;
use crate::math::Scalar;

/// Cartesian coordinate of the rectangular domain.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coordinate {
    /// Horizontal coordinate, spanning `[-b, b]`.
    X,
    /// Vertical coordinate, spanning `[-a, a]`.
    Y,
}

impl Coordinate {
    /// Symbol used for the coordinate in boundary expressions.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

/// One of the six lines that can carry a boundary condition.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Edge {
    /// Left edge `x = -b`.
    XMinus,
    /// Right edge `x = +b`.
    XPlus,
    /// Bottom edge `y = -a`.
    YMinus,
    /// Top edge `y = +a`.
    YPlus,
    /// Vertical center line `x = 0`.
    XCenter,
    /// Horizontal center line `y = 0`.
    YCenter,
}

impl Edge {
    /// All edges in input order.
    pub const ALL: [Self; 6] = [
        Self::XMinus,
        Self::XPlus,
        Self::YMinus,
        Self::YPlus,
        Self::XCenter,
        Self::YCenter,
    ];

    /// Position of the edge in [`Edge::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short label such as `x=-b`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::XMinus => "x=-b",
            Self::XPlus => "x=+b",
            Self::YMinus => "y=-a",
            Self::YPlus => "y=+a",
            Self::XCenter => "x=0",
            Self::YCenter => "y=0",
        }
    }

    /// The coordinate held fixed along the edge.
    #[must_use]
    pub const fn fixed_coordinate(self) -> Coordinate {
        match self {
            Self::XMinus | Self::XPlus | Self::XCenter => Coordinate::X,
            Self::YMinus | Self::YPlus | Self::YCenter => Coordinate::Y,
        }
    }

    /// The coordinate the edge runs along.
    #[must_use]
    pub const fn free_coordinate(self) -> Coordinate {
        match self.fixed_coordinate() {
            Coordinate::X => Coordinate::Y,
            Coordinate::Y => Coordinate::X,
        }
    }

    /// Value of the fixed coordinate on this edge.
    #[must_use]
    pub fn fixed_value(self, domain: &Domain) -> Scalar {
        match self {
            Self::XMinus => -domain.b,
            Self::XPlus => domain.b,
            Self::YMinus => -domain.a,
            Self::YPlus => domain.a,
            Self::XCenter | Self::YCenter => 0.0,
        }
    }

    /// Point `(x, y)` on the edge at free-coordinate value `s`.
    #[must_use]
    pub fn point(self, domain: &Domain, s: Scalar) -> (Scalar, Scalar) {
        let fixed = self.fixed_value(domain);
        match self.fixed_coordinate() {
            Coordinate::X => (fixed, s),
            Coordinate::Y => (s, fixed),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_points_lie_on_their_lines() {
        let domain = Domain::new(1.0, 2.0).expect("valid domain");
        assert_eq!(Edge::XMinus.point(&domain, 0.25), (-2.0, 0.25));
        assert_eq!(Edge::YPlus.point(&domain, -0.5), (-0.5, 1.0));
        assert_eq!(Edge::XCenter.point(&domain, 0.1), (0.0, 0.1));
        assert_eq!(Edge::YCenter.free_coordinate(), Coordinate::X);
    }

    #[test]
    fn index_follows_input_order() {
        for (i, edge) in Edge::ALL.iter().enumerate() {
            assert_eq!(edge.index(), i);
        }
    }
}
