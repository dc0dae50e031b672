//! Boundary conditions on the rectangle's edges and center lines.

mod binder;
mod edge;
/// Expression parser and evaluator used by boundary strings.
pub mod expr;

pub use binder::{
    required_constants, BoundExpr, BoundaryBinder, BoundaryCondition, BoundaryInputs, BoundarySet,
    ConstantBinding, EdgeProfile, ParseError, ParsePolicy, UnboundConstantError, STEP_AMPLITUDE,
    STEP_MARKER,
};
pub use edge::{Coordinate, Edge};
pub use expr::{Expr, SyntaxError};
