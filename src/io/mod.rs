//! I/O helpers for exporting potential fields.

pub mod csv;
pub mod vtk;

pub use csv::*;
pub use vtk::*;
