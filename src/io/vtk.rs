//! VTK legacy ASCII export.
//!
//! The grid is uniform, so the field is written as `STRUCTURED_POINTS` with
//! the potential as point data. The file opens directly in ParaView.

use std::io::{self, Write};

use crate::fields::PotentialField;

/// Writes the legacy VTK file header.
pub fn write_vtk_header<W: Write>(mut writer: W, title: &str) -> io::Result<()> {
    writeln!(writer, "# vtk DataFile Version 3.0")?;
    writeln!(writer, "{}", title.lines().next().unwrap_or_default())?;
    writeln!(writer, "ASCII")?;
    Ok(())
}

/// Writes `field` as a `STRUCTURED_POINTS` dataset with one `potential` scalar.
///
/// Points are emitted with `x` varying fastest, as VTK expects.
pub fn write_field_vtk<W: Write>(mut writer: W, field: &PotentialField) -> io::Result<()> {
    let (ny, nx) = field.potential.shape();
    write_vtk_header(&mut writer, &field.description)?;
    writeln!(writer, "DATASET STRUCTURED_POINTS")?;
    writeln!(writer, "DIMENSIONS {nx} {ny} 1")?;

    let x0 = field.x[(0, 0)];
    let y0 = field.y[(0, 0)];
    let dx = if nx > 1 { field.x[(0, 1)] - x0 } else { 0.0 };
    let dy = if ny > 1 { field.y[(1, 0)] - y0 } else { 0.0 };
    writeln!(writer, "ORIGIN {x0:e} {y0:e} 0")?;
    writeln!(writer, "SPACING {dx:e} {dy:e} 1")?;

    writeln!(writer, "POINT_DATA {}", nx * ny)?;
    writeln!(writer, "SCALARS potential double 1")?;
    writeln!(writer, "LOOKUP_TABLE default")?;
    for i in 0..ny {
        for j in 0..nx {
            writeln!(writer, "{:e}", field.potential[(i, j)])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{BoundaryCondition, BoundarySet, Edge};
    use crate::fields::{solve, Domain, Grid};

    #[test]
    fn structured_points_layout() {
        let domain = Domain::new(1.0, 2.0).expect("valid");
        let grid = Grid::new(domain, 3, 2).expect("valid");
        let set = BoundarySet::unspecified(domain)
            .with(Edge::XMinus, BoundaryCondition::Constant(1.0))
            .with(Edge::XPlus, BoundaryCondition::Constant(1.0));
        let field = solve(&grid, 5, &set).expect("solves");

        let mut out = Vec::new();
        write_field_vtk(&mut out, &field).expect("writes");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# vtk DataFile Version 3.0");
        assert_eq!(lines[2], "ASCII");
        assert_eq!(lines[3], "DATASET STRUCTURED_POINTS");
        assert_eq!(lines[4], "DIMENSIONS 3 2 1");
        assert_eq!(lines[5], "ORIGIN -2e0 -1e0 0");
        assert_eq!(lines[6], "SPACING 2e0 2e0 1");
        assert_eq!(lines[7], "POINT_DATA 6");
        assert_eq!(lines.len(), 10 + 6);
    }
}
