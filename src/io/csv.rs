//! Plain CSV export, one grid point per row.

use std::io::{self, Write};

use crate::fields::PotentialField;

/// Writes `x,y,V` rows for every grid point, row-major in `y`.
pub fn write_field_csv<W: Write>(mut writer: W, field: &PotentialField) -> io::Result<()> {
    writeln!(writer, "x,y,V")?;
    let (ny, nx) = field.potential.shape();
    for i in 0..ny {
        for j in 0..nx {
            writeln!(
                writer,
                "{:e},{:e},{:e}",
                field.x[(i, j)],
                field.y[(i, j)],
                field.potential[(i, j)]
            )?;
        }
    }
    Ok(())
}
