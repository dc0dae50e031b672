//! Solves a boxed Laplace problem described by a TOML request.
//!
//! ```text
//! cargo run --example solve_box -- --config demos/parallel_plates.toml --csv field.csv
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use em_laplace::io::{write_field_csv, write_field_vtk};
use em_laplace::simulation::SolveRequest;

#[derive(Parser, Debug)]
#[command(name = "solve_box", about = "Series solution of Laplace's equation on a rectangle")]
struct Cli {
    /// Path to a TOML request
    #[arg(short, long)]
    config: PathBuf,
    /// Path to CSV output (defaults to stdout)
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Optional VTK output for ParaView
    #[arg(long)]
    vtk: Option<PathBuf>,
    /// Suppress progress messages (stderr)
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if !cli.quiet {
        eprintln!("[solve_box] loading request {}", cli.config.display());
    }
    let request = SolveRequest::from_path(&cli.config)?;

    let missing = request.missing_constants()?;
    if !missing.is_empty() {
        return Err(format!("request is missing values for constants: {}", missing.join(", ")).into());
    }

    let field = request.run()?;
    if !cli.quiet {
        eprintln!("[solve_box] {:?}: {}", field.family, field.description);
        eprintln!("[solve_box] {}", field.label);
        for edge in &field.unused_edges {
            eprintln!("[solve_box] ignored boundary condition on {edge}");
        }
        eprintln!("[solve_box] max |V| = {:.6}", field.max_abs());
    }

    let mut writer: Box<dyn Write> = match &cli.csv {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    write_field_csv(&mut writer, &field)?;
    writer.flush()?;

    if let Some(path) = &cli.vtk {
        let mut out = BufWriter::new(File::create(path)?);
        write_field_vtk(&mut out, &field)?;
        out.flush()?;
        if !cli.quiet {
            eprintln!("[solve_box] wrote VTK to {}", path.display());
        }
    }
    Ok(())
}
