//! Comma-delimited text export of trajectories and sweeps.
//!
//! Values are written in scientific notation with the shortest digits that
//! round-trip, one record per line.

use crate::batch::TrajectoryBatch;
use crate::trajectory::Trajectory;
use std::io::{self, Write};

fn write_record<W: Write>(w: &mut W, values: impl IntoIterator<Item = f64>) -> io::Result<()> {
    let mut first = true;
    for value in values {
        if !first {
            w.write_all(b",")?;
        }
        write!(w, "{value:e}")?;
        first = false;
    }
    w.write_all(b"\n")
}

/// One row per sample: `theta,p`.
pub fn write_columns<W: Write>(w: &mut W, trajectory: &Trajectory) -> io::Result<()> {
    for state in trajectory.iter() {
        write_record(w, [state.theta, state.p])?;
    }
    Ok(())
}

/// Two rows: every `θ`, then every `p`.
pub fn write_rows<W: Write>(w: &mut W, trajectory: &Trajectory) -> io::Result<()> {
    write_record(w, trajectory.theta().iter().copied())?;
    write_record(w, trajectory.p().iter().copied())
}

/// One value per line.
pub fn write_series<W: Write>(w: &mut W, values: &[f64]) -> io::Result<()> {
    for &value in values {
        write_record(w, [value])?;
    }
    Ok(())
}

/// One row per condition with the step and coordinate axes flattened:
/// `θ_0,p_0,θ_1,p_1,...`.
pub fn write_batch<W: Write>(w: &mut W, batch: &TrajectoryBatch) -> io::Result<()> {
    let (_, samples, coordinates) = batch.shape();
    let row = samples * coordinates;
    for record in batch.as_slice().chunks(row.max(1)) {
        write_record(w, record.iter().copied())?;
    }
    Ok(())
}
