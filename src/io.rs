// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::Array2;

use crate::core::{Field, GridData};
use crate::error::{WaveError, Result};

/// Decimal places used by the text format.
pub const TEXT_PRECISION: usize = 6;

/// Write a grid as text: one row per line, every value followed by a space.
pub fn write_text<G: GridData, W: Write>(grid: &G, writer: &mut W) -> Result<()> {
    for i in 0..grid.rows() {
        for j in 0..grid.cols() {
            write!(writer, "{:.*} ", TEXT_PRECISION, grid.get(i, j))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Parse a text grid written by [`write_text`].
///
/// Blank lines are skipped. Every row must hold the same number of values.
pub fn read_text<R: BufRead>(reader: R) -> Result<Field> {
    let mut data = Vec::new();
    let mut rows = 0;
    let mut cols = None;
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| tok.parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| WaveError::Parse {
                line: n + 1,
                reason: e.to_string(),
            })?;
        match cols {
            None => cols = Some(row.len()),
            Some(c) if c != row.len() => {
                return Err(WaveError::Parse {
                    line: n + 1,
                    reason: format!("expected {} values, found {}", c, row.len()),
                });
            }
            Some(_) => {}
        }
        data.extend(row);
        rows += 1;
    }
    Field::from_vec(rows, cols.unwrap_or(0), data)
}

/// Save a grid to a text file.
pub fn save_text<G: GridData>(grid: &G, path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_text(grid, &mut w)?;
    w.flush()?;
    Ok(())
}

/// Load a grid from a text file.
pub fn load_text(path: &Path) -> Result<Field> {
    read_text(BufReader::new(File::open(path)?))
}

/// Save a grid to a .npy file as a 2-D f64 array.
pub fn save_npy<G: GridData>(grid: &G, path: &Path) -> Result<()> {
    let arr = Array2::from_shape_fn((grid.rows(), grid.cols()), |(i, j)| grid.get(i, j));
    ndarray_npy::write_npy(path, &arr)
        .map_err(|e| WaveError::Other(format!("npy write error: {}", e)))?;
    Ok(())
}

/// Load a 2-D grid from a .npy file, accepting f64 or f32 data.
pub fn load_npy(path: &Path) -> Result<Field> {
    // Try f64 first
    let arr: Array2<f64> = match ndarray_npy::read_npy(path) {
        Ok(a) => a,
        Err(_) => {
            let arr32: Array2<f32> = ndarray_npy::read_npy(path)
                .map_err(|e| WaveError::UnsupportedDtype(format!("{}", e)))?;
            arr32.mapv(|v| v as f64)
        }
    };
    let (rows, cols) = arr.dim();
    // Fortran-order files must be re-laid out before taking the raw buffer.
    Field::from_vec(rows, cols, arr.as_standard_layout().to_owned().into_raw_vec())
}

/// Supported file formats for grid I/O.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    /// Whitespace-separated text, one row per line.
    Text,
    /// NumPy .npy format.
    Npy,
}

impl FileFormat {
    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Text => "txt",
            FileFormat::Npy => "npy",
        }
    }
}

/// Infer file format from extension.
pub fn infer_format(path: &Path) -> Result<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("txt") => Ok(FileFormat::Text),
        Some("npy") => Ok(FileFormat::Npy),
        Some(ext) => Err(WaveError::UnsupportedFileFormat(ext.to_string())),
        None => Err(WaveError::UnsupportedFileFormat(
            "(no extension)".to_string(),
        )),
    }
}

/// Save a grid to a file, inferring format from extension.
pub fn save_grid<G: GridData>(grid: &G, path: &Path) -> Result<()> {
    match infer_format(path)? {
        FileFormat::Text => save_text(grid, path),
        FileFormat::Npy => save_npy(grid, path),
    }
}

/// Load a grid from a file, inferring format from extension.
pub fn load_grid(path: &Path) -> Result<Field> {
    match infer_format(path)? {
        FileFormat::Text => load_text(path),
        FileFormat::Npy => load_npy(path),
    }
}

/// Load a per-cell velocity field and check it against the grid shape.
pub fn load_velocity(path: &Path, rows: usize, cols: usize) -> Result<Vec<f64>> {
    let field = load_grid(path)?;
    if field.rows() != rows || field.cols() != cols {
        return Err(WaveError::ShapeMismatch {
            expected: vec![rows, cols],
            got: vec![field.rows(), field.cols()],
        });
    }
    Ok(field.into_vec())
}

/// Output file name for a run: `wavefield_<rows>_<cols>_<time_ms>.<ext>`.
/// Runs with different parameters never collide.
pub fn output_file_name(rows: usize, cols: usize, time_ms: u64, format: FileFormat) -> String {
    format!(
        "wavefield_{}_{}_{}.{}",
        rows,
        cols,
        time_ms,
        format.extension()
    )
}
