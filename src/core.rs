// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{WaveError, Result};
use crate::stencil::copy_rows;

/// Read access to a row-major 2D grid of samples.
pub trait GridData {
    /// Number of rows.
    fn rows(&self) -> usize;

    /// Number of columns.
    fn cols(&self) -> usize;

    /// Get the sample at row `i`, column `j`.
    fn get(&self, i: usize, j: usize) -> f64;

    /// Get the total number of cells in the grid.
    fn num_cells(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Convert a (row, column) pair to a flat index.
    fn to_flat(&self, i: usize, j: usize) -> usize {
        i * self.cols() + j
    }

    /// Convert a flat index to a (row, column) pair.
    fn to_rc(&self, flat: usize) -> (usize, usize) {
        (flat / self.cols(), flat % self.cols())
    }
}

/// A rectangular grid of `f64` samples stored flat in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Field {
    /// Allocate a zero-filled `rows x cols` grid.
    ///
    /// # Errors
    /// Returns [`WaveError::InvalidGridShape`] if either dimension is zero and
    /// [`WaveError::AllocationFailed`] if the storage cannot be reserved.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(WaveError::InvalidGridShape { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(WaveError::AllocationFailed { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| WaveError::AllocationFailed { rows, cols })?;
        data.resize(len, 0.0);
        Ok(Field { rows, cols, data })
    }

    /// Wrap existing row-major samples as a grid.
    ///
    /// # Errors
    /// Returns an error if the shape is empty or does not match `data.len()`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(WaveError::InvalidGridShape { rows, cols });
        }
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(WaveError::ShapeMismatch {
                expected: vec![rows, cols],
                got: vec![data.len()],
            });
        }
        Ok(Field { rows, cols, data })
    }

    /// Set the sample at row `i`, column `j`.
    pub fn set(&mut self, i: usize, j: usize, val: f64) {
        let flat = self.to_flat(i, j);
        self.data[flat] = val;
    }

    /// Overwrite every sample with `val`.
    pub fn fill(&mut self, val: f64) {
        self.data.fill(val);
    }

    /// Row-major view of all samples.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Samples of row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Consume the grid and return its row-major samples.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl GridData for Field {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }
}

/// Borrow bundle for the stencil phase: the scratch grid is written, the
/// time levels and velocity are only read.
pub struct ComputeTarget<'a> {
    /// Scratch grid receiving the next time level.
    pub next: &'a mut [f64],
    /// Time level the Laplacian is taken from.
    pub current: &'a [f64],
    /// Time level one step behind `current`.
    pub previous: &'a [f64],
    /// Velocity squared per cell.
    pub vel2: &'a [f64],
}

/// Borrow bundle for the promote phase: interior cells of `next` are copied
/// into `current`.
pub struct PromoteTarget<'a> {
    /// Destination of the copy.
    pub current: &'a mut [f64],
    /// Scratch grid filled by the stencil phase.
    pub next: &'a [f64],
}

/// The pressure time levels, the scratch grid, and the velocity-squared grid
/// of one run.
///
/// All four grids are allocated once with the same shape and never resized.
/// Roles are exchanged by moving owned buffers, never by copying data.
#[derive(Debug, Clone)]
pub struct Wavefield {
    current: Field,
    previous: Field,
    scratch: Field,
    vel2: Field,
}

impl Wavefield {
    /// Allocate four zero-filled grids of shape `rows x cols`.
    ///
    /// # Errors
    /// Fails fast with [`WaveError::AllocationFailed`] if any grid cannot be allocated.
    pub fn allocate(rows: usize, cols: usize) -> Result<Self> {
        Ok(Wavefield {
            current: Field::zeros(rows, cols)?,
            previous: Field::zeros(rows, cols)?,
            scratch: Field::zeros(rows, cols)?,
            vel2: Field::zeros(rows, cols)?,
        })
    }

    /// Number of rows shared by all grids.
    pub fn rows(&self) -> usize {
        self.current.rows
    }

    /// Number of columns shared by all grids.
    pub fn cols(&self) -> usize {
        self.current.cols
    }

    /// Fill the velocity-squared grid with `v * v`.
    pub fn set_velocity_uniform(&mut self, v: f64) {
        self.vel2.fill(v * v);
    }

    /// Fill the velocity-squared grid from a per-cell velocity field.
    ///
    /// # Errors
    /// Returns an error if the field length does not match the grid or any
    /// velocity is not positive and finite. On error `vel2` is left unchanged.
    pub fn set_velocity_field(&mut self, velocity: &[f64]) -> Result<()> {
        if velocity.len() != self.vel2.num_cells() {
            return Err(WaveError::ShapeMismatch {
                expected: vec![self.rows(), self.cols()],
                got: vec![velocity.len()],
            });
        }
        if let Some((index, &value)) = velocity
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v <= 0.0)
        {
            return Err(WaveError::InvalidVelocity { index, value });
        }
        for (dst, &v) in self.vel2.as_mut_slice().iter_mut().zip(velocity) {
            *dst = v * v;
        }
        Ok(())
    }

    /// Largest velocity present in the medium.
    pub fn max_velocity(&self) -> f64 {
        self.vel2
            .as_slice()
            .iter()
            .fold(0.0_f64, |acc, &v2| acc.max(v2))
            .sqrt()
    }

    /// The time level the next stencil pass reads as `t`.
    pub fn current(&self) -> &Field {
        &self.current
    }

    /// Mutable access to the `t` level, used to seed the initial disturbance.
    pub fn current_mut(&mut self) -> &mut Field {
        &mut self.current
    }

    /// The time level the next stencil pass reads as `t - 1`.
    pub fn previous(&self) -> &Field {
        &self.previous
    }

    /// Mutable access to the `t - 1` level.
    pub fn previous_mut(&mut self) -> &mut Field {
        &mut self.previous
    }

    /// The velocity-squared grid.
    pub fn vel2(&self) -> &Field {
        &self.vel2
    }

    /// Split borrows for the stencil phase.
    pub fn compute_target(&mut self) -> ComputeTarget<'_> {
        ComputeTarget {
            next: self.scratch.as_mut_slice(),
            current: self.current.as_slice(),
            previous: self.previous.as_slice(),
            vel2: self.vel2.as_slice(),
        }
    }

    /// Split borrows for the promote phase.
    pub fn promote_target(&mut self) -> PromoteTarget<'_> {
        PromoteTarget {
            current: self.current.as_mut_slice(),
            next: self.scratch.as_slice(),
        }
    }

    /// Copy the interior of the scratch grid into the `t` level on the calling
    /// thread. The solver uses the row-block parallel version of this copy.
    pub fn promote(&mut self, radius: usize) {
        let (rows, cols) = (self.rows(), self.cols());
        if rows <= 2 * radius || cols <= 2 * radius {
            return;
        }
        let PromoteTarget { current, next } = self.promote_target();
        let interior = &mut current[radius * cols..(rows - radius) * cols];
        copy_rows(interior, next, radius, cols, radius);
    }

    /// Exchange the `t` and `t - 1` roles.
    ///
    /// After a promote, the `t` buffer holds the freshly computed level, so
    /// once rotated that level sits in the `t - 1` role and the older level
    /// becomes the next pass's `t`.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
    }

    /// The field promoted by the most recent step (the zero grid before any step).
    pub fn latest(&self) -> &Field {
        &self.previous
    }

    /// Consume the wavefield and keep only [`Wavefield::latest`].
    pub fn into_latest(self) -> Field {
        self.previous
    }
}
