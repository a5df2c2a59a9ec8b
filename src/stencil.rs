// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::WaveConfig;

/// Squared discretization steps used by the five-point stencil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilCoefficients {
    /// `dx * dx`
    pub dx2: f64,
    /// `dy * dy`
    pub dy2: f64,
    /// `dt * dt`
    pub dt2: f64,
}

impl StencilCoefficients {
    /// Precompute squared steps from a configuration.
    pub fn from_config(config: &WaveConfig) -> Self {
        StencilCoefficients {
            dx2: config.dx * config.dx,
            dy2: config.dy * config.dy,
            dt2: config.dt * config.dt,
        }
    }
}

/// Leapfrog update for the cell at flat index `idx` of a grid with `cols` columns.
///
/// `lap = (u[j+1] - 2u + u[j-1]) / dx^2 + (u[i+1] - 2u + u[i-1]) / dy^2`, then
/// `next = 2u - prev + dt^2 * vel2 * lap`. The caller guarantees `idx` is at
/// least one cell away from every edge. No stability check is made.
#[inline]
pub fn update_cell(
    current: &[f64],
    previous: &[f64],
    vel2: &[f64],
    idx: usize,
    cols: usize,
    k: &StencilCoefficients,
) -> f64 {
    let u = current[idx];
    let mut lap = (current[idx + 1] - 2.0 * u + current[idx - 1]) / k.dx2;
    lap += (current[idx + cols] - 2.0 * u + current[idx - cols]) / k.dy2;
    2.0 * u - previous[idx] + k.dt2 * vel2[idx] * lap
}

/// Apply the stencil to rows `row_start..row_end`, skipping `radius` columns
/// on each side.
///
/// `next_rows` covers exactly those rows (`(row_end - row_start) * cols`
/// samples); the full-grid slices are only read.
#[allow(clippy::too_many_arguments)]
pub fn update_rows(
    next_rows: &mut [f64],
    current: &[f64],
    previous: &[f64],
    vel2: &[f64],
    row_start: usize,
    cols: usize,
    radius: usize,
    k: &StencilCoefficients,
) {
    debug_assert_eq!(next_rows.len() % cols, 0);
    if cols <= 2 * radius {
        return;
    }
    for (offset, row) in next_rows.chunks_exact_mut(cols).enumerate() {
        let base = (row_start + offset) * cols;
        for j in radius..cols - radius {
            row[j] = update_cell(current, previous, vel2, base + j, cols, k);
        }
    }
}

/// Copy rows `row_start..row_end` of the scratch grid into `current_rows`,
/// skipping `radius` columns on each side.
pub fn copy_rows(current_rows: &mut [f64], next: &[f64], row_start: usize, cols: usize, radius: usize) {
    if cols <= 2 * radius {
        return;
    }
    for (offset, row) in current_rows.chunks_exact_mut(cols).enumerate() {
        let base = (row_start + offset) * cols;
        row[radius..cols - radius].copy_from_slice(&next[base + radius..base + cols - radius]);
    }
}
