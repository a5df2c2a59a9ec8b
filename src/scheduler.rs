// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use tracing::{debug, info, trace, warn};

use crate::config::WaveConfig;
use crate::core::{ComputeTarget, Field, PromoteTarget, Wavefield};
use crate::error::{WaveError, Result};
use crate::source::inject_wavelet;
use crate::stencil::{copy_rows, update_rows, StencilCoefficients};

/// A contiguous range of grid rows assigned to one worker for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBlock {
    /// First row of the block.
    pub row_start: usize,
    /// One past the last row of the block.
    pub row_end: usize,
}

impl RowBlock {
    /// Number of rows in the block.
    pub fn len(&self) -> usize {
        self.row_end - self.row_start
    }

    /// True if the block holds no rows.
    pub fn is_empty(&self) -> bool {
        self.row_end == self.row_start
    }
}

/// Split the interior rows `[radius, rows - radius)` into at most `workers`
/// contiguous, non-overlapping blocks whose sizes differ by at most one.
///
/// Returns no blocks when the grid has no interior rows.
pub fn partition_rows(rows: usize, radius: usize, workers: usize) -> Vec<RowBlock> {
    if rows <= 2 * radius {
        return Vec::new();
    }
    let first = radius;
    let interior = rows - 2 * radius;
    let workers = workers.clamp(1, interior);
    let base = interior / workers;
    let extra = interior % workers;

    let mut blocks = Vec::with_capacity(workers);
    let mut row_start = first;
    for w in 0..workers {
        let len = base + usize::from(w < extra);
        blocks.push(RowBlock {
            row_start,
            row_end: row_start + len,
        });
        row_start += len;
    }
    blocks
}

/// Carve one disjoint mutable slice per block out of a full row-major grid.
/// Blocks must be sorted and non-overlapping.
fn split_row_blocks<'a>(data: &'a mut [f64], blocks: &[RowBlock], cols: usize) -> Vec<&'a mut [f64]> {
    let mut chunks = Vec::with_capacity(blocks.len());
    let mut rest = data;
    let mut consumed = 0;
    for block in blocks {
        let tail = std::mem::take(&mut rest);
        let (_, tail) = tail.split_at_mut((block.row_start - consumed) * cols);
        let (chunk, tail) = tail.split_at_mut(block.len() * cols);
        chunks.push(chunk);
        rest = tail;
        consumed = block.row_end;
    }
    chunks
}

/// Lifecycle of a [`WaveSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    /// Grids allocated; the initial disturbance has not been seeded yet.
    Initializing,
    /// Ready to advance, or advancing, in time.
    Stepping,
    /// All requested steps have been taken.
    Done,
}

impl fmt::Display for SolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverState::Initializing => "Initializing",
            SolverState::Stepping => "Stepping",
            SolverState::Done => "Done",
        };
        f.write_str(name)
    }
}

/// A parallel explicit FDTD solver for the 2D acoustic wave equation.
///
/// Each time step runs two fork-join phases on a dedicated rayon pool: the
/// stencil phase writes the scratch grid, then the promote phase copies it
/// into the `t` level. Both phases split the interior rows into the same
/// [`RowBlock`]s, so every interior cell is written by exactly one worker and
/// results are bitwise identical for any thread count.
pub struct WaveSolver {
    config: WaveConfig,
    wavefield: Wavefield,
    coefficients: StencilCoefficients,
    num_threads: Option<usize>,
    state: SolverState,
    steps_taken: usize,
}

impl WaveSolver {
    /// Allocate the grids for a `rows x cols` run and fill the medium with
    /// the configured uniform velocity.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the grids cannot be allocated.
    pub fn new(rows: usize, cols: usize, config: WaveConfig) -> Result<Self> {
        config.validate()?;
        let mut wavefield = Wavefield::allocate(rows, cols)?;
        wavefield.set_velocity_uniform(config.velocity);
        debug!(rows, cols, velocity = config.velocity, "allocated wavefield");
        Ok(WaveSolver {
            coefficients: StencilCoefficients::from_config(&config),
            config,
            wavefield,
            num_threads: None,
            state: SolverState::Initializing,
            steps_taken: 0,
        })
    }

    /// Build a solver around a wavefield whose time levels and velocity the
    /// caller has already set up. The solver starts in
    /// [`SolverState::Stepping`].
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn from_wavefield(wavefield: Wavefield, config: WaveConfig) -> Result<Self> {
        config.validate()?;
        Ok(WaveSolver {
            coefficients: StencilCoefficients::from_config(&config),
            config,
            wavefield,
            num_threads: None,
            state: SolverState::Stepping,
            steps_taken: 0,
        })
    }

    /// Set the number of worker threads (builder method).
    /// If not specified, defaults to the number of available CPU cores.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Replace the uniform medium with a per-cell velocity field (builder method).
    ///
    /// # Errors
    /// Returns an error if the field has the wrong length or holds a
    /// non-positive or non-finite velocity.
    pub fn with_velocity_field(mut self, velocity: &[f64]) -> Result<Self> {
        self.wavefield.set_velocity_field(velocity)?;
        Ok(self)
    }

    /// Seed the configured wavelet into the `t` level and move to
    /// [`SolverState::Stepping`].
    ///
    /// # Errors
    /// Returns [`WaveError::InvalidState`] unless the solver is initializing.
    pub fn inject_source(&mut self) -> Result<()> {
        self.expect_state(SolverState::Initializing, "inject source")?;
        let radius = self.config.radius;
        inject_wavelet(self.wavefield.current_mut(), &self.config.wavelet, radius);
        self.state = SolverState::Stepping;
        Ok(())
    }

    /// Advance exactly `iterations` time steps, then move to [`SolverState::Done`].
    ///
    /// A Courant number above 1 is logged as a warning; the run proceeds and
    /// the computed values are not altered.
    ///
    /// # Errors
    /// Returns [`WaveError::InvalidState`] unless the solver is stepping, and
    /// an error if the worker pool cannot be built.
    pub fn run(&mut self, iterations: usize) -> Result<()> {
        self.expect_state(SolverState::Stepping, "run")?;

        let cfl = self.cfl_number();
        if cfl > 1.0 {
            warn!(
                cfl,
                "CFL condition violated; the solution will grow without bound"
            );
        }

        let num_threads = self.get_num_threads()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| WaveError::Other(e.to_string()))?;
        let blocks = partition_rows(self.wavefield.rows(), self.config.radius, num_threads);
        debug!(
            iterations,
            threads = num_threads,
            blocks = blocks.len(),
            "starting time stepping"
        );

        for n in 0..iterations {
            self.step(&pool, &blocks);
            self.steps_taken += 1;
            trace!(step = n + 1, "step complete");
        }

        self.state = SolverState::Done;
        info!(steps = self.steps_taken, "time stepping finished");
        Ok(())
    }

    /// Advance the number of steps that covers `time_ms` milliseconds.
    ///
    /// # Errors
    /// See [`WaveSolver::run`].
    pub fn run_for(&mut self, time_ms: u64) -> Result<()> {
        let iterations = self.config.iterations(time_ms);
        self.run(iterations)
    }

    fn step(&mut self, pool: &rayon::ThreadPool, blocks: &[RowBlock]) {
        let cols = self.wavefield.cols();
        let radius = self.config.radius;
        let k = self.coefficients;

        let ComputeTarget {
            next,
            current,
            previous,
            vel2,
        } = self.wavefield.compute_target();
        let chunks = split_row_blocks(next, blocks, cols);
        pool.scope(|s| {
            for (block, chunk) in blocks.iter().zip(chunks) {
                s.spawn(move |_| {
                    update_rows(chunk, current, previous, vel2, block.row_start, cols, radius, &k)
                });
            }
        });

        // The scope above has joined every stencil task, so `next` is complete.
        let PromoteTarget { current, next } = self.wavefield.promote_target();
        let chunks = split_row_blocks(current, blocks, cols);
        pool.scope(|s| {
            for (block, chunk) in blocks.iter().zip(chunks) {
                s.spawn(move |_| copy_rows(chunk, next, block.row_start, cols, radius));
            }
        });

        self.wavefield.rotate();
    }

    /// Courant number of the current medium.
    pub fn cfl_number(&self) -> f64 {
        self.config.cfl_number(self.wavefield.max_velocity())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SolverState {
        self.state
    }

    /// Number of time steps taken so far.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// The configuration this solver runs with.
    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    /// Get a reference to the wavefield.
    pub fn wavefield(&self) -> &Wavefield {
        &self.wavefield
    }

    /// The field produced by the most recent step; this is the run's output.
    pub fn latest(&self) -> &Field {
        self.wavefield.latest()
    }

    /// Consume the solver and return the output field.
    pub fn into_field(self) -> Field {
        self.wavefield.into_latest()
    }

    /// Save the output field to a file. Format is inferred from the extension.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        crate::io::save_grid(self.latest(), path.as_ref())
    }

    fn expect_state(&self, expected: SolverState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(WaveError::InvalidState {
                operation,
                state: self.state.to_string(),
            })
        }
    }

    fn get_num_threads(&self) -> Result<usize> {
        match self.num_threads {
            Some(0) => Err(WaveError::InvalidThreadCount(0)),
            Some(n) => Ok(n),
            None => Ok(std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)),
        }
    }
}
