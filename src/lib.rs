// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! A parallel explicit finite-difference (FDTD) solver for the 2D acoustic
//! wave equation.
//!
//! A layered source wavelet is seeded at the grid centre and the pressure
//! field is advanced with a five-point Laplacian and a second-order leapfrog
//! time update. Each step is split into contiguous row blocks processed in
//! parallel, so every interior cell is written by exactly one worker and the
//! result does not depend on the thread count.

#![warn(missing_docs)]

/// Discretization constants, source profile, and TOML loading.
pub mod config;
/// Grid storage and the time-level buffers.
pub mod core;
/// Error types for the library.
pub mod error;
/// Text and .npy grid I/O.
pub mod io;
/// Parallel time-stepping controller.
pub mod scheduler;
/// Source wavelet injection.
pub mod source;
/// Five-point stencil and leapfrog update kernels.
pub mod stencil;

pub use crate::config::WaveConfig;
pub use crate::core::{Field, GridData, Wavefield};
pub use crate::error::{WaveError, Result};
pub use crate::scheduler::{RowBlock, SolverState, WaveSolver};
