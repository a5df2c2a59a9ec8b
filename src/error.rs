// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

/// Errors that can occur during wave solver setup, I/O, or execution.
#[derive(Debug)]
pub enum WaveError {
    /// Grid shape is invalid (zero rows or columns).
    InvalidGridShape {
        /// Number of rows requested.
        rows: usize,
        /// Number of columns requested.
        cols: usize,
    },
    /// Grid spacing is not positive and finite.
    InvalidGridSpacing(f64),
    /// Time step is not positive and finite.
    InvalidTimeStep(f64),
    /// Stencil radius is zero.
    InvalidRadius(usize),
    /// Worker thread count is zero.
    InvalidThreadCount(usize),
    /// Velocity value is not positive and finite.
    InvalidVelocity {
        /// The flat index of the invalid value.
        index: usize,
        /// The invalid value.
        value: f64,
    },
    /// Grid storage for the requested shape could not be allocated.
    AllocationFailed {
        /// Number of rows requested.
        rows: usize,
        /// Number of columns requested.
        cols: usize,
    },
    /// Array shape does not match expected shape.
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape encountered.
        got: Vec<usize>,
    },
    /// Solver operation called in the wrong lifecycle state.
    InvalidState {
        /// Name of the rejected operation.
        operation: &'static str,
        /// State the solver was in.
        state: String,
    },
    /// Text grid could not be parsed.
    Parse {
        /// One-based line number of the offending row.
        line: usize,
        /// Explanation of the failure.
        reason: String,
    },
    /// Unsupported data type in file.
    UnsupportedDtype(String),
    /// Unsupported file format (unrecognized extension).
    UnsupportedFileFormat(String),
    /// I/O error occurred.
    IoError(std::io::Error),
    /// Other error with a descriptive message.
    Other(String),
}

impl fmt::Display for WaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveError::InvalidGridShape { rows, cols } => {
                write!(
                    f,
                    "invalid grid shape: {}x{} (rows and cols must be >= 1)",
                    rows, cols
                )
            }
            WaveError::InvalidGridSpacing(h) => {
                write!(
                    f,
                    "invalid grid spacing: {} (must be positive and finite)",
                    h
                )
            }
            WaveError::InvalidTimeStep(dt) => {
                write!(f, "invalid time step: {} (must be positive and finite)", dt)
            }
            WaveError::InvalidRadius(r) => {
                write!(f, "invalid stencil radius: {} (must be >= 1)", r)
            }
            WaveError::InvalidThreadCount(n) => {
                write!(f, "invalid thread count: {} (must be >= 1)", n)
            }
            WaveError::InvalidVelocity { index, value } => {
                write!(
                    f,
                    "invalid velocity at index {}: {} (must be positive and finite)",
                    index, value
                )
            }
            WaveError::AllocationFailed { rows, cols } => {
                write!(
                    f,
                    "failed to allocate {}x{} grid: out of memory",
                    rows, cols
                )
            }
            WaveError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {:?}, got {:?}", expected, got)
            }
            WaveError::InvalidState { operation, state } => {
                write!(f, "cannot {} while solver is {}", operation, state)
            }
            WaveError::Parse { line, reason } => {
                write!(f, "parse error on line {}: {}", line, reason)
            }
            WaveError::UnsupportedDtype(dtype) => {
                write!(f, "unsupported dtype: {}", dtype)
            }
            WaveError::UnsupportedFileFormat(ext) => {
                write!(f, "unsupported file format: {}", ext)
            }
            WaveError::IoError(e) => write!(f, "I/O error: {}", e),
            WaveError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for WaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WaveError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WaveError {
    fn from(e: std::io::Error) -> Self {
        WaveError::IoError(e)
    }
}

/// Convenience type alias for Results with WaveError.
pub type Result<T> = std::result::Result<T, WaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_grid_shape() {
        let e = WaveError::InvalidGridShape { rows: 0, cols: 8 };
        assert_eq!(
            e.to_string(),
            "invalid grid shape: 0x8 (rows and cols must be >= 1)"
        );
    }

    #[test]
    fn display_invalid_grid_spacing() {
        let e = WaveError::InvalidGridSpacing(-1.0);
        assert_eq!(
            e.to_string(),
            "invalid grid spacing: -1 (must be positive and finite)"
        );
    }

    #[test]
    fn display_allocation_failed() {
        let e = WaveError::AllocationFailed {
            rows: 100_000,
            cols: 200_000,
        };
        assert_eq!(
            e.to_string(),
            "failed to allocate 100000x200000 grid: out of memory"
        );
    }

    #[test]
    fn display_invalid_velocity() {
        let e = WaveError::InvalidVelocity {
            index: 5,
            value: -0.5,
        };
        assert_eq!(
            e.to_string(),
            "invalid velocity at index 5: -0.5 (must be positive and finite)"
        );
    }

    #[test]
    fn display_invalid_state() {
        let e = WaveError::InvalidState {
            operation: "step",
            state: "Done".to_string(),
        };
        assert_eq!(e.to_string(), "cannot step while solver is Done");
    }

    #[test]
    fn display_parse_error() {
        let e = WaveError::Parse {
            line: 3,
            reason: "expected 4 values, found 2".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "parse error on line 3: expected 4 values, found 2"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e = WaveError::IoError(io_err);
        assert!(e.to_string().contains("file not found"));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let e: WaveError = io_err.into();
        assert!(matches!(e, WaveError::IoError(_)));
    }
}
