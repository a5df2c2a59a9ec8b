// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WaveError, Result};

/// Reference source wavelet taps.
pub const DEFAULT_WAVELET: [f64; 12] = [
    0.016387336,
    -0.041464937,
    -0.067372555,
    0.386110067,
    0.812723635,
    0.416998396,
    0.076488599,
    -0.059434419,
    0.023680172,
    0.005611435,
    0.001823209,
    -0.000720549,
];

/// Discretization constants and source profile for a run.
///
/// Every field has a default that reproduces the reference numbers, so a TOML
/// file only needs to name the values it overrides:
///
/// ```toml
/// dt = 0.001
/// velocity = 2000.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Time step in seconds. Sets the iteration count and stability.
    pub dt: f64,
    /// Grid spacing along a row (between columns), in meters.
    pub dx: f64,
    /// Grid spacing along a column (between rows), in meters.
    pub dy: f64,
    /// Uniform medium velocity in m/s, used unless a velocity field is supplied.
    pub velocity: f64,
    /// Stencil half-width: number of untouched cells along each edge.
    pub radius: usize,
    /// Source injection profile, outermost square last in the list.
    pub wavelet: Vec<f64>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        WaveConfig {
            dt: 0.0070710676,
            dx: 15.0,
            dy: 15.0,
            velocity: 1500.0,
            radius: 1,
            wavelet: DEFAULT_WAVELET.to_vec(),
        }
    }
}

impl WaveConfig {
    /// Load a configuration from a TOML file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: WaveConfig = toml::from_str(content)
            .map_err(|e| WaveError::Other(format!("failed to parse TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every constant is usable by the stencil.
    ///
    /// Stability is deliberately not checked here; see [`WaveConfig::cfl_number`].
    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(WaveError::InvalidTimeStep(self.dt));
        }
        for h in [self.dx, self.dy] {
            if !h.is_finite() || h <= 0.0 {
                return Err(WaveError::InvalidGridSpacing(h));
            }
        }
        if !self.velocity.is_finite() || self.velocity <= 0.0 {
            return Err(WaveError::InvalidVelocity {
                index: 0,
                value: self.velocity,
            });
        }
        if self.radius == 0 {
            return Err(WaveError::InvalidRadius(self.radius));
        }
        Ok(())
    }

    /// Number of time steps needed to cover `time_ms` milliseconds.
    pub fn iterations(&self, time_ms: u64) -> usize {
        ((time_ms as f64 / 1000.0) / self.dt).floor() as usize
    }

    /// Courant number `v * dt * sqrt(1/dx^2 + 1/dy^2)` for a peak velocity `v_max`.
    /// Values above 1 make the explicit scheme unstable.
    pub fn cfl_number(&self, v_max: f64) -> f64 {
        let inv = 1.0 / (self.dx * self.dx) + 1.0 / (self.dy * self.dy);
        v_max * self.dt * inv.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = WaveConfig::default();
        assert_eq!(config.dt, 0.0070710676);
        assert_eq!(config.dx, 15.0);
        assert_eq!(config.dy, 15.0);
        assert_eq!(config.velocity, 1500.0);
        assert_eq!(config.radius, 1);
        assert_eq!(config.wavelet.len(), 12);
        assert_eq!(config.wavelet[4], 0.812723635);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn iteration_count() {
        let config = WaveConfig::default();
        assert_eq!(config.iterations(1000), 141);
        assert_eq!(config.iterations(1), 0);
        assert_eq!(config.iterations(0), 0);
        assert_eq!(config.iterations(2000), 282);
    }

    #[test]
    fn default_setup_sits_on_stability_bound() {
        let config = WaveConfig::default();
        let cfl = config.cfl_number(config.velocity);
        assert!(cfl <= 1.0, "cfl = {}", cfl);
        assert!(cfl > 0.999_999, "cfl = {}", cfl);
        assert!(config.cfl_number(2.0 * config.velocity) > 1.0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = WaveConfig::from_toml_str("dt = 0.001\nvelocity = 2000.0\n").unwrap();
        assert_eq!(config.dt, 0.001);
        assert_eq!(config.velocity, 2000.0);
        assert_eq!(config.dx, 15.0);
        assert_eq!(config.wavelet, DEFAULT_WAVELET.to_vec());
    }

    #[test]
    fn toml_wavelet_override() {
        let config = WaveConfig::from_toml_str("wavelet = [1.0, 0.5]\n").unwrap();
        assert_eq!(config.wavelet, vec![1.0, 0.5]);
    }

    #[test]
    fn invalid_toml_rejected() {
        let result = WaveConfig::from_toml_str("dt = \"fast\"\n");
        assert!(matches!(result, Err(WaveError::Other(_))));
    }

    #[test]
    fn invalid_time_step() {
        let config = WaveConfig {
            dt: 0.0,
            ..WaveConfig::default()
        };
        assert!(matches!(config.validate(), Err(WaveError::InvalidTimeStep(_))));
    }

    #[test]
    fn invalid_spacing() {
        let config = WaveConfig {
            dy: f64::NAN,
            ..WaveConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WaveError::InvalidGridSpacing(_))
        ));
    }

    #[test]
    fn invalid_radius() {
        let config = WaveConfig {
            radius: 0,
            ..WaveConfig::default()
        };
        assert!(matches!(config.validate(), Err(WaveError::InvalidRadius(0))));
    }
}
