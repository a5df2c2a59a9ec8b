// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use acoustic_fdtd::config::WaveConfig;
use acoustic_fdtd::io::{self, FileFormat};
use acoustic_fdtd::scheduler::WaveSolver;

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Txt,
    Npy,
}

impl From<OutputFormat> for FileFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Txt => FileFormat::Text,
            OutputFormat::Npy => FileFormat::Npy,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "acoustic-fdtd",
    about = "Explicit finite-difference solver for the 2D acoustic wave equation"
)]
struct Cli {
    /// Number of grid rows
    rows: usize,

    /// Number of grid columns
    cols: usize,

    /// Propagation time in milliseconds
    time_ms: u64,

    /// Number of Rayon worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// TOML file overriding dt, dx, dy, velocity, radius or wavelet
    #[arg(long)]
    config: Option<PathBuf>,

    /// Medium: "uniform:<v>" or "velocity-file:<path>" (.txt or .npy)
    #[arg(long)]
    velocity: Option<String>,

    /// Directory the wavefield file is written to
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "txt")]
    format: OutputFormat,
}

enum Medium {
    Uniform(f64),
    File(PathBuf),
}

fn parse_medium(mode: &str) -> Result<Medium> {
    if let Some(val_str) = mode.strip_prefix("uniform:") {
        let val: f64 = val_str.parse().context("invalid uniform velocity value")?;
        if !val.is_finite() || val <= 0.0 {
            bail!("uniform velocity must be positive and finite, got {}", val);
        }
        return Ok(Medium::Uniform(val));
    }
    if let Some(path_str) = mode.strip_prefix("velocity-file:") {
        return Ok(Medium::File(PathBuf::from(path_str)));
    }
    bail!(
        "unknown --velocity mode: '{}'. Expected 'uniform:<v>' or 'velocity-file:<path>'",
        mode
    );
}

fn load_config(path: Option<&Path>) -> Result<WaveConfig> {
    match path {
        Some(p) => WaveConfig::from_file(p)
            .with_context(|| format!("failed to load config '{}'", p.display())),
        None => Ok(WaveConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("acoustic_fdtd=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    let medium = cli.velocity.as_deref().map(parse_medium).transpose()?;
    if let Some(Medium::Uniform(v)) = &medium {
        config.velocity = *v;
    }

    let iterations = config.iterations(cli.time_ms);
    info!(rows = cli.rows, cols = cli.cols, iterations, "starting run");

    let mut solver =
        WaveSolver::new(cli.rows, cli.cols, config).map_err(|e| anyhow!("{}", e))?;
    if let Some(Medium::File(path)) = &medium {
        let velocity =
            io::load_velocity(path, cli.rows, cli.cols).map_err(|e| anyhow!("{}", e))?;
        solver = solver
            .with_velocity_field(&velocity)
            .map_err(|e| anyhow!("{}", e))?;
    }
    if let Some(threads) = cli.threads {
        solver = solver.with_threads(threads);
    }

    solver.inject_source().map_err(|e| anyhow!("{}", e))?;
    solver.run(iterations).map_err(|e| anyhow!("{}", e))?;

    let format = FileFormat::from(cli.format);
    let output = cli
        .output_dir
        .join(io::output_file_name(cli.rows, cli.cols, cli.time_ms, format));
    solver.save(&output).map_err(|e| anyhow!("{}", e))?;
    info!(path = %output.display(), "wavefield written");

    Ok(())
}
