//! antviz - evaluate a dipole or dipole-array pattern from the command line.
//!
//! Loads the configuration (see `antviz_core::config`), overlays the flags
//! given here, evaluates once and writes the result bundle as JSON.
//!
//! ```text
//! antviz --topology collinear --elements 4 --spacing 0.5
//! antviz -t perpendicular -n 3 --phase -1.57 --surface -o pattern.json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use antviz_core::observe::{init_logging, LogFormat, LogLevel};
use antviz_core::prelude::*;
use antviz_sim::Session;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "antviz", version, about = "Dipole and linear array far-field patterns")]
struct Args {
    /// Configuration file. Falls back to ANTVIZ_CONFIG and the default
    /// search path.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Array topology: single, array, collinear or perpendicular.
    #[arg(short, long)]
    topology: Option<Topology>,

    /// Element length in wavelengths.
    #[arg(short, long, allow_hyphen_values = true)]
    length: Option<f64>,

    /// Element spacing in wavelengths.
    #[arg(short = 'd', long, allow_hyphen_values = true)]
    spacing: Option<f64>,

    /// Progressive phase shift between elements, in radians.
    #[arg(short, long, allow_hyphen_values = true)]
    phase: Option<f64>,

    /// Number of elements.
    #[arg(short = 'n', long)]
    elements: Option<usize>,

    /// Evaluate the 3D surface instead of the planar cuts.
    #[arg(long)]
    surface: bool,

    /// Write JSON here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Log format override (json, pretty, compact).
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Print an example configuration file and exit.
    #[arg(long)]
    example_config: bool,
}

impl Args {
    /// Overlay command-line values on the loaded configuration.
    fn apply_to(&self, config: &mut AntvizConfig) {
        let antenna = &mut config.antenna;
        if let Some(topology) = self.topology {
            antenna.topology = topology;
        }
        if let Some(length) = self.length {
            antenna.length = length;
        }
        if let Some(spacing) = self.spacing {
            antenna.spacing = spacing;
        }
        if let Some(phase) = self.phase {
            antenna.phase_offset = phase;
        }
        if let Some(elements) = self.elements {
            antenna.elements = elements;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }

    fn load_config(&self) -> anyhow::Result<AntvizConfig> {
        let mut config = match self.config {
            Some(ref path) => AntvizConfig::load_from(path)?,
            None => AntvizConfig::load()?,
        };
        self.apply_to(&mut config);
        config.validate()?;
        Ok(config)
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.example_config {
        print!("{}", AntvizConfig::example_yaml());
        return Ok(());
    }

    let config = args.load_config()?;
    init_logging(&config.logging).context("failed to initialise logging")?;
    tracing::info!(antenna = ?config.antenna, surface = args.surface, "evaluating");

    let mut session = Session::new(&config)?;
    if args.surface {
        session.toggle_3d()?;
    }

    let snapshot = session.snapshot();
    let json = if args.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "pattern written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    run(Args::parse())
}
