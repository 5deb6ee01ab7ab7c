//! Command-line overrides for the orrery configuration.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Settings that can be overridden from the command line.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    /// Simulated seconds per wall-clock second.
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Seed for initial orbital phases and the asteroid belt.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with the simulation clock paused.
    #[arg(long)]
    pub paused: Option<bool>,

    /// Disable the asteroid belt particle cloud.
    #[arg(long)]
    pub no_belt: bool,

    /// RON body catalog replacing the built-in solar system.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(scale) = args.time_scale {
            self.simulation.time_scale = scale;
        }
        if let Some(seed) = args.seed {
            self.simulation.seed = seed;
        }
        if let Some(paused) = args.paused {
            self.simulation.start_paused = paused;
        }
        if args.no_belt {
            self.belt.enabled = false;
        }
        if let Some(ref path) = args.catalog {
            self.scene.catalog_path = Some(path.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
