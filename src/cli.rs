//! Command line interface
//!
//! Argument definitions and the commands behind them. `main.rs` only parses
//! and dispatches.

use crate::{FirmwareKind, GeneratedProgram, PrintProfile, RetractionTowerGenerator};
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use k3d_rct_core::{parse_decimal, parse_integer};
use std::path::{Path, PathBuf};

/// Generates G-code for retraction calibration towers.
#[derive(Parser, Debug)]
#[command(
    name = "k3d-rct",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")")
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the calibration G-code.
    Generate(GenerateArgs),
    /// Print the retraction settings of each segment.
    Legend(ProfileArgs),
    /// Write the default profile to a `.toml` or `.json` file.
    InitProfile {
        /// File to create.
        file: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Where the profile comes from, plus command line overrides.
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    /// Profile file (`.toml` or `.json`).
    ///
    /// Without it, the profile in the user config directory is used when
    /// present, built-in defaults otherwise.
    #[arg(short, long)]
    pub profile: Option<PathBuf>,
    /// Target firmware: marlin, klipper or rrf.
    #[arg(long)]
    pub firmware: Option<FirmwareKind>,
    /// Hotend temperature (°C).
    #[arg(long, value_parser = parse_whole)]
    pub hotend_temperature: Option<u32>,
    /// Bed temperature (°C).
    #[arg(long, value_parser = parse_whole)]
    pub bed_temperature: Option<u32>,
    /// Number of tower segments.
    #[arg(long, value_parser = parse_whole)]
    pub segments: Option<u32>,
    /// Retraction length of the bottom segment (mm).
    #[arg(long, value_parser = parse_decimal)]
    pub init_retract_length: Option<f64>,
    /// Retraction length of the top segment (mm).
    #[arg(long, value_parser = parse_decimal)]
    pub end_retract_length: Option<f64>,
    /// Retraction speed of the bottom segment (mm/s).
    #[arg(long, value_parser = parse_decimal)]
    pub init_retract_speed: Option<f64>,
    /// Retraction speed of the top segment (mm/s).
    #[arg(long, value_parser = parse_decimal)]
    pub end_retract_speed: Option<f64>,
    /// Pressure / linear advance factor.
    #[arg(long, value_parser = parse_decimal)]
    pub k_factor: Option<f64>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
    /// Output directory or `.gcode` file. Defaults to the current directory.
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,
    /// Write the G-code to stdout instead of a file.
    #[arg(long)]
    pub stdout: bool,
}

fn parse_whole(input: &str) -> Result<u32, String> {
    let value = parse_integer(input)?;
    u32::try_from(value).map_err(|_| format!("{} is not a positive number", value))
}

impl ProfileArgs {
    /// Load the profile, apply overrides and validate the result.
    pub fn resolve(&self) -> anyhow::Result<PrintProfile> {
        let mut profile = match &self.profile {
            Some(path) => PrintProfile::load_from_file(path)
                .with_context(|| format!("Failed to load profile {}", path.display()))?,
            None => k3d_rct_profile::load_default_profile()
                .context("Failed to load the default profile")?,
        };

        if let Some(firmware) = self.firmware {
            profile.firmware = firmware;
        }
        if let Some(v) = self.hotend_temperature {
            profile.hotend_temperature = v;
        }
        if let Some(v) = self.bed_temperature {
            profile.bed_temperature = v;
        }
        if let Some(v) = self.segments {
            profile.segments = v;
        }
        if let Some(v) = self.init_retract_length {
            profile.init_retract_length = v;
        }
        if let Some(v) = self.end_retract_length {
            profile.end_retract_length = v;
        }
        if let Some(v) = self.init_retract_speed {
            profile.init_retract_speed = v;
        }
        if let Some(v) = self.end_retract_speed {
            profile.end_retract_speed = v;
        }
        if let Some(v) = self.k_factor {
            profile.k_factor = v;
        }

        profile.validate().context("Invalid profile")?;
        Ok(profile)
    }
}

/// Path the program is written to for a given `--output` value.
///
/// A path ending in `.gcode` is used as is; anything else is treated as a
/// directory that receives the suggested file name.
pub fn output_path(output: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        Some(path)
            if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("gcode")) =>
        {
            path.to_path_buf()
        }
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let profile = args.profile.resolve()?;
    tracing::info!(
        "Generating {} segments for {}",
        profile.segments,
        profile.firmware
    );
    let program = RetractionTowerGenerator::new(profile)
        .generate()
        .context("G-code generation failed")?;

    for entry in &program.legend {
        tracing::info!("{}", entry);
    }
    if !program.diagnostics.is_empty() {
        tracing::warn!(
            "{} retraction requests were skipped",
            program.diagnostics.len()
        );
    }

    if args.stdout {
        print!("{}", program.to_gcode());
        return Ok(());
    }

    let path = output_path(args.output.as_deref(), &program.file_name);
    write_program(&program, &path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

fn write_program(program: &GeneratedProgram, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, program.to_gcode())
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub fn run_legend(args: &ProfileArgs) -> anyhow::Result<()> {
    let profile = args.resolve()?;
    let legend = RetractionTowerGenerator::new(profile).legend()?;
    for entry in legend {
        println!("{}", entry);
    }
    Ok(())
}

pub fn run_init_profile(file: &Path, force: bool) -> anyhow::Result<()> {
    if file.exists() && !force {
        bail!(
            "{} already exists, use --force to overwrite it",
            file.display()
        );
    }
    PrintProfile::default()
        .save_to_file(file)
        .with_context(|| format!("Failed to write profile {}", file.display()))?;
    tracing::info!("Wrote default profile to {}", file.display());
    Ok(())
}
