//! # K3D RCT
//!
//! Command line generator for retraction calibration towers. Two square
//! towers are printed side by side; each vertical segment uses a different
//! retraction length and speed, so stringing between the towers shows which
//! setting works best.
//!
//! ## Architecture
//!
//! The workspace is organized into multiple crates:
//!
//! 1. **k3d-rct-core** - Point type, firmware selector, number formatting, errors
//! 2. **k3d-rct-profile** - Print profile, validation, templates, persistence
//! 3. **k3d-rct-toolpath** - Geometry, retraction ramp, modal emitter, assembler
//! 4. **k3d-rct** - This binary: profile loading, generation, output

pub mod cli;

pub use k3d_rct_core::{Error, FirmwareKind, GcodeError, Point3, ProfileError, Result};
pub use k3d_rct_profile::{PrintProfile, ProfileFormat};
pub use k3d_rct_toolpath::{GeneratedProgram, LegendEntry, RetractionTowerGenerator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so G-code written to stdout stays clean
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
