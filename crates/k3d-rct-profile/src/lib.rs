//! # K3D RCT Profile
//!
//! The print profile consumed by the toolpath engine: field definitions and
//! defaults, range validation, preamble/postamble templates, and JSON/TOML
//! persistence.

pub mod model;
pub mod persistence;
pub mod templates;
pub mod validation;

pub use model::{PrintProfile, FAN_PWM_MAX};
pub use persistence::{default_profile_path, load_default_profile, ProfileFormat};
pub use templates::{DEFAULT_END_GCODE, DEFAULT_START_GCODE, PLACEHOLDERS};
pub use validation::ProfileResult;
