//! # K3D RCT Core
//!
//! Core types and utilities shared by the retraction calibration crates.
//! Provides the point type used by every trajectory, the firmware selector,
//! the number formatting rules for emitted G-code, and the error taxonomy.

pub mod error;
pub mod firmware;
pub mod point;
pub mod units;

pub use error::{Error, GcodeError, ProfileError, Result};
pub use firmware::FirmwareKind;
pub use point::Point3;
pub use units::{
    format_fixed, format_rounded, mm_per_min_to_mm_per_sec, mm_per_sec_to_mm_per_min, parse_decimal,
    parse_integer, round_to,
};
