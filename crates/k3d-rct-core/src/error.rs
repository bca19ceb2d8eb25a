//! Error handling for the retraction calibration generator
//!
//! Provides error types for the two layers that can fail:
//! - G-Code errors (engine preconditions that would make generation meaningless)
//! - Profile errors (host-side validation of user supplied parameters)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code generation error type
///
/// Represents violated preconditions of the toolpath engine. The engine
/// performs no I/O, so these are the only ways generation can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// A parameter makes the toolpath impossible to compute
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        param: String,
        /// Why the value cannot be used.
        reason: String,
    },

    /// A trajectory was expected to hold points but was empty
    #[error("Empty trajectory: {context}")]
    EmptyTrajectory {
        /// Where the empty trajectory was produced.
        context: String,
    },
}

impl GcodeError {
    /// Shorthand for [`GcodeError::InvalidParameter`].
    pub fn invalid(param: impl Into<String>, reason: impl Into<String>) -> Self {
        GcodeError::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }
}

/// Profile validation error type
///
/// Raised by the profile layer before a profile ever reaches the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A numeric value is outside its accepted range
    #[error("Parameter '{field}' out of range: {value} (valid: {min}..{max})")]
    ValueOutOfRange {
        /// The profile field name.
        field: String,
        /// The offending value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// The firmware selector is not one of the supported kinds
    #[error("Unknown firmware: {0}")]
    UnknownFirmware(String),
}

/// Main error type
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code generation error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Profile validation error
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }

    /// Check if this is a profile validation error
    pub fn is_profile_error(&self) -> bool {
        matches!(self, Error::Profile(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
