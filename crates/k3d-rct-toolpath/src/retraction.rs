//! Retraction ramp
//!
//! Linear interpolation of retraction length and speed across the tower
//! segments. Segment 0 is printed with the initial values, the last segment
//! with the end values.

use k3d_rct_core::GcodeError;
use k3d_rct_profile::PrintProfile;
use serde::{Deserialize, Serialize};

/// Shortest retraction the printer is ever asked for (mm)
pub const MIN_RETRACT_LENGTH: f64 = 0.1;
/// Slowest retraction the printer is ever asked for (mm/s)
pub const MIN_RETRACT_SPEED: f64 = 5.0;

/// Retraction length (mm) and speed (mm/s) for one segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetractionSetting {
    pub length: f64,
    pub speed: f64,
}

/// Per-segment retraction values between an initial and an end setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetractionRamp {
    init: RetractionSetting,
    length_delta: f64,
    speed_delta: f64,
    segments: u32,
}

impl RetractionRamp {
    /// Build a ramp over `segments` segments. At least two are required.
    pub fn new(
        init_length: f64,
        end_length: f64,
        init_speed: f64,
        end_speed: f64,
        segments: u32,
    ) -> Result<Self, GcodeError> {
        if segments < 2 {
            return Err(GcodeError::invalid(
                "segments",
                format!("at least 2 segments are needed, got {segments}"),
            ));
        }
        let steps = (segments - 1) as f64;
        Ok(Self {
            init: RetractionSetting {
                length: init_length,
                speed: init_speed,
            },
            length_delta: (init_length - end_length) / steps,
            speed_delta: (init_speed - end_speed) / steps,
            segments,
        })
    }

    pub fn from_profile(profile: &PrintProfile) -> Result<Self, GcodeError> {
        Self::new(
            profile.init_retract_length,
            profile.end_retract_length,
            profile.init_retract_speed,
            profile.end_retract_speed,
            profile.segments,
        )
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Length removed per segment; negative when the ramp increases.
    pub fn length_delta(&self) -> f64 {
        self.length_delta
    }

    /// Speed removed per segment; negative when the ramp increases.
    pub fn speed_delta(&self) -> f64 {
        self.speed_delta
    }

    /// Interpolated value for `segment`, without the printer floor applied.
    ///
    /// This is what the legend reports.
    pub fn nominal(&self, segment: u32) -> RetractionSetting {
        let i = segment as f64;
        RetractionSetting {
            length: self.init.length - self.length_delta * i,
            speed: self.init.speed - self.speed_delta * i,
        }
    }

    /// Value actually sent to the printer for `segment`.
    pub fn setting(&self, segment: u32) -> RetractionSetting {
        let nominal = self.nominal(segment);
        RetractionSetting {
            length: nominal.length.max(MIN_RETRACT_LENGTH),
            speed: nominal.speed.max(MIN_RETRACT_SPEED),
        }
    }

    /// Nominal setting of the last segment.
    pub fn final_nominal(&self) -> RetractionSetting {
        self.nominal(self.segments - 1)
    }
}
