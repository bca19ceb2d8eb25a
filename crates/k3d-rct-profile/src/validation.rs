//! Range checks for print profiles
//!
//! These mirror the limits a user can enter for each field. The engine
//! assumes a profile that passed [`PrintProfile::validate`].

use crate::model::PrintProfile;
use k3d_rct_core::ProfileError;

/// Result type alias for profile validation.
pub type ProfileResult<T> = Result<T, ProfileError>;

fn check_range(field: &str, value: f64, min: f64, max: f64) -> ProfileResult<()> {
    if value.is_nan() || value < min || value > max {
        return Err(ProfileError::ValueOutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl PrintProfile {
    /// Validate every field, reporting the first violation.
    ///
    /// Dependent limits are checked after the fields they depend on: layer
    /// height against line width, tower spacing against bed width, Z offset
    /// against layer height.
    pub fn validate(&self) -> ProfileResult<()> {
        check_range("bed_x", self.bed_x, 100.0, 1000.0)?;
        check_range("bed_y", self.bed_y, 100.0, 1000.0)?;

        check_range(
            "hotend_temperature",
            self.hotend_temperature as f64,
            150.0,
            350.0,
        )?;
        check_range("bed_temperature", self.bed_temperature as f64, 0.0, 150.0)?;
        check_range("fan_speed_percent", self.fan_speed_percent as f64, 0.0, 100.0)?;

        check_range("line_width", self.line_width, 0.1, 2.0)?;
        check_range(
            "first_layer_line_width",
            self.first_layer_line_width,
            0.1,
            2.0,
        )?;
        check_range("layer_height", self.layer_height, 0.05, self.line_width * 0.75)?;

        check_range("print_speed", self.print_speed, 10.0, 1000.0)?;
        check_range(
            "first_layer_print_speed",
            self.first_layer_print_speed,
            10.0,
            1000.0,
        )?;
        check_range("travel_speed", self.travel_speed, 10.0, 1000.0)?;

        check_range("segments", self.segments as f64, 2.0, 100.0)?;
        check_range("init_retract_length", self.init_retract_length, 0.0, 20.0)?;
        check_range("end_retract_length", self.end_retract_length, 0.0, 20.0)?;
        check_range("init_retract_speed", self.init_retract_speed, 5.0, 150.0)?;
        check_range("end_retract_speed", self.end_retract_speed, 5.0, 150.0)?;
        check_range("segment_height", self.segment_height, 0.5, 20.0)?;

        check_range("tower_spacing", self.tower_spacing, 40.0, self.bed_x - 40.0)?;
        check_range(
            "z_offset",
            self.z_offset,
            -self.layer_height,
            self.layer_height,
        )?;
        check_range("flow_percent", self.flow_percent as f64, 50.0, 150.0)?;
        check_range("k_factor", self.k_factor, 0.0, 2.0)?;

        Ok(())
    }

    /// Convenience wrapper around [`PrintProfile::validate`].
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
