use crate::templates::{DEFAULT_END_GCODE, DEFAULT_START_GCODE};
use k3d_rct_core::{FirmwareKind, Point3};
use serde::{Deserialize, Serialize};

/// Upper bound of the fan PWM value written with `M106`.
pub const FAN_PWM_MAX: u32 = 255;

/// Everything the generator needs to know about one calibration print.
///
/// Lengths are in millimeters, speeds in mm/s, temperatures in °C.
/// A profile is built once per generation request and never mutated by the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintProfile {
    // Machine
    pub bed_x: f64,
    pub bed_y: f64,
    /// Delta printers have their origin in the middle of the bed.
    pub delta: bool,
    /// Insert `G29` in the preamble.
    pub bed_probe: bool,
    pub firmware: FirmwareKind,

    // Temperatures and cooling
    pub hotend_temperature: u32,
    pub bed_temperature: u32,
    /// Part cooling fan, 0-100 %.
    pub fan_speed_percent: u32,

    // Extrusion
    pub line_width: f64,
    pub first_layer_line_width: f64,
    pub layer_height: f64,
    /// Flow multiplier written with `M221`, percent.
    pub flow_percent: u32,
    /// Pressure advance / linear advance factor.
    pub k_factor: f64,

    // Speeds
    pub print_speed: f64,
    pub first_layer_print_speed: f64,
    pub travel_speed: f64,

    // Retraction ramp
    pub segments: u32,
    pub segment_height: f64,
    pub init_retract_length: f64,
    pub end_retract_length: f64,
    pub init_retract_speed: f64,
    pub end_retract_speed: f64,

    // Placement
    pub tower_spacing: f64,
    pub z_offset: f64,

    // Templates
    pub start_gcode: String,
    pub end_gcode: String,
}

impl Default for PrintProfile {
    fn default() -> Self {
        Self {
            bed_x: 220.0,
            bed_y: 220.0,
            delta: false,
            bed_probe: false,
            firmware: FirmwareKind::Marlin,
            hotend_temperature: 240,
            bed_temperature: 70,
            fan_speed_percent: 50,
            line_width: 0.4,
            first_layer_line_width: 0.5,
            layer_height: 0.2,
            flow_percent: 100,
            k_factor: 0.0,
            print_speed: 60.0,
            first_layer_print_speed: 25.0,
            travel_speed: 150.0,
            segments: 5,
            segment_height: 3.0,
            init_retract_length: 6.0,
            end_retract_length: 1.0,
            init_retract_speed: 45.0,
            end_retract_speed: 25.0,
            tower_spacing: 60.0,
            z_offset: 0.0,
            start_gcode: DEFAULT_START_GCODE.to_string(),
            end_gcode: DEFAULT_END_GCODE.to_string(),
        }
    }
}

impl PrintProfile {
    /// Fan percentage scaled to the 0-255 PWM range used by `M106`.
    pub fn fan_pwm(&self) -> u32 {
        let scaled = (self.fan_speed_percent as f64 * 2.55).round() as u32;
        scaled.min(FAN_PWM_MAX)
    }

    /// Number of whole layers that share one retraction setting.
    pub fn layers_per_segment(&self) -> u32 {
        if self.layer_height <= 0.0 {
            return 0;
        }
        (self.segment_height / self.layer_height) as u32
    }

    /// Bed center at first layer height.
    pub fn bed_center(&self) -> Point3 {
        if self.delta {
            Point3::new(0.0, 0.0, self.layer_height)
        } else {
            Point3::new(self.bed_x / 2.0, self.bed_y / 2.0, self.layer_height)
        }
    }

    /// Centers of the left and right towers.
    pub fn tower_centers(&self) -> (Point3, Point3) {
        let center = self.bed_center();
        let half = self.tower_spacing / 2.0;
        (
            center.translated(-half, 0.0, 0.0),
            center.translated(half, 0.0, 0.0),
        )
    }

    /// Builder-style firmware override.
    pub fn with_firmware(mut self, firmware: FirmwareKind) -> Self {
        self.firmware = firmware;
        self
    }
}
