//! Program assembly
//!
//! Sequences a complete calibration print: header and legend comments, the
//! firmware preamble, first layer setup, purge line, rafts, tower layers and
//! the postamble.

use crate::emitter::{ModalDiagnostic, ModalEmitter};
use crate::geometry::{translate_x, zigzag_raft_trajectory, Trajectory};
use crate::retraction::RetractionRamp;
use crate::tower::TowerLayerBuilder;
use k3d_rct_core::{format_fixed, format_rounded, GcodeError, Point3, Result};
use k3d_rct_profile::{templates, PrintProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generator name written at the top of every program
pub const GENERATOR_NAME: &str = "K3D Retraction calibration towers generator";

/// Feedrate of the initial Z correction (mm/min)
const Z_CORRECTION_FEEDRATE: f64 = 450.0;
/// Purge line overhang past each tower along X (mm)
const PURGE_X_MARGIN: f64 = 15.0;
/// Purge line distance in front of the towers (mm)
const PURGE_Y_OFFSET: f64 = 25.0;

/// Retraction values of one segment, as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// 1-based segment number, counted from the bed up.
    pub segment: u32,
    /// Retraction length (mm).
    pub length: f64,
    /// Retraction speed (mm/s).
    pub speed: f64,
}

impl fmt::Display for LegendEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Segment {}: retraction length {} mm, retraction speed {} mm/s",
            self.segment,
            format_fixed(self.length, 2),
            format_fixed(self.speed, 2)
        )
    }
}

/// A generated program and what the host needs to present it
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProgram {
    /// G-code lines without line terminators.
    pub lines: Vec<String>,
    /// One entry per segment, top segment first.
    pub legend: Vec<LegendEntry>,
    /// Suggested file name.
    pub file_name: String,
    /// Absolute extruder position at the end of the print (mm of filament).
    pub filament_used: f64,
    pub diagnostics: Vec<ModalDiagnostic>,
}

impl GeneratedProgram {
    /// The whole document, newline terminated.
    pub fn to_gcode(&self) -> String {
        let mut gcode = self.lines.join("\n");
        gcode.push('\n');
        gcode
    }

    /// Legend rendered one entry per line.
    pub fn legend_text(&self) -> String {
        self.legend
            .iter()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Generator for retraction calibration towers
pub struct RetractionTowerGenerator {
    profile: PrintProfile,
}

impl RetractionTowerGenerator {
    /// Create a generator for `profile`.
    ///
    /// The profile is expected to have passed [`PrintProfile::validate`];
    /// only the preconditions the geometry itself depends on are checked
    /// again during generation.
    pub fn new(profile: PrintProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &PrintProfile {
        &self.profile
    }

    pub fn ramp(&self) -> Result<RetractionRamp> {
        Ok(RetractionRamp::from_profile(&self.profile)?)
    }

    /// Nominal retraction of every segment, top segment first.
    pub fn legend(&self) -> Result<Vec<LegendEntry>> {
        let ramp = self.ramp()?;
        Ok((0..ramp.segments())
            .rev()
            .map(|i| {
                let setting = ramp.nominal(i);
                LegendEntry {
                    segment: i + 1,
                    length: setting.length,
                    speed: setting.speed,
                }
            })
            .collect())
    }

    /// Suggested file name, encoding temperatures and the retraction range.
    pub fn file_name(&self) -> Result<String> {
        let p = &self.profile;
        let ramp = self.ramp()?;
        let last = ramp.final_nominal();
        Ok(format!(
            "K3D_RCT_H{}-B{}_{}-{}mm_{}-{}mms.gcode",
            p.hotend_temperature,
            p.bed_temperature,
            format_rounded(p.init_retract_length, 2),
            format_rounded(last.length, 2),
            format_rounded(p.init_retract_speed, 0),
            format_rounded(last.speed, 2)
        ))
    }

    /// Substitute the `$` placeholders of a start or end template.
    pub fn render_template(&self, template: &str) -> String {
        let p = &self.profile;
        let probe = if p.bed_probe { "G29" } else { "" };
        template
            .replace(
                templates::PLACEHOLDER_PRESSURE_ADVANCE,
                &p.firmware.pressure_advance_command(p.k_factor),
            )
            .replace(templates::PLACEHOLDER_BED_TEMP, &p.bed_temperature.to_string())
            .replace(templates::PLACEHOLDER_HOTEND_TEMP, &p.hotend_temperature.to_string())
            .replace(templates::PLACEHOLDER_BED_PROBE, probe)
            .replace(templates::PLACEHOLDER_FLOW, &p.flow_percent.to_string())
    }

    /// Generate the complete program.
    pub fn generate(&self) -> Result<GeneratedProgram> {
        let p = &self.profile;
        self.check_preconditions()?;

        let ramp = self.ramp()?;
        let towers = TowerLayerBuilder::new(p, ramp)?;
        let legend = self.legend()?;
        let file_name = self.file_name()?;

        let mut lines = self.header(&ramp, &legend);
        lines.extend(self.render_template(&p.start_gcode).lines().map(String::from));
        lines.push("M82".to_string());
        lines.push(format!("M106 S{}", p.fan_pwm() / 3));

        let mut emitter = ModalEmitter::new(p, ramp.setting(0));
        lines.push(emitter.emit_z_move(p.layer_height + p.z_offset, Z_CORRECTION_FEEDRATE));
        lines.push(emitter.emit_set_z(p.layer_height));

        tracing::debug!("Generating purge line");
        lines.extend(self.purge(&mut emitter));

        tracing::debug!("Generating rafts");
        lines.extend(self.rafts(&mut emitter)?);

        tracing::debug!(
            "Generating {} tower layers, {} per segment",
            towers.layer_count(),
            towers.layers_per_segment()
        );
        lines.extend(towers.build_all(&mut emitter)?);

        lines.push(";end gcode".to_string());
        lines.extend(self.render_template(&p.end_gcode).lines().map(String::from));

        let filament_used = emitter.state().extrusion;
        let diagnostics = emitter.diagnostics().to_vec();
        tracing::info!(
            "Generated {} lines, {:.1} mm of filament",
            lines.len(),
            filament_used
        );

        Ok(GeneratedProgram {
            lines,
            legend,
            file_name,
            filament_used,
            diagnostics,
        })
    }

    fn check_preconditions(&self) -> std::result::Result<(), GcodeError> {
        let p = &self.profile;
        let positive = [
            ("line_width", p.line_width),
            ("first_layer_line_width", p.first_layer_line_width),
            ("layer_height", p.layer_height),
            ("segment_height", p.segment_height),
        ];
        for (param, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(GcodeError::invalid(
                    param,
                    format!("must be greater than 0, got {value}"),
                ));
            }
        }
        Ok(())
    }

    fn header(&self, ramp: &RetractionRamp, legend: &[LegendEntry]) -> Vec<String> {
        let p = &self.profile;
        let mut lines = vec![
            format!("; generated by {} v{}", GENERATOR_NAME, env!("CARGO_PKG_VERSION")),
            format!(
                ";Bedsize: {}:{}",
                format_fixed(p.bed_x, 6),
                format_fixed(p.bed_y, 6)
            ),
            format!(";Temp: {}/{}", p.hotend_temperature, p.bed_temperature),
            format!(
                ";Width: {}-{}",
                format_fixed(p.line_width, 6),
                format_fixed(p.first_layer_line_width, 6)
            ),
            format!(";Layer height: {}", format_fixed(p.layer_height, 6)),
            format!(
                ";Retract length: {}, -{}/segment",
                format_fixed(p.init_retract_length, 6),
                format_fixed(ramp.length_delta(), 6)
            ),
            format!(
                ";Retract speed: {}, -{}/segment",
                format_fixed(p.init_retract_speed, 6),
                format_fixed(ramp.speed_delta(), 6)
            ),
            format!(
                ";Segments: {}x{} mm",
                p.segments,
                format_fixed(p.segment_height, 6)
            ),
        ];
        lines.extend(legend.iter().map(|entry| format!(";{}", entry)));
        lines
    }

    fn purge(&self, emitter: &mut ModalEmitter<'_>) -> Vec<String> {
        let p = &self.profile;
        let (left, right) = p.tower_centers();

        let start = Point3::new(
            left.x - PURGE_X_MARGIN,
            left.y - PURGE_Y_OFFSET,
            p.layer_height,
        );
        let far = Point3::new(right.x + PURGE_X_MARGIN, start.y, start.z);
        let far_back = far.translated(0.0, p.first_layer_line_width, 0.0);
        let end = Point3::new(start.x, far_back.y, start.z);

        let mut lines = emitter.emit_move(start, 0.0);
        for point in [far, far_back, end] {
            lines.extend(emitter.emit_move(point, p.first_layer_line_width));
        }
        lines
    }

    fn rafts(&self, emitter: &mut ModalEmitter<'_>) -> Result<Vec<String>> {
        let p = &self.profile;
        let (left, _) = p.tower_centers();
        let z = emitter.state().position.z;

        let raft = zigzag_raft_trajectory(left, p.first_layer_line_width, z)?;
        tracing::debug!(
            "Raft: {} points per side, corrected line width {:.4}",
            raft.points_per_side,
            raft.line_width
        );

        let mut lines = print_path(emitter, &raft.points, raft.line_width)?;
        let right = translate_x(&raft.points, p.tower_spacing);
        lines.extend(print_path(emitter, &right, raft.line_width)?);
        Ok(lines)
    }
}

/// Travel to the first point of `path` and extrude through the rest.
fn print_path(
    emitter: &mut ModalEmitter<'_>,
    path: &Trajectory,
    width: f64,
) -> std::result::Result<Vec<String>, GcodeError> {
    let (first, rest) = path.split_first().ok_or_else(|| GcodeError::EmptyTrajectory {
        context: "raft".to_string(),
    })?;
    let mut lines = emitter.emit_move(*first, 0.0);
    for point in rest {
        lines.extend(emitter.emit_move(*point, width));
    }
    Ok(lines)
}
