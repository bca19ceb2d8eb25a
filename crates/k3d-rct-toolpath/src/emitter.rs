//! Modal G-code emitter
//!
//! Tracks what the printer currently believes (position, extruder position,
//! feedrate, retraction state) and emits only the words that change. Every
//! XY travel is wrapped in a retraction and a deretraction using the setting
//! of the current segment.
//!
//! Lines are returned without a trailing newline; the assembler joins them.

use crate::retraction::RetractionSetting;
use k3d_rct_core::{format_rounded, mm_per_min_to_mm_per_sec, mm_per_sec_to_mm_per_min, Point3};
use k3d_rct_profile::PrintProfile;
use std::f64::consts::PI;
use std::fmt;

/// Filament diameter the extrusion amounts are computed for (mm)
pub const FILAMENT_DIAMETER: f64 = 1.75;

/// Extruding moves at or below this XY length carry no `E` word (mm)
pub const MIN_EXTRUSION_DISTANCE: f64 = 0.8;

const XY_DECIMALS: u32 = 2;
const Z_DECIMALS: u32 = 2;
const E_DECIMALS: u32 = 4;
const RETRACT_E_DECIMALS: u32 = 2;

/// What the printer is assumed to be doing after the last emitted line
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterState {
    pub position: Point3,
    /// Absolute extruder position (mm of filament).
    pub extrusion: f64,
    /// Active feedrate (mm/s).
    pub feedrate: f64,
    pub retracted: bool,
    /// Retraction applied around travels.
    pub retraction: RetractionSetting,
}

/// A retraction request that did not match the tracked state
///
/// Generation continues without the offending line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalDiagnostic {
    RetractWhileRetracted,
    DeretractWhileNotRetracted,
}

impl fmt::Display for ModalDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RetractWhileRetracted => {
                write!(f, "retraction requested while already retracted")
            }
            Self::DeretractWhileNotRetracted => {
                write!(f, "deretraction requested while not retracted")
            }
        }
    }
}

/// Stateful line emitter for one program
pub struct ModalEmitter<'a> {
    profile: &'a PrintProfile,
    state: PrinterState,
    diagnostics: Vec<ModalDiagnostic>,
}

impl<'a> ModalEmitter<'a> {
    /// Start at the origin with the extruder zeroed and the first layer
    /// speed active.
    pub fn new(profile: &'a PrintProfile, retraction: RetractionSetting) -> Self {
        Self {
            profile,
            state: PrinterState {
                position: Point3::default(),
                extrusion: 0.0,
                feedrate: profile.first_layer_print_speed,
                retracted: false,
                retraction,
            },
            diagnostics: Vec::new(),
        }
    }

    pub fn state(&self) -> &PrinterState {
        &self.state
    }

    pub fn diagnostics(&self) -> &[ModalDiagnostic] {
        &self.diagnostics
    }

    pub fn set_retraction(&mut self, retraction: RetractionSetting) {
        self.state.retraction = retraction;
    }

    /// Filament needed for an extruded line of `distance` mm.
    pub fn extrusion_for(&self, distance: f64, width: f64) -> f64 {
        width * self.profile.layer_height * distance * 4.0 / PI / FILAMENT_DIAMETER.powi(2)
    }

    /// Move to `target`, extruding a line `extrusion_width` wide, or
    /// travelling when the width is zero.
    ///
    /// Returns no lines when nothing would change.
    pub fn emit_move(&mut self, target: Point3, extrusion_width: f64) -> Vec<String> {
        let start = self.state.position;
        let extruding = extrusion_width > 0.0;

        let mut words = Vec::new();
        if target.x != start.x {
            words.push(format!("X{}", format_rounded(target.x, XY_DECIMALS)));
        }
        if target.y != start.y {
            words.push(format!("Y{}", format_rounded(target.y, XY_DECIMALS)));
        }

        let mut new_extrusion = None;
        if target.z != start.z {
            words.push(format!("Z{}", format_rounded(target.z, Z_DECIMALS)));
        } else if extruding {
            let distance = start.xy_distance(&target);
            if distance > MIN_EXTRUSION_DISTANCE {
                let e = self.state.extrusion + self.extrusion_for(distance, extrusion_width);
                words.push(format!("E{}", format_rounded(e, E_DECIMALS)));
                new_extrusion = Some(e);
            }
        }

        if words.is_empty() {
            return Vec::new();
        }

        let mut lines = Vec::with_capacity(3);
        let travel = !extruding && !start.same_xy(&target);
        if travel {
            lines.extend(self.retract());
        }

        let feedrate = if extruding {
            if start.z < self.profile.layer_height * 2.0 {
                Some(self.profile.first_layer_print_speed)
            } else if self.state.feedrate != self.profile.print_speed {
                Some(self.profile.print_speed)
            } else {
                None
            }
        } else if self.state.feedrate != self.profile.travel_speed {
            Some(self.profile.travel_speed)
        } else {
            None
        };
        if let Some(speed) = feedrate {
            words.push(format!(
                "F{}",
                format_rounded(mm_per_sec_to_mm_per_min(speed), 0)
            ));
            self.state.feedrate = speed;
        }

        lines.push(format!("G1 {}", words.join(" ")));
        self.state.position = target;
        if let Some(e) = new_extrusion {
            self.state.extrusion = e;
        }

        if travel {
            lines.extend(self.deretract());
        }
        lines
    }

    /// Pull the filament back by the current retraction length.
    pub fn retract(&mut self) -> Option<String> {
        if self.state.retracted {
            tracing::warn!("{}", ModalDiagnostic::RetractWhileRetracted);
            self.diagnostics.push(ModalDiagnostic::RetractWhileRetracted);
            return None;
        }
        let RetractionSetting { length, speed } = self.state.retraction;
        self.state.retracted = true;
        self.state.feedrate = speed;
        Some(format!(
            "G1 E{} F{}",
            format_rounded(self.state.extrusion - length, RETRACT_E_DECIMALS),
            format_rounded(mm_per_sec_to_mm_per_min(speed), 0)
        ))
    }

    /// Push the filament back to the tracked extruder position.
    pub fn deretract(&mut self) -> Option<String> {
        if !self.state.retracted {
            tracing::warn!("{}", ModalDiagnostic::DeretractWhileNotRetracted);
            self.diagnostics.push(ModalDiagnostic::DeretractWhileNotRetracted);
            return None;
        }
        let speed = self.state.retraction.speed;
        self.state.retracted = false;
        self.state.feedrate = speed;
        Some(format!(
            "G1 E{} F{}",
            format_rounded(self.state.extrusion, RETRACT_E_DECIMALS),
            format_rounded(mm_per_sec_to_mm_per_min(speed), 0)
        ))
    }

    /// Raise the tracked Z without emitting anything.
    ///
    /// The next [`ModalEmitter::emit_current_z`] sends the printer there.
    pub fn advance_z(&mut self, dz: f64) {
        self.state.position.z += dz;
    }

    /// Explicit Z move to the tracked height at `feedrate` mm/min.
    pub fn emit_current_z(&mut self, feedrate: f64) -> String {
        self.emit_z_move(self.state.position.z, feedrate)
    }

    /// Explicit Z move at `feedrate` mm/min, always emitted.
    pub fn emit_z_move(&mut self, z: f64, feedrate: f64) -> String {
        self.state.position.z = z;
        self.state.feedrate = mm_per_min_to_mm_per_sec(feedrate);
        format!(
            "G1 Z{} F{}",
            format_rounded(z, Z_DECIMALS),
            format_rounded(feedrate, 0)
        )
    }

    /// Redefine the current Z without moving (`G92`).
    pub fn emit_set_z(&mut self, z: f64) -> String {
        self.state.position.z = z;
        format!("G92 Z{}", format_rounded(z, Z_DECIMALS))
    }
}
