//! Tower layers
//!
//! Each layer prints two square loops per tower. The first layer of every
//! segment switches to the segment's retraction setting and thickens the
//! wall slightly so segment boundaries are visible on the part.

use crate::emitter::ModalEmitter;
use crate::geometry::{rotate_square_trajectory_cw, square_trajectory, Trajectory};
use crate::retraction::RetractionRamp;
use k3d_rct_core::{format_rounded, GcodeError, Point3};
use k3d_rct_profile::PrintProfile;

/// Nominal tower wall size (mm)
pub const BASE_WALL_WIDTH: f64 = 15.0;
/// Inset of the inner loop, in line widths
pub const INNER_LOOP_INSET: f64 = 2.3;
/// Inset of the outer loop, in line widths
pub const OUTER_LOOP_INSET: f64 = 0.5;
/// Feedrate of the explicit Z move at each layer change (mm/min)
pub const LAYER_CHANGE_FEEDRATE: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TowerSide {
    Left,
    Right,
}

/// Emits the tower layers above the raft
pub struct TowerLayerBuilder<'a> {
    profile: &'a PrintProfile,
    ramp: RetractionRamp,
    left_center: Point3,
    right_center: Point3,
    layers_per_segment: u32,
}

impl<'a> TowerLayerBuilder<'a> {
    pub fn new(profile: &'a PrintProfile, ramp: RetractionRamp) -> Result<Self, GcodeError> {
        let layers_per_segment = profile.layers_per_segment();
        if layers_per_segment == 0 {
            return Err(GcodeError::invalid(
                "segment_height",
                format!(
                    "segment height {} is lower than the layer height {}",
                    profile.segment_height, profile.layer_height
                ),
            ));
        }
        let (left_center, right_center) = profile.tower_centers();
        Ok(Self {
            profile,
            ramp,
            left_center,
            right_center,
            layers_per_segment,
        })
    }

    pub fn layers_per_segment(&self) -> u32 {
        self.layers_per_segment
    }

    /// Tower layers are numbered `1..=layer_count()`; layer 0 is the raft.
    pub fn layer_count(&self) -> u32 {
        (self.ramp.segments() * self.layers_per_segment).saturating_sub(1)
    }

    /// Segment entered at `layer`, if `layer` starts one.
    pub fn segment_starting_at(&self, layer: u32) -> Option<u32> {
        (layer % self.layers_per_segment == 0).then(|| layer / self.layers_per_segment)
    }

    /// Wall size for `layer`: wider by half a line on segment boundaries.
    pub fn wall_width(&self, layer: u32) -> f64 {
        if self.segment_starting_at(layer).is_some() {
            BASE_WALL_WIDTH + self.profile.line_width / 2.0
        } else {
            BASE_WALL_WIDTH
        }
    }

    /// Even layers start on the left tower, odd ones on the right.
    pub fn print_order(layer: u32) -> [TowerSide; 2] {
        if layer % 2 == 0 {
            [TowerSide::Left, TowerSide::Right]
        } else {
            [TowerSide::Right, TowerSide::Left]
        }
    }

    /// Inner then outer loop of one tower at height `z`.
    ///
    /// The right tower starts one corner further along so that its seam
    /// does not line up with the left one.
    pub fn tower_trajectory(
        &self,
        side: TowerSide,
        wall_width: f64,
        z: f64,
    ) -> Result<Trajectory, GcodeError> {
        let lw = self.profile.line_width;
        let center = match side {
            TowerSide::Left => self.left_center,
            TowerSide::Right => self.right_center,
        };
        let mut trajectory = square_trajectory(center, wall_width - INNER_LOOP_INSET * lw, z);
        trajectory.extend(square_trajectory(center, wall_width - OUTER_LOOP_INSET * lw, z));

        match side {
            TowerSide::Left => Ok(trajectory),
            TowerSide::Right => rotate_square_trajectory_cw(&trajectory),
        }
    }

    /// Lines for one tower layer, advancing the emitter by one layer height.
    pub fn build_layer(
        &self,
        emitter: &mut ModalEmitter<'_>,
        layer: u32,
    ) -> Result<Vec<String>, GcodeError> {
        let profile = self.profile;
        let mut lines = Vec::new();

        emitter.advance_z(profile.layer_height);
        let z = emitter.state().position.z;
        lines.push(format!(
            ";layer #{}",
            format_rounded(z / profile.layer_height, 0)
        ));

        match layer {
            1 => lines.push(format!("M106 S{}", profile.fan_pwm() * 2 / 3)),
            2 => lines.push(format!("M106 S{}", profile.fan_pwm())),
            _ => {}
        }

        if let Some(segment) = self.segment_starting_at(layer) {
            let setting = self.ramp.setting(segment);
            tracing::debug!(
                "Layer {}: segment {} retracts {} mm at {} mm/s",
                layer,
                segment,
                setting.length,
                setting.speed
            );
            emitter.set_retraction(setting);
        }
        let wall_width = self.wall_width(layer);

        for (i, side) in Self::print_order(layer).into_iter().enumerate() {
            let trajectory = self.tower_trajectory(side, wall_width, z)?;
            let (first, rest) = trajectory.split_first().ok_or_else(|| {
                GcodeError::EmptyTrajectory {
                    context: format!("layer {layer}"),
                }
            })?;

            lines.extend(emitter.emit_move(*first, 0.0));
            if i == 0 {
                lines.push(emitter.emit_current_z(LAYER_CHANGE_FEEDRATE));
            }
            for point in rest {
                lines.extend(emitter.emit_move(*point, profile.line_width));
            }
        }

        Ok(lines)
    }

    /// Lines for every tower layer, bottom to top.
    pub fn build_all(&self, emitter: &mut ModalEmitter<'_>) -> Result<Vec<String>, GcodeError> {
        let mut lines = Vec::new();
        for layer in 1..=self.layer_count() {
            lines.extend(self.build_layer(emitter, layer)?);
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> PrintProfile {
        PrintProfile {
            bed_x: 220.0,
            bed_y: 220.0,
            line_width: 0.4,
            layer_height: 0.2,
            segment_height: 1.0,
            segments: 3,
            tower_spacing: 60.0,
            fan_speed_percent: 100,
            ..PrintProfile::default()
        }
    }

    fn builder(profile: &PrintProfile) -> TowerLayerBuilder<'_> {
        let ramp = RetractionRamp::from_profile(profile).unwrap();
        TowerLayerBuilder::new(profile, ramp).unwrap()
    }

    #[test]
    fn test_layer_count() {
        let profile = profile();
        let builder = builder(&profile);
        assert_eq!(builder.layers_per_segment(), 5);
        assert_eq!(builder.layer_count(), 14);
    }

    #[test]
    fn test_layer_count_truncates_segment_height() {
        let mut profile = profile();
        profile.segments = 5;
        profile.segment_height = 2.0;
        profile.layer_height = 0.25;
        assert_eq!(builder(&profile).layers_per_segment(), 8);
        assert_eq!(builder(&profile).layer_count(), 39);

        profile.segment_height = 2.1;
        assert_eq!(builder(&profile).layer_count(), 39);
    }

    #[test]
    fn test_segment_boundaries_widen_the_wall() {
        let profile = profile();
        let builder = builder(&profile);
        assert_eq!(builder.segment_starting_at(5), Some(1));
        assert_eq!(builder.segment_starting_at(10), Some(2));
        assert_eq!(builder.segment_starting_at(7), None);
        assert_eq!(builder.wall_width(5), 15.2);
        assert_eq!(builder.wall_width(6), BASE_WALL_WIDTH);
    }

    #[test]
    fn test_print_order_alternates() {
        assert_eq!(
            TowerLayerBuilder::print_order(2),
            [TowerSide::Left, TowerSide::Right]
        );
        assert_eq!(
            TowerLayerBuilder::print_order(3),
            [TowerSide::Right, TowerSide::Left]
        );
    }

    #[test]
    fn test_right_tower_seam_is_rotated() {
        let profile = profile();
        let builder = builder(&profile);
        let left = builder.tower_trajectory(TowerSide::Left, 15.0, 0.4).unwrap();
        let right = builder.tower_trajectory(TowerSide::Right, 15.0, 0.4).unwrap();
        assert_eq!(left.len(), 10);
        assert_eq!(right.len(), 10);

        // Left starts bottom right, right starts bottom left.
        assert!(left[0].x > 80.0 && left[0].y < 110.0);
        assert!(right[0].x < 140.0 && right[0].y < 110.0);
        assert_eq!(right[0].x, 140.0 - (15.0 - 2.3 * 0.4) / 2.0);
    }

    #[test]
    fn test_zero_layers_per_segment_is_rejected() {
        let mut profile = profile();
        profile.segment_height = 0.1;
        let ramp = RetractionRamp::from_profile(&profile).unwrap();
        assert!(TowerLayerBuilder::new(&profile, ramp).is_err());
    }

    #[test]
    fn test_first_layers_set_fan_and_z() {
        let profile = profile();
        let builder = builder(&profile);
        let ramp = RetractionRamp::from_profile(&profile).unwrap();
        let mut emitter = ModalEmitter::new(&profile, ramp.setting(0));
        emitter.emit_set_z(profile.layer_height);

        let layer1 = builder.build_layer(&mut emitter, 1).unwrap();
        assert_eq!(layer1[0], ";layer #2");
        assert_eq!(layer1[1], "M106 S170");
        assert!(layer1.contains(&"G1 Z0.4 F300".to_string()));
        assert_eq!(layer1.iter().filter(|l| l.contains(" Z")).count(), 1);

        let layer2 = builder.build_layer(&mut emitter, 2).unwrap();
        assert_eq!(layer2[1], "M106 S255");

        let layer3 = builder.build_layer(&mut emitter, 3).unwrap();
        assert!(!layer3.iter().any(|l| l.starts_with("M106")));
    }

    #[test]
    fn test_layer_has_one_travel_per_tower() {
        let profile = profile();
        let builder = builder(&profile);
        let ramp = RetractionRamp::from_profile(&profile).unwrap();
        let mut emitter = ModalEmitter::new(&profile, ramp.setting(0));
        emitter.emit_set_z(profile.layer_height);

        let lines = builder.build_layer(&mut emitter, 4).unwrap();
        let retractions = lines
            .iter()
            .filter(|l| l.starts_with("G1 E") && l.contains(" F"))
            .count();
        // Retract plus deretract around each of the two travels.
        assert_eq!(retractions, 4);
        assert!(emitter.diagnostics().is_empty());
    }

    #[test]
    fn test_segment_switch_changes_retraction() {
        let profile = profile();
        let builder = builder(&profile);
        let ramp = RetractionRamp::from_profile(&profile).unwrap();
        let mut emitter = ModalEmitter::new(&profile, ramp.setting(0));
        emitter.emit_set_z(profile.layer_height);

        builder.build_all(&mut emitter).unwrap();
        assert_eq!(emitter.state().retraction, ramp.setting(2));
        let top = profile.layer_height * (builder.layer_count() + 1) as f64;
        assert!((emitter.state().position.z - top).abs() < 1e-9);
    }
}
