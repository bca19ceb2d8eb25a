//! Geometry primitives
//!
//! Builds the point sequences the printer follows: the closed square used for
//! every tower wall loop, the seam rotation applied to the right hand tower,
//! and the zigzag raft under each tower.
//!
//! The index arithmetic here decides where seams and infill turns land on the
//! printed part, so the point ordering is part of the contract.

use k3d_rct_core::{GcodeError, Point3};
use std::f64::consts::SQRT_2;

/// An ordered pass over the bed, consumed front to back.
pub type Trajectory = Vec<Point3>;

/// Points in one closed square: four corners plus the first corner again.
pub const SQUARE_POINTS: usize = 5;

/// Outer side length of the raft under each tower.
pub const RAFT_SIZE: f64 = 30.0;

/// Closed square of side `size` centered on `center`, at height `z`.
///
/// Traversed clockwise from the bottom right corner:
///
/// ```text
/// 2----3
/// |    |
/// 1---0,4
/// ```
pub fn square_trajectory(center: Point3, size: f64, z: f64) -> Trajectory {
    let half = size / 2.0;
    let bottom_right = Point3::new(center.x + half, center.y - half, z);
    let bottom_left = Point3::new(center.x - half, bottom_right.y, z);
    let top_left = Point3::new(bottom_left.x, center.y + half, z);
    let top_right = Point3::new(bottom_right.x, top_left.y, z);

    vec![bottom_right, bottom_left, top_left, top_right, bottom_right]
}

/// Advance the starting corner of every closed square by one step.
///
/// `trajectory` must be a concatenation of closed squares as produced by
/// [`square_trajectory`]. Each group of five is handled on its own: every
/// point takes the value of its successor, and the closing point of a group
/// takes the group's second point, which re-closes the loop on the new start.
pub fn rotate_square_trajectory_cw(trajectory: &[Point3]) -> Result<Trajectory, GcodeError> {
    if trajectory.is_empty() || trajectory.len() % SQUARE_POINTS != 0 {
        return Err(GcodeError::invalid(
            "trajectory",
            format!(
                "rotation needs whole squares of {} points, got {}",
                SQUARE_POINTS,
                trajectory.len()
            ),
        ));
    }

    let rotated = (0..trajectory.len())
        .map(|i| {
            if (i + 1) % SQUARE_POINTS == 0 {
                trajectory[i - 3]
            } else {
                trajectory[i + 1]
            }
        })
        .collect();
    Ok(rotated)
}

/// Shift every point of a trajectory by `dx` along X.
pub fn translate_x(trajectory: &[Point3], dx: f64) -> Trajectory {
    trajectory
        .iter()
        .map(|p| p.translated(dx, 0.0, 0.0))
        .collect()
}

/// Raft infill path together with the line width it was laid out for.
#[derive(Debug, Clone, PartialEq)]
pub struct RaftTrajectory {
    pub points: Trajectory,
    /// Boundary points on one side of the raft, always odd.
    pub points_per_side: usize,
    /// Distance between neighbouring boundary points.
    pub point_spacing: f64,
    /// Corrected first layer line width, `point_spacing / √2`.
    ///
    /// The raft must be printed with this width rather than the requested
    /// one, so that the diagonal infill lines evenly fill the square.
    pub line_width: f64,
}

/// Zigzag raft around `center`, filling a [`RAFT_SIZE`] square with lines at 45°.
///
/// Boundary points are laid out on the square inset by half a line, walking
/// clockwise from the (min X, max Y) corner, then visited in an order that
/// alternates between short hops along the boundary and diagonal strokes
/// across the square.
pub fn zigzag_raft_trajectory(
    center: Point3,
    line_width: f64,
    z: f64,
) -> Result<RaftTrajectory, GcodeError> {
    if line_width <= 0.0 || line_width >= RAFT_SIZE {
        return Err(GcodeError::invalid(
            "first_layer_line_width",
            format!("raft line width must be in (0, {RAFT_SIZE}), got {line_width}"),
        ));
    }

    let side_length = RAFT_SIZE - line_width;
    let mut points_per_side = (side_length / (line_width * SQRT_2)) as usize;
    if points_per_side < 3 {
        return Err(GcodeError::invalid(
            "first_layer_line_width",
            format!("raft line width {line_width} leaves fewer than 3 points per side"),
        ));
    }
    points_per_side -= (points_per_side - 1) % 2;

    let n = points_per_side;
    let point_spacing = side_length / (n - 1) as f64;
    let corrected_width = point_spacing / SQRT_2;

    let min_x = center.x - side_length / 2.0;
    let min_y = center.y - side_length / 2.0;
    let max_x = center.x + side_length / 2.0;
    let max_y = center.y + side_length / 2.0;
    let step = |i: usize| point_spacing * i as f64;

    let total = 4 * n - 4;
    let mut boundary = Vec::with_capacity(total);
    for i in 0..n {
        boundary.push(Point3::new(min_x + step(i), max_y, z));
    }
    for i in 1..n {
        boundary.push(Point3::new(max_x, max_y - step(i), z));
    }
    for i in 1..n {
        boundary.push(Point3::new(max_x - step(i), min_y, z));
    }
    for i in 1..n - 1 {
        boundary.push(Point3::new(min_x, min_y + step(i), z));
    }
    debug_assert_eq!(boundary.len(), total);

    let last = total - 1;
    let mut points = Vec::with_capacity(total);
    points.extend([boundary[0], boundary[last], boundary[1], boundary[2]]);
    for i in (4..total).step_by(4) {
        let j = i / 2;
        points.extend([
            boundary[total - j],
            boundary[total - j - 1],
            boundary[j + 1],
            boundary[j + 2],
        ]);
    }

    Ok(RaftTrajectory {
        points,
        points_per_side,
        point_spacing,
        line_width: corrected_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn perimeter(points: &[Point3]) -> f64 {
        points.windows(2).map(|w| w[0].xy_distance(&w[1])).sum()
    }

    fn two_squares() -> Trajectory {
        let center = Point3::new(95.0, 125.0, 0.2);
        let mut trajectory = square_trajectory(center, 14.08, 0.4);
        trajectory.extend(square_trajectory(center, 14.8, 0.4));
        trajectory
    }

    #[test]
    fn test_square_corner_order() {
        let square = square_trajectory(Point3::new(10.0, 20.0, 0.0), 4.0, 0.6);
        assert_eq!(
            square,
            vec![
                Point3::new(12.0, 18.0, 0.6),
                Point3::new(8.0, 18.0, 0.6),
                Point3::new(8.0, 22.0, 0.6),
                Point3::new(12.0, 22.0, 0.6),
                Point3::new(12.0, 18.0, 0.6),
            ]
        );
    }

    #[test]
    fn test_rotation_advances_start_corner() {
        let square = square_trajectory(Point3::new(0.0, 0.0, 0.0), 2.0, 0.2);
        let rotated = rotate_square_trajectory_cw(&square).unwrap();
        assert_eq!(
            rotated,
            vec![square[1], square[2], square[3], square[0], square[1]]
        );
    }

    #[test]
    fn test_rotation_handles_each_square_independently() {
        let trajectory = two_squares();
        let rotated = rotate_square_trajectory_cw(&trajectory).unwrap();
        assert_eq!(&rotated[..5], &rotate_square_trajectory_cw(&trajectory[..5]).unwrap()[..]);
        assert_eq!(&rotated[5..], &rotate_square_trajectory_cw(&trajectory[5..]).unwrap()[..]);
        assert_eq!(rotated[4], rotated[0]);
        assert_eq!(rotated[9], rotated[5]);
    }

    #[test]
    fn test_rotation_has_period_four_on_closed_squares() {
        let original = two_squares();
        let mut trajectory = original.clone();
        for _ in 0..4 {
            trajectory = rotate_square_trajectory_cw(&trajectory).unwrap();
        }
        assert_eq!(trajectory, original);

        // A fifth turn is the same as a single one.
        let fifth = rotate_square_trajectory_cw(&trajectory).unwrap();
        assert_eq!(fifth, rotate_square_trajectory_cw(&original).unwrap());
    }

    #[test]
    fn test_rotation_assumes_closed_groups_of_five() {
        // Open groups lose their first point: the formula only makes sense on
        // the closed squares the tower builder concatenates.
        let open: Trajectory = (0..10).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        let rotated = rotate_square_trajectory_cw(&open).unwrap();
        assert!(!rotated.contains(&open[0]));
        assert!(!rotated.contains(&open[5]));

        assert!(rotate_square_trajectory_cw(&open[..9]).is_err());
        assert!(rotate_square_trajectory_cw(&[]).is_err());
    }

    #[test]
    fn test_translate_x() {
        let square = square_trajectory(Point3::new(0.0, 0.0, 0.0), 2.0, 0.2);
        let moved = translate_x(&square, 60.0);
        assert_eq!(moved[0], Point3::new(61.0, -1.0, 0.2));
        assert_eq!(square[0], Point3::new(1.0, -1.0, 0.2));
    }

    #[test]
    fn test_zigzag_corrects_line_width() {
        let raft = zigzag_raft_trajectory(Point3::new(95.0, 125.0, 0.2), 0.5, 0.2).unwrap();
        // (30 - 0.5) / (0.5 * √2) = 41.7 -> 41 points, already odd
        assert_eq!(raft.points_per_side, 41);
        assert!((raft.point_spacing - 29.5 / 40.0).abs() < EPS);
        assert!((raft.line_width - 29.5 / 40.0 / SQRT_2).abs() < EPS);
        assert_eq!(raft.points.len(), 4 * 41 - 4);
    }

    #[test]
    fn test_zigzag_forces_odd_point_count() {
        // (30 - 0.4) / (0.4 * √2) = 52.3 -> 52, forced down to 51
        let raft = zigzag_raft_trajectory(Point3::new(0.0, 0.0, 0.0), 0.4, 0.2).unwrap();
        assert_eq!(raft.points_per_side, 51);
    }

    #[test]
    fn test_zigzag_starts_in_corner_and_hops_down() {
        let raft = zigzag_raft_trajectory(Point3::new(100.0, 100.0, 0.0), 0.5, 0.3).unwrap();
        let half = (RAFT_SIZE - 0.5) / 2.0;
        let first = raft.points[0];
        assert_eq!(first, Point3::new(100.0 - half, 100.0 + half, 0.3));
        let second = raft.points[1];
        assert!((second.x - first.x).abs() < EPS);
        assert!((first.y - second.y - raft.point_spacing).abs() < EPS);
        assert!(raft.points.iter().all(|p| p.z == 0.3));
    }

    #[test]
    fn test_zigzag_rejects_unusable_width() {
        assert!(zigzag_raft_trajectory(Point3::default(), 0.0, 0.2).is_err());
        assert!(zigzag_raft_trajectory(Point3::default(), 12.0, 0.2).is_err());
    }

    proptest! {
        #[test]
        fn prop_square_is_closed_with_expected_perimeter(
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
            size in 0.1f64..100.0,
        ) {
            let square = square_trajectory(Point3::new(x, y, 0.0), size, 0.2);
            prop_assert_eq!(square.len(), SQUARE_POINTS);
            prop_assert_eq!(square[4], square[0]);
            prop_assert!((perimeter(&square) - 4.0 * size).abs() < 1e-6);
        }

        #[test]
        fn prop_zigzag_visits_every_boundary_point_once(width in 0.1f64..2.0) {
            let raft = zigzag_raft_trajectory(Point3::new(110.0, 110.0, 0.0), width, 0.2).unwrap();
            let n = raft.points_per_side;
            prop_assert_eq!(n % 2, 1);
            prop_assert_eq!(raft.points.len(), 4 * n - 4);

            for (i, a) in raft.points.iter().enumerate() {
                for b in &raft.points[i + 1..] {
                    prop_assert!(a.xy_distance(b) > raft.point_spacing / 2.0);
                }
            }
        }

        #[test]
        fn prop_zigzag_alternates_hops_and_diagonals(width in 0.1f64..2.0) {
            let raft = zigzag_raft_trajectory(Point3::new(0.0, 0.0, 0.0), width, 0.2).unwrap();
            for (i, pair) in raft.points.windows(2).enumerate() {
                let dx = (pair[1].x - pair[0].x).abs();
                let dy = (pair[1].y - pair[0].y).abs();
                if i % 2 == 0 {
                    // Hop between neighbouring boundary points.
                    let hop = pair[0].xy_distance(&pair[1]);
                    prop_assert!((hop - raft.point_spacing).abs() < 1e-6);
                    prop_assert!(hop <= raft.point_spacing * SQRT_2 + 1e-9);
                } else {
                    // Infill stroke at 45°.
                    prop_assert!((dx - dy).abs() < 1e-6);
                    prop_assert!(dx > 0.0);
                }
            }
        }
    }
}
