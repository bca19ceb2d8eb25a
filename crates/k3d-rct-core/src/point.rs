//! 3D point in millimeters

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in machine coordinates, in millimeters.
///
/// Points have no identity beyond their value. Equality is exact field
/// equality, which is what the modal emitter relies on to decide whether an
/// axis moved.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Same point with a different Z.
    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }

    /// Point shifted by the given offsets.
    pub fn translated(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Euclidean distance in the XY plane, ignoring Z.
    pub fn xy_distance(&self, other: &Point3) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// True when X and Y are identical, so a move between the two only touches Z.
    pub fn same_xy(&self, other: &Point3) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}
