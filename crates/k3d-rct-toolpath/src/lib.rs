//! # K3D RCT Toolpath
//!
//! G-code engine for the retraction calibration towers: two square towers
//! on zigzag rafts, printed in segments that each use a different
//! retraction length and speed.
//!
//! - [`geometry`] - square loops, seam rotation and raft paths
//! - [`retraction`] - per-segment retraction ramp
//! - [`emitter`] - modal G-code lines with travel retraction
//! - [`tower`] - tower layer loop
//! - [`assembler`] - complete program, legend and file name
//!
//! The engine performs no I/O and reads no global state; everything it needs
//! comes from the [`PrintProfile`](k3d_rct_profile::PrintProfile) handed to
//! [`RetractionTowerGenerator::new`].

pub mod assembler;
pub mod emitter;
pub mod geometry;
pub mod retraction;
pub mod tower;

pub use assembler::{GeneratedProgram, LegendEntry, RetractionTowerGenerator, GENERATOR_NAME};
pub use emitter::{ModalDiagnostic, ModalEmitter, PrinterState};
pub use geometry::{
    rotate_square_trajectory_cw, square_trajectory, zigzag_raft_trajectory, RaftTrajectory,
    Trajectory,
};
pub use retraction::{RetractionRamp, RetractionSetting};
pub use tower::{TowerLayerBuilder, TowerSide};
