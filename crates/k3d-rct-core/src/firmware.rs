//! Target firmware selection
//!
//! The generated toolpath is firmware neutral except for the pressure
//! advance command injected into the preamble.

use crate::error::ProfileError;
use crate::units::format_rounded;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Printer firmware the G-code is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirmwareKind {
    /// Marlin, linear advance via `M900`
    #[default]
    Marlin,
    /// Klipper, pressure advance via `SET_PRESSURE_ADVANCE`
    Klipper,
    /// RepRapFirmware, pressure advance via `M572`
    #[serde(rename = "rrf", alias = "reprapfirmware")]
    RepRapFirmware,
}

impl FirmwareKind {
    /// All supported firmware kinds.
    pub const ALL: [FirmwareKind; 3] = [
        FirmwareKind::Marlin,
        FirmwareKind::Klipper,
        FirmwareKind::RepRapFirmware,
    ];

    /// Pressure/linear advance command for factor `k`, rounded to 3 decimals.
    pub fn pressure_advance_command(self, k: f64) -> String {
        let k = format_rounded(k, 3);
        match self {
            Self::Marlin => format!("M900 K{}", k),
            Self::Klipper => format!("SET_PRESSURE_ADVANCE ADVANCE={}", k),
            Self::RepRapFirmware => format!("M572 D0 S{}", k),
        }
    }
}

impl fmt::Display for FirmwareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marlin => write!(f, "Marlin"),
            Self::Klipper => write!(f, "Klipper"),
            Self::RepRapFirmware => write!(f, "RepRapFirmware"),
        }
    }
}

impl FromStr for FirmwareKind {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "marlin" => Ok(Self::Marlin),
            "klipper" => Ok(Self::Klipper),
            "rrf" | "reprap" | "reprapfirmware" => Ok(Self::RepRapFirmware),
            _ => Err(ProfileError::UnknownFirmware(s.to_string())),
        }
    }
}
