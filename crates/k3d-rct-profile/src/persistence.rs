//! Profile persistence
//!
//! Loads and saves print profiles as JSON or TOML, chosen by file extension.
//! Profiles are validated on both load and save.

use crate::model::PrintProfile;
use k3d_rct_core::{Error, Result};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "k3d-rct";
const DEFAULT_PROFILE_FILE: &str = "profile.toml";

/// Serialization format of a profile file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Json,
    Toml,
}

impl ProfileFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(Error::other(format!(
                "Profile file must be .json or .toml: {}",
                path.display()
            ))),
        }
    }
}

impl PrintProfile {
    /// Parse a profile from text in the given format, without validating it.
    pub fn from_str_with_format(content: &str, format: ProfileFormat) -> Result<Self> {
        match format {
            ProfileFormat::Json => serde_json::from_str(content)
                .map_err(|e| Error::other(format!("Invalid JSON profile: {}", e))),
            ProfileFormat::Toml => toml::from_str(content)
                .map_err(|e| Error::other(format!("Invalid TOML profile: {}", e))),
        }
    }

    /// Render the profile in the given format.
    pub fn to_string_with_format(&self, format: ProfileFormat) -> Result<String> {
        match format {
            ProfileFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize profile: {}", e))),
            ProfileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize profile: {}", e))),
        }
    }

    /// Load and validate a profile from a `.json` or `.toml` file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = ProfileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let profile = Self::from_str_with_format(&content, format)?;
        profile.validate()?;
        tracing::debug!("Loaded profile from {}", path.display());
        Ok(profile)
    }

    /// Validate and save the profile to a `.json` or `.toml` file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let format = ProfileFormat::from_path(path)?;
        let content = self.to_string_with_format(format)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved profile to {}", path.display());
        Ok(())
    }
}

/// Location of the user's default profile, if a config directory exists.
pub fn default_profile_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(DEFAULT_PROFILE_FILE))
}

/// Load the user's default profile when present, otherwise built-in defaults.
pub fn load_default_profile() -> Result<PrintProfile> {
    match default_profile_path() {
        Some(path) if path.exists() => PrintProfile::load_from_file(&path),
        _ => Ok(PrintProfile::default()),
    }
}
