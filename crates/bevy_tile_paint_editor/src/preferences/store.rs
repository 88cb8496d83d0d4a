//! Where preferences live on disk

use super::PainterPreferences;
use bevy::prelude::Resource;
use directories::ProjectDirs;
use std::io;
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "preferences.json";

#[derive(Debug)]
pub enum PreferencesError {
    Read { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
    Malformed { path: PathBuf, source: serde_json::Error },
    Encode(serde_json::Error),
    /// The platform has no per-user config directory
    Unlocated,
}

impl std::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
            Self::Write { path, source } => {
                write!(f, "cannot write {}: {}", path.display(), source)
            }
            Self::Malformed { path, source } => {
                write!(f, "{} is not valid preferences JSON: {}", path.display(), source)
            }
            Self::Encode(e) => write!(f, "cannot encode preferences: {}", e),
            Self::Unlocated => write!(f, "no config directory for this platform"),
        }
    }
}

impl std::error::Error for PreferencesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Malformed { source, .. } | Self::Encode(source) => Some(source),
            Self::Unlocated => None,
        }
    }
}

/// Backing file for [`PainterPreferences`]
///
/// Resolved once at startup and kept as a resource so every save goes to the
/// file the preferences were read from.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct PreferencesStore {
    path: Option<PathBuf>,
}

impl PreferencesStore {
    /// The per-user preferences file, if the platform has a config directory
    pub fn user() -> Self {
        let path = ProjectDirs::from("com", "bevy_tile_paint", "bevy_tile_paint")
            .map(|dirs| dirs.config_dir().join(FILE_NAME));
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the stored preferences; a file that does not exist yet reads as defaults
    pub fn read(&self) -> Result<PainterPreferences, PreferencesError> {
        let path = self.path.as_ref().ok_or(PreferencesError::Unlocated)?;

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(PainterPreferences::default())
            }
            Err(source) => {
                return Err(PreferencesError::Read {
                    path: path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| PreferencesError::Malformed {
            path: path.clone(),
            source,
        })
    }

    /// Read the stored preferences, falling back to defaults with a warning
    pub fn read_or_default(&self) -> PainterPreferences {
        self.read().unwrap_or_else(|e| {
            bevy::log::warn!("Using default preferences: {}", e);
            PainterPreferences::default()
        })
    }

    pub fn write(&self, preferences: &PainterPreferences) -> Result<(), PreferencesError> {
        let path = self.path.as_ref().ok_or(PreferencesError::Unlocated)?;
        let content =
            serde_json::to_string_pretty(preferences).map_err(PreferencesError::Encode)?;

        let written = match path.parent() {
            Some(dir) => std::fs::create_dir_all(dir).and_then(|_| std::fs::write(path, content)),
            None => std::fs::write(path, content),
        };
        written.map_err(|source| PreferencesError::Write {
            path: path.clone(),
            source,
        })?;

        bevy::log::info!("Saved preferences to {}", path.display());
        Ok(())
    }
}
