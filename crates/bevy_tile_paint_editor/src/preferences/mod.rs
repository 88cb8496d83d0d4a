//! Painter preferences persisted between sessions

mod store;

pub use store::{PreferencesError, PreferencesStore};

use bevy::prelude::Resource;
use bevy_tile_paint_core::{GridConfig, PaintMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User-facing painter settings
///
/// Missing fields fall back to their defaults so older preference files keep
/// loading after new settings are added.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterPreferences {
    pub grid: GridConfig,
    pub show_grid: bool,
    /// RGBA, linear
    pub grid_color: [f32; 4],
    pub mode: PaintMode,
    pub last_tileset: Option<String>,
    /// Tile size in pixels used when slicing tile-set images
    pub tile_size: [u32; 2],
    pub group_by_identity: bool,
    /// Image pixels per world unit
    pub pixels_per_unit: f32,
    /// Assets directory used when the plugin is not given one
    pub assets_root: Option<PathBuf>,
}

impl Default for PainterPreferences {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            show_grid: true,
            grid_color: [1.0, 1.0, 1.0, 0.25],
            mode: PaintMode::default(),
            last_tileset: None,
            tile_size: [32, 32],
            group_by_identity: false,
            pixels_per_unit: 32.0,
            assets_root: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let prefs: PainterPreferences =
            serde_json::from_str(r#"{"mode": "Erase", "grid": [0.01, 2.0]}"#).unwrap();

        assert_eq!(prefs.mode, PaintMode::Erase);
        assert_eq!(prefs.grid.cell_size(), [0.05, 2.0]);
        assert!(prefs.show_grid);
        assert_eq!(prefs.tile_size, [32, 32]);
    }
}
