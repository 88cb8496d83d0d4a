//! Standalone tile painter binary
//!
//! Run with: tile_painter [assets-dir]

use bevy::asset::{AssetPlugin, UnapprovedPathMode};
use bevy::prelude::*;
use bevy_tile_paint_editor::TilePaintPlugin;

fn main() {
    let mut plugin = TilePaintPlugin::new();
    if let Some(path) = std::env::args().nth(1) {
        plugin = plugin.with_assets_path(path);
    }

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Tile Painter".to_string(),
                        ..default()
                    }),
                    ..default()
                })
                // Pixel-perfect rendering for pixel-art tile sets
                .set(ImagePlugin::default_nearest())
                .set(AssetPlugin {
                    // Tile sets are loaded by absolute path from the assets directory
                    unapproved_path_mode: UnapprovedPathMode::Allow,
                    ..default()
                }),
        )
        .add_plugins(plugin)
        .run();
}
