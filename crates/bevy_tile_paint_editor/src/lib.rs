//! Bevy host for the tile painter
//!
//! `TilePaintPlugin` wires [`bevy_tile_paint_core`] into a Bevy app:
//! - mouse input becomes pointer events for a [`PaintSession`]
//! - painted objects are mirrored as Bevy sprites
//! - a gizmo grid overlay follows the configured cell size
//! - an egui side panel edits the mode, grid, tile set, palette and container
//! - tile sets are discovered in `{assets}/tilesets`, templates live in
//!   `{assets}/templates`
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_tile_paint_editor::TilePaintPlugin;
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(TilePaintPlugin::default())
//!     .run();
//! ```

pub mod input;
pub mod library;
pub mod preferences;
pub mod render;
pub mod ui;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_tile_paint_core::{FsTemplateStore, ObjectId, PaintSession};
use std::path::{Path, PathBuf};

use input::{handle_keyboard_shortcuts, handle_viewport_input, ViewportInputState};
use library::{TilesetLibrary, TEMPLATES_FOLDER, TILESETS_FOLDER};
use preferences::{PainterPreferences, PreferencesStore};
use render::PaintRenderPlugin;
use ui::PaintPanelPlugin;

/// Convert a filesystem path into a path string the asset server accepts
pub fn to_asset_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Main plugin for the tile painter
#[derive(Default)]
pub struct TilePaintPlugin {
    /// Custom assets directory path.
    /// If not set, uses the saved preference or `{cwd}/assets`.
    pub assets_path: Option<PathBuf>,
}

impl TilePaintPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.assets_path = Some(path.into());
        self
    }

    fn detect_assets_path(&self, preferences: &PainterPreferences) -> PathBuf {
        if let Some(path) = &self.assets_path {
            return path.clone();
        }
        if let Some(path) = &preferences.assets_root {
            return path.clone();
        }

        std::env::current_dir()
            .map(|p| p.join("assets"))
            .unwrap_or_else(|_| PathBuf::from("assets"))
    }
}

impl Plugin for TilePaintPlugin {
    fn build(&self, app: &mut App) {
        let store = PreferencesStore::user();
        let preferences = store.read_or_default();
        let assets_path = self.detect_assets_path(&preferences);
        bevy::log::info!("TilePaintPlugin: Using assets path: {:?}", assets_path);

        let mut library = TilesetLibrary::new(
            assets_path.join(TILESETS_FOLDER),
            preferences.tile_size,
            preferences.group_by_identity,
        );
        if let Err(e) = library.refresh(preferences.last_tileset.as_deref()) {
            bevy::log::warn!("Could not load tile sets: {}", e);
        }

        let template_store = FsTemplateStore::new(assets_path.join(TEMPLATES_FOLDER));

        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin::default());
        }

        app.add_plugins((PaintRenderPlugin, PaintPanelPlugin))
            .insert_resource(PaintState::new(template_store))
            .insert_resource(library)
            .insert_resource(preferences)
            .insert_resource(store)
            .init_resource::<EditorSelection>()
            .init_resource::<ViewportInputState>()
            .add_systems(Startup, setup_editor_camera)
            .add_systems(
                Update,
                (
                    handle_keyboard_shortcuts,
                    sync_paint_settings,
                    handle_viewport_input,
                )
                    .chain(),
            );
    }
}

/// The painting session driven by viewport input
#[derive(Resource)]
pub struct PaintState {
    pub session: PaintSession<FsTemplateStore>,
}

impl PaintState {
    pub fn new(store: FsTemplateStore) -> Self {
        Self {
            session: PaintSession::new(store),
        }
    }
}

/// The editor's current selection, replaced by Select-mode presses
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSelection(pub Option<ObjectId>);

fn setup_editor_camera(
    mut commands: Commands,
    camera_query: Query<&Camera2d>,
    preferences: Res<PainterPreferences>,
) {
    // Only spawn if no Camera2d exists
    if !camera_query.is_empty() {
        return;
    }

    let pixels_per_unit = preferences.pixels_per_unit.max(1.0);
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scale: 1.0 / pixels_per_unit,
            ..OrthographicProjection::default_2d()
        }),
    ));
}

/// Copy preferences and the palette pick into the session settings
fn sync_paint_settings(
    preferences: Res<PainterPreferences>,
    library: Res<TilesetLibrary>,
    mut state: ResMut<PaintState>,
) {
    if !preferences.is_changed() && !library.is_changed() {
        return;
    }

    let settings = &mut state.session.settings;
    settings.mode = preferences.mode;
    settings.grid = preferences.grid;
    settings.palette = library.active_group().cloned();
    settings.tileset = library.current_name().unwrap_or_default().to_string();
}
