//! Viewport rendering: painted tiles as Bevy sprites and the grid overlay

use bevy::prelude::*;
use bevy_tile_paint_core::{ObjectId, Scene};
use std::collections::HashMap;

use crate::input::handle_viewport_input;
use crate::library::TilesetLibrary;
use crate::preferences::PainterPreferences;
use crate::{EditorSelection, PaintState};

/// Z offset per nesting level so tiles painted over others draw on top
const DEPTH_Z_STEP: f32 = 0.01;

const SELECTED_TINT: Color = Color::srgb(1.0, 0.85, 0.4);
const MISSING_IMAGE_COLOR: Color = Color::srgba(1.0, 0.0, 1.0, 0.6);

/// Plugin for viewport rendering
pub struct PaintRenderPlugin;

impl Plugin for PaintRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderState>()
            .add_systems(Update, sync_painted_sprites.after(handle_viewport_input))
            .add_systems(Update, draw_grid);
    }
}

/// Marker for sprites mirroring a painted scene object
#[derive(Component)]
pub struct PaintedSprite {
    pub object: ObjectId,
}

/// Tracks which scene state the viewport currently shows
#[derive(Resource, Default)]
pub struct RenderState {
    /// Scene object -> sprite entity
    pub sprites: HashMap<ObjectId, Entity>,
    pub rendered_revision: Option<u64>,
    pub rendered_selection: Option<ObjectId>,
}

impl RenderState {
    fn is_current(&self, revision: u64, selection: Option<ObjectId>) -> bool {
        self.rendered_revision == Some(revision) && self.rendered_selection == selection
    }
}

/// Nesting depth of an object below its scene root
fn depth(scene: &Scene, id: ObjectId) -> usize {
    let mut depth = 0;
    let mut current = scene.parent(id);
    while let Some(parent) = current {
        depth += 1;
        current = scene.parent(parent);
    }
    depth
}

fn sync_painted_sprites(
    mut commands: Commands,
    state: Res<PaintState>,
    selection: Res<EditorSelection>,
    library: Res<TilesetLibrary>,
    preferences: Res<PainterPreferences>,
    asset_server: Res<AssetServer>,
    mut render_state: ResMut<RenderState>,
) {
    let scene = &state.session.scene;
    if render_state.is_current(scene.revision(), selection.0) && !preferences.is_changed() {
        return;
    }
    render_state.rendered_revision = Some(scene.revision());
    render_state.rendered_selection = selection.0;

    // Remove sprites for objects that no longer exist
    let to_remove: Vec<_> = render_state
        .sprites
        .keys()
        .filter(|id| !scene.get(**id).is_some_and(|o| o.sprite.is_some()))
        .copied()
        .collect();

    for id in to_remove {
        if let Some(entity) = render_state.sprites.remove(&id) {
            let _ = commands.get_entity(entity).map(|mut e| e.despawn());
        }
    }

    let [cell_w, cell_h] = preferences.grid.cell_size();

    for object in scene.iter() {
        let Some(tile) = &object.sprite else {
            continue;
        };

        let z = object.position[2] + depth(scene, object.id()) as f32 * DEPTH_Z_STEP;
        let transform = Transform::from_xyz(object.position[0], object.position[1], z);

        let sprite = match library.image_asset_path(&tile.tileset) {
            Some(path) => Sprite {
                image: asset_server.load(path),
                rect: tile
                    .rect
                    .map(|[x, y, w, h]| Rect::new(x, y, x + w, y + h)),
                custom_size: Some(Vec2::new(cell_w, cell_h)),
                color: if selection.0 == Some(object.id()) {
                    SELECTED_TINT
                } else {
                    Color::WHITE
                },
                ..default()
            },
            None => Sprite::from_color(MISSING_IMAGE_COLOR, Vec2::new(cell_w, cell_h)),
        };

        if let Some(&entity) = render_state.sprites.get(&object.id()) {
            if let Ok(mut entity_commands) = commands.get_entity(entity) {
                entity_commands.insert((transform, sprite));
            }
        } else {
            let entity = commands
                .spawn((sprite, transform, PaintedSprite { object: object.id() }))
                .id();
            render_state.sprites.insert(object.id(), entity);
        }
    }
}

/// Draw grid lines across the visible part of the viewport
fn draw_grid(
    mut gizmos: Gizmos,
    preferences: Res<PainterPreferences>,
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
) {
    if !preferences.show_grid {
        return;
    }
    let Some(window) = windows.iter().next() else {
        return;
    };
    let Some((camera, camera_transform)) = camera_q.iter().next() else {
        return;
    };

    let corners = [Vec2::ZERO, window.size()];
    let Ok(a) = camera.viewport_to_world_2d(camera_transform, corners[0]) else {
        return;
    };
    let Ok(b) = camera.viewport_to_world_2d(camera_transform, corners[1]) else {
        return;
    };

    let min = a.min(b);
    let max = a.max(b);
    let [r, g, bl, alpha] = preferences.grid_color;
    let color = Color::linear_rgba(r, g, bl, alpha);

    let lines = preferences
        .grid
        .grid_lines([min.x, min.y], [max.x, max.y]);

    for x in lines.vertical {
        gizmos.line_2d(Vec2::new(x, min.y), Vec2::new(x, max.y), color);
    }
    for y in lines.horizontal {
        gizmos.line_2d(Vec2::new(min.x, y), Vec2::new(max.x, y), color);
    }
}
