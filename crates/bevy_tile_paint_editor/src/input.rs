//! Viewport and keyboard input
//!
//! Mouse input is normalized into [`PointerEvent`]s on the z = 0 authoring
//! plane and handed to the paint session; keyboard shortcuts edit the
//! preferences and the tile-set library.

use bevy::prelude::*;
use bevy_egui::EguiContexts;
use bevy_tile_paint_core::{
    GridConfig, PaintAction, PaintMode, PointerButton, PointerEvent, PointerEventKind,
};

use crate::library::TilesetLibrary;
use crate::preferences::{PainterPreferences, PreferencesStore};
use crate::ui::status_line;
use crate::{EditorSelection, PaintState};

/// State for viewport input handling
#[derive(Resource, Default)]
pub struct ViewportInputState {
    /// Last cursor position in world coordinates
    pub last_world_pos: Option<Vec2>,
}

/// Pointer event for one button this frame.
///
/// A drag is only reported when the pointer moved while the button was held.
pub fn pointer_event(
    button: PointerButton,
    just_pressed: bool,
    just_released: bool,
    pressed: bool,
    moved: bool,
    position: [f32; 3],
) -> Option<PointerEvent> {
    let kind = if just_pressed {
        PointerEventKind::Down
    } else if just_released {
        PointerEventKind::Up
    } else if pressed && moved {
        PointerEventKind::Drag
    } else {
        return None;
    };

    Some(PointerEvent {
        kind,
        button,
        position,
    })
}

const BUTTONS: [(MouseButton, PointerButton); 3] = [
    (MouseButton::Left, PointerButton::Primary),
    (MouseButton::Right, PointerButton::Secondary),
    (MouseButton::Middle, PointerButton::Middle),
];

pub(crate) fn handle_viewport_input(
    mut contexts: EguiContexts,
    mut state: ResMut<PaintState>,
    mut selection: ResMut<EditorSelection>,
    mut input_state: ResMut<ViewportInputState>,
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let Some(window) = windows.iter().next() else {
        return;
    };
    let Some((camera, camera_transform)) = camera_q.iter().next() else {
        return;
    };

    let Some(cursor_position) = window.cursor_position() else {
        input_state.last_world_pos = None;
        return;
    };

    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_position) else {
        return;
    };

    let moved = input_state.last_world_pos != Some(world_pos);
    input_state.last_world_pos = Some(world_pos);

    // Clicks and drags on the side panel belong to egui
    if ctx.is_using_pointer() || ctx.is_pointer_over_area() {
        return;
    }

    for (mouse_button, button) in BUTTONS {
        let Some(event) = pointer_event(
            button,
            mouse_buttons.just_pressed(mouse_button),
            mouse_buttons.just_released(mouse_button),
            mouse_buttons.pressed(mouse_button),
            moved,
            [world_pos.x, world_pos.y, 0.0],
        ) else {
            continue;
        };

        let outcome = match state.session.handle(&event) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Paint action failed: {}", e);
                continue;
            }
        };

        if let Some(container) = outcome.container_created {
            info!("Painting into new container {}", container);
        }

        match outcome.action {
            PaintAction::Selected(picked) => selection.0 = picked,
            PaintAction::Rejected(diagnostic) => {
                debug!("{} at {:?}", diagnostic, outcome.cell);
            }
            PaintAction::Erased(erased) if !erased.is_empty() => {
                if selection.0.is_some_and(|id| erased.contains(&id)) {
                    selection.0 = None;
                }
            }
            PaintAction::Placed { erased, .. } => {
                if selection.0.is_some_and(|id| erased.contains(&id)) {
                    selection.0 = None;
                }
            }
            _ => {}
        }
    }
}

const MODE_KEYS: [(KeyCode, PaintMode); 5] = [
    (KeyCode::Digit1, PaintMode::Select),
    (KeyCode::Digit2, PaintMode::PaintOver),
    (KeyCode::Digit3, PaintMode::PaintOnlyOnEmpty),
    (KeyCode::Digit4, PaintMode::PaintOrReplace),
    (KeyCode::Digit5, PaintMode::Erase),
];

/// Cell size after scaling both axes by `factor`, clamped like any other edit
pub fn scaled_cell_size(grid: GridConfig, factor: f32) -> [f32; 2] {
    let [width, height] = grid.cell_size();
    GridConfig::new(width * factor, height * factor).cell_size()
}

/// Handle keyboard shortcuts
pub(crate) fn handle_keyboard_shortcuts(
    mut contexts: EguiContexts,
    keyboard: Res<ButtonInput<KeyCode>>,
    store: Res<PreferencesStore>,
    mut preferences: ResMut<PainterPreferences>,
    mut library: ResMut<TilesetLibrary>,
) {
    // Typing into a panel field
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_keyboard_input() {
            return;
        }
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);

    if ctrl {
        // Ctrl+S - Save preferences
        if keyboard.just_pressed(KeyCode::KeyS) {
            if let Err(e) = store.write(&preferences) {
                error!("Failed to save preferences: {}", e);
            }
        }
        return;
    }

    let mut palette_changed = false;

    for (key, mode) in MODE_KEYS {
        if keyboard.just_pressed(key) && preferences.mode != mode {
            preferences.mode = mode;
            palette_changed = true;
        }
    }

    if keyboard.just_pressed(KeyCode::BracketLeft) {
        library.cycle_group(-1);
        palette_changed = true;
    }
    if keyboard.just_pressed(KeyCode::BracketRight) {
        library.cycle_group(1);
        palette_changed = true;
    }

    let tileset_step = if keyboard.just_pressed(KeyCode::Comma) {
        Some(-1)
    } else if keyboard.just_pressed(KeyCode::Period) {
        Some(1)
    } else {
        None
    };
    if let Some(step) = tileset_step {
        if let Err(e) = library.cycle_tileset(step) {
            warn!("Could not load tile set: {}", e);
        }
        preferences.last_tileset = library.current_name().map(str::to_string);
        palette_changed = true;
    }

    // - / = halve or double the cell size
    let cell_factor = if keyboard.just_pressed(KeyCode::Minus) {
        Some(0.5)
    } else if keyboard.just_pressed(KeyCode::Equal) {
        Some(2.0)
    } else {
        None
    };
    if let Some(factor) = cell_factor {
        let cell_size = scaled_cell_size(preferences.grid, factor);
        preferences.grid.set_cell_size(cell_size);
        info!("Cell size: {} x {}", cell_size[0], cell_size[1]);
    }

    // G - toggle grid overlay
    if keyboard.just_pressed(KeyCode::KeyG) {
        preferences.show_grid = !preferences.show_grid;
    }

    // N - toggle grouping sprites by name
    if keyboard.just_pressed(KeyCode::KeyN) {
        preferences.group_by_identity = !preferences.group_by_identity;
        library.set_group_by_identity(preferences.group_by_identity);
        palette_changed = true;
    }

    if palette_changed {
        info!("{}", status_line(&preferences, &library));
    }
}
