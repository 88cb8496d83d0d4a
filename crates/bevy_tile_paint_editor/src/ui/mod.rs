//! Painter side panel
//!
//! The panel reads the current preferences, library and session, and reports
//! what the user changed as a [`PanelResult`]. The result is applied after the
//! frame's UI is built so the panel itself never holds mutable state.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use bevy_tile_paint_core::{ObjectId, PaintMode, Scene, CELL_SIZE_MIN, DEFAULT_CONTAINER_NAME};

use crate::library::TilesetLibrary;
use crate::preferences::{PainterPreferences, PreferencesStore};
use crate::{EditorSelection, PaintState};

const NO_CONTAINER_LABEL: &str = "(new on first paint)";

pub struct PaintPanelPlugin;

impl Plugin for PaintPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, render_paint_panel);
    }
}

/// Which container the next paint goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPick {
    Existing(ObjectId),
    /// Create a fresh container now
    New,
    /// Let the first paint create one
    Unset,
}

/// Changes requested through the panel this frame
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PanelResult {
    pub mode: Option<PaintMode>,
    pub cell_size: Option<[f32; 2]>,
    pub show_grid: Option<bool>,
    pub grid_color: Option<[f32; 4]>,
    pub tileset: Option<usize>,
    pub rescan_tilesets: bool,
    /// `Some(None)` clears the palette pick
    pub group: Option<Option<usize>>,
    pub group_by_identity: Option<bool>,
    pub container: Option<ContainerPick>,
    pub save_preferences: bool,
}

impl PanelResult {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One-line summary of the active mode, tile set and palette pick
pub fn status_line(preferences: &PainterPreferences, library: &TilesetLibrary) -> String {
    let tileset = library.current_name().unwrap_or("no tile set");
    let group = match library.active_group() {
        Some(group) => format!("{} ({} sprites)", group.key, group.len()),
        None => "no sprite".to_string(),
    };
    format!("{} | {} | {}", preferences.mode.label(), tileset, group)
}

/// Objects without a sprite, in hierarchy order, that can hold painted tiles
pub fn container_candidates(scene: &Scene) -> Vec<ObjectId> {
    let mut candidates = Vec::new();
    let mut stack: Vec<ObjectId> = scene.roots().iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        let Some(object) = scene.get(id) else {
            continue;
        };
        if object.sprite.is_none() {
            candidates.push(id);
        }
        stack.extend(scene.children(id).iter().rev().copied());
    }
    candidates
}

fn render_paint_panel(
    mut contexts: EguiContexts,
    mut preferences: ResMut<PainterPreferences>,
    mut library: ResMut<TilesetLibrary>,
    mut state: ResMut<PaintState>,
    store: Res<PreferencesStore>,
    selection: Res<EditorSelection>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let result = render_panel(
        ctx,
        &preferences,
        &library,
        &state.session.scene,
        state.session.settings.container,
        selection.0,
    );
    if result.is_empty() {
        return;
    }

    apply_panel_result(result, &mut preferences, &mut library, &mut state, &store);
}

/// Apply panel changes to the preferences, library and session
pub fn apply_panel_result(
    result: PanelResult,
    preferences: &mut PainterPreferences,
    library: &mut TilesetLibrary,
    state: &mut PaintState,
    store: &PreferencesStore,
) {
    let mut palette_changed = false;

    if let Some(mode) = result.mode {
        preferences.mode = mode;
        palette_changed = true;
    }
    if let Some(cell_size) = result.cell_size {
        preferences.grid.set_cell_size(cell_size);
    }
    if let Some(show_grid) = result.show_grid {
        preferences.show_grid = show_grid;
    }
    if let Some(color) = result.grid_color {
        preferences.grid_color = color;
    }

    if result.rescan_tilesets {
        if let Err(e) = library.refresh(preferences.last_tileset.as_deref()) {
            warn!("Could not rescan tile sets: {}", e);
        }
        palette_changed = true;
    }
    if let Some(index) = result.tileset {
        if let Err(e) = library.select_tileset(index) {
            warn!("Could not load tile set: {}", e);
        }
        preferences.last_tileset = library.current_name().map(str::to_string);
        palette_changed = true;
    }
    if let Some(by_identity) = result.group_by_identity {
        preferences.group_by_identity = by_identity;
        library.set_group_by_identity(by_identity);
        palette_changed = true;
    }
    if let Some(group) = result.group {
        library.select_group(group);
        palette_changed = true;
    }

    if let Some(pick) = result.container {
        let session = &mut state.session;
        session.settings.container = match pick {
            ContainerPick::Existing(id) if session.scene.contains(id) => Some(id),
            ContainerPick::Existing(_) | ContainerPick::Unset => None,
            ContainerPick::New => Some(session.scene.spawn_root(DEFAULT_CONTAINER_NAME)),
        };
        info!("Painting into container {:?}", session.settings.container);
    }

    if palette_changed {
        info!("{}", status_line(preferences, library));
    }

    if result.save_preferences {
        if let Err(e) = store.write(preferences) {
            error!("Failed to save preferences: {}", e);
        }
    }
}

fn render_panel(
    ctx: &egui::Context,
    preferences: &PainterPreferences,
    library: &TilesetLibrary,
    scene: &Scene,
    container: Option<ObjectId>,
    selected: Option<ObjectId>,
) -> PanelResult {
    let mut result = PanelResult::default();

    egui::SidePanel::left("paint_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Mode");
            ui.separator();
            ui.horizontal_wrapped(|ui| {
                for (index, mode) in PaintMode::ALL.into_iter().enumerate() {
                    if ui
                        .selectable_label(preferences.mode == mode, mode.label())
                        .on_hover_text(format!("Key {}", index + 1))
                        .clicked()
                        && preferences.mode != mode
                    {
                        result.mode = Some(mode);
                    }
                }
            });

            ui.add_space(12.0);
            ui.heading("Grid");
            ui.separator();

            let [mut width, mut height] = preferences.grid.cell_size();
            ui.horizontal(|ui| {
                let w = ui.add(
                    egui::DragValue::new(&mut width)
                        .speed(0.05)
                        .range(CELL_SIZE_MIN..=1024.0)
                        .prefix("W: "),
                );
                let h = ui.add(
                    egui::DragValue::new(&mut height)
                        .speed(0.05)
                        .range(CELL_SIZE_MIN..=1024.0)
                        .prefix("H: "),
                );
                if w.changed() || h.changed() {
                    result.cell_size = Some([width, height]);
                }
            });
            ui.small("Cell size in world units, - / = to halve or double");

            let mut show_grid = preferences.show_grid;
            if ui.checkbox(&mut show_grid, "Show grid (G)").changed() {
                result.show_grid = Some(show_grid);
            }

            let mut color = preferences.grid_color;
            ui.horizontal(|ui| {
                ui.label("Color:");
                if ui.color_edit_button_rgba_unmultiplied(&mut color).changed() {
                    result.grid_color = Some(color);
                }
            });

            ui.add_space(12.0);
            ui.heading("Tile Set");
            ui.separator();

            ui.horizontal(|ui| {
                egui::ComboBox::from_id_salt("tileset")
                    .selected_text(library.current_name().unwrap_or("(none)"))
                    .show_ui(ui, |ui| {
                        for (index, entry) in library.tilesets().iter().enumerate() {
                            let current = library.current_name() == Some(entry.name.as_str());
                            if ui.selectable_label(current, entry.name.as_str()).clicked()
                                && !current
                            {
                                result.tileset = Some(index);
                            }
                        }
                    });
                if ui
                    .button("Rescan")
                    .on_hover_text("Look for new tile-set images")
                    .clicked()
                {
                    result.rescan_tilesets = true;
                }
            });

            let mut by_identity = library.group_by_identity();
            if ui
                .checkbox(&mut by_identity, "Group by name (N)")
                .on_hover_text("Treat sprites named like grass1, grass2 as one palette entry")
                .changed()
            {
                result.group_by_identity = Some(by_identity);
            }

            ui.add_space(12.0);
            ui.heading("Palette");
            ui.separator();

            egui::ScrollArea::vertical()
                .max_height(240.0)
                .show(ui, |ui| {
                    if ui
                        .selectable_label(library.selected_group().is_none(), "(none)")
                        .clicked()
                    {
                        result.group = Some(None);
                    }
                    for (index, group) in library.groups().iter().enumerate() {
                        let label = if group.len() > 1 {
                            format!("{} ({})", group.key, group.len())
                        } else {
                            group.key.clone()
                        };
                        if ui
                            .selectable_label(library.selected_group() == Some(index), label)
                            .clicked()
                        {
                            result.group = Some(Some(index));
                        }
                    }
                });

            ui.add_space(12.0);
            ui.heading("Container");
            ui.separator();

            let name_of = |id: ObjectId| {
                scene
                    .get(id)
                    .map(|o| format!("{} ({})", o.name, scene.children(id).len()))
            };
            ui.horizontal(|ui| {
                egui::ComboBox::from_id_salt("container")
                    .selected_text(
                        container
                            .and_then(name_of)
                            .unwrap_or_else(|| NO_CONTAINER_LABEL.to_string()),
                    )
                    .show_ui(ui, |ui| {
                        if ui
                            .selectable_label(container.is_none(), NO_CONTAINER_LABEL)
                            .clicked()
                        {
                            result.container = Some(ContainerPick::Unset);
                        }
                        for id in container_candidates(scene) {
                            let Some(label) = name_of(id) else {
                                continue;
                            };
                            if ui.selectable_label(container == Some(id), label).clicked() {
                                result.container = Some(ContainerPick::Existing(id));
                            }
                        }
                    });
                if ui.button("New").clicked() {
                    result.container = Some(ContainerPick::New);
                }
            });

            ui.add_space(12.0);
            ui.separator();
            ui.label(status_line(preferences, library));
            if let Some(object) = selected.and_then(|id| scene.get(id)) {
                ui.label(format!(
                    "Selected: {} at ({:.2}, {:.2})",
                    object.name, object.position[0], object.position[1]
                ));
            }
            if ui.button("Save preferences (Ctrl+S)").clicked() {
                result.save_preferences = true;
            }
        });

    result
}
