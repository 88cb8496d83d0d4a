//! Paint modes and the per-event paint controller
//!
//! Every qualifying pointer event is snapped to a cell, the container's
//! occupants of that cell are looked up, and the active mode decides what
//! happens:
//!
//! | Mode               | Effect                                                         |
//! |--------------------|----------------------------------------------------------------|
//! | `PaintOver`        | Add a tile, nested under an existing occupant if there is one |
//! | `PaintOnlyOnEmpty` | Add a tile only when the cell is empty                         |
//! | `PaintOrReplace`   | Remove the occupants, then add a tile                          |
//! | `Erase`            | Remove the occupants                                           |
//! | `Select`           | Pick an occupant on press, drag it along while held            |

use crate::{
    find_at_cell, GridConfig, ObjectId, Scene, Sprite, SpriteGroup, Template, TemplateCache,
    TemplateError, TemplateStore,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Name given to a container created on first paint
pub const DEFAULT_CONTAINER_NAME: &str = "Tiles";

/// What a pointer event does to the cell under it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaintMode {
    #[default]
    Select,
    PaintOver,
    PaintOnlyOnEmpty,
    PaintOrReplace,
    Erase,
}

impl PaintMode {
    pub const ALL: [PaintMode; 5] = [
        PaintMode::Select,
        PaintMode::PaintOver,
        PaintMode::PaintOnlyOnEmpty,
        PaintMode::PaintOrReplace,
        PaintMode::Erase,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaintMode::Select => "Select",
            PaintMode::PaintOver => "Paint Over",
            PaintMode::PaintOnlyOnEmpty => "Paint Only On Empty",
            PaintMode::PaintOrReplace => "Paint Or Replace",
            PaintMode::Erase => "Erase",
        }
    }
}

/// Pointer event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Drag,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pointer event already projected onto the authoring plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub button: PointerButton,
    /// World position; z is the plane the pointer was projected onto
    pub position: [f32; 3],
}

impl PointerEvent {
    /// Primary button pressed at `position`
    pub fn down(position: [f32; 3]) -> Self {
        Self {
            kind: PointerEventKind::Down,
            button: PointerButton::Primary,
            position,
        }
    }

    /// Primary button held while the pointer is at `position`
    pub fn drag(position: [f32; 3]) -> Self {
        Self {
            kind: PointerEventKind::Drag,
            button: PointerButton::Primary,
            position,
        }
    }

    /// Only primary-button presses and drags drive the controller
    pub fn is_qualifying(&self) -> bool {
        self.button == PointerButton::Primary
            && matches!(self.kind, PointerEventKind::Down | PointerEventKind::Drag)
    }
}

/// Configuration read fresh on every event
///
/// Owned by the host (editor panel); the controller never keeps a copy.
#[derive(Debug, Clone, Default)]
pub struct PaintSettings {
    pub mode: PaintMode,
    /// Active palette group; `None` while no tile is picked
    pub palette: Option<SpriteGroup>,
    /// Object whose direct children are painted and searched
    pub container: Option<ObjectId>,
    /// Tile set name, namespaces the template store
    pub tileset: String,
    pub grid: GridConfig,
}

/// User-correctable conditions reported instead of acting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// Select mode needs a container to pick from
    NoContainer,
    /// Select mode found nothing at the cell
    NothingToSelect,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoContainer => write!(f, "First set a container object!"),
            Diagnostic::NothingToSelect => write!(f, "Container has no child to select here!"),
        }
    }
}

/// What an event did
#[derive(Debug, Clone, PartialEq)]
pub enum PaintAction {
    /// Not a primary press or drag
    Ignored,
    /// A guard held (no palette, repeated drag cell, occupied cell, nothing selected)
    Skipped,
    /// A new object was added under `parent`, after removing `erased`
    Placed {
        object: ObjectId,
        parent: ObjectId,
        erased: Vec<ObjectId>,
    },
    /// These occupants were removed (empty when the cell was empty)
    Erased(Vec<ObjectId>),
    /// Select press: the host should replace its selection with this
    Selected(Option<ObjectId>),
    /// The selected object was dragged onto the event's cell
    Moved(ObjectId),
    Rejected(Diagnostic),
}

/// Result of handling one pointer event
#[derive(Debug, Clone, PartialEq)]
pub struct PaintOutcome {
    /// Snapped cell of the event (`None` for ignored events)
    pub cell: Option<[f32; 3]>,
    pub action: PaintAction,
    /// Container created because none was set; it should become the
    /// container for the rest of the session
    pub container_created: Option<ObjectId>,
}

impl PaintOutcome {
    fn new(cell: [f32; 3], action: PaintAction) -> Self {
        Self {
            cell: Some(cell),
            action,
            container_created: None,
        }
    }
}

struct PreparedTile {
    sprite: Sprite,
    template: Arc<Template>,
}

/// Decides and applies the effect of each pointer event
///
/// Carries only the last snapped cell (for the repeated-drag guard) and the
/// object picked in Select mode. Mode, palette and container come from the
/// [`PaintSettings`] passed to every call.
#[derive(Debug, Clone)]
pub struct PaintController {
    last_cell: Option<[f32; 3]>,
    selected: Option<ObjectId>,
    rng: fastrand::Rng,
}

impl Default for PaintController {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintController {
    pub fn new() -> Self {
        Self {
            last_cell: None,
            selected: None,
            rng: fastrand::Rng::new(),
        }
    }

    /// Controller with deterministic palette picks
    pub fn with_seed(seed: u64) -> Self {
        Self {
            last_cell: None,
            selected: None,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Object currently held by Select mode
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Cell of the last qualifying event
    pub fn last_cell(&self) -> Option<[f32; 3]> {
        self.last_cell
    }

    /// Handle one pointer event.
    ///
    /// Template storage failures abort before the scene is touched and are
    /// returned as [`TemplateError::StorageUnavailable`].
    pub fn handle<S: TemplateStore>(
        &mut self,
        event: &PointerEvent,
        settings: &PaintSettings,
        scene: &mut Scene,
        cache: &mut TemplateCache<S>,
    ) -> Result<PaintOutcome, TemplateError> {
        if !event.is_qualifying() {
            return Ok(PaintOutcome {
                cell: None,
                action: PaintAction::Ignored,
                container_created: None,
            });
        }

        let cell = settings.grid.snap(event.position);
        let same_cell = self
            .last_cell
            .is_some_and(|last| GridConfig::same_cell(last, cell));
        self.last_cell = Some(cell);

        // The press of a stroke always runs; only drags repeat a cell
        let repeated_drag = same_cell && event.kind == PointerEventKind::Drag;

        let container = settings.container.filter(|id| scene.contains(*id));
        let occupants = container
            .map(|c| find_at_cell(scene, c, cell))
            .unwrap_or_default();

        match settings.mode {
            PaintMode::PaintOver => {
                if repeated_drag {
                    return Ok(PaintOutcome::new(cell, PaintAction::Skipped));
                }
                let Some(tile) = self.prepare_tile(settings, cache)? else {
                    return Ok(PaintOutcome::new(cell, PaintAction::Skipped));
                };

                let mut outcome = place_tile(tile, cell, container, scene);
                if let (Some(&occupant), PaintAction::Placed { object, parent, .. }) =
                    (occupants.first(), &mut outcome.action)
                {
                    if scene.set_parent(*object, Some(occupant)) {
                        *parent = occupant;
                    }
                }
                Ok(outcome)
            }
            PaintMode::PaintOnlyOnEmpty => {
                if !occupants.is_empty() {
                    return Ok(PaintOutcome::new(cell, PaintAction::Skipped));
                }
                let Some(tile) = self.prepare_tile(settings, cache)? else {
                    return Ok(PaintOutcome::new(cell, PaintAction::Skipped));
                };
                Ok(place_tile(tile, cell, container, scene))
            }
            PaintMode::PaintOrReplace => {
                if repeated_drag {
                    return Ok(PaintOutcome::new(cell, PaintAction::Skipped));
                }
                // Resolve the template before erasing anything
                let Some(tile) = self.prepare_tile(settings, cache)? else {
                    return Ok(PaintOutcome::new(cell, PaintAction::Skipped));
                };

                for occupant in &occupants {
                    scene.despawn(*occupant);
                }
                let mut outcome = place_tile(tile, cell, container, scene);
                if let PaintAction::Placed { erased, .. } = &mut outcome.action {
                    *erased = occupants;
                }
                Ok(outcome)
            }
            PaintMode::Erase => {
                for occupant in &occupants {
                    scene.despawn(*occupant);
                }
                Ok(PaintOutcome::new(cell, PaintAction::Erased(occupants)))
            }
            PaintMode::Select => Ok(PaintOutcome::new(
                cell,
                self.select(event, cell, container, &occupants, scene),
            )),
        }
    }

    fn select(
        &mut self,
        event: &PointerEvent,
        cell: [f32; 3],
        container: Option<ObjectId>,
        occupants: &[ObjectId],
        scene: &mut Scene,
    ) -> PaintAction {
        match event.kind {
            PointerEventKind::Down => {
                let Some(container) = container else {
                    return reject(Diagnostic::NoContainer);
                };
                if occupants.is_empty() {
                    self.selected = None;
                    return reject(Diagnostic::NothingToSelect);
                }

                self.selected = occupants.iter().copied().find(|id| {
                    scene
                        .get(*id)
                        .is_some_and(|o| o.sprite.is_some() && o.parent() == Some(container))
                });
                PaintAction::Selected(self.selected)
            }
            PointerEventKind::Drag => {
                let Some(id) = self.selected else {
                    return PaintAction::Skipped;
                };
                let Some(depth) = scene.get(id).map(|o| o.position[2]) else {
                    self.selected = None;
                    return PaintAction::Skipped;
                };
                // Nested tiles travel with the dragged one
                scene.move_subtree(id, [cell[0], cell[1], depth]);
                PaintAction::Moved(id)
            }
            PointerEventKind::Up => PaintAction::Ignored,
        }
    }

    /// Pick a palette sprite and resolve its template, without touching the scene
    fn prepare_tile<S: TemplateStore>(
        &mut self,
        settings: &PaintSettings,
        cache: &mut TemplateCache<S>,
    ) -> Result<Option<PreparedTile>, TemplateError> {
        let Some(sprite) = settings
            .palette
            .as_ref()
            .and_then(|palette| palette.pick(&mut self.rng))
        else {
            return Ok(None);
        };

        let sprite = sprite.clone();
        let template = cache.get_or_create(&settings.tileset, &sprite)?;
        Ok(Some(PreparedTile { sprite, template }))
    }
}

fn reject(diagnostic: Diagnostic) -> PaintAction {
    tracing::warn!("{}", diagnostic);
    PaintAction::Rejected(diagnostic)
}

/// Instantiate a prepared tile on `cell` under the container, creating the
/// container first if there is none
fn place_tile(
    tile: PreparedTile,
    cell: [f32; 3],
    container: Option<ObjectId>,
    scene: &mut Scene,
) -> PaintOutcome {
    let (container, container_created) = match container {
        Some(container) => (container, None),
        None => {
            let container = scene.spawn_root(DEFAULT_CONTAINER_NAME);
            tracing::info!("New container object created!");
            (container, Some(container))
        }
    };

    let object = scene.spawn(
        tile.template.instantiate(&tile.sprite, cell),
        Some(container),
    );

    PaintOutcome {
        cell: Some(cell),
        action: PaintAction::Placed {
            object,
            parent: container,
            erased: Vec::new(),
        },
        container_created,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTemplateStore;

    struct Fixture {
        controller: PaintController,
        settings: PaintSettings,
        scene: Scene,
        cache: TemplateCache<MemoryTemplateStore>,
    }

    impl Fixture {
        fn new(mode: PaintMode) -> Self {
            Self {
                controller: PaintController::with_seed(42),
                settings: PaintSettings {
                    mode,
                    palette: Some(SpriteGroup::single(Sprite::new("grass1"))),
                    container: None,
                    tileset: "forest".to_string(),
                    grid: GridConfig::default(),
                },
                scene: Scene::new(),
                cache: TemplateCache::new(MemoryTemplateStore::new()),
            }
        }

        /// Handle an event the way a host does, adopting any created container
        fn send(&mut self, event: PointerEvent) -> Result<PaintOutcome, TemplateError> {
            let outcome = self.controller.handle(
                &event,
                &self.settings,
                &mut self.scene,
                &mut self.cache,
            )?;
            if let Some(container) = outcome.container_created {
                self.settings.container = Some(container);
            }
            Ok(outcome)
        }

        fn down(&mut self, x: f32, y: f32) -> PaintOutcome {
            self.send(PointerEvent::down([x, y, 0.0])).unwrap()
        }

        fn drag(&mut self, x: f32, y: f32) -> PaintOutcome {
            self.send(PointerEvent::drag([x, y, 0.0])).unwrap()
        }

        fn container(&self) -> ObjectId {
            self.settings.container.unwrap()
        }

        fn child_count(&self) -> usize {
            self.scene.children(self.container()).len()
        }

        fn occupants(&self, x: f32, y: f32) -> Vec<ObjectId> {
            find_at_cell(&self.scene, self.container(), [x, y, 0.0])
        }
    }

    #[test]
    fn test_paint_over_creates_container_and_object() {
        let mut fx = Fixture::new(PaintMode::PaintOver);

        let outcome = fx.down(2.3, 4.6);
        let container = outcome.container_created.expect("container created");
        assert_eq!(outcome.cell, Some([2.0, 5.0, 0.0]));

        let PaintAction::Placed { object, parent, .. } = outcome.action else {
            panic!("expected placement, got {:?}", outcome.action);
        };
        assert_eq!(parent, container);
        assert_eq!(fx.scene.children(container), &[object]);
        assert_eq!(fx.scene.get(object).unwrap().position, [2.0, 5.0, 0.0]);
    }

    #[test]
    fn test_paint_over_drag_on_same_cell_is_skipped() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        fx.down(2.3, 4.6);

        let outcome = fx.drag(2.3, 4.6);
        assert_eq!(outcome.action, PaintAction::Skipped);
        assert_eq!(fx.child_count(), 1);

        // Still the same cell after a small move
        fx.drag(2.4, 4.7);
        assert_eq!(fx.child_count(), 1);
    }

    #[test]
    fn test_paint_over_click_on_occupied_cell_nests() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        let PaintAction::Placed { object: first, .. } = fx.down(0.0, 0.0).action else {
            panic!("expected placement");
        };

        let PaintAction::Placed { object, parent, .. } = fx.down(0.1, -0.1).action else {
            panic!("expected placement");
        };
        assert_eq!(parent, first);
        assert_eq!(fx.child_count(), 1);
        assert_eq!(fx.scene.children(first), &[object]);
        assert_eq!(fx.scene.get(object).unwrap().position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_paint_over_drag_across_cells() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        fx.down(0.0, 0.0);
        fx.drag(1.0, 0.0);
        fx.drag(1.2, 0.1);
        fx.drag(2.0, 0.0);

        assert_eq!(fx.child_count(), 3);
    }

    #[test]
    fn test_paint_only_on_empty_one_per_cell() {
        let mut fx = Fixture::new(PaintMode::PaintOnlyOnEmpty);
        fx.down(0.0, 0.0);
        for _ in 0..3 {
            assert_eq!(fx.drag(0.1, 0.1).action, PaintAction::Skipped);
        }
        assert_eq!(fx.child_count(), 1);

        fx.drag(1.0, 0.0);
        assert_eq!(fx.child_count(), 2);

        // Back over an occupied cell
        assert_eq!(fx.drag(0.0, 0.0).action, PaintAction::Skipped);
        assert_eq!(fx.child_count(), 2);
    }

    #[test]
    fn test_paint_or_replace_keeps_one_occupant() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        let PaintAction::Placed { object: old, .. } = fx.down(3.0, 3.0).action else {
            panic!("expected placement");
        };

        fx.settings.mode = PaintMode::PaintOrReplace;
        let PaintAction::Placed { object, erased, .. } = fx.down(3.0, 3.0).action else {
            panic!("expected placement");
        };

        assert_eq!(erased, vec![old]);
        assert!(!fx.scene.contains(old));
        assert_eq!(fx.occupants(3.0, 3.0), vec![object]);
        assert_eq!(fx.child_count(), 1);
    }

    #[test]
    fn test_paint_or_replace_skips_repeated_drag() {
        let mut fx = Fixture::new(PaintMode::PaintOrReplace);
        let PaintAction::Placed { object, .. } = fx.down(0.0, 0.0).action else {
            panic!("expected placement");
        };

        assert_eq!(fx.drag(0.0, 0.0).action, PaintAction::Skipped);
        assert_eq!(fx.occupants(0.0, 0.0), vec![object]);
    }

    #[test]
    fn test_paint_or_replace_storage_failure_keeps_occupant() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        let PaintAction::Placed { object: old, .. } = fx.down(0.0, 0.0).action else {
            panic!("expected placement");
        };

        fx.settings.mode = PaintMode::PaintOrReplace;
        fx.settings.palette = Some(SpriteGroup::single(Sprite::new("rock")));
        fx.cache.store_mut().set_offline(true);

        let revision = fx.scene.revision();
        let err = fx.send(PointerEvent::down([0.0, 0.0, 0.0])).unwrap_err();
        assert!(matches!(err, TemplateError::StorageUnavailable { .. }));
        assert!(fx.scene.contains(old));
        assert_eq!(fx.child_count(), 1);
        assert_eq!(fx.scene.revision(), revision);
    }

    #[test]
    fn test_storage_failure_creates_no_container() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        fx.cache.store_mut().set_offline(true);

        assert!(fx.send(PointerEvent::down([0.0, 0.0, 0.0])).is_err());
        assert!(fx.scene.is_empty());
        assert_eq!(fx.settings.container, None);

        // The next event is unaffected once storage is back
        fx.cache.store_mut().set_offline(false);
        assert!(fx.send(PointerEvent::down([0.0, 0.0, 0.0])).is_ok());
        assert_eq!(fx.child_count(), 1);
    }

    #[test]
    fn test_erase_removes_occupants() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        fx.down(2.3, 4.6);
        fx.down(5.0, 5.0);

        fx.settings.mode = PaintMode::Erase;
        let outcome = fx.down(2.0, 5.0);
        assert!(matches!(outcome.action, PaintAction::Erased(ref ids) if ids.len() == 1));
        assert_eq!(fx.child_count(), 1);
        assert!(fx.occupants(2.0, 5.0).is_empty());
    }

    #[test]
    fn test_erase_on_empty_cell_is_noop() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        fx.down(0.0, 0.0);

        fx.settings.mode = PaintMode::Erase;
        let revision = fx.scene.revision();
        assert_eq!(fx.down(7.0, 7.0).action, PaintAction::Erased(Vec::new()));
        assert_eq!(fx.child_count(), 1);
        assert_eq!(fx.scene.revision(), revision);
    }

    #[test]
    fn test_missing_palette_is_silent_noop() {
        for mode in [
            PaintMode::PaintOver,
            PaintMode::PaintOnlyOnEmpty,
            PaintMode::PaintOrReplace,
        ] {
            let mut fx = Fixture::new(mode);
            fx.settings.palette = None;

            let outcome = fx.down(0.0, 0.0);
            assert_eq!(outcome.action, PaintAction::Skipped);
            assert_eq!(outcome.container_created, None);
            assert!(fx.scene.is_empty());
        }
    }

    #[test]
    fn test_non_primary_events_are_ignored() {
        let mut fx = Fixture::new(PaintMode::PaintOver);

        let mut event = PointerEvent::down([0.0, 0.0, 0.0]);
        event.button = PointerButton::Secondary;
        assert_eq!(fx.send(event).unwrap().action, PaintAction::Ignored);

        let mut event = PointerEvent::down([0.0, 0.0, 0.0]);
        event.kind = PointerEventKind::Up;
        assert_eq!(fx.send(event).unwrap().action, PaintAction::Ignored);

        assert!(fx.scene.is_empty());
        assert_eq!(fx.controller.last_cell(), None);
    }

    #[test]
    fn test_select_without_container_is_reported() {
        let mut fx = Fixture::new(PaintMode::Select);
        assert_eq!(
            fx.down(0.0, 0.0).action,
            PaintAction::Rejected(Diagnostic::NoContainer)
        );
    }

    #[test]
    fn test_select_on_empty_cell_is_reported() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        fx.down(0.0, 0.0);

        fx.settings.mode = PaintMode::Select;
        assert_eq!(
            fx.down(4.0, 4.0).action,
            PaintAction::Rejected(Diagnostic::NothingToSelect)
        );
        assert_eq!(fx.controller.selected(), None);
    }

    #[test]
    fn test_select_then_drag_moves_only_selected() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        let PaintAction::Placed { object: a, .. } = fx.down(0.0, 0.0).action else {
            panic!("expected placement");
        };
        let PaintAction::Placed { object: b, .. } = fx.down(1.0, 0.0).action else {
            panic!("expected placement");
        };

        fx.settings.mode = PaintMode::Select;
        assert_eq!(fx.down(0.2, 0.1).action, PaintAction::Selected(Some(a)));

        assert_eq!(fx.drag(3.1, 2.2).action, PaintAction::Moved(a));
        assert_eq!(fx.scene.get(a).unwrap().position, [3.0, 2.0, 0.0]);

        fx.drag(4.4, 2.0);
        assert_eq!(fx.scene.get(a).unwrap().position, [4.0, 2.0, 0.0]);
        assert_eq!(fx.scene.get(b).unwrap().position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_drag_carries_nested_tiles() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        let PaintAction::Placed { object: base, .. } = fx.down(0.0, 0.0).action else {
            panic!("expected placement");
        };
        let PaintAction::Placed {
            object: over,
            parent,
            ..
        } = fx.down(0.0, 0.0).action
        else {
            panic!("expected placement");
        };
        assert_eq!(parent, base);

        fx.settings.mode = PaintMode::Select;
        assert_eq!(fx.down(0.0, 0.0).action, PaintAction::Selected(Some(base)));
        assert_eq!(fx.drag(5.0, 0.0).action, PaintAction::Moved(base));
        assert_eq!(fx.scene.get(base).unwrap().position, [5.0, 0.0, 0.0]);
        assert_eq!(fx.scene.get(over).unwrap().position, [5.0, 0.0, 0.0]);

        fx.settings.mode = PaintMode::Erase;
        assert_eq!(fx.down(0.0, 0.0).action, PaintAction::Erased(Vec::new()));
        assert_eq!(fx.down(5.0, 0.0).action, PaintAction::Erased(vec![base]));
        assert!(!fx.scene.contains(over));
        assert_eq!(fx.child_count(), 0);
    }

    #[test]
    fn test_select_skips_containers_without_sprite() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        fx.down(0.0, 0.0);
        let container = fx.container();
        let marker = fx
            .scene
            .spawn(crate::SceneObject::new("marker", [1.0, 1.0, 0.0]), Some(container));

        fx.settings.mode = PaintMode::Select;
        assert_eq!(fx.down(1.0, 1.0).action, PaintAction::Selected(None));
        assert_eq!(fx.drag(2.0, 2.0).action, PaintAction::Skipped);
        assert_eq!(fx.scene.get(marker).unwrap().position, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_mode_switch_applies_to_next_event() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        fx.down(0.0, 0.0);
        fx.drag(1.0, 0.0);

        fx.settings.mode = PaintMode::Erase;
        fx.drag(2.0, 0.0);
        fx.drag(1.0, 0.0);

        assert_eq!(fx.child_count(), 1);
        assert!(fx.occupants(1.0, 0.0).is_empty());
    }

    #[test]
    fn test_palette_variants_are_all_used() {
        let mut fx = Fixture::new(PaintMode::PaintOver);
        fx.settings.palette = Some(SpriteGroup::new(
            "grass",
            vec![Sprite::new("grass1"), Sprite::new("grass2")],
        ));

        fx.down(0.0, 0.0);
        for x in 1..32 {
            fx.drag(x as f32, 0.0);
        }

        let names: std::collections::HashSet<_> = fx
            .scene
            .children(fx.container())
            .iter()
            .filter_map(|id| fx.scene.get(*id))
            .filter_map(|o| o.sprite.as_ref().map(|s| s.name.clone()))
            .collect();
        assert_eq!(names.len(), 2);
        // Both variants share one template
        assert_eq!(fx.cache.len(), 1);
    }
}
