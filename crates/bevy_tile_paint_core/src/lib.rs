//! Core painting logic for bevy_tile_paint
//!
//! This crate contains everything that decides what a pointer event does to a
//! tile scene, independent of any renderer or windowing layer:
//! - `GridConfig` - Cell size and world-to-cell snapping
//! - `find_at_cell` - Occupancy lookup among a container's direct children
//! - `TemplateCache` - Sprite identity to reusable template, created on first use
//! - `PaintController` - Per-event create/replace/erase/select decisions
//! - `Scene` - The parented object arena painted objects live in
//! - `PaintSession` - Bundles the above for a host application

mod grid;
mod paint;
mod scene;
mod session;
mod spatial;
mod sprite;
mod template;

pub use grid::{GridConfig, GridLines, CELL_EPSILON, CELL_SIZE_MIN, MAX_GRID_LINES};
pub use paint::{
    Diagnostic, PaintAction, PaintController, PaintMode, PaintOutcome, PaintSettings,
    PointerButton, PointerEvent, PointerEventKind, DEFAULT_CONTAINER_NAME,
};
pub use scene::{ObjectId, Scene, SceneObject};
pub use session::PaintSession;
pub use spatial::find_at_cell;
pub use sprite::{group_sprites, Sprite, SpriteGroup, SpriteIdentity};
pub use template::{
    template_path, FsTemplateStore, MemoryTemplateStore, StoreError, Template, TemplateCache,
    TemplateError, TemplateStore, TEMPLATE_EXTENSION,
};
