//! A painting session: settings, scene, controller and template cache together

use crate::{
    ObjectId, PaintController, PaintOutcome, PaintSettings, PointerEvent, Scene, TemplateCache,
    TemplateError, TemplateStore,
};

/// Everything needed to turn pointer events into scene edits
///
/// Hosts that keep their own settings and scene can drive
/// [`PaintController::handle`] directly; this type additionally adopts a
/// container created on first paint as the container for later events.
#[derive(Debug)]
pub struct PaintSession<S> {
    pub settings: PaintSettings,
    pub scene: Scene,
    controller: PaintController,
    cache: TemplateCache<S>,
}

impl<S: TemplateStore> PaintSession<S> {
    pub fn new(store: S) -> Self {
        Self::with_controller(store, PaintController::new())
    }

    pub fn with_controller(store: S, controller: PaintController) -> Self {
        Self {
            settings: PaintSettings::default(),
            scene: Scene::new(),
            controller,
            cache: TemplateCache::new(store),
        }
    }

    /// Handle one pointer event against the current settings
    pub fn handle(&mut self, event: &PointerEvent) -> Result<PaintOutcome, TemplateError> {
        let outcome =
            self.controller
                .handle(event, &self.settings, &mut self.scene, &mut self.cache)?;

        if let Some(container) = outcome.container_created {
            self.settings.container = Some(container);
        }
        Ok(outcome)
    }

    pub fn container(&self) -> Option<ObjectId> {
        self.settings.container.filter(|id| self.scene.contains(*id))
    }

    /// Object currently held by Select mode
    pub fn selected(&self) -> Option<ObjectId> {
        self.controller.selected()
    }

    pub fn cache(&self) -> &TemplateCache<S> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut TemplateCache<S> {
        &mut self.cache
    }
}
