//! Sprite templates and their on-disk cache
//!
//! A template is a reusable prototype bound to one sprite. Painted objects are
//! instantiated from the template of their sprite's identity, so all frames
//! and variants of `grass` share `grass.template`.
//!
//! Templates are stored per tile set:
//! `{root}/{tileset}/{identity}.template`

use crate::{SceneObject, Sprite, SpriteIdentity};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File extension of stored templates
pub const TEMPLATE_EXTENSION: &str = "template";

/// A reusable prototype with a sprite already bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub identity: SpriteIdentity,
    pub name: String,
    pub tileset: String,
    pub sprite: Sprite,
}

impl Template {
    pub fn new(tileset: &str, sprite: &Sprite) -> Self {
        Self {
            identity: sprite.identity(),
            name: sprite.name.clone(),
            tileset: tileset.to_string(),
            sprite: sprite.clone(),
        }
    }

    /// Create an unparented instance showing `sprite` at `position`
    pub fn instantiate(&self, sprite: &Sprite, position: [f32; 3]) -> SceneObject {
        let mut object = SceneObject::new(sprite.name.clone(), position).with_sprite(sprite.clone());
        object.template = Some(self.identity.to_string());
        object
    }
}

/// Store-relative path of the template for `identity` in `tileset`
pub fn template_path(tileset: &str, identity: &SpriteIdentity) -> PathBuf {
    Path::new(tileset).join(format!("{}.{}", identity, TEMPLATE_EXTENSION))
}

/// Errors from a template store backend
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
            StoreError::ParseError(e) => write!(f, "Parse error: {}", e),
            StoreError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Failure surfaced by [`TemplateCache::get_or_create`]
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// The backing store could not be read or written
    StorageUnavailable { path: PathBuf, source: StoreError },
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::StorageUnavailable { path, source } => {
                write!(f, "Template storage unavailable at {:?}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::StorageUnavailable { source, .. } => Some(source),
        }
    }
}

/// Durable storage for templates, addressed by store-relative paths
pub trait TemplateStore {
    /// Load a template, `Ok(None)` if nothing is stored at `path`
    fn load(&self, path: &Path) -> Result<Option<Template>, StoreError>;

    /// Ensure a directory exists
    fn create_dir_all(&mut self, dir: &Path) -> Result<(), StoreError>;

    /// Persist a template; its directory must already exist
    fn save(&mut self, path: &Path, template: &Template) -> Result<(), StoreError>;
}

/// Template store backed by JSON files under a root directory
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateStore for FsTemplateStore {
    fn load(&self, path: &Path) -> Result<Option<Template>, StoreError> {
        let full_path = self.root.join(path);
        if !full_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&full_path)
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::ParseError(e.to_string()))
    }

    fn create_dir_all(&mut self, dir: &Path) -> Result<(), StoreError> {
        let full_path = self.root.join(dir);
        if full_path.is_dir() {
            return Ok(());
        }

        std::fs::create_dir_all(&full_path).map_err(|e| StoreError::IoError(e.to_string()))?;
        tracing::info!("Created directory: {:?}", full_path);
        Ok(())
    }

    fn save(&mut self, path: &Path, template: &Template) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(template)
            .map_err(|e| StoreError::SerializeError(e.to_string()))?;

        std::fs::write(self.root.join(path), content)
            .map_err(|e| StoreError::IoError(e.to_string()))
    }
}

/// In-memory template store
///
/// Mirrors the file store's rules (saving needs an existing directory) and can
/// be switched offline to simulate an unreachable backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<PathBuf, Template>,
    dirs: HashSet<PathBuf>,
    offline: bool,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn get(&self, path: &Path) -> Option<&Template> {
        self.templates.get(path)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::IoError("store is offline".to_string()));
        }
        Ok(())
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load(&self, path: &Path) -> Result<Option<Template>, StoreError> {
        self.check_online()?;
        Ok(self.templates.get(path).cloned())
    }

    fn create_dir_all(&mut self, dir: &Path) -> Result<(), StoreError> {
        self.check_online()?;
        self.dirs.insert(dir.to_path_buf());
        Ok(())
    }

    fn save(&mut self, path: &Path, template: &Template) -> Result<(), StoreError> {
        self.check_online()?;
        let dir = path.parent().unwrap_or(Path::new(""));
        if !dir.as_os_str().is_empty() && !self.dirs.contains(dir) {
            return Err(StoreError::IoError(format!(
                "directory {:?} does not exist",
                dir
            )));
        }
        self.templates.insert(path.to_path_buf(), template.clone());
        Ok(())
    }
}

/// Resolves sprites to templates, creating and persisting missing ones
///
/// Resolved templates are kept for the life of the cache, so repeated lookups
/// of one identity return the same `Arc`.
#[derive(Debug)]
pub struct TemplateCache<S> {
    store: S,
    entries: HashMap<PathBuf, Arc<Template>>,
}

impl<S: TemplateStore> TemplateCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: HashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Number of templates resolved so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Template for `sprite` within `tileset`, created on first use
    pub fn get_or_create(
        &mut self,
        tileset: &str,
        sprite: &Sprite,
    ) -> Result<Arc<Template>, TemplateError> {
        let identity = sprite.identity();
        let path = template_path(tileset, &identity);

        if let Some(template) = self.entries.get(&path) {
            return Ok(template.clone());
        }

        let unavailable = |source: StoreError| TemplateError::StorageUnavailable {
            path: path.clone(),
            source,
        };

        let template = match self.store.load(&path).map_err(unavailable)? {
            Some(template) => template,
            None => {
                if let Some(dir) = path.parent() {
                    self.store.create_dir_all(dir).map_err(unavailable)?;
                }
                let template = Template::new(tileset, sprite);
                self.store.save(&path, &template).map_err(unavailable)?;
                tracing::info!("Created new template {}!", identity);
                template
            }
        };

        let template = Arc::new(template);
        self.entries.insert(path, template.clone());
        Ok(template)
    }
}
