//! Parented object arena that painted tiles live in

use crate::Sprite;
use std::collections::HashMap;
use uuid::Uuid;

/// Identifier of an object in a [`Scene`]
pub type ObjectId = Uuid;

/// An object in the authoring scene
///
/// Containers are objects without a sprite; painted tiles carry one.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    id: ObjectId,
    pub name: String,
    /// World position (not relative to the parent)
    pub position: [f32; 3],
    pub sprite: Option<Sprite>,
    /// Identity of the template this object was instantiated from
    pub template: Option<String>,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
}

impl SceneObject {
    /// Create an unparented object with a fresh id
    pub fn new(name: impl Into<String>, position: [f32; 3]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position,
            sprite: None,
            template: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}

/// Arena of scene objects with a parent/children hierarchy
///
/// Every mutation bumps [`Scene::revision`], which hosts use to re-sync
/// their own view of the scene only when something changed.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    roots: Vec<ObjectId>,
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an empty, unparented object (used for containers)
    pub fn spawn_root(&mut self, name: impl Into<String>) -> ObjectId {
        self.spawn(SceneObject::new(name, [0.0, 0.0, 0.0]), None)
    }

    /// Insert an object under `parent`, appended after its existing children.
    ///
    /// A missing parent inserts the object as a root. An object whose id is
    /// already in the scene (e.g. a clone) is given a fresh id.
    pub fn spawn(&mut self, mut object: SceneObject, parent: Option<ObjectId>) -> ObjectId {
        if self.objects.contains_key(&object.id) {
            object.id = Uuid::new_v4();
        }
        let id = object.id;
        let parent = parent.filter(|p| self.objects.contains_key(p));

        object.parent = parent;
        object.children.clear();
        self.objects.insert(id, object);
        self.attach(id, parent);
        self.revision += 1;
        id
    }

    /// Move an object under a new parent, keeping its world position.
    ///
    /// Returns false if either object is missing or the move would create a cycle.
    pub fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> bool {
        if !self.objects.contains_key(&id) {
            return false;
        }
        if let Some(parent) = parent {
            if !self.objects.contains_key(&parent) || self.is_descendant_or_self(parent, id) {
                return false;
            }
        }

        let old_parent = self.objects.get(&id).and_then(|o| o.parent);
        self.detach(id, old_parent);
        if let Some(object) = self.objects.get_mut(&id) {
            object.parent = parent;
        }
        self.attach(id, parent);
        self.revision += 1;
        true
    }

    /// Set an object's world position, leaving its descendants in place
    pub fn set_position(&mut self, id: ObjectId, position: [f32; 3]) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        object.position = position;
        self.revision += 1;
        true
    }

    /// Move an object to `position` and shift every descendant by the same
    /// offset, so nested objects keep their place relative to it
    pub fn move_subtree(&mut self, id: ObjectId, position: [f32; 3]) -> bool {
        let Some(from) = self.objects.get(&id).map(|o| o.position) else {
            return false;
        };
        let offset = [
            position[0] - from[0],
            position[1] - from[1],
            position[2] - from[2],
        ];

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(object) = self.objects.get_mut(&current) {
                if current == id {
                    object.position = position;
                } else {
                    for (axis, delta) in object.position.iter_mut().zip(offset) {
                        *axis += delta;
                    }
                }
                stack.extend(object.children.iter().copied());
            }
        }

        self.revision += 1;
        true
    }

    /// Remove an object and all of its descendants, returning the removed ids
    pub fn despawn(&mut self, id: ObjectId) -> Vec<ObjectId> {
        let Some(parent) = self.objects.get(&id).map(|o| o.parent) else {
            return Vec::new();
        };
        self.detach(id, parent);

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(object) = self.objects.remove(&current) {
                stack.extend(object.children.iter().copied());
                removed.push(current);
            }
        }

        self.revision += 1;
        removed
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects.get(&id).and_then(|o| o.parent)
    }

    /// Direct children of an object, in insertion order (empty if missing)
    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.objects
            .get(&id)
            .map(|o| o.children.as_slice())
            .unwrap_or(&[])
    }

    /// Objects without a parent, in insertion order
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Counter bumped by every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn attach(&mut self, id: ObjectId, parent: Option<ObjectId>) {
        match parent.and_then(|p| self.objects.get_mut(&p)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }
    }

    fn detach(&mut self, id: ObjectId, parent: Option<ObjectId>) {
        match parent.and_then(|p| self.objects.get_mut(&p)) {
            Some(parent) => parent.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
    }

    fn is_descendant_or_self(&self, candidate: ObjectId, ancestor: ObjectId) -> bool {
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}
