//! Sprites, sprite identities and palette groups

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named region of a tile-set image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    /// Tile set the sprite was sliced from
    #[serde(default)]
    pub tileset: String,
    /// Source rect in pixels: `[x, y, width, height]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<[f32; 4]>,
}

impl Sprite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tileset: String::new(),
            rect: None,
        }
    }

    pub fn with_tileset(mut self, tileset: impl Into<String>) -> Self {
        self.tileset = tileset.into();
        self
    }

    pub fn with_rect(mut self, rect: [f32; 4]) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Identity shared by every frame/variant of this sprite
    pub fn identity(&self) -> SpriteIdentity {
        SpriteIdentity::from_name(&self.name)
    }
}

/// Template key derived from a sprite name with every non-letter removed
///
/// `grass1`, `grass_2` and `grass` all map to `grass`. A name without any
/// letters keeps its full text so that such sprites do not collapse into one
/// empty key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteIdentity(String);

impl SpriteIdentity {
    pub fn from_name(name: &str) -> Self {
        let letters: String = name.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            Self(name.to_string())
        } else {
            Self(letters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sprites offered together as one palette entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteGroup {
    /// Grouping key (exact sprite name, or identity when grouping by name)
    pub key: String,
    pub sprites: Vec<Sprite>,
}

impl SpriteGroup {
    pub fn new(key: impl Into<String>, sprites: Vec<Sprite>) -> Self {
        Self {
            key: key.into(),
            sprites,
        }
    }

    /// Group holding a single sprite
    pub fn single(sprite: Sprite) -> Self {
        Self {
            key: sprite.name.clone(),
            sprites: vec![sprite],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// First sprite, used as the group's preview
    pub fn first(&self) -> Option<&Sprite> {
        self.sprites.first()
    }

    /// Pick a member uniformly at random
    pub fn pick(&self, rng: &mut fastrand::Rng) -> Option<&Sprite> {
        if self.sprites.is_empty() {
            return None;
        }
        self.sprites.get(rng.usize(..self.sprites.len()))
    }
}

/// Group a tile set's sprites for the palette.
///
/// With `by_identity` sprites sharing a [`SpriteIdentity`] land in one group,
/// otherwise each distinct name is its own group. Groups keep the order in
/// which their first member appears.
pub fn group_sprites(sprites: &[Sprite], by_identity: bool) -> Vec<SpriteGroup> {
    let mut groups: Vec<SpriteGroup> = Vec::new();

    for sprite in sprites {
        let key = if by_identity {
            sprite.identity().as_str().to_string()
        } else {
            sprite.name.clone()
        };

        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.sprites.push(sprite.clone()),
            None => groups.push(SpriteGroup::new(key, vec![sprite.clone()])),
        }
    }

    groups
}
