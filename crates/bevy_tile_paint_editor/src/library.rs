//! Tile-set discovery and slicing
//!
//! Tile sets are PNG images in the tile-set folder. A tile set's sprites come
//! from an optional `<name>.sprites.json` manifest next to the image, or else
//! from cutting the image into a grid of the configured tile size.

use bevy::prelude::Resource;
use bevy_tile_paint_core::{group_sprites, Sprite, SpriteGroup};
use std::path::{Path, PathBuf};

/// Folder (under the assets root) holding tile-set images
pub const TILESETS_FOLDER: &str = "tilesets";

/// Folder (under the assets root) holding generated templates
pub const TEMPLATES_FOLDER: &str = "templates";

const TILESET_EXTENSION: &str = "png";
const SPRITE_MANIFEST_SUFFIX: &str = ".sprites.json";

#[derive(Debug)]
pub enum LibraryError {
    IoError(String),
    ImageError(String),
    ParseError(String),
}

impl std::fmt::Display for LibraryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryError::IoError(e) => write!(f, "IO error: {}", e),
            LibraryError::ImageError(e) => write!(f, "Image error: {}", e),
            LibraryError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for LibraryError {}

/// A tile-set image found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetEntry {
    /// Name used for template namespacing (file name up to the first `.`)
    pub name: String,
    pub file_name: String,
}

/// Tile-set name for an image file name: everything before the first `.`
pub fn tileset_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// List tile-set images in `dir`, creating the folder if it is missing
pub fn scan_tilesets(dir: &Path) -> Result<Vec<TilesetEntry>, LibraryError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| LibraryError::IoError(e.to_string()))?;
        bevy::log::info!("Created directory: {:?}", dir);
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| LibraryError::IoError(e.to_string()))? {
        let path = entry
            .map_err(|e| LibraryError::IoError(e.to_string()))?
            .path();

        let is_image = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TILESET_EXTENSION));
        if !path.is_file() || !is_image {
            continue;
        }

        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            entries.push(TilesetEntry {
                name: tileset_name(file_name).to_string(),
                file_name: file_name.to_string(),
            });
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.file_name.cmp(&b.file_name)));
    Ok(entries)
}

/// Cut an image into whole tiles, row-major from the top-left corner.
///
/// Partial tiles at the right and bottom edges are dropped.
pub fn slice_sprites(tileset: &str, image_size: [u32; 2], tile_size: [u32; 2]) -> Vec<Sprite> {
    if tile_size[0] == 0 || tile_size[1] == 0 {
        return Vec::new();
    }

    let columns = image_size[0] / tile_size[0];
    let rows = image_size[1] / tile_size[1];

    (0..rows)
        .flat_map(|row| (0..columns).map(move |column| (row, column)))
        .enumerate()
        .map(|(index, (row, column))| {
            Sprite::new(format!("{}_{}", tileset, index))
                .with_tileset(tileset)
                .with_rect([
                    (column * tile_size[0]) as f32,
                    (row * tile_size[1]) as f32,
                    tile_size[0] as f32,
                    tile_size[1] as f32,
                ])
        })
        .collect()
}

/// Load the sprites of one tile set
pub fn load_sprites(
    dir: &Path,
    entry: &TilesetEntry,
    tile_size: [u32; 2],
) -> Result<Vec<Sprite>, LibraryError> {
    let manifest = dir.join(format!("{}{}", entry.name, SPRITE_MANIFEST_SUFFIX));
    if manifest.is_file() {
        let content =
            std::fs::read_to_string(&manifest).map_err(|e| LibraryError::IoError(e.to_string()))?;
        let mut sprites: Vec<Sprite> = serde_json::from_str(&content)
            .map_err(|e| LibraryError::ParseError(e.to_string()))?;
        for sprite in &mut sprites {
            sprite.tileset = entry.name.clone();
        }
        return Ok(sprites);
    }

    let (width, height) = image::image_dimensions(dir.join(&entry.file_name))
        .map_err(|e| LibraryError::ImageError(e.to_string()))?;
    Ok(slice_sprites(&entry.name, [width, height], tile_size))
}

/// Tile sets on disk and the palette built from the current one
#[derive(Resource, Debug)]
pub struct TilesetLibrary {
    pub dir: PathBuf,
    pub tile_size: [u32; 2],
    tilesets: Vec<TilesetEntry>,
    current: Option<usize>,
    sprites: Vec<Sprite>,
    groups: Vec<SpriteGroup>,
    selected_group: Option<usize>,
    group_by_identity: bool,
}

impl TilesetLibrary {
    pub fn new(dir: impl Into<PathBuf>, tile_size: [u32; 2], group_by_identity: bool) -> Self {
        Self {
            dir: dir.into(),
            tile_size,
            tilesets: Vec::new(),
            current: None,
            sprites: Vec::new(),
            groups: Vec::new(),
            selected_group: None,
            group_by_identity,
        }
    }

    /// Rescan the folder and load `preferred` (or the first tile set)
    pub fn refresh(&mut self, preferred: Option<&str>) -> Result<(), LibraryError> {
        self.tilesets = scan_tilesets(&self.dir)?;
        let index = preferred
            .and_then(|name| self.tilesets.iter().position(|t| t.name == name))
            .or(if self.tilesets.is_empty() { None } else { Some(0) });

        match index {
            Some(index) => self.select_tileset(index),
            None => {
                self.current = None;
                self.set_sprites(Vec::new());
                Ok(())
            }
        }
    }

    /// Make the tile set at `index` current and load its sprites
    pub fn select_tileset(&mut self, index: usize) -> Result<(), LibraryError> {
        let Some(entry) = self.tilesets.get(index).cloned() else {
            return Ok(());
        };
        self.current = Some(index);
        let sprites = load_sprites(&self.dir, &entry, self.tile_size);
        match sprites {
            Ok(sprites) => {
                bevy::log::info!("Loaded {} sprites from tile set '{}'", sprites.len(), entry.name);
                self.set_sprites(sprites);
                Ok(())
            }
            Err(e) => {
                self.set_sprites(Vec::new());
                Err(e)
            }
        }
    }

    /// Step to the next/previous tile set, wrapping around
    pub fn cycle_tileset(&mut self, step: isize) -> Result<(), LibraryError> {
        match self.current.and_then(|c| wrap(c, step, self.tilesets.len())) {
            Some(index) => self.select_tileset(index),
            None if !self.tilesets.is_empty() => self.select_tileset(0),
            None => Ok(()),
        }
    }

    /// Step the palette selection, wrapping around
    pub fn cycle_group(&mut self, step: isize) {
        if self.groups.is_empty() {
            self.selected_group = None;
            return;
        }
        self.selected_group = match self.selected_group {
            Some(current) => wrap(current, step, self.groups.len()),
            None => Some(0),
        };
    }

    pub fn select_group(&mut self, index: Option<usize>) {
        self.selected_group = index.filter(|i| *i < self.groups.len());
    }

    /// Switch between grouping sprites by exact name and by identity
    pub fn set_group_by_identity(&mut self, group_by_identity: bool) {
        if self.group_by_identity == group_by_identity {
            return;
        }
        // Keep the selection on the group holding the previously picked sprite
        let picked = self.active_group().and_then(|g| g.first()).cloned();
        self.group_by_identity = group_by_identity;
        self.groups = group_sprites(&self.sprites, group_by_identity);
        self.selected_group = picked.and_then(|sprite| {
            self.groups
                .iter()
                .position(|g| g.sprites.contains(&sprite))
        });
    }

    pub fn group_by_identity(&self) -> bool {
        self.group_by_identity
    }

    pub fn tilesets(&self) -> &[TilesetEntry] {
        &self.tilesets
    }

    pub fn current(&self) -> Option<&TilesetEntry> {
        self.current.and_then(|c| self.tilesets.get(c))
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current().map(|t| t.name.as_str())
    }

    /// Asset-server path of a tile set's image
    pub fn image_asset_path(&self, tileset: &str) -> Option<String> {
        self.tilesets
            .iter()
            .find(|t| t.name == tileset)
            .map(|t| crate::to_asset_path(&self.dir.join(&t.file_name)))
    }

    pub fn groups(&self) -> &[SpriteGroup] {
        &self.groups
    }

    pub fn selected_group(&self) -> Option<usize> {
        self.selected_group
    }

    /// The palette group currently picked, if any
    pub fn active_group(&self) -> Option<&SpriteGroup> {
        self.selected_group.and_then(|i| self.groups.get(i))
    }

    fn set_sprites(&mut self, sprites: Vec<Sprite>) {
        self.groups = group_sprites(&sprites, self.group_by_identity);
        self.sprites = sprites;
        self.selected_group = None;
    }
}

fn wrap(current: usize, step: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as isize;
    Some(((current as isize + step).rem_euclid(len)) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbaImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn test_tileset_name() {
        assert_eq!(tileset_name("forest.png"), "forest");
        assert_eq!(tileset_name("forest.v2.png"), "forest");
        assert_eq!(tileset_name("plain"), "plain");
    }

    #[test]
    fn test_slice_sprites() {
        let sprites = slice_sprites("forest", [70, 64], [32, 32]);
        assert_eq!(sprites.len(), 4);
        assert_eq!(sprites[0].name, "forest_0");
        assert_eq!(sprites[1].rect, Some([32.0, 0.0, 32.0, 32.0]));
        assert_eq!(sprites[2].rect, Some([0.0, 32.0, 32.0, 32.0]));
        assert!(sprites.iter().all(|s| s.tileset == "forest"));

        assert!(slice_sprites("forest", [64, 64], [0, 32]).is_empty());
    }

    #[test]
    fn test_scan_creates_folder_and_lists_images() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(TILESETS_FOLDER);

        assert!(scan_tilesets(&dir).unwrap().is_empty());
        assert!(dir.is_dir());

        write_png(&dir.join("forest.png"), 32, 32);
        write_png(&dir.join("desert.png"), 32, 32);
        std::fs::write(dir.join("notes.txt"), "not a tile set").unwrap();

        let names: Vec<_> = scan_tilesets(&dir)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["desert", "forest"]);
    }

    #[test]
    fn test_load_sprites_prefers_manifest() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("forest.png"), 64, 32);
        std::fs::write(
            dir.path().join("forest.sprites.json"),
            r#"[{"name": "grass1", "rect": [0, 0, 16, 16]}, {"name": "grass2"}]"#,
        )
        .unwrap();

        let entry = TilesetEntry {
            name: "forest".to_string(),
            file_name: "forest.png".to_string(),
        };
        let sprites = load_sprites(dir.path(), &entry, [32, 32]).unwrap();
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[0].rect, Some([0.0, 0.0, 16.0, 16.0]));
        assert!(sprites.iter().all(|s| s.tileset == "forest"));
    }

    #[test]
    fn test_load_sprites_slices_image() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("forest.png"), 64, 32);

        let entry = TilesetEntry {
            name: "forest".to_string(),
            file_name: "forest.png".to_string(),
        };
        assert_eq!(load_sprites(dir.path(), &entry, [32, 32]).unwrap().len(), 2);
    }

    #[test]
    fn test_library_palette_cycling() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("forest.png"), 64, 32);
        write_png(&dir.path().join("desert.png"), 32, 32);

        let mut library = TilesetLibrary::new(dir.path(), [32, 32], false);
        library.refresh(Some("forest")).unwrap();
        assert_eq!(library.current_name(), Some("forest"));
        assert_eq!(library.groups().len(), 2);
        assert!(library.active_group().is_none());

        library.cycle_group(1);
        assert_eq!(library.active_group().unwrap().key, "forest_0");
        library.cycle_group(-1);
        assert_eq!(library.active_group().unwrap().key, "forest_1");

        library.cycle_tileset(1).unwrap();
        assert_eq!(library.current_name(), Some("desert"));
        assert!(library.active_group().is_none());
        let path = library.image_asset_path("desert").unwrap();
        assert!(path.ends_with("/desert.png"));
        assert!(library.image_asset_path("swamp").is_none());
    }

    #[test]
    fn test_group_by_identity_keeps_selection() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("forest.png"), 64, 32);

        let mut library = TilesetLibrary::new(dir.path(), [32, 32], false);
        library.refresh(None).unwrap();
        library.select_group(Some(1));

        library.set_group_by_identity(true);
        assert_eq!(library.groups().len(), 1);
        let group = library.active_group().unwrap();
        assert_eq!(group.key, "forest");
        assert_eq!(group.len(), 2);
    }
}
