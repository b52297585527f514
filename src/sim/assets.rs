/// Asset table: the scene declares named textures during preload, the
/// loader resolves each path against the built-in sprite sources, and
/// the resulting cache hands out texture geometry to the world builder.
///
/// Textures are drawn as terminal glyphs, so a "source" is just the
/// pixel size of the source image. Sizes still matter: they become the
/// physics body of every sprite built from them.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset key '{0}' declared more than once")]
    DuplicateKey(String),
    #[error("asset '{key}': no source for path '{path}'")]
    MissingSource { key: String, path: String },
    #[error("sprite sheet '{key}': {frame_width}x{frame_height} frames do not tile {width}x{height}")]
    BadFrameSize {
        key: String,
        frame_width: u32,
        frame_height: u32,
        width: u32,
        height: u32,
    },
    #[error("asset '{0}' was never loaded")]
    NotLoaded(String),
    #[error("sprite sheet '{key}' has {found} frame(s), animations need {needed}")]
    TooFewFrames { key: String, needed: u32, found: u32 },
}

/// Pixel size of each shipped image, by path.
const BUILTIN_SOURCES: &[(&str, u32, u32)] = &[
    ("assets/sky.png", 800, 600),
    ("assets/platform.png", 400, 32),
    ("assets/star.png", 24, 22),
    ("assets/bomb.png", 14, 14),
    ("assets/dude.png", 288, 48),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    SpriteSheet { frame_width: u32, frame_height: u32 },
}

#[derive(Clone, Debug)]
struct AssetDecl {
    key: String,
    path: String,
    kind: AssetKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    pub key: String,
    pub width: u32,
    pub height: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_count: u32,
}

/// Collects declarations; nothing is resolved until `load()`.
#[derive(Default)]
pub struct AssetLoader {
    queue: Vec<AssetDecl>,
}

impl AssetLoader {
    pub fn new() -> Self {
        AssetLoader::default()
    }

    pub fn image(&mut self, key: &str, path: &str) {
        self.queue.push(AssetDecl {
            key: key.to_string(),
            path: path.to_string(),
            kind: AssetKind::Image,
        });
    }

    pub fn spritesheet(&mut self, key: &str, path: &str, frame_width: u32, frame_height: u32) {
        self.queue.push(AssetDecl {
            key: key.to_string(),
            path: path.to_string(),
            kind: AssetKind::SpriteSheet { frame_width, frame_height },
        });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Resolve every declaration. Fails on the first bad entry.
    pub fn load(self) -> Result<AssetCache, AssetError> {
        let mut textures = HashMap::with_capacity(self.queue.len());
        for decl in self.queue {
            if textures.contains_key(&decl.key) {
                return Err(AssetError::DuplicateKey(decl.key));
            }
            let texture = resolve(&decl)?;
            log::debug!(
                "loaded '{}' from {} ({}x{}, {} frame(s))",
                texture.key, decl.path, texture.width, texture.height, texture.frame_count
            );
            textures.insert(decl.key, texture);
        }
        Ok(AssetCache { textures })
    }
}

fn resolve(decl: &AssetDecl) -> Result<Texture, AssetError> {
    let (width, height) = BUILTIN_SOURCES
        .iter()
        .find(|(path, _, _)| *path == decl.path)
        .map(|&(_, w, h)| (w, h))
        .ok_or_else(|| AssetError::MissingSource {
            key: decl.key.clone(),
            path: decl.path.clone(),
        })?;

    let (frame_width, frame_height) = match decl.kind {
        AssetKind::Image => (width, height),
        AssetKind::SpriteSheet { frame_width, frame_height } => {
            let tiles = frame_width > 0
                && frame_height > 0
                && width % frame_width == 0
                && height % frame_height == 0;
            if !tiles {
                return Err(AssetError::BadFrameSize {
                    key: decl.key.clone(),
                    frame_width,
                    frame_height,
                    width,
                    height,
                });
            }
            (frame_width, frame_height)
        }
    };

    Ok(Texture {
        key: decl.key.clone(),
        width,
        height,
        frame_width,
        frame_height,
        frame_count: (width / frame_width) * (height / frame_height),
    })
}

#[derive(Debug, Default)]
pub struct AssetCache {
    textures: HashMap<String, Texture>,
}

impl AssetCache {
    pub fn get(&self, key: &str) -> Result<&Texture, AssetError> {
        self.textures
            .get(key)
            .ok_or_else(|| AssetError::NotLoaded(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_sheet_counts_frames() {
        let mut loader = AssetLoader::new();
        loader.spritesheet("dude", "assets/dude.png", 32, 48);
        let cache = loader.load().unwrap();
        let dude = cache.get("dude").unwrap();
        assert_eq!(dude.frame_count, 9);
        assert_eq!((dude.frame_width, dude.frame_height), (32, 48));
    }

    #[test]
    fn image_is_one_frame() {
        let mut loader = AssetLoader::new();
        loader.image("ground", "assets/platform.png");
        let cache = loader.load().unwrap();
        let ground = cache.get("ground").unwrap();
        assert_eq!((ground.width, ground.height), (400, 32));
        assert_eq!(ground.frame_count, 1);
    }

    #[test]
    fn unknown_path_is_reported() {
        let mut loader = AssetLoader::new();
        loader.image("moon", "assets/moon.png");
        assert_eq!(
            loader.load().unwrap_err(),
            AssetError::MissingSource { key: "moon".into(), path: "assets/moon.png".into() }
        );
    }

    #[test]
    fn duplicate_key_is_reported() {
        let mut loader = AssetLoader::new();
        loader.image("star", "assets/star.png");
        loader.image("star", "assets/bomb.png");
        assert_eq!(loader.load().unwrap_err(), AssetError::DuplicateKey("star".into()));
    }

    #[test]
    fn frames_must_tile_the_sheet() {
        let mut loader = AssetLoader::new();
        loader.spritesheet("dude", "assets/dude.png", 30, 48);
        assert!(matches!(loader.load(), Err(AssetError::BadFrameSize { .. })));
    }

    #[test]
    fn missing_key_lookup_fails() {
        let cache = AssetLoader::new().load().unwrap();
        assert_eq!(cache.get("sky").unwrap_err(), AssetError::NotLoaded("sky".into()));
        assert_eq!(cache.len(), 0);
    }
}
