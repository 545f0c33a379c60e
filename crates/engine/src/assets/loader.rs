use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;

use image::ImageReader;
use thiserror::Error;
use tracing::debug;

use super::keys::{resolve_asset_path, AssetKey, AssetPathError};

/// Decoded RGBA8 image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Sprite {
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            rgba,
        }
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.rgba.len() >= self.width as usize * self.height as usize * 4
    }
}

#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("invalid asset path: {0}")]
    InvalidPath(#[from] AssetPathError),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("asset worker for {key} stopped before reporting")]
    WorkerLost { key: AssetKey },
}

#[derive(Debug)]
pub struct AssetCompletion {
    pub key: AssetKey,
    pub result: Result<Sprite, AssetLoadError>,
}

pub fn load_sprite(path: &Path) -> Result<Sprite, AssetLoadError> {
    let reader = ImageReader::open(path).map_err(|source| AssetLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decoded.to_rgba8();
    Ok(Sprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

pub fn load_asset(root: &Path, key: AssetKey) -> Result<Sprite, AssetLoadError> {
    let path = resolve_asset_path(root, key)?;
    load_sprite(&path)
}

/// Decodes each asset on its own worker thread and reports every completion,
/// successful or not, through `on_complete`. Returns once all workers are
/// started; completions arrive asynchronously.
pub fn spawn_asset_loads<F>(root: &Path, keys: &[AssetKey], on_complete: F)
where
    F: Fn(AssetCompletion) + Clone + Send + 'static,
{
    for &key in keys {
        let root = root.to_path_buf();
        let notify = on_complete.clone();
        let spawned = thread::Builder::new()
            .name(format!("asset-load-{key}"))
            .spawn(move || {
                let result = load_asset(&root, key);
                debug!(asset = %key, ok = result.is_ok(), "asset_load_finished");
                notify(AssetCompletion { key, result });
            });
        if spawned.is_err() {
            on_complete(AssetCompletion {
                key,
                result: Err(AssetLoadError::WorkerLost { key }),
            });
        }
    }
}

/// Images available to the renderer, keyed by asset. Populated while the
/// gate is loading and only read after it opens.
#[derive(Debug, Default)]
pub struct AssetTable {
    sprites: HashMap<AssetKey, Sprite>,
}

impl AssetTable {
    pub fn insert(&mut self, key: AssetKey, sprite: Sprite) {
        self.sprites.insert(key, sprite);
    }

    pub fn get(&self, key: AssetKey) -> Option<&Sprite> {
        self.sprites.get(&key)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
