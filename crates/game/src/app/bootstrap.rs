use std::path::{Path, PathBuf};

use engine::{resolve_app_paths, LoopConfig, StartupError, ViewLayout, WorldSource};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::demo::DemoWorld;
use super::scene_file::{generate_scene, load_scene_file, LoadedScene, SceneLoadError};

const MAP_ENV_VAR: &str = "TILEVIEW_MAP";
const DEFAULT_MAP_FILE: &str = "world.json";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) source: Box<dyn WorldSource>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Scene(#[from] SceneLoadError),
    #[error("scene has no player actor")]
    NoPlayer,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "tileview_starting");

    let paths = resolve_app_paths()?;
    let layout = ViewLayout::default();
    let map_path = map_path_from_env().or_else(|| {
        let candidate = paths.maps_dir.join(DEFAULT_MAP_FILE);
        candidate.is_file().then_some(candidate)
    });
    let scene = load_scene(map_path.as_deref(), layout)?;
    info!(
        root = %paths.root.display(),
        map = %map_path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "generated".to_string()),
        world_width = scene.map.width(),
        world_height = scene.map.height(),
        "scene_loaded"
    );

    let config = LoopConfig {
        asset_root: Some(paths.assets_dir),
        layout: layout.with_world_size(scene.map.width(), scene.map.height()),
        ..LoopConfig::default()
    };
    let source = DemoWorld::new(scene).ok_or(BootstrapError::NoPlayer)?;

    Ok(AppWiring {
        config,
        source: Box::new(source),
    })
}

fn load_scene(map_path: Option<&Path>, layout: ViewLayout) -> Result<LoadedScene, SceneLoadError> {
    match map_path {
        Some(path) => load_scene_file(path),
        None => generate_scene(layout.world_width, layout.world_height),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn map_path_from_env() -> Option<PathBuf> {
    std::env::var(MAP_ENV_VAR)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}
