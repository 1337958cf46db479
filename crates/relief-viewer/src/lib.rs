//! Relief Viewer - interactive terrain viewer and headless snapshot tool
//!
//! Provides the `ViewerApp` application handler, layered configuration,
//! orbit controls and logging setup shared by the `relief` binary.

pub mod app;
pub mod config;
pub mod controls;
pub mod logging;

pub use app::ViewerApp;
pub use config::{CliOverrides, ViewerConfig};
pub use controls::OrbitControls;

use config::{CameraSettings, TerrainSettings};
use relief_render::Camera;
use relief_terrain::{source_for_root, ResourceSource, TerrainLoader};

/// Loader over the configured root (directory or HTTP base URL)
pub fn terrain_loader(settings: &TerrainSettings) -> TerrainLoader<Box<dyn ResourceSource>> {
    let source = source_for_root(&settings.root, settings.request_timeout);
    TerrainLoader::new(source, settings.paths.clone())
        .with_vertical_exaggeration(settings.vertical_exaggeration)
}

/// Initial camera pose for a viewport of the given aspect ratio
pub fn initial_camera(settings: &CameraSettings, aspect: f32) -> Camera {
    let mut camera = Camera {
        fov: settings.fov,
        near: settings.near,
        far: settings.far,
        aspect,
        min_distance: settings.min_distance,
        max_distance: settings.max_distance,
        ..Camera::default()
    };
    camera.look_from(settings.position, settings.target);
    camera
}
