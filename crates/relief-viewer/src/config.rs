//! Layered viewer configuration
//!
//! Config is resolved with four layers of precedence (highest wins):
//! 1. Command-line flags
//! 2. Environment variables: `RELIEF_ROOT`, `RELIEF_VERTICAL_EXAGGERATION`
//! 3. Config file: `--config FILE`, or `relief.toml` in the working directory
//! 4. Built-in defaults

use relief_core::{Color, ReliefError, Result, Vec3};
use relief_terrain::{TerrainPaths, DEFAULT_VERTICAL_EXAGGERATION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "relief.toml";

/// `[terrain]` section as written in a config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerrainFileSection {
    pub root: Option<String>,
    pub descriptor: Option<String>,
    pub vertex_shader: Option<String>,
    pub fragment_shader: Option<String>,
    pub vertical_exaggeration: Option<f32>,
    pub request_timeout_secs: Option<u64>,
}

/// `[camera]` section as written in a config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraFileSection {
    pub position: Option<[f32; 3]>,
    pub target: Option<[f32; 3]>,
    pub fov: Option<f32>,
    pub near: Option<f32>,
    pub far: Option<f32>,
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
}

/// `[window]` section as written in a config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowFileSection {
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fullscreen: Option<bool>,
    /// `#rrggbb`
    pub background: Option<String>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewerConfigFile {
    #[serde(default)]
    pub terrain: TerrainFileSection,
    #[serde(default)]
    pub camera: CameraFileSection,
    #[serde(default)]
    pub window: WindowFileSection,
}

/// Command-line overrides; `None` leaves the lower layers in place
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root: Option<String>,
    pub descriptor: Option<String>,
    pub vertex_shader: Option<String>,
    pub fragment_shader: Option<String>,
    pub vertical_exaggeration: Option<f32>,
    pub fullscreen: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainSettings {
    /// Directory or `http(s)://` base the asset paths resolve against
    pub root: String,
    pub paths: TerrainPaths,
    pub vertical_exaggeration: f32,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub background: Color,
}

/// Resolved configuration with every layer applied
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub terrain: TerrainSettings,
    pub camera: CameraSettings,
    pub window: WindowSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainSettings {
                root: ".".to_string(),
                paths: TerrainPaths::default(),
                vertical_exaggeration: DEFAULT_VERTICAL_EXAGGERATION,
                request_timeout: None,
            },
            camera: CameraSettings {
                position: Vec3::new(0.0, 20.0, 120.0),
                target: Vec3::ZERO,
                fov: 75.0,
                near: 1.0,
                far: 5000.0,
                min_distance: 1.0,
                max_distance: 2500.0,
            },
            window: WindowSettings {
                title: "Relief".to_string(),
                width: 1280,
                height: 720,
                fullscreen: false,
                background: Color::from_hex(0xffffff),
            },
        }
    }
}

impl ViewerConfig {
    /// Resolve config from defaults, the config file, the process environment, and CLI flags.
    ///
    /// An explicit `config_path` must exist; the implicit `relief.toml` is optional.
    pub fn load(config_path: Option<&Path>, cli: &CliOverrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => Some(Self::load_file(path)?),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Some(Self::load_file(&local)?)
                } else {
                    None
                }
            }
        };

        Self::resolve(file, |key| std::env::var(key).ok(), cli)
    }

    /// Apply the layers in order over the defaults
    pub fn resolve(
        file: Option<ViewerConfigFile>,
        env: impl Fn(&str) -> Option<String>,
        cli: &CliOverrides,
    ) -> Result<Self> {
        let mut config = Self::default();
        if let Some(file) = file {
            config.merge_file(file)?;
        }
        config.apply_env_overrides(env)?;
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<ViewerConfigFile> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReliefError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ReliefError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn merge_file(&mut self, file: ViewerConfigFile) -> Result<()> {
        let t = file.terrain;
        if let Some(root) = t.root {
            self.terrain.root = root;
        }
        if let Some(descriptor) = t.descriptor {
            self.terrain.paths.descriptor = descriptor;
        }
        if let Some(vertex_shader) = t.vertex_shader {
            self.terrain.paths.vertex_shader = vertex_shader;
        }
        if let Some(fragment_shader) = t.fragment_shader {
            self.terrain.paths.fragment_shader = fragment_shader;
        }
        if let Some(exaggeration) = t.vertical_exaggeration {
            self.terrain.vertical_exaggeration = exaggeration;
        }
        if let Some(secs) = t.request_timeout_secs {
            self.terrain.request_timeout = Some(Duration::from_secs(secs));
        }

        let c = file.camera;
        if let Some(position) = c.position {
            self.camera.position = Vec3::from_array(position);
        }
        if let Some(target) = c.target {
            self.camera.target = Vec3::from_array(target);
        }
        if let Some(fov) = c.fov {
            self.camera.fov = fov;
        }
        if let Some(near) = c.near {
            self.camera.near = near;
        }
        if let Some(far) = c.far {
            self.camera.far = far;
        }
        if let Some(min_distance) = c.min_distance {
            self.camera.min_distance = min_distance;
        }
        if let Some(max_distance) = c.max_distance {
            self.camera.max_distance = max_distance;
        }

        let w = file.window;
        if let Some(title) = w.title {
            self.window.title = title;
        }
        if let Some(width) = w.width {
            self.window.width = width;
        }
        if let Some(height) = w.height {
            self.window.height = height;
        }
        if let Some(fullscreen) = w.fullscreen {
            self.window.fullscreen = fullscreen;
        }
        if let Some(background) = w.background {
            self.window.background = parse_hex_color(&background)?;
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(root) = env("RELIEF_ROOT") {
            self.terrain.root = root;
        }
        if let Some(value) = env("RELIEF_VERTICAL_EXAGGERATION") {
            self.terrain.vertical_exaggeration = value.trim().parse().map_err(|_| {
                ReliefError::Config(format!(
                    "RELIEF_VERTICAL_EXAGGERATION must be a number, got '{}'",
                    value
                ))
            })?;
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &CliOverrides) {
        if let Some(root) = &cli.root {
            self.terrain.root = root.clone();
        }
        if let Some(descriptor) = &cli.descriptor {
            self.terrain.paths.descriptor = descriptor.clone();
        }
        if let Some(vertex_shader) = &cli.vertex_shader {
            self.terrain.paths.vertex_shader = vertex_shader.clone();
        }
        if let Some(fragment_shader) = &cli.fragment_shader {
            self.terrain.paths.fragment_shader = fragment_shader.clone();
        }
        if let Some(exaggeration) = cli.vertical_exaggeration {
            self.terrain.vertical_exaggeration = exaggeration;
        }
        if cli.fullscreen {
            self.window.fullscreen = true;
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.terrain.vertical_exaggeration.is_finite() {
            return Err(ReliefError::Config(
                "vertical_exaggeration must be finite".to_string(),
            ));
        }
        let cam = &self.camera;
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return Err(ReliefError::Config(format!(
                "camera fov must be between 0 and 180 degrees, got {}",
                cam.fov
            )));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ReliefError::Config(format!(
                "camera clip planes must satisfy 0 < near < far, got {} / {}",
                cam.near, cam.far
            )));
        }
        if !(cam.min_distance > 0.0 && cam.max_distance >= cam.min_distance) {
            return Err(ReliefError::Config(format!(
                "camera distance limits must satisfy 0 < min <= max, got {} / {}",
                cam.min_distance, cam.max_distance
            )));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ReliefError::Config("window size must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Parse `#rrggbb` (the `#` is optional)
pub fn parse_hex_color(value: &str) -> Result<Color> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ReliefError::Config(format!(
            "color must be #rrggbb, got '{}'",
            value
        )));
    }
    u32::from_str_radix(hex, 16)
        .map(Color::from_hex)
        .map_err(|_| ReliefError::Config(format!("color must be #rrggbb, got '{}'", value)))
}
