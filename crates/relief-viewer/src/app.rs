//! Viewer application implementing winit ApplicationHandler
//!
//! Everything runs on the event-loop thread: the window, the GPU context,
//! the camera and the terrain load. A failed load is logged and leaves the
//! scene showing only the background.

use crate::config::ViewerConfig;
use crate::controls::OrbitControls;
use crate::{initial_camera, terrain_loader};
use anyhow::{Context, Result};
use relief_core::Vec3;
use relief_render::{Camera, FovPreserver, RenderContext, TerrainRenderer};
use relief_terrain::TerrainStats;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

/// Window, GPU state, and camera for one running viewer
pub struct SceneContext {
    window: Arc<Window>,
    render_context: RenderContext,
    renderer: TerrainRenderer,
    camera: Camera,
    controls: OrbitControls,
    fov: FovPreserver,
}

impl SceneContext {
    fn new(event_loop: &ActiveEventLoop, config: &ViewerConfig) -> Result<Self> {
        let window_attrs = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        if config.window.fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let render_context = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to create render context")?;

        let camera = initial_camera(&config.camera, render_context.aspect_ratio());
        let controls = OrbitControls::new(config.camera.position, config.camera.target);
        let fov = FovPreserver::new(config.camera.fov, render_context.size.height);
        let renderer = TerrainRenderer::new(render_context.format(), config.window.background);

        Ok(Self {
            window,
            render_context,
            renderer,
            camera,
            controls,
            fov,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.render_context.resize(new_size);
        self.fov
            .apply(&mut self.camera, new_size.width, new_size.height, Vec3::ZERO);
        debug!(
            width = new_size.width,
            height = new_size.height,
            fov = self.camera.fov,
            "viewport resized"
        );
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.render_context.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.render_context.device,
            &self.render_context.queue,
            &self.camera,
            &view,
            &self.render_context.depth_view,
        );

        self.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

pub struct ViewerApp {
    config: ViewerConfig,
    scene: Option<SceneContext>,
    stats: Option<TerrainStats>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            scene: None,
            stats: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Stats of the loaded terrain, `None` until a load succeeds
    pub fn terrain_stats(&self) -> Option<&TerrainStats> {
        self.stats.as_ref()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut scene = SceneContext::new(event_loop, &self.config)?;
        info!(
            width = scene.render_context.size.width,
            height = scene.render_context.size.height,
            format = ?scene.render_context.format(),
            "viewer started"
        );

        // The scene is already live with its background; the terrain joins it when ready.
        match terrain_loader(&self.config.terrain).load() {
            Ok(loaded) => {
                match scene
                    .renderer
                    .set_terrain(&scene.render_context.device, &loaded.mesh)
                {
                    Ok(()) => {
                        info!(
                            "loaded {} ({}x{})",
                            loaded.descriptor.filename,
                            loaded.descriptor.reduced_width,
                            loaded.descriptor.reduced_height
                        );
                        self.stats = Some(loaded.stats);
                    }
                    Err(e) => error!("terrain could not be prepared for the GPU: {}", e),
                }
            }
            Err(e) => error!("terrain failed to load: {}", e),
        }

        scene.window.request_redraw();
        self.scene = Some(scene);
        Ok(())
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.scene.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                error!("{:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(scene) = &mut self.scene else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                scene.resize(new_size);
                scene.window.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                        PhysicalKey::Code(KeyCode::KeyR) => {
                            scene.controls.reset(&mut scene.camera);
                        }
                        _ => {}
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                scene.controls.mouse_input(button, state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                scene
                    .controls
                    .cursor_moved(&mut scene.camera, position.x, position.y);
            }

            WindowEvent::CursorLeft { .. } => {
                scene.controls.cursor_left();
            }

            WindowEvent::MouseWheel { delta, .. } => {
                scene.controls.mouse_wheel(&mut scene.camera, delta);
            }

            WindowEvent::RedrawRequested => match scene.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    scene.render_context.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("surface out of memory, exiting");
                    event_loop.exit();
                }
                Err(e) => warn!("surface error: {:?}", e),
            },

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(scene) = &self.scene {
            scene.window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_app_has_no_scene_or_terrain() {
        let app = ViewerApp::new(ViewerConfig::default());
        assert!(app.scene.is_none());
        assert!(app.terrain_stats().is_none());
        assert_eq!(app.config().terrain.vertical_exaggeration, 25.0);
    }
}
