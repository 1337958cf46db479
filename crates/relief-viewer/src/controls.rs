//! Mouse orbit controls for the viewer camera
//!
//! Left drag orbits around the target, right drag pans, the wheel zooms.
//! Pan and zoom steps scale with the current distance so the terrain moves
//! at the same on-screen rate whether the camera is close or far.

use relief_core::Vec3;
use relief_render::Camera;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Radians per pixel of drag
const ROTATE_SPEED: f32 = 0.01;
/// Fraction of the camera distance moved per pixel of drag
const PAN_SPEED: f32 = 0.002;
/// Fraction of the camera distance moved per wheel line
const ZOOM_SPEED: f32 = 0.1;
/// Pixel-precise trackpads report in pixels; treat this many as one line
const PIXELS_PER_LINE: f32 = 100.0;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    rotating: bool,
    panning: bool,
    last_cursor: Option<(f64, f64)>,
    home_position: Vec3,
    home_target: Vec3,
}

impl OrbitControls {
    /// `home_*` is the pose restored by [`OrbitControls::reset`]
    pub fn new(home_position: Vec3, home_target: Vec3) -> Self {
        Self {
            rotating: false,
            panning: false,
            last_cursor: None,
            home_position,
            home_target,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.rotating || self.panning
    }

    pub fn mouse_input(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right => self.panning = pressed,
            _ => {}
        }
    }

    /// Returns true if the camera moved
    pub fn cursor_moved(&mut self, camera: &mut Camera, x: f64, y: f64) -> bool {
        let mut moved = false;
        if let Some((last_x, last_y)) = self.last_cursor {
            let dx = (x - last_x) as f32;
            let dy = (y - last_y) as f32;

            if self.rotating {
                camera.orbit_horizontal(-dx * ROTATE_SPEED);
                camera.orbit_vertical(-dy * ROTATE_SPEED);
                moved = true;
            }

            if self.panning {
                let scale = camera.distance * PAN_SPEED;
                camera.pan(-dx * scale, dy * scale);
                moved = true;
            }
        }
        self.last_cursor = Some((x, y));
        moved
    }

    pub fn mouse_wheel(&mut self, camera: &mut Camera, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        };
        self.zoom(camera, lines);
    }

    /// Positive `lines` moves toward the target
    pub fn zoom(&mut self, camera: &mut Camera, lines: f32) {
        camera.zoom(lines * camera.distance * ZOOM_SPEED);
    }

    pub fn cursor_left(&mut self) {
        self.last_cursor = None;
    }

    pub fn reset(&mut self, camera: &mut Camera) {
        self.rotating = false;
        self.panning = false;
        camera.look_from(self.home_position, self.home_target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (OrbitControls, Camera) {
        let camera = Camera::new();
        let controls = OrbitControls::new(camera.position, camera.target);
        (controls, camera)
    }

    #[test]
    fn moving_without_buttons_does_nothing() {
        let (mut controls, mut camera) = setup();
        let before = camera.position;
        assert!(!controls.cursor_moved(&mut camera, 10.0, 10.0));
        assert!(!controls.cursor_moved(&mut camera, 50.0, 80.0));
        assert_eq!(camera.position, before);
    }

    #[test]
    fn left_drag_orbits_keeping_distance() {
        let (mut controls, mut camera) = setup();
        let distance = camera.distance;
        controls.cursor_moved(&mut camera, 100.0, 100.0);
        controls.mouse_input(MouseButton::Left, ElementState::Pressed);
        assert!(controls.cursor_moved(&mut camera, 160.0, 100.0));

        assert_eq!(camera.target, Vec3::ZERO);
        assert!(camera.position.x.abs() > 1.0);
        assert!(((camera.position - camera.target).length() - distance).abs() < 1e-3);

        controls.mouse_input(MouseButton::Left, ElementState::Released);
        assert!(!controls.is_dragging());
    }

    #[test]
    fn right_drag_pans_target() {
        let (mut controls, mut camera) = setup();
        controls.cursor_moved(&mut camera, 0.0, 0.0);
        controls.mouse_input(MouseButton::Right, ElementState::Pressed);
        controls.cursor_moved(&mut camera, 40.0, 0.0);
        assert!(camera.target.x < 0.0);
        assert!(camera.target.y.abs() < 1e-3);
    }

    #[test]
    fn wheel_zooms_proportionally() {
        let (mut controls, mut camera) = setup();
        let distance = camera.distance;
        controls.mouse_wheel(&mut camera, MouseScrollDelta::LineDelta(0.0, 1.0));
        assert!((camera.distance - distance * 0.9).abs() < 1e-3);
        controls.zoom(&mut camera, -2.0);
        assert!(camera.distance > distance * 0.9);
    }

    #[test]
    fn reset_restores_home_pose() {
        let (mut controls, mut camera) = setup();
        let home = camera.position;
        controls.mouse_input(MouseButton::Right, ElementState::Pressed);
        controls.cursor_moved(&mut camera, 0.0, 0.0);
        controls.cursor_moved(&mut camera, 25.0, 30.0);
        controls.zoom(&mut camera, 3.0);

        controls.reset(&mut camera);
        assert!((camera.position - home).length() < 1e-3);
        assert_eq!(camera.target, Vec3::ZERO);
        assert!(!controls.is_dragging());
    }
}
