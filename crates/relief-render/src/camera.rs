//! Perspective orbit camera

use relief_core::{mat4_mul, Vec3};

/// Pitch limit, just short of straight up/down
const MAX_PITCH: f32 = 1.56;

/// A perspective camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position
    pub position: Vec3,
    /// Target point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,

    // Orbit control state
    /// Distance from target
    pub distance: f32,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians
    pub pitch: f32,
    /// Zoom limits for `distance`
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::UP,
            fov: 75.0,
            near: 1.0,
            far: 5000.0,
            aspect: 16.0 / 9.0,
            distance: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            min_distance: 1.0,
            max_distance: 2500.0,
        };
        camera.look_from(Vec3::new(0.0, 20.0, 120.0), Vec3::ZERO);
        camera
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the camera at `position` looking at `target`, deriving orbit state from the pose
    pub fn look_from(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        self.target = target;
        self.distance = offset.length().max(f32::EPSILON);
        self.pitch = (offset.y / self.distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
        self.position = position;
    }

    /// Re-aim at a new target, keeping the current position
    pub fn look_at(&mut self, target: Vec3) {
        let position = self.position;
        self.look_from(position, target);
    }

    /// Update position based on orbit parameters
    pub fn update_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();

        self.position = self.target + Vec3::new(x, y, z);
    }

    /// Orbit horizontally (rotate around target)
    pub fn orbit_horizontal(&mut self, delta: f32) {
        self.yaw += delta;
        self.update_orbit();
    }

    /// Orbit vertically (tilt up/down)
    pub fn orbit_vertical(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-MAX_PITCH, MAX_PITCH);
        self.update_orbit();
    }

    /// Zoom in (positive) or out (negative), clamped to the distance limits
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(self.min_distance, self.max_distance);
        self.update_orbit();
    }

    /// Pan the camera (move target in the view plane)
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position).normalized();
        let right = forward.cross(&self.up).normalized();
        let up = right.cross(&forward);

        self.target = self.target + right * dx + up * dy;
        self.update_orbit();
    }

    /// Get the view matrix (4x4, column-major)
    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        let f = (self.target - self.position).normalized();
        let s = f.cross(&self.up).normalized();
        let u = s.cross(&f);

        [
            [s.x, u.x, -f.x, 0.0],
            [s.y, u.y, -f.y, 0.0],
            [s.z, u.z, -f.z, 0.0],
            [
                -s.dot(&self.position),
                -u.dot(&self.position),
                f.dot(&self.position),
                1.0,
            ],
        ]
    }

    /// Get the projection matrix (4x4, column-major), depth mapped to [0, 1]
    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        let f = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let range_inv = 1.0 / (self.near - self.far);

        [
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, self.far * range_inv, -1.0],
            [0.0, 0.0, self.near * self.far * range_inv, 0.0],
        ]
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> [[f32; 4]; 4] {
        mat4_mul(&self.projection_matrix(), &self.view_matrix())
    }
}

/// Keeps the scene's on-screen size constant as the viewport height changes.
///
/// Remembers `tan(fov / 2)` and the viewport height at creation; a taller
/// window widens the vertical field of view instead of magnifying the scene.
#[derive(Debug, Clone, Copy)]
pub struct FovPreserver {
    tan_half_fov: f32,
    reference_height: f32,
}

impl FovPreserver {
    pub fn new(fov_degrees: f32, viewport_height: u32) -> Self {
        Self {
            tan_half_fov: (fov_degrees.to_radians() / 2.0).tan(),
            reference_height: viewport_height.max(1) as f32,
        }
    }

    /// Field of view in degrees for a viewport of `height` pixels
    pub fn fov_for_height(&self, height: u32) -> f32 {
        let ratio = height.max(1) as f32 / self.reference_height;
        2.0 * (self.tan_half_fov * ratio).atan().to_degrees()
    }

    /// Apply the resize to a camera: new aspect, preserved scale, re-aimed at `scene_origin`
    pub fn apply(&self, camera: &mut Camera, width: u32, height: u32, scene_origin: Vec3) {
        camera.aspect = width.max(1) as f32 / height.max(1) as f32;
        camera.fov = self.fov_for_height(height);
        camera.look_at(scene_origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(m: &[[f32; 4]; 4], p: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (row, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|col| m[col][row] * p[col]).sum();
        }
        out
    }

    #[test]
    fn default_pose_matches_initial_view() {
        let camera = Camera::new();
        assert_eq!(camera.position, Vec3::new(0.0, 20.0, 120.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert_eq!(camera.fov, 75.0);
        assert!((camera.distance - (20.0f32 * 20.0 + 120.0 * 120.0).sqrt()).abs() < 1e-3);
    }

    #[test]
    fn orbit_state_round_trips_pose() {
        let mut camera = Camera::new();
        camera.look_from(Vec3::new(30.0, 40.0, -50.0), Vec3::new(1.0, 2.0, 3.0));
        let before = camera.position;
        camera.update_orbit();
        assert!((camera.position - before).length() < 1e-3);
    }

    #[test]
    fn zoom_respects_limits() {
        let mut camera = Camera::new();
        camera.zoom(1.0e6);
        assert_eq!(camera.distance, camera.min_distance);
        camera.zoom(-1.0e6);
        assert_eq!(camera.distance, camera.max_distance);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new();
        camera.orbit_vertical(10.0);
        assert!(camera.pitch <= MAX_PITCH);
        camera.orbit_vertical(-20.0);
        assert!(camera.pitch >= -MAX_PITCH);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::new();
        let clip = transform(&camera.view_projection_matrix(), [0.0, 0.0, 0.0, 1.0]);
        assert!((clip[0] / clip[3]).abs() < 1e-4);
        assert!((clip[1] / clip[3]).abs() < 1e-4);
        let depth = clip[2] / clip[3];
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn near_and_far_map_to_depth_bounds() {
        let mut camera = Camera::new();
        camera.look_from(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let proj = camera.projection_matrix();

        let near = transform(&proj, [0.0, 0.0, -camera.near, 1.0]);
        let far = transform(&proj, [0.0, 0.0, -camera.far, 1.0]);
        assert!((near[2] / near[3]).abs() < 1e-5);
        assert!((far[2] / far[3] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn fov_unchanged_at_reference_height() {
        let preserver = FovPreserver::new(75.0, 720);
        assert!((preserver.fov_for_height(720) - 75.0).abs() < 1e-3);
    }

    #[test]
    fn taller_viewport_widens_fov() {
        let preserver = FovPreserver::new(75.0, 720);
        let taller = preserver.fov_for_height(1440);
        let shorter = preserver.fov_for_height(360);
        assert!(taller > 75.0 && taller < 180.0);
        assert!(shorter < 75.0 && shorter > 0.0);

        // tan(fov/2) scales linearly with height
        let expected = (75.0f32.to_radians() / 2.0).tan() * 2.0;
        assert!(((taller.to_radians() / 2.0).tan() - expected).abs() < 1e-4);
    }

    #[test]
    fn apply_updates_aspect_and_aims_at_origin() {
        let preserver = FovPreserver::new(75.0, 600);
        let mut camera = Camera::new();
        camera.target = Vec3::new(5.0, 0.0, 0.0);

        preserver.apply(&mut camera, 1200, 600, Vec3::ZERO);
        assert_eq!(camera.aspect, 2.0);
        assert!((camera.fov - 75.0).abs() < 1e-3);
        assert_eq!(camera.target, Vec3::ZERO);
    }
}
