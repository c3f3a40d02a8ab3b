use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

pub const DEFAULT_MOVE_SPEED: f32 = 0.1;
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.0025;
pub const DEFAULT_PITCH_MARGIN: f32 = 0.1;

/// Tunables that differ between renderer presets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
    /// Distance kept between pitch and ±π/2
    pub pitch_margin: f32,
    pub start_position: [f32; 3],
    pub start_yaw: f32,
    pub start_pitch: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            pitch_margin: DEFAULT_PITCH_MARGIN,
            start_position: [-1.0, 1.5, -2.0],
            start_yaw: std::f32::consts::PI,
            start_pitch: 0.0,
        }
    }
}

/// Snapshot of everything that makes two rendered frames comparable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// First-person camera.
///
/// Only position and the (yaw, pitch) pair are stored. Every basis vector is
/// recomputed from the angles on demand, so the frame handed to the shader is
/// orthonormal no matter how many updates have been applied.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    move_speed: f32,
    mouse_sensitivity: f32,
    pitch_limit: f32,
}

impl Camera {
    pub fn new(settings: &CameraSettings) -> Self {
        let pitch_limit = FRAC_PI_2 - settings.pitch_margin;
        Self {
            position: Vec3::from_array(settings.start_position),
            yaw: wrap_angle(settings.start_yaw),
            pitch: settings.start_pitch.clamp(-pitch_limit, pitch_limit),
            move_speed: settings.move_speed,
            mouse_sensitivity: settings.mouse_sensitivity,
            pitch_limit,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Largest absolute pitch the camera will accept
    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    /// Horizontal walking direction; pitch does not affect it
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    pub fn look_direction(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
    }

    pub fn right(&self) -> Vec3 {
        let angle = self.yaw - FRAC_PI_2;
        Vec3::new(angle.sin(), 0.0, angle.cos())
    }

    pub fn up(&self) -> Vec3 {
        self.look_direction().cross(self.right())
    }

    /// Move along the horizontal basis plus world Y.
    ///
    /// The combined offset is normalized, so diagonal input is not faster
    /// than a single axis. Input that sums to zero leaves the camera in place.
    pub fn move_by(&mut self, strafe: f32, forward: f32, vertical: f32) {
        let forward_axis = self.forward();
        let right_axis = Vec3::new(-forward_axis.z, 0.0, forward_axis.x);

        let mut offset = right_axis * strafe + forward_axis * forward;
        offset.y += vertical;

        if offset.length_squared() <= f32::EPSILON * f32::EPSILON {
            return;
        }

        self.position += offset.normalize() * self.move_speed;
    }

    /// Apply a pointer delta in device units
    pub fn add_rotation(&mut self, dx: f32, dy: f32) {
        let dx = dx * self.mouse_sensitivity;
        let dy = dy * self.mouse_sensitivity;

        self.yaw = wrap_angle(self.yaw + dx);
        self.pitch = (self.pitch + dy).clamp(-self.pitch_limit, self.pitch_limit);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraSettings::default())
    }
}

/// Wrap into [0, 2π)
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU in f32
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn unit_speed_camera() -> Camera {
        Camera::new(&CameraSettings {
            move_speed: 1.0,
            ..CameraSettings::default()
        })
    }

    #[test]
    fn test_default_pose() {
        let camera = Camera::default();
        assert_eq!(camera.position(), Vec3::new(-1.0, 1.5, -2.0));
        assert!((camera.yaw() - std::f32::consts::PI).abs() < EPS);
        assert_eq!(camera.pitch(), 0.0);
    }

    #[test]
    fn test_look_direction_at_zero_orientation() {
        let camera = Camera::new(&CameraSettings {
            start_yaw: 0.0,
            start_pitch: 0.0,
            ..CameraSettings::default()
        });
        let look = camera.look_direction();
        assert!((look - Vec3::Z).length() < EPS);
        assert!((camera.right() - Vec3::NEG_X).length() < EPS);
    }

    #[test]
    fn test_up_is_cross_of_look_and_right() {
        let mut camera = Camera::default();
        camera.add_rotation(123.0, -45.0);
        let expected = camera.look_direction().cross(camera.right());
        assert!((camera.up() - expected).length() < EPS);
        assert!(camera.up().dot(camera.look_direction()).abs() < EPS);
        assert!(camera.up().dot(camera.right()).abs() < EPS);
    }

    #[test]
    fn test_zero_move_is_noop() {
        let mut camera = unit_speed_camera();
        let before = camera.position();
        camera.move_by(0.0, 0.0, 0.0);
        assert_eq!(camera.position(), before);
    }

    #[test]
    fn test_opposing_input_cancels() {
        let mut camera = unit_speed_camera();
        let before = camera.position();
        camera.move_by(1.0, 1.0, 0.0);
        camera.move_by(-1.0, -1.0, 0.0);
        assert!((camera.position() - before).length() < EPS);

        let before = camera.position();
        camera.move_by(0.0, 1.0 - 1.0, 0.0);
        assert_eq!(camera.position(), before);
    }

    #[test]
    fn test_forward_move_follows_yaw() {
        let mut camera = unit_speed_camera();
        let start = camera.position();
        let axis = camera.forward();
        camera.move_by(0.0, 1.0, 0.0);
        assert!((camera.position() - (start + axis)).length() < EPS);
    }

    #[test]
    fn test_pitch_does_not_change_walk_speed() {
        let mut camera = unit_speed_camera();
        camera.add_rotation(0.0, 400.0);
        assert!(camera.pitch() > 0.5);

        let start = camera.position();
        camera.move_by(0.0, 1.0, 0.0);
        let delta = camera.position() - start;
        assert!(delta.y.abs() < EPS);
        assert!((delta.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_diagonal_move_is_normalized() {
        let mut camera = unit_speed_camera();
        let start = camera.position();
        camera.move_by(1.0, 1.0, 1.0);
        assert!(((camera.position() - start).length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_vertical_move_ignores_orientation() {
        let mut camera = unit_speed_camera();
        camera.add_rotation(77.0, -200.0);
        let start = camera.position();
        camera.move_by(0.0, 0.0, -1.0);
        assert!((camera.position() - (start - Vec3::Y)).length() < EPS);
    }

    #[test]
    fn test_rotation_scales_by_sensitivity() {
        let mut camera = Camera::new(&CameraSettings {
            start_yaw: 1.0,
            start_pitch: 0.0,
            mouse_sensitivity: 0.01,
            ..CameraSettings::default()
        });
        camera.add_rotation(10.0, 5.0);
        assert!((camera.yaw() - 1.1).abs() < EPS);
        assert!((camera.pitch() - 0.05).abs() < EPS);
    }

    #[test]
    fn test_pitch_clamps_at_limits() {
        let mut camera = Camera::default();
        camera.add_rotation(0.0, 1.0e6);
        assert!((camera.pitch() - (FRAC_PI_2 - DEFAULT_PITCH_MARGIN)).abs() < EPS);

        camera.add_rotation(0.0, -1.0e7);
        assert!((camera.pitch() + (FRAC_PI_2 - DEFAULT_PITCH_MARGIN)).abs() < EPS);
    }

    #[test]
    fn test_yaw_wraps_in_both_directions() {
        let mut camera = Camera::new(&CameraSettings {
            start_yaw: 0.0,
            mouse_sensitivity: 1.0,
            ..CameraSettings::default()
        });
        camera.add_rotation(-0.5, 0.0);
        assert!((camera.yaw() - (TAU - 0.5)).abs() < 1e-4);

        camera.add_rotation(1.0, 0.0);
        assert!((camera.yaw() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_angle_never_returns_tau() {
        assert_eq!(wrap_angle(-1.0e-9), 0.0);
        assert!(wrap_angle(-TAU * 3.0 - 0.25) < TAU);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_start_pitch_is_clamped() {
        let camera = Camera::new(&CameraSettings {
            start_pitch: 3.0,
            ..CameraSettings::default()
        });
        assert!((camera.pitch() - camera.pitch_limit()).abs() < EPS);
    }

    #[test]
    fn test_pose_tracks_mutation() {
        let mut camera = Camera::default();
        let before = camera.pose();
        camera.add_rotation(0.0, 0.0);
        assert_eq!(camera.pose(), before);

        camera.add_rotation(1.0, 0.0);
        assert_ne!(camera.pose(), before);
    }
}
