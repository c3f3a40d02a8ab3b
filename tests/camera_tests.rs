use glam::Vec3;
use progressive_tracer::camera::{Camera, CameraSettings};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{FRAC_PI_2, TAU};

#[cfg(test)]
mod camera_property_tests {
    use super::*;

    fn camera_with(settings: CameraSettings) -> Camera {
        Camera::new(&settings)
    }

    #[test]
    fn test_right_is_orthogonal_to_horizontal_look() {
        let mut camera = Camera::default();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..1000 {
            camera.add_rotation(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0));

            let look = camera.look_direction();
            let horizontal = Vec3::new(look.x, 0.0, look.z);
            let dot = camera.right().dot(horizontal);
            assert!(dot.abs() < 1e-5, "right . look_h = {} at yaw {}", dot, camera.yaw());
        }
    }

    #[test]
    fn test_angles_stay_in_range_after_many_rotations() {
        let mut camera = Camera::default();
        let limit = camera.pitch_limit();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..10_000 {
            camera.add_rotation(rng.random_range(-5000.0..5000.0), rng.random_range(-5000.0..5000.0));

            assert!(camera.pitch() >= -limit && camera.pitch() <= limit, "pitch {}", camera.pitch());
            assert!(camera.yaw() >= 0.0 && camera.yaw() < TAU, "yaw {}", camera.yaw());
        }
    }

    #[test]
    fn test_up_stays_unit_length() {
        let mut camera = Camera::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..10_000 {
            camera.add_rotation(rng.random_range(-300.0..300.0), rng.random_range(-300.0..300.0));
        }

        let up = camera.up();
        assert!((up.length() - 1.0).abs() < 1e-4, "|up| = {}", up.length());
        assert!((camera.look_direction().length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_limit_respects_margin() {
        let camera = camera_with(CameraSettings {
            pitch_margin: 0.25,
            ..Default::default()
        });
        assert!((camera.pitch_limit() - (FRAC_PI_2 - 0.25)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_move_is_noop() {
        let mut camera = Camera::default();
        let before = camera.position();

        for _ in 0..100 {
            camera.move_by(0.0, 0.0, 0.0);
        }

        assert_eq!(camera.position(), before);
    }

    #[test]
    fn test_move_distance_equals_speed() {
        let mut camera = camera_with(CameraSettings {
            move_speed: 0.37,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..200 {
            camera.add_rotation(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0));
            let strafe = rng.random_range(-1i32..=1) as f32;
            let forward = rng.random_range(-1i32..=1) as f32;
            let vertical = rng.random_range(-1i32..=1) as f32;

            let before = camera.position();
            camera.move_by(strafe, forward, vertical);
            let moved = camera.position().distance(before);

            if strafe == 0.0 && forward == 0.0 && vertical == 0.0 {
                assert_eq!(moved, 0.0);
            } else {
                assert!((moved - 0.37).abs() < 1e-4, "moved {}", moved);
            }
        }
    }

    #[test]
    fn test_forward_move_follows_initial_heading() {
        let mut camera = camera_with(CameraSettings {
            move_speed: 1.0,
            ..Default::default()
        });
        let start = camera.position();
        let heading = camera.forward();

        camera.move_by(0.0, 1.0, 0.0);

        let offset = camera.position() - start;
        assert!((offset - heading).length() < 1e-5, "offset {:?}", offset);
        // Default heading faces -Z
        assert!((heading - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_vertical_move_ignores_pitch() {
        let mut camera = Camera::default();
        camera.add_rotation(0.0, 400.0);
        let start = camera.position();

        camera.move_by(0.0, 0.0, 1.0);

        let offset = camera.position() - start;
        assert!(offset.x.abs() < 1e-6 && offset.z.abs() < 1e-6);
        assert!((offset.y - camera.move_speed()).abs() < 1e-6);
    }
}
