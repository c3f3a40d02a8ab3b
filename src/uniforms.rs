use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::camera::Camera;
use crate::types::TraceUniform;

/// Offset between the two components of a seed pair
const SEED_SPREAD: f32 = 999.0;

/// Per-frame random seeds for stochastic sampling in the shader
#[derive(Debug, Clone)]
pub struct SeedSource {
    rng: StdRng,
}

impl SeedSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Two seed pairs, each `(r, r + 999)` for a fresh `r` in [0, 1)
    pub fn next_pair(&mut self) -> (Vec2, Vec2) {
        let r1: f32 = self.rng.random();
        let r2: f32 = self.rng.random();
        (
            Vec2::new(r1, r1 + SEED_SPREAD),
            Vec2::new(r2, r2 + SEED_SPREAD),
        )
    }
}

/// Host-side view of everything the trace shader reads for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderUniforms {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub fov: f32,
    pub viewport_size: Vec2,
    /// Blend weight of the new sample, `1 / frame_count` when accumulating
    pub sample_part: f32,
    pub seed1: Vec2,
    pub seed2: Vec2,
    pub sample_count: u32,
    pub time: f32,
}

impl ShaderUniforms {
    pub fn from_camera(
        camera: &Camera,
        fov: f32,
        viewport_size: Vec2,
        sample_part: f32,
        sample_count: u32,
        seeds: &mut SeedSource,
        time: f32,
    ) -> Self {
        let (seed1, seed2) = seeds.next_pair();
        Self {
            position: camera.position(),
            direction: camera.look_direction(),
            up: camera.up(),
            right: camera.right(),
            fov,
            viewport_size,
            sample_part,
            seed1,
            seed2,
            sample_count,
            time,
        }
    }

    pub fn to_gpu(&self) -> TraceUniform {
        TraceUniform {
            position: self.position.to_array(),
            fov: self.fov,
            direction: self.direction.to_array(),
            sample_part: self.sample_part,
            up: self.up.to_array(),
            time: self.time,
            right: self.right.to_array(),
            sample_count: self.sample_count,
            viewport_size: self.viewport_size.to_array(),
            seed1: self.seed1.to_array(),
            seed2: self.seed2.to_array(),
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_pairs_are_offset() {
        let mut seeds = SeedSource::from_seed(7);
        for _ in 0..100 {
            let (a, b) = seeds.next_pair();
            assert!((0.0..1.0).contains(&a.x));
            assert!((0.0..1.0).contains(&b.x));
            assert!((a.y - a.x - SEED_SPREAD).abs() < 1e-3);
            assert!((b.y - b.x - SEED_SPREAD).abs() < 1e-3);
        }
    }

    #[test]
    fn test_seeds_refresh_every_frame() {
        let mut seeds = SeedSource::from_seed(42);
        let first = seeds.next_pair();
        let second = seeds.next_pair();
        assert_ne!(first, second);
    }

    #[test]
    fn test_seeded_source_is_deterministic() {
        let mut a = SeedSource::from_seed(3);
        let mut b = SeedSource::from_seed(3);
        assert_eq!(a.next_pair(), b.next_pair());
    }

    #[test]
    fn test_uniforms_follow_camera() {
        let camera = Camera::default();
        let mut seeds = SeedSource::from_seed(1);
        let uniforms = ShaderUniforms::from_camera(
            &camera,
            1.2,
            Vec2::new(640.0, 480.0),
            0.25,
            4,
            &mut seeds,
            3.0,
        );

        assert_eq!(uniforms.position, camera.position());
        assert_eq!(uniforms.direction, camera.look_direction());
        assert_eq!(uniforms.up, camera.up());

        let gpu = uniforms.to_gpu();
        assert_eq!(gpu.sample_part, 0.25);
        assert_eq!(gpu.sample_count, 4);
        assert_eq!(gpu.viewport_size, [640.0, 480.0]);
        assert_eq!(gpu.fov, 1.2);
        assert_eq!(gpu.time, 3.0);
    }
}
