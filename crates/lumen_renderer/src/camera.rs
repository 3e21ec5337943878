//! Camera configuration and ray generation.

use crate::hash;
use crate::random::Sampler;
use crate::Ray;
use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

/// User facing camera settings, snapshotted on every submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    pub aspect_ratio_w: f32,
    pub aspect_ratio_h: f32,
    /// Lens radius, 0 for a pinhole camera
    pub aperture: f32,
    /// Distance to the plane in focus, only used with a non-zero aperture
    pub focus_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(0.0, 1.0, 5.0),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            field_of_view: 60.0,
            aspect_ratio_w: 16.0,
            aspect_ratio_h: 9.0,
            aperture: 0.0,
            focus_distance: 10.0,
        }
    }
}

impl CameraConfig {
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    pub fn with_fov(mut self, field_of_view: f32) -> Self {
        self.field_of_view = field_of_view;
        self
    }

    pub fn with_aspect_ratio(mut self, w: f32, h: f32) -> Self {
        self.aspect_ratio_w = w;
        self.aspect_ratio_h = h;
        self
    }

    pub fn with_lens(mut self, aperture: f32, focus_distance: f32) -> Self {
        self.aperture = aperture;
        self.focus_distance = focus_distance;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio_w / self.aspect_ratio_h
    }

    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        hash::hash_vec3(&mut hasher, self.look_from);
        hash::hash_vec3(&mut hasher, self.look_at);
        hash::hash_vec3(&mut hasher, self.vup);
        hash::hash_f32s(
            &mut hasher,
            &[
                self.field_of_view,
                self.aspect_ratio_w,
                self.aspect_ratio_h,
                self.aperture,
                self.focus_distance,
            ],
        );
        hasher.finish()
    }
}

/// Ray generation basis computed from a [`CameraConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Vec3,
    upper_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let theta = config.field_of_view.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * config.aspect_ratio();

        // Camera basis
        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        let focus = if config.aperture > 0.0 {
            config.focus_distance
        } else {
            1.0
        };

        let horizontal = focus * viewport_width * u;
        let vertical = -focus * viewport_height * v;
        let upper_left = config.look_from - focus * w - horizontal / 2.0 - vertical / 2.0;

        Self {
            origin: config.look_from,
            upper_left,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: config.aperture / 2.0,
        }
    }

    /// Ray through the viewport point `(s, t)`, both in [0, 1].
    ///
    /// `s` runs left to right, `t` top to bottom (image row order).
    pub fn get_ray(&self, s: f32, t: f32, sampler: &mut dyn Sampler) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * sampler.in_unit_disk();
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let origin = self.origin + offset;
        let target = self.upper_left + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::PcgSampler;

    #[test]
    fn test_center_ray_points_at_target() {
        let config = CameraConfig::default().with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let camera = Camera::new(&config);
        let mut sampler = PcgSampler::new(7);

        let ray = camera.get_ray(0.5, 0.5, &mut sampler);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 5.0));
        assert!((ray.direction.normalize() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_corner_orientation() {
        let config = CameraConfig::default()
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_fov(90.0)
            .with_aspect_ratio(1.0, 1.0);
        let camera = Camera::new(&config);
        let mut sampler = PcgSampler::new(7);

        // Top left of the image looks up and to the left
        let ray = camera.get_ray(0.0, 0.0, &mut sampler);
        assert!((ray.direction - Vec3::new(-1.0, 1.0, -1.0)).length() < 1e-5);

        let ray = camera.get_ray(1.0, 1.0, &mut sampler);
        assert!((ray.direction - Vec3::new(1.0, -1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_lens_jitters_origin() {
        let config = CameraConfig::default()
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(0.5, 5.0);
        let camera = Camera::new(&config);
        let mut sampler = PcgSampler::new(11);

        for _ in 0..16 {
            let ray = camera.get_ray(0.5, 0.5, &mut sampler);
            assert!((ray.origin - camera.origin()).length() <= 0.25 + 1e-5);
            // Every lens sample converges on the focus plane
            let focus_point = ray.at(1.0);
            assert!(focus_point.length() < 1e-4);
        }
    }

    #[test]
    fn test_hash_changes() {
        let a = CameraConfig::default();
        let b = a.clone().with_fov(30.0);
        assert_ne!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash(), a.clone().content_hash());
    }
}
