//! Direct lighting toward a single light with a hard shadow test.

use super::PixelKernel;
use crate::random::Sampler;
use crate::{Color, Ray, RayStats, Scene};
use lumen_math::{Interval, Vec3};

/// Factor applied to points whose path to the light is blocked.
pub const SHADOW_ATTENUATION: f32 = 0.9;

/// Vertical white to blue gradient used for missed rays.
pub fn background_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Fast preview kernel.
///
/// Only the first light of the scene contributes. Without any light the
/// surfaces are lit by the ambient floor alone.
pub struct PreviewKernel<'a> {
    scene: &'a Scene,
    light: Option<Vec3>,
    ambient: Color,
}

impl<'a> PreviewKernel<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        let light = scene.query_lights().first().map(|l| l.origin());
        if light.is_none() {
            log::error!("Scene needs at least one light source.");
        }
        Self {
            scene,
            light,
            ambient: scene.ambient,
        }
    }
}

impl PixelKernel for PreviewKernel<'_> {
    fn trace(&self, ray: &Ray, _sampler: &mut dyn Sampler, stats: &mut RayStats) -> Color {
        stats.rays += 1;
        let Some(hit) = self
            .scene
            .intersect(ray, Interval::from_t_max(f32::INFINITY), stats)
        else {
            return background_gradient(ray);
        };

        let material = hit.material;
        if material.is_light() {
            return material.emitted_color;
        }

        let Some(light) = self.light else {
            return material.color * self.ambient;
        };

        let to_light = light - hit.p;
        let distance = to_light.length();
        let light_dir = to_light / distance;

        let lambert = hit.normal.dot(light_dir);
        let mut color = material.color * self.ambient.max(Color::splat(lambert));

        stats.rays += 1;
        let shadow_ray = Ray::new(hit.p, light_dir);
        if let Some(blocker) =
            self.scene
                .intersect(&shadow_ray, Interval::from_t_max(distance), stats)
        {
            if !blocker.material.is_light() {
                color *= SHADOW_ATTENUATION;
            }
        }

        color
    }
}
