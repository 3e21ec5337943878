//! Path traced reference kernel.

use super::PixelKernel;
use crate::random::Sampler;
use crate::tone_mapping::ToneMapper;
use crate::{palette, Color, Ray, RayStats, Scene};
use lumen_math::{optics, Interval, Onb, Vec3};

/// Throughput below this (squared length) ends the path.
const MIN_THROUGHPUT_SQ: f32 = 0.1;

const SKY_BRIGHTNESS: f32 = 0.4;

/// Sky seen by escaping rays: white horizon blending into white-blue zenith.
pub fn environment_light(ray: &Ray) -> Color {
    let t = optics::smoothstep(-0.6, 0.2, ray.direction.normalize().y);
    let light = optics::lerp(palette::WHITE, palette::WHITE_BLUE, t);
    light.clamp(Color::ZERO, Color::ONE) * SKY_BRIGHTNESS
}

/// Monte Carlo path tracer.
///
/// At each bounce exactly one response is drawn from the material: gloss with
/// `gloss_probability`, refraction with `refraction_probability`, diffuse
/// otherwise.
pub struct ReferenceKernel<'a> {
    scene: &'a Scene,
    max_bounces: u32,
    white_point: f32,
}

impl<'a> ReferenceKernel<'a> {
    pub fn new(scene: &'a Scene, max_bounces: u32, white_point: f32) -> Self {
        Self {
            scene,
            max_bounces,
            white_point,
        }
    }
}

impl PixelKernel for ReferenceKernel<'_> {
    fn trace(&self, ray: &Ray, sampler: &mut dyn Sampler, stats: &mut RayStats) -> Color {
        let mut ray = *ray;
        // Product of surface colours along the path
        let mut throughput = Color::ONE;
        // Light gathered so far, unbounded
        let mut incoming = Color::ZERO;

        for _ in 0..self.max_bounces {
            stats.rays += 1;
            let Some(hit) = self
                .scene
                .intersect(&ray, Interval::from_t_max(f32::INFINITY), stats)
            else {
                incoming += environment_light(&ray) * throughput;
                break;
            };

            let material = hit.material;
            if material.is_light() {
                incoming += material.emitted_color * throughput;
                break;
            }

            if throughput.length_squared() < MIN_THROUGHPUT_SQ {
                break;
            }

            let unit_direction = ray.direction.normalize();
            let diffuse_dir = Onb::from_w(hit.normal).local(sampler.cosine_direction());
            let specular_dir = optics::reflect(unit_direction, hit.normal);

            let choice = sampler.unit();
            let direction = if choice < material.gloss_probability {
                throughput *= material.gloss_color;
                optics::lerp(diffuse_dir, specular_dir, material.smoothness)
            } else if choice < material.gloss_probability + material.refraction_probability {
                let ratio = if hit.front_face {
                    1.0 / material.refraction_index
                } else {
                    material.refraction_index
                };

                let cos_theta = (-unit_direction).dot(hit.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
                let cannot_refract = ratio * sin_theta > 1.0;

                let scattered = if cannot_refract
                    || optics::reflectance(cos_theta, ratio) > sampler.unit()
                {
                    specular_dir
                } else {
                    optics::refract(unit_direction, hit.normal, ratio)
                };

                throughput *= material.color;
                scattered + diffuse_dir * (1.0 - material.smoothness)
            } else {
                throughput *= material.color;
                // Smooth materials without a separate gloss lobe blend toward the mirror
                if material.gloss_probability > 0.0 {
                    diffuse_dir
                } else {
                    optics::lerp(diffuse_dir, specular_dir, material.smoothness)
                }
            };

            ray = Ray::new(hit.p, direction);
        }

        assert!(incoming.is_finite(), "non-finite radiance {incoming}");
        incoming
    }

    fn tone_map(&self, hdr: Color) -> Color {
        ToneMapper::ReinhardExtended.apply(hdr, self.white_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{PcgSampler, RandomCache};
    use crate::{Material, MeshData, Sphere, StaticMesh};
    use std::sync::Arc;

    fn trace(kernel: &ReferenceKernel<'_>, ray: &Ray, seed: u32) -> Color {
        kernel.trace(ray, &mut PcgSampler::new(seed), &mut RayStats::default())
    }

    #[test]
    fn test_escaping_ray_sees_sky() {
        let scene = Scene::new("empty");
        let kernel = ReferenceKernel::new(&scene, 7, 1.0);

        let up = Ray::new(Vec3::ZERO, Vec3::Y);
        let down = Ray::new(Vec3::ZERO, Vec3::NEG_Y);
        assert!((trace(&kernel, &up, 1) - palette::WHITE_BLUE * SKY_BRIGHTNESS).length() < 1e-6);
        assert!((trace(&kernel, &down, 1) - palette::WHITE * SKY_BRIGHTNESS).length() < 1e-6);
    }

    #[test]
    fn test_light_hit_returns_emission() {
        let mut scene = Scene::new("lamp");
        scene.add(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::light("lamp", Color::splat(3.0))),
        ));
        let kernel = ReferenceKernel::new(&scene, 7, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(trace(&kernel, &ray, 3), Color::splat(3.0));
    }

    #[test]
    fn test_zero_bounces_is_black() {
        let scene = Scene::new("empty");
        let kernel = ReferenceKernel::new(&scene, 0, 1.0);
        assert_eq!(trace(&kernel, &Ray::new(Vec3::ZERO, Vec3::Y), 0), Color::ZERO);
    }

    #[test]
    fn test_diffuse_floor_under_sky_is_dimmer_than_sky() {
        let mut scene = Scene::new("floor");
        scene.add(
            StaticMesh::new(
                Arc::new(MeshData::quad("floor")),
                Arc::new(Material::diffuse("grey", Color::splat(0.5))),
            )
            .with_transform(Vec3::ZERO, 0.0, 100.0),
        );
        let kernel = ReferenceKernel::new(&scene, 4, 1.0);
        let cache = RandomCache::with_sizes(42, 4096, 1024);
        let mut sampler = cache.sampler(1);

        let ray = Ray::new(Vec3::new(0.3, 2.0, 0.1), Vec3::NEG_Y);
        let n = 256;
        let mut sum = Color::ZERO;
        for _ in 0..n {
            let c = kernel.trace(&ray, &mut sampler, &mut RayStats::default());
            assert!(c.is_finite());
            sum += c;
        }
        let mean = sum / n as f32;
        // One diffuse bounce into the upper sky, scaled by the albedo
        assert!(mean.x > 0.0);
        assert!(mean.z <= 0.5 * SKY_BRIGHTNESS + 1e-4);
    }

    #[test]
    fn test_glass_sphere_stays_finite() {
        let mut scene = Scene::new("glass");
        scene.add(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::glass("glass", Color::splat(0.95), 1.0, 1.5)),
        ));
        let kernel = ReferenceKernel::new(&scene, 8, 1.0);
        for seed in 0..64 {
            let ray = Ray::new(Vec3::new(0.1, 0.2, 5.0), Vec3::NEG_Z);
            let mut stats = RayStats::default();
            let c = kernel.trace(&ray, &mut PcgSampler::new(seed), &mut stats);
            assert!(c.is_finite());
            assert!(c.min_element() >= 0.0);
            assert!(stats.rays >= 1 && stats.rays <= 8);
        }
    }

    #[test]
    fn test_tone_map_uses_white_point() {
        let scene = Scene::new("empty");
        let kernel = ReferenceKernel::new(&scene, 1, 2.0);
        assert!((kernel.tone_map(Color::splat(2.0)) - Color::ONE).length() < 1e-5);
    }
}
